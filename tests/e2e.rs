//! End-to-end integration tests for tometext.
//!
//! These drive the full orchestration — folder scan, skip check, extraction
//! loop, normalisation, rewrite, output write — through injected stub engines,
//! so they need neither a pdfium build nor a tesseract install and always run
//! in CI.

use image::DynamicImage;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tometext::{
    BatchConfig, Converter, CorrectionError, Corrector, FileOutcome, OcrEngine, OcrError,
    PageError, Rasterizer, TomeError, UnicodeSegmenter, Whitelist,
};

// ── Stub engines ─────────────────────────────────────────────────────────────

/// Rasteriser that hands back a fixed number of 1×1 images per document.
struct FixedPageRasterizer {
    pages: usize,
}

impl Rasterizer for FixedPageRasterizer {
    fn rasterize(&self, _pdf_path: &Path) -> Result<Vec<DynamicImage>, TomeError> {
        Ok((0..self.pages).map(|_| DynamicImage::new_rgb8(1, 1)).collect())
    }
}

/// Rasteriser that fails for files whose name contains a marker and succeeds
/// for everything else.
struct SelectiveRasterizer {
    fail_marker: &'static str,
    pages: usize,
}

impl Rasterizer for SelectiveRasterizer {
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<DynamicImage>, TomeError> {
        let name = pdf_path.file_name().unwrap_or_default().to_string_lossy();
        if name.contains(self.fail_marker) {
            return Err(TomeError::Rasterize {
                path: pdf_path.to_path_buf(),
                detail: "simulated corrupt PDF".into(),
            });
        }
        Ok((0..self.pages).map(|_| DynamicImage::new_rgb8(1, 1)).collect())
    }
}

/// OCR engine that replays a per-page script (`None` = failure) and counts
/// invocations so tests can assert OCR never ran.
struct ScriptedOcr {
    pages: Vec<Option<String>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedOcr {
    fn new(pages: &[Option<&str>]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let ocr = Self {
            pages: pages.iter().map(|p| p.map(str::to_string)).collect(),
            calls: Arc::clone(&calls),
        };
        (ocr, calls)
    }
}

impl OcrEngine for ScriptedOcr {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(idx) {
            Some(Some(text)) => Ok(text.clone()),
            Some(None) => Err(OcrError::Scratch("scripted page failure".into())),
            None => Ok(String::new()),
        }
    }
}

/// Corrector with a fixed lowercase typo→fix table.
struct MapCorrector(HashMap<String, String>);

impl Corrector for MapCorrector {
    fn correct(&self, word: &str) -> Result<Option<String>, CorrectionError> {
        Ok(self.0.get(&word.to_lowercase()).cloned())
    }
}

fn book_corrector() -> MapCorrector {
    MapCorrector(
        [("helo", "hello"), ("wrold", "world"), ("attcks", "attacks")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

// ── Test helpers ─────────────────────────────────────────────────────────────

fn converter(
    input: &Path,
    output: &Path,
    raster: Box<dyn Rasterizer>,
    ocr: Box<dyn OcrEngine>,
    whitelist: Whitelist,
) -> Converter {
    let config = BatchConfig::builder()
        .input_dir(input)
        .output_dir(output)
        .build()
        .expect("valid config");
    Converter::with_engines(
        config,
        raster,
        ocr,
        Box::new(UnicodeSegmenter),
        Box::new(book_corrector()),
        whitelist,
    )
}

/// Create an empty placeholder PDF file (the stub rasteriser never reads it).
fn touch_pdf(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"%PDF-1.4 placeholder").unwrap();
}

// ── Scenarios ────────────────────────────────────────────────────────────────

/// The full book1 scenario: two OCR'd pages, one whitelisted monster name,
/// three typos, page markers and paragraph breaks in the output.
#[test]
fn end_to_end_book1() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    touch_pdf(input.path(), "book1.pdf");

    let (ocr, _) = ScriptedOcr::new(&[Some("Helo Wrold"), Some("goblin attcks")]);
    let conv = converter(
        input.path(),
        output.path(),
        Box::new(FixedPageRasterizer { pages: 2 }),
        Box::new(ocr),
        Whitelist::from_terms(["goblin"]),
    );

    let summary = conv.convert_folder().expect("batch should run");
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.rewrite.corrected, 3, "Helo, Wrold., attcks.");
    assert_eq!(summary.rewrite.whitelisted, 1, "goblin");
    assert_eq!(summary.rewrite.guarded, 2, "the two page numbers");

    let text = std::fs::read_to_string(output.path().join("book1.txt")).unwrap();
    assert_eq!(
        text,
        "--- Page 1 ---.\n\nHello World.\n\n--- Page 2 ---.\n\ngoblin attacks."
    );
}

/// Pre-created output: OCR must never be invoked and the file is untouched.
#[test]
fn existing_output_skips_document_entirely() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    touch_pdf(input.path(), "book1.pdf");
    std::fs::write(output.path().join("book1.txt"), "hand-written contents").unwrap();

    let (ocr, calls) = ScriptedOcr::new(&[Some("should never be seen")]);
    let conv = converter(
        input.path(),
        output.path(),
        Box::new(FixedPageRasterizer { pages: 1 }),
        Box::new(ocr),
        Whitelist::from_terms(Vec::<&str>::new()),
    );

    let summary = conv.convert_folder().unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.written, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "OCR ran for a skipped file");
    assert_eq!(
        std::fs::read_to_string(output.path().join("book1.txt")).unwrap(),
        "hand-written contents"
    );
}

/// Running the folder twice changes nothing the second time.
#[test]
fn second_run_is_idempotent() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    touch_pdf(input.path(), "book1.pdf");
    touch_pdf(input.path(), "book2.pdf");

    let (ocr, calls) = ScriptedOcr::new(&[
        Some("first book text"),
        Some("second book text"),
    ]);
    let conv = converter(
        input.path(),
        output.path(),
        Box::new(FixedPageRasterizer { pages: 1 }),
        Box::new(ocr),
        Whitelist::from_terms(Vec::<&str>::new()),
    );

    let first = conv.convert_folder().unwrap();
    assert_eq!(first.written, 2);
    let calls_after_first = calls.load(Ordering::SeqCst);
    let contents_after_first: Vec<String> = ["book1.txt", "book2.txt"]
        .iter()
        .map(|n| std::fs::read_to_string(output.path().join(n)).unwrap())
        .collect();

    let second = conv.convert_folder().unwrap();
    assert_eq!(second.written, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(
        calls.load(Ordering::SeqCst),
        calls_after_first,
        "OCR ran again on the second pass"
    );
    let contents_after_second: Vec<String> = ["book1.txt", "book2.txt"]
        .iter()
        .map(|n| std::fs::read_to_string(output.path().join(n)).unwrap())
        .collect();
    assert_eq!(contents_after_first, contents_after_second);
}

/// A failing middle page contributes an empty section; markers stay ordered.
#[test]
fn failing_middle_page_keeps_marker_order() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    touch_pdf(input.path(), "book1.pdf");

    let (ocr, _) = ScriptedOcr::new(&[Some("First page text"), None, Some("Third page text")]);
    let conv = converter(
        input.path(),
        output.path(),
        Box::new(FixedPageRasterizer { pages: 3 }),
        Box::new(ocr),
        Whitelist::from_terms(Vec::<&str>::new()),
    );

    let outcome = conv.convert_file(&input.path().join("book1.pdf"));
    let report = match outcome {
        FileOutcome::Written(report) => report,
        other => panic!("expected Written, got {other:?}"),
    };

    assert_eq!(report.pages, 3);
    assert_eq!(report.page_errors.len(), 1);
    assert!(matches!(report.page_errors[0], PageError::Ocr { page: 2, .. }));

    let text = std::fs::read_to_string(&report.output).unwrap();
    let p1 = text.find("--- Page 1 ---").expect("page 1 marker");
    let p2 = text.find("--- Page 2 ---").expect("page 2 marker");
    let p3 = text.find("--- Page 3 ---").expect("page 3 marker");
    assert!(p1 < p2 && p2 < p3, "markers out of order in: {text}");
    assert!(text.contains("First page text"));
    assert!(text.contains("Third page text"));
}

/// A document whose rasterisation fails is recorded as failed; the rest of
/// the batch still converts.
#[test]
fn rasterisation_failure_aborts_only_that_document() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    touch_pdf(input.path(), "bad_scan.pdf");
    touch_pdf(input.path(), "good_scan.pdf");

    let (ocr, _) = ScriptedOcr::new(&[Some("readable text"), Some("readable text")]);
    let conv = converter(
        input.path(),
        output.path(),
        Box::new(SelectiveRasterizer {
            fail_marker: "bad",
            pages: 1,
        }),
        Box::new(ocr),
        Whitelist::from_terms(Vec::<&str>::new()),
    );

    let summary = conv.convert_folder().unwrap();
    assert_eq!(summary.scanned, 2);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.failed, 1);
    assert!(output.path().join("good_scan.txt").exists());
    assert!(
        !output.path().join("bad_scan.txt").exists(),
        "failed document must not produce an output file"
    );
}

/// Empty input folder: report-and-return, no error, output dir created.
#[test]
fn empty_folder_is_not_an_error() {
    let input = tempfile::tempdir().unwrap();
    let output_parent = tempfile::tempdir().unwrap();
    let output = output_parent.path().join("text");

    let (ocr, _) = ScriptedOcr::new(&[]);
    let conv = converter(
        input.path(),
        &output,
        Box::new(FixedPageRasterizer { pages: 1 }),
        Box::new(ocr),
        Whitelist::from_terms(Vec::<&str>::new()),
    );

    let summary = conv.convert_folder().unwrap();
    assert_eq!(summary.scanned, 0);
    assert_eq!(summary.written, 0);
    assert!(output.is_dir(), "output directory must be created");
}

/// Only files with the exact `.pdf` extension are picked up.
#[test]
fn non_pdf_files_are_ignored() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    touch_pdf(input.path(), "book1.pdf");
    std::fs::write(input.path().join("notes.txt"), "not a pdf").unwrap();
    std::fs::write(input.path().join("SHOUTY.PDF"), "wrong case").unwrap();

    let (ocr, _) = ScriptedOcr::new(&[Some("page text")]);
    let conv = converter(
        input.path(),
        output.path(),
        Box::new(FixedPageRasterizer { pages: 1 }),
        Box::new(ocr),
        Whitelist::from_terms(Vec::<&str>::new()),
    );

    let summary = conv.convert_folder().unwrap();
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.written, 1);
    assert!(output.path().join("book1.txt").exists());
    assert!(!output.path().join("SHOUTY.txt").exists());
}
