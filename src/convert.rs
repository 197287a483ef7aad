//! Batch orchestration: folder scan, per-document pipeline, output files.
//!
//! A [`Converter`] owns the four engines (rasteriser, OCR, segmenter,
//! corrector) plus the whitelist, all built once at startup. Documents are
//! processed strictly one at a time, each start-to-finish:
//!
//! ```text
//! scan folder ──▶ per PDF: rasterise ─▶ OCR pages ─▶ normalise ─▶ rewrite ─▶ write .txt
//! ```
//!
//! Failure containment follows the error tiers in [`crate::error`]: a page
//! failure costs one empty page section, a document failure costs one missing
//! output file, and only startup configuration errors stop the batch.
//!
//! Re-runs are idempotent: a PDF whose output file already exists is skipped
//! without touching it, so an interrupted batch resumes where it left off.

use crate::config::BatchConfig;
use crate::error::{PageError, TomeError};
use crate::output::{BatchSummary, DocumentReport, FileOutcome};
use crate::pipeline::normalize::normalize_text;
use crate::pipeline::ocr::{OcrEngine, TesseractEngine};
use crate::pipeline::raster::{PdfiumRasterizer, Rasterizer};
use crate::pipeline::rewrite::{
    rewrite, Corrector, SentenceSegmenter, SymSpellCorrector, UnicodeSegmenter,
};
use crate::whitelist::Whitelist;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Drives the whole pipeline over files and folders.
pub struct Converter {
    config: BatchConfig,
    raster: Box<dyn Rasterizer>,
    ocr: Box<dyn OcrEngine>,
    segmenter: Box<dyn SentenceSegmenter>,
    corrector: Box<dyn Corrector>,
    whitelist: Whitelist,
}

impl Converter {
    /// Build a converter with the production engines.
    ///
    /// Loads the whitelist and the frequency dictionary and creates the
    /// scratch directory — all fatal if they fail, per the startup error
    /// policy. The pdfium binding itself is established lazily on the first
    /// rasterisation.
    pub fn new(config: BatchConfig) -> Result<Self, TomeError> {
        let whitelist = Whitelist::load(&config.whitelist_path)?;
        info!(
            "Loaded {} whitelist terms from {}",
            whitelist.len(),
            config.whitelist_path.display()
        );

        let corrector = SymSpellCorrector::load(&config.dictionary_path, config.max_edit_distance)?;

        std::fs::create_dir_all(&config.cache_dir).map_err(|source| {
            TomeError::CacheDirCreate {
                path: config.cache_dir.clone(),
                source,
            }
        })?;

        let raster = PdfiumRasterizer::new(
            config.pdfium_lib_dir.clone(),
            config.max_rendered_pixels,
        );
        let ocr = TesseractEngine::new(
            config.tesseract_cmd.clone(),
            config.tesseract_lang.clone(),
            config.cache_dir.clone(),
        );

        Ok(Self {
            config,
            raster: Box::new(raster),
            ocr: Box::new(ocr),
            segmenter: Box::new(UnicodeSegmenter),
            corrector: Box::new(corrector),
            whitelist,
        })
    }

    /// Build a converter with caller-supplied engines.
    ///
    /// This is the seam the integration tests use to drive the orchestration
    /// with scripted rasterisers and OCR engines; embedding applications can
    /// use it to swap in a different OCR backend.
    pub fn with_engines(
        config: BatchConfig,
        raster: Box<dyn Rasterizer>,
        ocr: Box<dyn OcrEngine>,
        segmenter: Box<dyn SentenceSegmenter>,
        corrector: Box<dyn Corrector>,
        whitelist: Whitelist,
    ) -> Self {
        Self {
            config,
            raster,
            ocr,
            segmenter,
            corrector,
            whitelist,
        }
    }

    /// Convert one PDF into `<stem>.txt` in the output directory.
    ///
    /// Never overwrites: an existing output file means
    /// [`FileOutcome::Skipped`]. Rasterisation and write failures are
    /// reported as [`FileOutcome::Failed`] so the caller's batch loop keeps
    /// going; nothing here panics or propagates.
    pub fn convert_file(&self, pdf_path: &Path) -> FileOutcome {
        let start = Instant::now();

        let pdf_path = match std::path::absolute(pdf_path) {
            Ok(p) => p,
            Err(e) => {
                warn!("Cannot resolve '{}': {e}", pdf_path.display());
                return FileOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let output_path = match std::path::absolute(&self.config.output_dir) {
            Ok(dir) => output_path_for(&dir, &pdf_path),
            Err(e) => {
                warn!("Cannot resolve output dir: {e}");
                return FileOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if output_path.exists() {
            info!(
                "Skipping {}, text file already exists: {}",
                pdf_path.display(),
                output_path.display()
            );
            return FileOutcome::Skipped;
        }

        info!("Processing file: {}", pdf_path.display());

        // ── Step 1: Rasterise + OCR ──────────────────────────────────────
        let (raw_text, pages, page_errors) = match self.extract_text(&pdf_path) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to process {}: {e}", pdf_path.display());
                return FileOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        // ── Step 2: Normalise ────────────────────────────────────────────
        let normalized = normalize_text(&raw_text);

        // ── Step 3: Rewrite ──────────────────────────────────────────────
        let (corrected, rewrite_stats) = rewrite(
            &normalized,
            &self.whitelist,
            self.segmenter.as_ref(),
            self.corrector.as_ref(),
        );

        // ── Step 4: Write output ─────────────────────────────────────────
        if let Err(e) = write_atomic(&output_path, &corrected) {
            warn!("Failed to write {}: {e}", output_path.display());
            return FileOutcome::Failed {
                reason: e.to_string(),
            };
        }

        info!(
            "Text extracted, cleaned, and spell-checked for {} → {}",
            pdf_path.display(),
            output_path.display()
        );

        FileOutcome::Written(DocumentReport {
            source: pdf_path,
            output: output_path,
            pages,
            page_errors,
            rewrite: rewrite_stats,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Convert every `.pdf` in the configured input folder.
    ///
    /// Creates the output directory if absent. Per-file failures are counted
    /// in the summary, not propagated; the only errors returned are the
    /// startup-class ones (unlistable input dir, uncreatable output dir).
    pub fn convert_folder(&self) -> Result<BatchSummary, TomeError> {
        let start = Instant::now();

        let input_dir = std::path::absolute(&self.config.input_dir).map_err(|source| {
            TomeError::InputDirUnreadable {
                path: self.config.input_dir.clone(),
                source,
            }
        })?;
        let output_dir = std::path::absolute(&self.config.output_dir).map_err(|source| {
            TomeError::OutputDirCreate {
                path: self.config.output_dir.clone(),
                source,
            }
        })?;
        std::fs::create_dir_all(&output_dir).map_err(|source| TomeError::OutputDirCreate {
            path: output_dir.clone(),
            source,
        })?;

        info!("Scanning folder for PDF files: {}", input_dir.display());

        // Extension match is exact and case-sensitive; directory-listing
        // order is whatever the platform returns.
        let mut pdf_files: Vec<PathBuf> = Vec::new();
        let entries = std::fs::read_dir(&input_dir).map_err(|source| {
            TomeError::InputDirUnreadable {
                path: input_dir.clone(),
                source,
            }
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| TomeError::InputDirUnreadable {
                path: input_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "pdf") {
                pdf_files.push(path);
            }
        }

        if let Some(cb) = &self.config.progress_callback {
            cb.on_scan_complete(pdf_files.len());
        }

        let mut summary = BatchSummary {
            scanned: pdf_files.len(),
            ..Default::default()
        };

        if pdf_files.is_empty() {
            info!("No PDF files found.");
            if let Some(cb) = &self.config.progress_callback {
                cb.on_batch_complete(0, 0, 0);
            }
            return Ok(summary);
        }

        let total = pdf_files.len();
        for (index, pdf_path) in pdf_files.iter().enumerate() {
            let name = pdf_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if let Some(cb) = &self.config.progress_callback {
                cb.on_file_start(&name, index, total);
            }

            match self.convert_file(pdf_path) {
                FileOutcome::Skipped => {
                    summary.skipped += 1;
                    if let Some(cb) = &self.config.progress_callback {
                        cb.on_file_skipped(&name);
                    }
                }
                FileOutcome::Written(report) => {
                    summary.written += 1;
                    summary.rewrite.absorb(report.rewrite);
                    if let Some(cb) = &self.config.progress_callback {
                        cb.on_file_complete(&name, report.pages, report.page_errors.len());
                    }
                }
                FileOutcome::Failed { reason } => {
                    summary.failed += 1;
                    if let Some(cb) = &self.config.progress_callback {
                        cb.on_file_failed(&name, reason);
                    }
                }
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        if let Some(cb) = &self.config.progress_callback {
            cb.on_batch_complete(summary.written, summary.skipped, summary.failed);
        }
        info!(
            "Folder complete: {} written, {} skipped, {} failed of {} PDFs",
            summary.written, summary.skipped, summary.failed, summary.scanned
        );

        Ok(summary)
    }

    /// Rasterise the document and OCR every page.
    ///
    /// Returns the concatenated page-marked blob, the attempted page count,
    /// and the per-page errors. A page whose OCR fails contributes its marker
    /// with an empty body; rasterisation failure aborts the whole document.
    fn extract_text(
        &self,
        pdf_path: &Path,
    ) -> Result<(String, usize, Vec<PageError>), TomeError> {
        debug!("Converting PDF to images for: {}", pdf_path.display());
        let images = self.raster.rasterize(pdf_path)?;
        let total_pages = images.len();

        let mut blob = String::new();
        let mut page_errors: Vec<PageError> = Vec::new();

        for (idx, image) in images.iter().enumerate() {
            let page_num = idx + 1;
            if let Some(cb) = &self.config.progress_callback {
                cb.on_page_start(page_num, total_pages);
            }
            debug!("Processing page {page_num} of {}", pdf_path.display());

            let text = match self.ocr.recognize(image) {
                Ok(text) => {
                    if let Some(cb) = &self.config.progress_callback {
                        cb.on_page_complete(page_num, total_pages, text.len());
                    }
                    text
                }
                Err(e) => {
                    warn!(
                        "Error processing page {page_num} in {}: {e}",
                        pdf_path.display()
                    );
                    if let Some(cb) = &self.config.progress_callback {
                        cb.on_page_error(page_num, total_pages, e.to_string());
                    }
                    page_errors.push(PageError::Ocr {
                        page: page_num,
                        detail: e.to_string(),
                    });
                    String::new()
                }
            };

            blob.push_str(&format!("--- Page {page_num} ---\n{text}\n"));
        }

        Ok((blob, total_pages, page_errors))
    }
}

/// `<output_dir>/<pdf stem>.txt`
fn output_path_for(output_dir: &Path, pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}.txt"))
}

/// Atomic write: temp file in the target directory, then rename.
///
/// A crash mid-write must not leave a truncated `.txt` behind — a partial
/// output file would be treated as "already converted" on the next run and
/// the document would never be completed.
fn write_atomic(path: &Path, contents: &str) -> Result<(), TomeError> {
    let io_err = |source| TomeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = path.with_extension("txt.tmp");
    std::fs::write(&tmp_path, contents).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}
