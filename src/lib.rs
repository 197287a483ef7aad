//! # tometext
//!
//! Batch-convert scanned PDF books to clean, spell-corrected plain text.
//!
//! ## Why this crate?
//!
//! Scanned rulebooks and sourcebooks have no text layer — extraction tools
//! see only page images. Running OCR gets the words back but leaves the text
//! littered with leader dots, fused sentences, and one-glyph misreads; naive
//! spell checking then "fixes" every monster name into an English word.
//! This crate runs the whole chain — rasterise, OCR, clean up, spell-correct —
//! while a domain whitelist shields jargon from the corrector.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF folder
//!  │
//!  ├─ 1. Scan       list *.pdf, skip already-converted documents
//!  ├─ 2. Raster     rasterise pages via pdfium
//!  ├─ 3. OCR        tesseract per page; a failed page costs only itself
//!  ├─ 4. Normalise  8-rule regex cleanup of OCR noise
//!  ├─ 5. Rewrite    per sentence, per word: whitelist / guard / correct
//!  └─ 6. Output     one <stem>.txt per PDF, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tometext::{BatchConfig, Converter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder()
//!         .input_dir("books")
//!         .output_dir("books/text")
//!         .whitelist("dnd_monster_whitelist.txt")
//!         .dictionary("frequency_dictionary_en.txt")
//!         .build()?;
//!
//!     let summary = Converter::new(config)?.convert_folder()?;
//!     eprintln!(
//!         "{} written, {} skipped, {} failed",
//!         summary.written, summary.skipped, summary.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `tometext` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! tometext = { version = "0.3", default-features = false }
//! ```
//!
//! ## External engines
//!
//! The rasteriser, OCR engine, sentence segmenter, and spell corrector sit
//! behind traits ([`Rasterizer`], [`OcrEngine`], [`SentenceSegmenter`],
//! [`Corrector`]), so the orchestration and cleanup logic can be exercised
//! with test doubles. Production implementations: pdfium, the tesseract
//! binary, UAX #29 sentence bounds, and a SymSpell frequency dictionary.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod whitelist;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder};
pub use convert::Converter;
pub use error::{CorrectionError, OcrError, PageError, TomeError};
pub use output::{BatchSummary, DocumentReport, FileOutcome, RewriteStats};
pub use pipeline::normalize::normalize_text;
pub use pipeline::ocr::{OcrEngine, TesseractEngine};
pub use pipeline::raster::{PdfiumRasterizer, Rasterizer};
pub use pipeline::rewrite::{
    rewrite, Corrector, SentenceSegmenter, SymSpellCorrector, UnicodeSegmenter,
};
pub use progress::{BatchProgressCallback, NoopBatchCallback, ProgressCallback};
pub use whitelist::Whitelist;
