//! Error types for the tometext library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`TomeError`] — **Fatal**: startup cannot complete (unreadable whitelist
//!   or dictionary, uncreatable directory) or a whole document cannot be
//!   processed (rasterisation failed, output file unwritable). Startup errors
//!   abort the batch; document errors abort only that document.
//!
//! * [`PageError`] — **Non-fatal**: OCR failed on a single page. The page
//!   contributes an empty section to the document text and all other pages
//!   continue. Stored in [`crate::output::DocumentReport`] so callers can
//!   inspect partial success.
//!
//! Engine-local failures ([`OcrError`], [`CorrectionError`]) are converted at
//! the call site: an OCR failure becomes a [`PageError`], a correction failure
//! degrades to "keep the original word". Neither ever crosses a document
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the tometext library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::DocumentReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum TomeError {
    // ── Startup / configuration errors ────────────────────────────────────
    /// The whitelist file could not be read.
    #[error("Failed to read whitelist '{path}': {source}\nCheck the path exists and is readable.")]
    WhitelistUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spell-correction frequency dictionary could not be read.
    #[error("Failed to read frequency dictionary '{path}': {source}")]
    DictionaryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scratch directory for rasterised page images could not be created.
    #[error("Failed to create cache directory '{path}': {source}")]
    CacheDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory could not be listed.
    #[error("Failed to scan input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Point --pdfium-lib at the directory containing libpdfium, or install it\n\
where the system loader can find it."
    )]
    PdfiumBindingFailed(String),

    // ── Per-document errors (abort one document, batch continues) ─────────
    /// The PDF could not be loaded or rasterised. No output file is written
    /// for this document.
    #[error("Rasterisation failed for '{path}': {detail}")]
    Rasterize { path: PathBuf, detail: String },

    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored in [`crate::output::DocumentReport`] when OCR fails on one page.
/// The page's marker still appears in the document text with an empty body,
/// and all later pages are processed.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// OCR failed on this page.
    #[error("Page {page}: OCR failed: {detail}")]
    Ocr { page: usize, detail: String },
}

/// Error from a single OCR engine invocation.
///
/// Carries no page number; the extraction loop wraps it into a [`PageError`]
/// with the page it was processing.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine process could not be launched at all.
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but exited unsuccessfully.
    #[error("'{command}' exited with {status}: {stderr}")]
    EngineFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The page image could not be written to the scratch directory.
    #[error("failed to write scratch page image: {0}")]
    Scratch(String),
}

/// Error from a single dictionary lookup.
///
/// Always degraded to "keep the original word" by the rewriter; exposed so
/// [`crate::pipeline::rewrite::Corrector`] implementations can report what
/// went wrong for the log line.
#[derive(Debug, Error)]
#[error("correction failed for '{word}': {detail}")]
pub struct CorrectionError {
    pub word: String,
    pub detail: String,
}
