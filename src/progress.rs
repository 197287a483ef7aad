//! Progress-callback trait for per-file and per-page batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the batch works through a folder.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a log file, or a GUI — without
//! the library knowing anything about how the host application communicates.
//! The trait is `Send + Sync` so the same implementation keeps working if a
//! caller runs several independent batches from different threads.

use std::sync::Arc;

/// Called by the batch as it scans the folder and processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the folder scan, before any file is processed.
    ///
    /// # Arguments
    /// * `pdf_count` — number of PDF files found
    fn on_scan_complete(&self, pdf_count: usize) {
        let _ = pdf_count;
    }

    /// Called when a file's conversion begins (after the skip check).
    ///
    /// # Arguments
    /// * `name`  — file name of the PDF
    /// * `index` — 0-based position in the folder run
    /// * `total` — number of PDF files in the run
    fn on_file_start(&self, name: &str, index: usize, total: usize) {
        let _ = (name, index, total);
    }

    /// Called when a file is skipped because its output already exists.
    fn on_file_skipped(&self, name: &str) {
        let _ = name;
    }

    /// Called just before OCR runs on a page.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages in the current document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when OCR on a page succeeds.
    ///
    /// # Arguments
    /// * `text_len` — byte length of the recognised page text
    fn on_page_complete(&self, page_num: usize, total_pages: usize, text_len: usize) {
        let _ = (page_num, total_pages, text_len);
    }

    /// Called when OCR on a page fails. The page contributes an empty
    /// section; the document continues.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: String) {
        let _ = (page_num, total_pages, error);
    }

    /// Called when a file's output has been written.
    ///
    /// # Arguments
    /// * `pages`        — pages attempted
    /// * `failed_pages` — pages whose OCR failed
    fn on_file_complete(&self, name: &str, pages: usize, failed_pages: usize) {
        let _ = (name, pages, failed_pages);
    }

    /// Called when a file fails as a whole (rasterisation or output write).
    fn on_file_failed(&self, name: &str, error: String) {
        let _ = (name, error);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, written: usize, skipped: usize, failed: usize) {
        let _ = (written, skipped, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopBatchCallback;

impl BatchProgressCallback for NoopBatchCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
