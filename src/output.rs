//! Outcome and statistics types for batch runs.
//!
//! One [`FileOutcome`] per input PDF, aggregated into a [`BatchSummary`] for
//! the whole folder. All types serialise to JSON so the CLI's `--json` flag
//! and any embedding application see the same numbers the log lines report.

use crate::error::PageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one input PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileOutcome {
    /// The output file already existed; nothing was touched.
    Skipped,
    /// Converted and written.
    Written(DocumentReport),
    /// Rasterisation or the output write failed; no output file exists for
    /// this document. The batch continues with the next file.
    Failed { reason: String },
}

impl FileOutcome {
    /// True for [`FileOutcome::Written`].
    pub fn is_written(&self) -> bool {
        matches!(self, FileOutcome::Written(_))
    }
}

/// Per-document conversion report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Absolute path of the source PDF.
    pub source: PathBuf,
    /// Absolute path of the written text file.
    pub output: PathBuf,
    /// Pages attempted (equals the rasterised page count).
    pub pages: usize,
    /// Pages whose OCR failed and contributed an empty section.
    pub page_errors: Vec<PageError>,
    /// Word-level rewrite counters.
    pub rewrite: RewriteStats,
    /// Wall-clock time for this document in milliseconds.
    pub duration_ms: u64,
}

/// How the rewriter classified the words of one document.
///
/// Every whitespace-delimited word lands in exactly one bucket, so the four
/// counters sum to the document's word count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStats {
    /// Kept verbatim: exact or fuzzy whitelist hit.
    pub whitelisted: usize,
    /// Kept verbatim: longer than the length cap or contains a digit.
    pub guarded: usize,
    /// Replaced by a dictionary candidate.
    pub corrected: usize,
    /// Looked up but left alone (known word, no candidate, or lookup error).
    pub unchanged: usize,
}

impl RewriteStats {
    /// Total words seen.
    pub fn total(&self) -> usize {
        self.whitelisted + self.guarded + self.corrected + self.unchanged
    }

    /// Merge another document's counters into this one.
    pub fn absorb(&mut self, other: RewriteStats) {
        self.whitelisted += other.whitelisted;
        self.guarded += other.guarded;
        self.corrected += other.corrected;
        self.unchanged += other.unchanged;
    }
}

/// Aggregate result of one folder run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// PDF files found in the input folder.
    pub scanned: usize,
    /// Documents converted and written this run.
    pub written: usize,
    /// Documents skipped because their output already existed.
    pub skipped: usize,
    /// Documents that failed (rasterisation or output write).
    pub failed: usize,
    /// Word counters summed over all written documents.
    pub rewrite: RewriteStats,
    /// Wall-clock time for the whole folder in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_stats_total_sums_all_buckets() {
        let stats = RewriteStats {
            whitelisted: 2,
            guarded: 3,
            corrected: 5,
            unchanged: 7,
        };
        assert_eq!(stats.total(), 17);
    }

    #[test]
    fn absorb_accumulates_per_document_counters() {
        let mut batch = RewriteStats::default();
        batch.absorb(RewriteStats {
            whitelisted: 1,
            guarded: 0,
            corrected: 2,
            unchanged: 3,
        });
        batch.absorb(RewriteStats {
            whitelisted: 0,
            guarded: 4,
            corrected: 1,
            unchanged: 1,
        });
        assert_eq!(batch.whitelisted, 1);
        assert_eq!(batch.guarded, 4);
        assert_eq!(batch.corrected, 3);
        assert_eq!(batch.unchanged, 4);
    }

    #[test]
    fn summary_serialises_to_json() {
        let summary = BatchSummary {
            scanned: 3,
            written: 2,
            skipped: 1,
            failed: 0,
            rewrite: RewriteStats::default(),
            duration_ms: 1200,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"scanned\":3"));
        let back: BatchSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.written, 2);
    }
}
