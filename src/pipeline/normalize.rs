//! Text normalisation: deterministic cleanup of raw OCR output.
//!
//! ## Why is normalisation necessary?
//!
//! Tesseract output from scanned books is *readable* but *structurally
//! broken* — for example:
//!
//! - Leader dots from tables of contents come through as `......`
//! - Bullet glyphs survive as `*` and `·` noise
//! - Column layouts produce runs of blank lines and double spaces
//! - Adjacent sentences fuse across line breaks (`"word.Word"` loses its
//!   period entirely: `"wordWord"`)
//!
//! This module applies 8 cheap, deterministic regex rules that repair
//! structure without touching content, so the sentence segmenter downstream
//! sees real sentence boundaries. Each rule is independently testable.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: noise collapse (rules 1–5) before
//! boundary insertion (rules 6–8), so the boundary rules observe single-space
//! single-newline structure. Rules 1–5 are idempotent as a group; rules 6–8
//! are not (they insert text) and therefore run exactly once, immediately
//! before segmentation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation rules to the raw OCR blob.
///
/// Runs 8 deterministic cleanup passes in a defined order. Each pass is a
/// pure function (`&str → String`) with no shared state.
///
/// Rules (applied in order):
/// 1. Collapse two-or-more consecutive periods into one
/// 2. Remove all asterisks
/// 3. Remove all middle dots
/// 4. Collapse two-or-more consecutive newlines into one
/// 5. Collapse remaining whitespace runs into a single space
/// 6. Insert `". "` between a lowercase letter and an uppercase letter
/// 7. Insert `". "` between a digit and an uppercase letter
/// 8. Append a period before any remaining newline
pub fn normalize_text(input: &str) -> String {
    let s = collapse_noise(input);
    let s = split_merged_sentences(&s);
    let s = split_numbered_sentences(&s);
    terminate_lines(&s)
}

/// Rules 1–5: the idempotent noise-collapse prefix of the chain.
fn collapse_noise(input: &str) -> String {
    let s = collapse_repeated_periods(input);
    let s = strip_asterisks(&s);
    let s = strip_middle_dots(&s);
    let s = collapse_repeated_newlines(&s);
    collapse_whitespace_runs(&s)
}

// ── Rule 1: Collapse repeated periods ────────────────────────────────────────

static RE_REPEATED_PERIODS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());

fn collapse_repeated_periods(input: &str) -> String {
    RE_REPEATED_PERIODS.replace_all(input, ".").to_string()
}

// ── Rule 2: Strip asterisks ──────────────────────────────────────────────────

static RE_ASTERISKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+").unwrap());

fn strip_asterisks(input: &str) -> String {
    RE_ASTERISKS.replace_all(input, "").to_string()
}

// ── Rule 3: Strip middle dots ────────────────────────────────────────────────

static RE_MIDDLE_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"·+").unwrap());

fn strip_middle_dots(input: &str) -> String {
    RE_MIDDLE_DOTS.replace_all(input, "").to_string()
}

// ── Rule 4: Collapse repeated newlines ───────────────────────────────────────

static RE_REPEATED_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

fn collapse_repeated_newlines(input: &str) -> String {
    RE_REPEATED_NEWLINES.replace_all(input, "\n").to_string()
}

// ── Rule 5: Collapse whitespace runs ─────────────────────────────────────────

static RE_WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

fn collapse_whitespace_runs(input: &str) -> String {
    RE_WHITESPACE_RUNS.replace_all(input, " ").to_string()
}

// ── Rule 6: Split sentences merged across a case change ──────────────────────
//
// OCR frequently drops the period between sentences when the scan loses the
// punctuation mark: "ends hereNext sentence". A lowercase letter directly
// followed by an uppercase letter almost never occurs inside an English word,
// so the boundary is restored with ". ". (The regex crate has no lookaround;
// both letters are captured and re-emitted.)

static RE_LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

fn split_merged_sentences(input: &str) -> String {
    RE_LOWER_UPPER.replace_all(input, "${1}. ${2}").to_string()
}

// ── Rule 7: Split sentences merged after a number ────────────────────────────

static RE_DIGIT_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9])([A-Z])").unwrap());

fn split_numbered_sentences(input: &str) -> String {
    RE_DIGIT_UPPER.replace_all(input, "${1}. ${2}").to_string()
}

// ── Rule 8: Terminate lines ──────────────────────────────────────────────────
//
// After rules 4–5 every surviving newline is a deliberate line break, and in
// scanned book text a line break is overwhelmingly a sentence end. Appending
// a period gives the segmenter an explicit boundary to cut on.

static RE_LINE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n").unwrap());

fn terminate_lines(input: &str) -> String {
    RE_LINE_END.replace_all(input, ".\n").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
