//! Sentence-by-sentence, word-by-word spell correction.
//!
//! The rewriter walks the normalised text one sentence at a time and decides,
//! per whitespace-delimited word, whether to keep, guard, or replace it:
//!
//! 1. Whitelist hit (exact or fuzzy) → keep verbatim. Monster names are
//!    jargon, not misspellings.
//! 2. Longer than [`MAX_UNCHECKED_LEN`] chars, or contains a digit → keep
//!    verbatim. Such tokens are proper nouns, dice codes, or page references;
//!    a frequency dictionary can only make them worse.
//! 3. Otherwise ask the [`Corrector`]. A lookup failure is logged and the
//!    original word kept — a bad dictionary entry must never eat a word.
//!
//! Punctuation hugging a word is peeled off before lookup and re-attached
//! after: the normaliser terminates every line with a period, so sentence-
//! final words arrive as `"Wrold."` and would otherwise never match the
//! dictionary.
//!
//! Words rejoin with single spaces, sentences with a blank line. One pass,
//! stateless per word; no paragraph-level rebalancing.

use crate::error::{CorrectionError, TomeError};
use crate::output::RewriteStats;
use crate::whitelist::Whitelist;
use std::path::Path;
use symspell::{AsciiStringStrategy, SymSpell, Verbosity};
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

/// Words longer than this are never sent to the corrector.
const MAX_UNCHECKED_LEN: usize = 15;

// ── Sentence segmentation ────────────────────────────────────────────────────

/// Splits text into an ordered sequence of sentence spans.
///
/// Implementations return subslices of the input, in order and without gaps
/// beyond whitespace; the rewriter only ever word-splits each span.
pub trait SentenceSegmenter: Send + Sync {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Production segmenter: UAX #29 sentence boundaries.
pub struct UnicodeSegmenter;

impl SentenceSegmenter for UnicodeSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.unicode_sentences().collect()
    }
}

// ── Spell correction ─────────────────────────────────────────────────────────

/// Dictionary-backed word correction.
///
/// `Ok(Some(replacement))` means the word is unknown and a candidate exists;
/// `Ok(None)` means the word is known, or no candidate was found — keep the
/// original either way. Errors are caught by the rewriter and degrade to
/// keeping the original word.
pub trait Corrector: Send + Sync {
    fn correct(&self, word: &str) -> Result<Option<String>, CorrectionError>;
}

/// Production corrector backed by a SymSpell frequency dictionary.
pub struct SymSpellCorrector {
    symspell: SymSpell<AsciiStringStrategy>,
    max_edit: i64,
}

impl SymSpellCorrector {
    /// Load the frequency dictionary (`word count` per line) from a file.
    ///
    /// # Errors
    /// [`TomeError::DictionaryUnreadable`] if the file cannot be read — a
    /// startup-fatal configuration error, like the whitelist.
    pub fn load(path: &Path, max_edit: i64) -> Result<Self, TomeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            TomeError::DictionaryUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(Self::from_lines(raw.lines(), max_edit))
    }

    /// Build a corrector from dictionary lines already in memory.
    ///
    /// Malformed lines are skipped by the underlying loader; an empty
    /// iterator yields a corrector that knows nothing and so never rewrites.
    pub fn from_lines<'a, I>(lines: I, max_edit: i64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut symspell: SymSpell<AsciiStringStrategy> = SymSpell::default();
        for line in lines {
            symspell.load_dictionary_line(line, 0, 1, " ");
        }
        Self { symspell, max_edit }
    }
}

impl Corrector for SymSpellCorrector {
    fn correct(&self, word: &str) -> Result<Option<String>, CorrectionError> {
        let probe = word.to_lowercase();
        let suggestions = self.symspell.lookup(&probe, Verbosity::Top, self.max_edit);
        match suggestions.first() {
            // Distance 0: the word is in the dictionary — nothing to fix.
            Some(s) if s.distance == 0 => Ok(None),
            Some(s) => Ok(Some(s.term.clone())),
            // No candidate within the edit bound: keep the original.
            None => Ok(None),
        }
    }
}

// ── The rewrite pass ─────────────────────────────────────────────────────────

/// Rewrite normalised text sentence by sentence.
///
/// Returns the corrected text (sentences separated by blank lines) and the
/// per-bucket word counters.
pub fn rewrite(
    text: &str,
    whitelist: &Whitelist,
    segmenter: &dyn SentenceSegmenter,
    corrector: &dyn Corrector,
) -> (String, RewriteStats) {
    let mut stats = RewriteStats::default();
    let mut rebuilt: Vec<String> = Vec::new();

    for sentence in segmenter.segment(text) {
        let words: Vec<String> = sentence
            .split_whitespace()
            .map(|word| rewrite_word(word, whitelist, corrector, &mut stats))
            .collect();
        rebuilt.push(words.join(" "));
    }

    (rebuilt.join("\n\n"), stats)
}

fn rewrite_word(
    word: &str,
    whitelist: &Whitelist,
    corrector: &dyn Corrector,
    stats: &mut RewriteStats,
) -> String {
    if whitelist.contains(word) || whitelist.fuzzy_contains(word) {
        stats.whitelisted += 1;
        return word.to_string();
    }

    if word.chars().count() > MAX_UNCHECKED_LEN || word.chars().any(|c| c.is_ascii_digit()) {
        stats.guarded += 1;
        return word.to_string();
    }

    let (prefix, core, suffix) = split_affixes(word);
    if core.is_empty() {
        // Pure punctuation (e.g. a page-marker dash run); nothing to look up.
        stats.unchanged += 1;
        return word.to_string();
    }

    match corrector.correct(core) {
        Ok(Some(replacement)) => {
            stats.corrected += 1;
            format!("{prefix}{}{suffix}", restore_case(core, &replacement))
        }
        Ok(None) => {
            stats.unchanged += 1;
            word.to_string()
        }
        Err(e) => {
            warn!("{e}; keeping original");
            stats.unchanged += 1;
            word.to_string()
        }
    }
}

/// Split a token into leading punctuation, the alphanumeric-bounded core, and
/// trailing punctuation. Interior punctuation (apostrophes, hyphens) stays in
/// the core.
fn split_affixes(word: &str) -> (&str, &str, &str) {
    let Some(start) = word.find(|c: char| c.is_alphanumeric()) else {
        return (word, "", "");
    };
    let end = word
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(word.len());
    (&word[..start], &word[start..end], &word[end..])
}

/// Re-apply the original word's leading capitalisation to a replacement.
///
/// Frequency dictionaries are lowercase, so without this every corrected
/// sentence-initial word would be down-cased.
fn restore_case(original: &str, replacement: &str) -> String {
    let leading_upper = original.chars().next().is_some_and(|c| c.is_uppercase());
    if !leading_upper {
        return replacement.to_string();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
