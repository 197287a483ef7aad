//! Domain-term whitelist: exact and fuzzy membership.
//!
//! The whitelist holds jargon the spell corrector must never touch — monster
//! names, place names, rulebook terms. OCR garbles these as readily as any
//! other word, so exact membership alone is not enough: `fuzzy_contains`
//! additionally accepts words within a bounded edit distance of an entry,
//! catching "Gobln" for "Goblin" before the corrector rewrites it into
//! "Gobble".
//!
//! Matching is case- and form-sensitive as loaded; no normalisation is
//! applied to entries or probes.

use crate::error::TomeError;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Minimum normalized edit similarity for a fuzzy whitelist hit.
///
/// On this scale 1.0 is an exact match and 0.0 shares nothing. 0.8 admits one
/// edit in a five-or-six-letter name, which is the typical OCR damage, while
/// rejecting genuinely different words.
const SIMILARITY_THRESHOLD: f64 = 0.8;

/// An immutable set of domain terms loaded once at startup.
#[derive(Debug, Clone)]
pub struct Whitelist {
    terms: HashSet<String>,
}

impl Whitelist {
    /// Load a whitelist from a newline-delimited file.
    ///
    /// Each line is trimmed; blank lines are dropped. Duplicate terms
    /// collapse into one entry.
    ///
    /// # Errors
    /// [`TomeError::WhitelistUnreadable`] if the file cannot be read. A
    /// missing whitelist is a startup-fatal configuration error — correcting
    /// a batch without jargon protection silently mangles every monster name.
    pub fn load(path: &Path) -> Result<Self, TomeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            TomeError::WhitelistUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let terms: HashSet<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("Loaded {} whitelist terms from {}", terms.len(), path.display());

        Ok(Self { terms })
    }

    /// Build a whitelist from terms already in memory. Trims and drops blank
    /// entries exactly like [`Whitelist::load`].
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Exact membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.terms.contains(word)
    }

    /// True if `word` is within [`SIMILARITY_THRESHOLD`] of the closest
    /// entry on the normalized edit-similarity scale.
    ///
    /// Scans all entries and keeps the best score; whitelists are a few
    /// thousand terms at most, so a linear pass per unprotected word is
    /// cheaper than it looks next to the OCR call that produced the word.
    pub fn fuzzy_contains(&self, word: &str) -> bool {
        if self.terms.contains(word) {
            return true;
        }
        let mut best = 0.0_f64;
        for term in &self.terms {
            let score = strsim::normalized_levenshtein(word, term);
            if score > best {
                best = score;
                if best >= 1.0 {
                    break;
                }
            }
        }
        best >= SIMILARITY_THRESHOLD
    }

    /// Number of loaded terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True if no terms were loaded.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_trims_and_drops_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Goblin\n  Beholder  \n\n\nMind Flayer\n\n").unwrap();

        let wl = Whitelist::load(file.path()).unwrap();
        assert_eq!(wl.len(), 3);
        assert!(wl.contains("Goblin"));
        assert!(wl.contains("Beholder"));
        assert!(wl.contains("Mind Flayer"));
        assert!(!wl.contains(""));
    }

    #[test]
    fn load_missing_file_is_fatal() {
        let err = Whitelist::load(Path::new("/no/such/whitelist.txt")).unwrap_err();
        assert!(matches!(err, TomeError::WhitelistUnreadable { .. }));
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let wl = Whitelist::from_terms(["goblin"]);
        assert!(wl.contains("goblin"));
        assert!(!wl.contains("GOBLIN"));
    }

    #[test]
    fn one_edit_on_six_letters_clears_the_threshold() {
        // similarity = 1 - 1/6 ≈ 0.833
        let wl = Whitelist::from_terms(["goblin"]);
        assert!(wl.fuzzy_contains("gobln"));
        assert!(wl.fuzzy_contains("goblim"));
    }

    #[test]
    fn two_edits_on_six_letters_miss_the_threshold() {
        // similarity = 1 - 2/6 ≈ 0.667
        let wl = Whitelist::from_terms(["goblin"]);
        assert!(!wl.fuzzy_contains("gobxim"));
        assert!(!wl.fuzzy_contains("hobgob"));
    }

    #[test]
    fn fuzzy_uses_best_candidate_across_entries() {
        let wl = Whitelist::from_terms(["goblin", "kobold", "owlbear"]);
        assert!(wl.fuzzy_contains("kobol"));
        assert!(wl.fuzzy_contains("owlbeor"));
        assert!(!wl.fuzzy_contains("dragon"));
    }

    #[test]
    fn empty_whitelist_matches_nothing() {
        let wl = Whitelist::from_terms(Vec::<&str>::new());
        assert!(wl.is_empty());
        assert!(!wl.fuzzy_contains("goblin"));
    }
}
