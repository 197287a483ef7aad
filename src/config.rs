//! Configuration types for the batch OCR pipeline.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to log a run's parameters and to diff two runs to understand why their
//! outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::TomeError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for a batch PDF-to-text run.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use tometext::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .input_dir("books")
///     .output_dir("books/text")
///     .whitelist("dnd_monster_whitelist.txt")
///     .dictionary("frequency_dictionary_en.txt")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// OCR engine executable. Default: `tesseract` (resolved via `PATH`).
    pub tesseract_cmd: PathBuf,

    /// Tesseract language code passed as `-l`. Default: `eng`.
    pub tesseract_lang: String,

    /// Directory containing the pdfium shared library. Default: `None`,
    /// meaning the system loader finds it.
    pub pdfium_lib_dir: Option<PathBuf>,

    /// Scratch directory for rasterised page images, created at startup if
    /// absent. Default: `tometext/` under the system temp directory.
    ///
    /// Page images are written here only for the duration of one OCR call and
    /// removed immediately after, so the directory stays small even for
    /// thousand-page batches.
    pub cache_dir: PathBuf,

    /// Newline-delimited domain-term whitelist. Words matching an entry
    /// (exactly or fuzzily) are never spell-corrected.
    pub whitelist_path: PathBuf,

    /// SymSpell frequency dictionary (`word count` per line) backing the
    /// spell corrector.
    pub dictionary_path: PathBuf,

    /// Folder scanned (non-recursively) for `.pdf` files.
    pub input_dir: PathBuf,

    /// Folder receiving one `<stem>.txt` per converted PDF. An existing
    /// output file causes its PDF to be skipped — re-runs are idempotent.
    pub output_dir: PathBuf,

    /// Maximum rendered page dimension (width or height) in pixels.
    /// Default: 3000.
    ///
    /// A safety cap independent of page size: an A0 poster rendered at OCR
    /// resolution could produce a 13 000 × 18 000 px image and exhaust
    /// memory. This caps the longest edge, scaling the other dimension
    /// proportionally. 3000 px keeps ~10 pt body text comfortably above the
    /// legibility floor for tesseract.
    pub max_rendered_pixels: u32,

    /// Maximum edit distance for dictionary lookups. Range 0–2. Default: 1.
    ///
    /// Distance 1 mirrors scanned-book reality: OCR misreads are nearly
    /// always a single substituted or dropped glyph, and distance-2 search is
    /// an order of magnitude slower on a 500-page batch.
    pub max_edit_distance: i64,

    /// Progress callback fired per file and per page. Default: `None`.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from("tesseract"),
            tesseract_lang: "eng".to_string(),
            pdfium_lib_dir: None,
            cache_dir: std::env::temp_dir().join("tometext"),
            whitelist_path: PathBuf::from("whitelist.txt"),
            dictionary_path: PathBuf::from("frequency_dictionary_en.txt"),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("text"),
            max_rendered_pixels: 3000,
            max_edit_distance: 1,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("tesseract_lang", &self.tesseract_lang)
            .field("pdfium_lib_dir", &self.pdfium_lib_dir)
            .field("cache_dir", &self.cache_dir)
            .field("whitelist_path", &self.whitelist_path)
            .field("dictionary_path", &self.dictionary_path)
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("max_edit_distance", &self.max_edit_distance)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = cmd.into();
        self
    }

    pub fn tesseract_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.tesseract_lang = lang.into();
        self
    }

    pub fn pdfium_lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_dir = Some(dir.into());
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn whitelist(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.whitelist_path = path.into();
        self
    }

    pub fn dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dictionary_path = path.into();
        self
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn max_edit_distance(mut self, d: i64) -> Self {
        self.config.max_edit_distance = d;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, TomeError> {
        let c = &self.config;
        if !(0..=2).contains(&c.max_edit_distance) {
            return Err(TomeError::InvalidConfig(format!(
                "max_edit_distance must be 0-2, got {}",
                c.max_edit_distance
            )));
        }
        if c.tesseract_lang.is_empty() {
            return Err(TomeError::InvalidConfig(
                "tesseract_lang must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
