//! OCR: recognise text in a single page image.
//!
//! The production engine shells out to the tesseract binary rather than
//! linking it: the binary is what ships in every distro package, the CLI
//! surface is stable across tesseract 4 and 5, and a crashed recognition
//! takes down one subprocess instead of the batch.
//!
//! Page images are written to the configured scratch directory for the
//! duration of one invocation; `tempfile` removes them on drop, so the
//! scratch directory stays small even for thousand-page batches.

use crate::error::OcrError;
use image::DynamicImage;
use std::path::PathBuf;
use std::process::Command;
use tracing::warn;

/// Recognises the text in one page image.
///
/// Implemented by [`TesseractEngine`] in production and by scripted stubs in
/// tests. A failed recognition is an [`OcrError`]; the extraction loop in
/// [`crate::convert`] records it against the page and moves on.
pub trait OcrEngine: Send + Sync {
    /// Engine identifier for log lines (e.g. `"tesseract"`).
    fn name(&self) -> &'static str;

    /// Extract the text of one page image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Production engine invoking the tesseract binary.
pub struct TesseractEngine {
    command: PathBuf,
    lang: String,
    scratch_dir: PathBuf,
}

impl TesseractEngine {
    /// Create an engine.
    ///
    /// * `command` — tesseract executable (absolute path or resolved via `PATH`).
    /// * `lang` — language code passed as `-l`.
    /// * `scratch_dir` — existing directory for transient page images.
    pub fn new(command: PathBuf, lang: String, scratch_dir: PathBuf) -> Self {
        Self {
            command,
            lang,
            scratch_dir,
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        // Tesseract reads files, not pipes, so the page goes through a
        // scratch PNG that is deleted when `scratch` drops.
        let scratch = tempfile::Builder::new()
            .prefix("page-")
            .suffix(".png")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| OcrError::Scratch(e.to_string()))?;

        image
            .save_with_format(scratch.path(), image::ImageFormat::Png)
            .map_err(|e| OcrError::Scratch(e.to_string()))?;

        let output = Command::new(&self.command)
            .arg(scratch.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg("1") // automatic page segmentation with orientation detection
            .output()
            .map_err(|source| OcrError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                command: self.command.display().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Tesseract routinely prints DPI warnings on stderr with exit 0.
        if !output.stderr.is_empty() {
            warn!(
                "tesseract stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The real engine needs a tesseract install; these cover the subprocess
    // plumbing with stand-in commands that exist on any unix system.

    fn one_pixel() -> DynamicImage {
        DynamicImage::new_rgb8(1, 1)
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractEngine::new(
            PathBuf::from("/no/such/tesseract"),
            "eng".into(),
            dir.path().to_path_buf(),
        );
        let err = engine.recognize(&one_pixel()).unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }), "got: {err:?}");
    }

    #[test]
    #[cfg(unix)]
    fn nonzero_exit_is_an_engine_failure() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractEngine::new(
            PathBuf::from("false"),
            "eng".into(),
            dir.path().to_path_buf(),
        );
        let err = engine.recognize(&one_pixel()).unwrap_err();
        assert!(matches!(err, OcrError::EngineFailed { .. }), "got: {err:?}");
    }

    #[test]
    fn missing_scratch_dir_is_a_scratch_error() {
        let engine = TesseractEngine::new(
            PathBuf::from("tesseract"),
            "eng".into(),
            PathBuf::from("/no/such/scratch"),
        );
        let err = engine.recognize(&one_pixel()).unwrap_err();
        assert!(matches!(err, OcrError::Scratch(_)), "got: {err:?}");
    }
}
