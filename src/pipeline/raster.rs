//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why cap pixels, not DPI?
//!
//! Page sizes vary wildly: an A0 poster at OCR-friendly resolution would
//! produce a 12,000 × 17,000 px image. [`PdfiumRasterizer::max_pixels`] caps
//! the longest edge regardless of physical size, keeping memory bounded while
//! staying well above tesseract's legibility floor for book-sized pages.
//!
//! Rasterisation failure is fatal for the whole document — there is no
//! per-page recovery here, because a PDF that pdfium cannot open or render
//! reliably yields garbage for every page. Per-page tolerance lives one stage
//! later, in OCR.

use crate::error::TomeError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Converts a PDF file into an ordered sequence of page images.
///
/// Implemented by [`PdfiumRasterizer`] in production and by in-memory stubs
/// in tests.
pub trait Rasterizer: Send + Sync {
    /// Render all pages, in page order.
    ///
    /// # Errors
    /// Any failure (unreadable file, corrupt PDF, render error on any page)
    /// is a [`TomeError::Rasterize`] and aborts this document.
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<DynamicImage>, TomeError>;
}

/// Production rasteriser backed by the pdfium library.
pub struct PdfiumRasterizer {
    lib_dir: Option<PathBuf>,
    max_pixels: u32,
}

impl PdfiumRasterizer {
    /// Create a rasteriser.
    ///
    /// * `lib_dir` — directory containing the pdfium shared library, or
    ///   `None` to let the system loader find it.
    /// * `max_pixels` — longest-edge cap for rendered pages.
    pub fn new(lib_dir: Option<PathBuf>, max_pixels: u32) -> Self {
        Self { lib_dir, max_pixels }
    }

    /// Bind to pdfium. Binding is re-established per document; pdfium keeps
    /// thread-local state and a fresh binding is the cheapest way to keep the
    /// rasteriser free of shared mutable state.
    fn bind(&self) -> Result<Pdfium, TomeError> {
        let bindings = match &self.lib_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| TomeError::PdfiumBindingFailed(format!("{e:?}")))?;
        Ok(Pdfium::new(bindings))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<DynamicImage>, TomeError> {
        let pdfium = self.bind()?;

        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| TomeError::Rasterize {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let render_config = PdfRenderConfig::new()
            .set_target_width(self.max_pixels as i32)
            .set_maximum_height(self.max_pixels as i32);

        let mut images = Vec::with_capacity(total_pages);

        for (idx, page) in pages.iter().enumerate() {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                TomeError::Rasterize {
                    path: pdf_path.to_path_buf(),
                    detail: format!("page {}: {e:?}", idx + 1),
                }
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            images.push(image);
        }

        Ok(images)
    }
}
