//! CLI binary for tometext.
//!
//! Maps flags and environment variables to a `BatchConfig`, wires a terminal
//! progress bar into the batch, and prints the summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tometext::{BatchConfig, BatchProgressCallback, Converter, ProgressCallback};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar tracking files, per-file log lines,
/// and a live page counter in the bar message while a document is in OCR.
struct CliProgressCallback {
    /// One bar, anchored at the bottom; log lines print above it.
    bar: ProgressBar,
    /// Count of documents that failed outright.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by
    /// `on_scan_complete` (called before any file is processed).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_scan_complete

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Listing PDF files…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know the file count.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_scan_complete(&self, pdf_count: usize) {
        self.activate_bar(pdf_count);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {pdf_count} PDF files"))
        ));
    }

    fn on_file_start(&self, name: &str, _index: usize, _total: usize) {
        self.bar.set_message(name.to_string());
    }

    fn on_file_skipped(&self, name: &str) {
        self.bar
            .println(format!("  {} {}", dim("↷"), dim(&format!("{name}  (already converted)"))));
        self.bar.inc(1);
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        self.bar
            .set_message(format!("page {page_num}/{total_pages}"));
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: String) {
        // Tesseract stderr dumps can run to kilobytes; one line is enough here.
        let msg = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error
        };
        self.bar.println(format!(
            "      {} page {page_num}/{total_pages}  {}",
            red("✗"),
            red(&msg)
        ));
    }

    fn on_file_complete(&self, name: &str, pages: usize, failed_pages: usize) {
        let pages_note = if failed_pages == 0 {
            dim(&format!("{pages} pages"))
        } else {
            red(&format!("{pages} pages, {failed_pages} failed"))
        };
        self.bar
            .println(format!("  {} {name}  {pages_note}", green("✓")));
        self.bar.inc(1);
    }

    fn on_file_failed(&self, name: &str, error: String) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar
            .println(format!("  {} {name}  {}", red("✗"), red(&error)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _written: usize, _skipped: usize, _failed: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a folder of scanned books
  tometext books/ -o books/text --whitelist dnd_monster_whitelist.txt \
      --dictionary frequency_dictionary_en.txt

  # Re-run after an interruption (already-converted PDFs are skipped)
  tometext books/ -o books/text --whitelist dnd_monster_whitelist.txt \
      --dictionary frequency_dictionary_en.txt

  # Non-English books, custom tesseract install
  tometext scans/ -o out --lang deu --tesseract /opt/tesseract/bin/tesseract \
      --whitelist terms.txt --dictionary de_50k.txt

  # Machine-readable summary
  tometext books/ -o out --whitelist w.txt --dictionary d.txt --json

ENVIRONMENT VARIABLES:
  TOMETEXT_TESSERACT   Tesseract executable (same as --tesseract)
  TOMETEXT_LANG        OCR language code (same as --lang)
  TOMETEXT_CACHE_DIR   Scratch directory for page images
  PDFIUM_LIB_PATH      Directory containing libpdfium — skips the system search

SETUP:
  1. Install tesseract:   apt install tesseract-ocr   (or brew install tesseract)
  2. Install pdfium:      place libpdfium where the loader finds it, or set
                          PDFIUM_LIB_PATH / --pdfium-lib
  3. Get a frequency dictionary, e.g. SymSpell's
     frequency_dictionary_en_82_765.txt
  4. Convert:             tometext books/ -o books/text \
                              --whitelist whitelist.txt --dictionary dict.txt

The whitelist is one term per line; words matching an entry (or within one
edit of one) are never "corrected" away.
"#;

/// Batch-convert scanned PDF books to clean, spell-corrected plain text.
#[derive(Parser, Debug)]
#[command(
    name = "tometext",
    version,
    about = "Batch-convert scanned PDF books to clean, spell-corrected plain text",
    long_about = "Convert every scanned PDF in a folder to plain text: rasterise pages with \
pdfium, OCR them with tesseract, clean up the OCR noise, and spell-correct word by word \
while protecting whitelisted domain terms. Re-runs skip already-converted documents.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the PDF files (scanned non-recursively).
    input_dir: PathBuf,

    /// Folder receiving one .txt per PDF (created if absent).
    #[arg(short, long, env = "TOMETEXT_OUTPUT")]
    output: PathBuf,

    /// Newline-delimited domain-term whitelist (terms exempt from correction).
    #[arg(long, env = "TOMETEXT_WHITELIST")]
    whitelist: PathBuf,

    /// SymSpell frequency dictionary ("word count" per line).
    #[arg(long, env = "TOMETEXT_DICTIONARY")]
    dictionary: PathBuf,

    /// Tesseract executable.
    #[arg(long, env = "TOMETEXT_TESSERACT", default_value = "tesseract")]
    tesseract: PathBuf,

    /// Tesseract language code.
    #[arg(long, env = "TOMETEXT_LANG", default_value = "eng")]
    lang: String,

    /// Directory containing the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Scratch directory for rasterised page images.
    #[arg(long, env = "TOMETEXT_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Longest-edge cap for rendered pages, in pixels.
    #[arg(long, env = "TOMETEXT_MAX_PIXELS", default_value_t = 3000)]
    max_pixels: u32,

    /// Maximum edit distance for dictionary corrections (0-2).
    #[arg(long, env = "TOMETEXT_MAX_EDIT", default_value_t = 1,
          value_parser = clap::value_parser!(i64).range(0..=2))]
    max_edit_distance: i64,

    /// Print the batch summary as JSON on stdout.
    #[arg(long, env = "TOMETEXT_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "TOMETEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TOMETEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TOMETEXT_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // With the progress bar active, library INFO lines would fight the bar
    // for the terminal; drop to error-only unless asked for more.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let mut builder = BatchConfig::builder()
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output)
        .whitelist(&cli.whitelist)
        .dictionary(&cli.dictionary)
        .tesseract_cmd(&cli.tesseract)
        .tesseract_lang(&cli.lang)
        .max_rendered_pixels(cli.max_pixels)
        .max_edit_distance(cli.max_edit_distance);

    if let Some(ref dir) = cli.pdfium_lib {
        builder = builder.pdfium_lib_dir(dir);
    }
    if let Some(ref dir) = cli.cache_dir {
        builder = builder.cache_dir(dir);
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    let converter = Converter::new(config)
        .context("Startup failed (whitelist, dictionary, or cache directory)")?;
    let summary = converter.convert_folder().context("Batch failed")?;

    // ── Summary ──────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        let badge = if summary.failed == 0 {
            green("✔")
        } else {
            cyan("⚠")
        };
        eprintln!(
            "{badge}  {} written, {} skipped, {} failed of {} PDFs  {}",
            bold(&summary.written.to_string()),
            summary.skipped,
            if summary.failed == 0 {
                summary.failed.to_string()
            } else {
                red(&summary.failed.to_string())
            },
            summary.scanned,
            dim(&format!("{}ms", summary.duration_ms)),
        );
        eprintln!(
            "   {} words corrected  /  {} whitelisted  /  {} guarded",
            dim(&summary.rewrite.corrected.to_string()),
            dim(&summary.rewrite.whitelisted.to_string()),
            dim(&summary.rewrite.guarded.to_string()),
        );
    }

    Ok(())
}
