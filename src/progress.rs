use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Trait for reporting round progress.
///
/// The CLI implements it with indicatif; tests and library callers use
/// [`SilentReporter`]. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_search_start(&self, _query: &str) {}
    fn on_search_complete(&self, _results: usize, _duration_secs: f64) {}
    fn on_download_start(&self, _total: usize) {}
    fn on_download_progress(&self, _position: usize, _succeeded: bool) {}
    fn on_download_complete(&self, _downloaded: usize, _total: usize, _duration_secs: f64) {}
    fn on_store_complete(&self, _stored: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Terminal reporter: a spinner while searching, a bar while downloading.
pub struct BarReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for BarReporter {
    fn on_search_start(&self, query: &str) {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.set_message(format!("Searching for '{}'...", query));
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_search_complete(&self, results: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Search complete: {} results in {:.2}s",
            results, duration_secs
        );
    }

    fn on_download_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} Downloading [{bar:30.cyan/dim}] {pos}/{len} images",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_download_progress(&self, _position: usize, _succeeded: bool) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn on_download_complete(&self, downloaded: usize, total: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Download complete: {}/{} images in {:.2}s",
            downloaded, total, duration_secs
        );
    }

    fn on_store_complete(&self, stored: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Database write complete: {} rows in {:.2}s",
            stored, duration_secs
        );
    }
}
