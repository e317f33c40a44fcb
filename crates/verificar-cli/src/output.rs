//! Output formatting and progress reporting.

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use verificar::SuiteSummary;

/// Progress reporter for scenario execution
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    progress: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over a batch of scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar.set_message(message.to_string());
        self.progress = Some(bar);
    }

    /// Advance the progress bar
    pub fn increment(&self, delta: u64) {
        if let Some(bar) = &self.progress {
            bar.inc(delta);
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_progress(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
    }

    /// Print a success line
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure line. Failures print even in quiet mode.
    pub fn failure(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info line
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().to_string()
        } else {
            title.to_string()
        };
        let _ = self.term.write_line(&styled);
    }

    /// Print the suite summary line
    pub fn summary(&self, summary: &SuiteSummary) {
        let line = format!(
            "{} passed, {} failed ({} ms)",
            summary.passed(),
            summary.failed(),
            summary.duration_ms
        );
        if summary.all_passed() {
            self.success(&line);
        } else {
            self.failure(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_default() {
        let reporter = Reporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.quiet);
    }

    #[test]
    fn test_quiet_reporter_skips_progress() {
        let mut reporter = Reporter::new(false, true);
        reporter.start_progress(5, "running");
        assert!(reporter.progress.is_none());
    }

    #[test]
    fn test_progress_lifecycle() {
        let mut reporter = Reporter::new(false, false);
        reporter.start_progress(3, "running");
        assert!(reporter.progress.is_some());
        reporter.increment(1);
        reporter.finish_progress();
        assert!(reporter.progress.is_none());
    }
}
