//! Terminal progress reporting.

use std::io::{stderr, IsTerminal};

use indicatif::{ProgressBar, ProgressStyle};
use sqz_core::progress::{ProgressObserver, UNKNOWN_SIZE};

use crate::io::OutputTarget;

/// Whether a progress indicator should be rendered at all.
///
/// Progress is opt-in, goes to stderr, and is suppressed when stderr is
/// not a terminal or when the payload itself is going to stdout.
#[must_use]
pub fn should_report(progress_requested: bool, output: &OutputTarget) -> bool {
    progress_requested && *output != OutputTarget::Stdout && stderr().is_terminal()
}

/// Progress indicator for one operation.
///
/// Renders a bounded bar when the input size is known and a byte-count
/// spinner when it is not. A disabled reporter is inert, so callers
/// never branch on whether progress is active.
pub struct Reporter {
    bar: Option<ProgressBar>,
}

impl Reporter {
    /// Creates a reporter; `total` of [`UNKNOWN_SIZE`] selects the
    /// indeterminate spinner.
    #[must_use]
    pub fn new(enabled: bool, total: u64) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = if total == UNKNOWN_SIZE {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(spinner_style());
            spinner
        } else {
            let bar = ProgressBar::new(total);
            bar.set_style(bar_style());
            bar
        };

        Self { bar: Some(bar) }
    }

    /// Observer handle to hang off a pipeline stream.
    #[must_use]
    pub fn observer(&self) -> ReporterObserver {
        ReporterObserver {
            bar: self.bar.clone(),
        }
    }

    /// Clears the indicator from the terminal.
    ///
    /// Called on both success and failure so an aborted operation never
    /// leaves a stale bar behind.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{bytes}/{total_bytes} [{bar:32}] {percent}%")
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {bytes} processed")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// [`ProgressObserver`] forwarding counts to the reporter's bar.
pub struct ReporterObserver {
    bar: Option<ProgressBar>,
}

impl ProgressObserver for ReporterObserver {
    fn update(&mut self, processed: u64, _total: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(processed);
        }
    }
}
