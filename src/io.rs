//! File input/output and status reporting.

pub mod param;
pub mod utils;

use indicatif::{ProgressBar, ProgressStyle};

/// How much non-critical status information to print.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verbosity {
    Quiet,
    Messages,
    Progress,
}

impl Verbosity {
    /// Whether status messages should be printed.
    pub fn print_messages(&self) -> bool {
        match self {
            Self::Quiet => false,
            Self::Messages | Self::Progress => true,
        }
    }

    /// Whether progress bars should be shown.
    pub fn show_progress(&self) -> bool {
        *self == Self::Progress
    }

    /// Creates a progress bar for the given number of steps,
    /// which is hidden unless progress should be shown.
    pub fn create_progress_bar(&self, n_steps: usize) -> ProgressBar {
        if self.show_progress() {
            let progress_bar = ProgressBar::new(n_steps as u64);
            progress_bar.set_style(
                ProgressStyle::with_template(
                    "{elapsed_precise} [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            progress_bar
        } else {
            ProgressBar::hidden()
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::Quiet
    }
}
