//! Console status output.

use indicatif::{ProgressBar, ProgressStyle};

/// How much non-critical status information to write to the console.
#[derive(Clone)]
pub enum Verbosity {
    Quiet,
    Messages,
    Progress(ProgressStyle),
}

impl Verbosity {
    /// Whether status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Creates a progress bar for the given number of items, which is hidden
    /// unless progress reporting is enabled.
    pub fn create_progress_bar(&self, n_items: usize) -> ProgressBar {
        match self {
            Self::Progress(style) => ProgressBar::new(n_items as u64).with_style(style.clone()),
            _ => ProgressBar::hidden(),
        }
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::Quiet
    }
}
