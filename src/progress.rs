//! Progress bar display for pipeline runs

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for fragment rendering
pub struct ProgressDisplay {
    /// Fragment progress bar
    fragment_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total fragment count
    #[allow(clippy::unwrap_used)]
    pub fn new(total_fragments: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-");

        let fragment_pb = ProgressBar::new(total_fragments);
        fragment_pb.set_style(style);

        Self { fragment_pb }
    }

    /// Display that emits nothing, for library use and tests
    #[allow(dead_code)]
    pub fn hidden() -> Self {
        Self {
            fragment_pb: ProgressBar::hidden(),
        }
    }

    /// Set the total once the fragment count is known
    pub fn set_total(&self, total_fragments: u64) {
        self.fragment_pb.set_length(total_fragments);
    }

    /// Update to show the fragment being rendered
    pub fn update_fragment(&self, fragment_path: &str) {
        // Truncate long paths for display
        let display_path = if fragment_path.len() > 50 {
            format!("...{}", &fragment_path[fragment_path.len() - 47..])
        } else {
            fragment_path.to_string()
        };
        self.fragment_pb.set_message(display_path);
        self.fragment_pb.inc(1);
    }

    /// Finish fragment progress
    pub fn finish(&self) {
        self.fragment_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.fragment_pb.abandon();
    }
}
