//! Copy progress bar for the CLI run.

use indicatif::{ProgressBar, ProgressStyle};

/// Single-line progress over the planned file copies.
pub struct CopyProgress {
    bar: ProgressBar,
}

impl CopyProgress {
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) | {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Self { bar }
    }

    /// Invisible bar for `--quiet` runs.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Advance by one copied file, showing its name.
    pub fn copied(&self, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}
