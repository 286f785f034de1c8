//! Batch progress display for split and stitch runs

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{prefix}}: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress of a batch of independent units (images or tile folders)
///
/// All methods take `&self`, so one manager can be shared by the worker
/// threads of a parallel batch.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a visible progress bar for `unit_count` units
    pub fn new(label: &str, unit_count: usize) -> Self {
        let bar = ProgressBar::new(unit_count as u64);
        bar.set_style(BATCH_STYLE.clone());
        bar.set_prefix(label.to_string());
        Self { bar }
    }

    /// Create a manager that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Record a finished unit and the number of tiles it produced or used
    pub fn complete_unit(&self, path: &Path, tiles: usize) {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        self.bar.set_message(format!("✓ {name} ({tiles} tiles)"));
        self.bar.inc(1);
    }

    /// Record a unit that failed or produced no output
    pub fn skip_unit(&self, path: &Path) {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        self.bar.set_message(format!("✗ {name}"));
        self.bar.inc(1);
    }

    /// Number of units recorded so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar with a final summary line
    pub fn finish(&self, summary: &str) {
        self.bar.finish_with_message(summary.to_string());
    }
}
