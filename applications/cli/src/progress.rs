//! Terminal rendering of import progress

use indicatif::{ProgressBar, ProgressStyle};
use shelf_importer::ImportProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Drives one indicatif bar from a stream of [`ImportProgress`] events
///
/// Starts as a spinner while folders are walked and switches to a bounded
/// bar once the candidate total is known.
pub struct ProgressRenderer {
    bar: ProgressBar,
    bounded: bool,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    /// Render into an existing bar (use `ProgressBar::hidden()` in tests)
    pub fn with_bar(bar: ProgressBar) -> Self {
        if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
            bar.set_style(style);
        }
        Self {
            bar,
            bounded: false,
        }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    pub fn handle(&mut self, event: &ImportProgress) {
        match *event {
            ImportProgress::Scanning => {
                self.bar.set_message("Scanning folders...");
            }
            ImportProgress::FolderScanned { count } => {
                self.bar.set_message(format!("Scanned {} folders", count));
                self.bar.tick();
            }
            ImportProgress::Importing { current, total } => {
                if !self.bounded {
                    self.bar.set_length(total as u64);
                    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                        self.bar.set_style(style.progress_chars("=>-"));
                    }
                    self.bar.set_message("Importing");
                    self.bounded = true;
                }
                self.bar.set_position(current as u64);
            }
            ImportProgress::Finished {
                imported,
                had_error,
                cancelled,
            } => {
                let message = if cancelled {
                    format!("Cancelled after {} imported", imported)
                } else if had_error {
                    format!("Done with errors, {} imported", imported)
                } else if imported == 0 {
                    "No new books found".to_string()
                } else {
                    format!("Done, {} imported", imported)
                };
                self.bar.finish_with_message(message);
            }
        }
    }
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}
