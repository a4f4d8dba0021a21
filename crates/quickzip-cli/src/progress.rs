//! Progress bar implementation for CLI operations.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use quickzip_core::ProgressCallback;
use std::fmt::Write;

/// Resolution of the bar; fractions are mapped onto this many steps.
const STEPS: u64 = 1000;

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// Shows the entry being processed, the entry count and ETA. Automatically
/// cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    verb: String,
}

impl CliProgress {
    /// Creates a new CLI progress bar.
    ///
    /// `verb` prefixes the current entry name (e.g., "Adding", "Extracting").
    #[must_use]
    pub fn new(verb: &str) -> Self {
        let bar = ProgressBar::new(STEPS);

        // Template: "Adding photos/a.gif [████████░░░░] 42% (3/7, 12s)"
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:30!} [{bar:40.cyan/blue}] {percent:>3}% ({prefix}, {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );

        Self {
            bar,
            verb: verb.to_string(),
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, entry: &str, current: usize, total: usize) {
        self.bar.set_prefix(format!("{current}/{total}"));
        self.bar.set_message(format!("{} {entry}", self.verb));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn on_progress(&mut self, fraction: f64) {
        self.bar
            .set_position((fraction.clamp(0.0, 1.0) * STEPS as f64).round() as u64);
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration(std::time::Duration::from_secs(0)), "0s");
        assert_eq!(humanize_duration(std::time::Duration::from_secs(30)), "30s");
        assert_eq!(
            humanize_duration(std::time::Duration::from_secs(90)),
            "1m30s"
        );
        assert_eq!(
            humanize_duration(std::time::Duration::from_secs(3661)),
            "1h1m"
        );
    }

    #[test]
    fn test_progress_callback() {
        let mut progress = CliProgress::new("Testing");

        progress.on_entry_start("dir/test.txt", 1, 4);
        progress.on_progress(0.25);
        assert_eq!(progress.bar.prefix(), "1/4");
        assert_eq!(progress.bar.position(), 250);

        progress.on_progress(1.0);
        assert_eq!(progress.bar.position(), STEPS);
    }
}
