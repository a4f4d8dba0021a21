//! Progress reporting and cancellation for archive operations.
//!
//! Both directions report progress once per processed entry as a fraction in
//! `[0.0, 1.0]`. Cancellation is cooperative and only observed between
//! entries.
//!
//! # Components
//!
//! - **`ProgressCallback`**: sink receiving per-entry events
//! - **`ProgressTracker`**: counts entries and computes fractions
//! - **`CancellationToken`**: shared flag checked at entry boundaries

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::ArchiveError;
use crate::Result;

/// Callback trait for progress reporting during zip and unzip.
///
/// Only [`on_progress`](Self::on_progress) is required. The callback runs on
/// whatever thread executes the operation.
///
/// Any `FnMut(f64)` closure is a callback:
///
/// ```
/// use quickzip_core::ProgressCallback;
///
/// let mut seen = Vec::new();
/// let mut sink = |fraction: f64| seen.push(fraction);
/// sink.on_progress(0.5);
/// sink.on_progress(1.0);
/// assert_eq!(seen, vec![0.5, 1.0]);
/// ```
pub trait ProgressCallback {
    /// Called before an entry is processed. `current` is 1-indexed.
    fn on_entry_start(&mut self, _entry: &str, _current: usize, _total: usize) {}

    /// Called after each entry with `completed / total`.
    fn on_progress(&mut self, fraction: f64);

    /// Called once after the whole operation succeeded.
    fn on_complete(&mut self) {}
}

impl<F> ProgressCallback for F
where
    F: FnMut(f64),
{
    fn on_progress(&mut self, fraction: f64) {
        self(fraction);
    }
}

/// Callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_progress(&mut self, _fraction: f64) {}
}

/// Counts processed entries and forwards fractions to a callback.
///
/// The fraction reported after the last entry is exactly `1.0`. When the
/// total is zero the callback is never invoked.
///
/// # Examples
///
/// ```
/// use quickzip_core::progress::ProgressTracker;
///
/// let mut fractions = Vec::new();
/// let mut sink = |f: f64| fractions.push(f);
/// let mut tracker = ProgressTracker::new(&mut sink, 2);
/// tracker.on_entry_start("a.txt");
/// tracker.on_entry_complete();
/// tracker.on_entry_start("b.txt");
/// tracker.on_entry_complete();
/// drop(tracker);
/// assert_eq!(fractions, vec![0.5, 1.0]);
/// ```
pub struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    completed: usize,
    total: usize,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for `total` entries.
    #[must_use]
    pub fn new(progress: &'a mut dyn ProgressCallback, total: usize) -> Self {
        Self {
            progress,
            completed: 0,
            total,
        }
    }

    /// Reports that processing started for an entry.
    pub fn on_entry_start(&mut self, entry: &str) {
        self.progress
            .on_entry_start(entry, self.completed + 1, self.total);
    }

    /// Marks one more entry as processed and reports the new fraction.
    pub fn on_entry_complete(&mut self) {
        if self.total == 0 {
            return;
        }
        self.completed = (self.completed + 1).min(self.total);
        self.progress.on_progress(self.fraction());
    }

    /// Reports that the whole operation completed.
    pub fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    /// Fraction of entries processed so far.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// Number of entries processed so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a token can be handed to a worker thread
/// and cancelled from another. Operations check it before each entry; the
/// entry in flight always finishes first.
///
/// # Examples
///
/// ```
/// use quickzip_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let worker_view = token.clone();
/// token.cancel();
/// assert!(worker_view.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Fails with `ArchiveError::Cancelled` if `token` has been cancelled.
pub(crate) fn check_cancelled(token: Option<&CancellationToken>) -> Result<()> {
    if token.is_some_and(CancellationToken::is_cancelled) {
        return Err(ArchiveError::Cancelled);
    }
    Ok(())
}
