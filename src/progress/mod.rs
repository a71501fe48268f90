//! Progress reporting for dataset generation
//!
//! Writing hundreds of millions of keys takes a while, so the writer reports
//! `(elements_written, elements_total, elapsed)` at a coarse interval. Reporting is
//! advisory: sinks can render a bar, log, or ignore updates, and nothing they do
//! affects the bytes written.
//!
//! # Sampling
//!
//! Updates are emitted once at the start, every `interval` elements (default
//! 100,000), and once at completion. The per-element cost is a single counter
//! comparison.
//!
//! # Example
//!
//! ```
//! use keyforge::progress::{ProgressTracker, ProgressUpdate};
//!
//! let mut seen = Vec::new();
//! let mut sink = |u: &ProgressUpdate| seen.push(u.elements_written);
//! let mut tracker = ProgressTracker::new(250, 100);
//! tracker.start(0, &mut sink);
//! for written in 1..=250 {
//!     tracker.record(written, &mut sink);
//! }
//! tracker.finish(&mut sink);
//! drop(sink);
//! assert_eq!(seen, vec![0, 100, 200, 250]);
//! ```

pub mod console;

use std::time::{Duration, Instant};

/// Default number of elements between progress updates
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Snapshot of a running dataset write
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Elements encoded and handed to the output buffer
    pub elements_written: u64,

    /// Elements requested for this dataset
    pub elements_total: u64,

    /// Time since the header was written
    pub elapsed: Duration,
}

impl ProgressUpdate {
    /// Completed fraction in `[0, 1]`
    ///
    /// An empty dataset counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.elements_total == 0 {
            1.0
        } else {
            (self.elements_written as f64 / self.elements_total as f64).min(1.0)
        }
    }

    /// Estimated total run time: `elapsed / written * total`
    ///
    /// `None` until at least one element was written, or when the projection
    /// does not fit in a `Duration`.
    pub fn estimated_total(&self) -> Option<Duration> {
        if self.elements_written == 0 {
            return None;
        }
        let per_element = self.elapsed.as_secs_f64() / self.elements_written as f64;
        Duration::try_from_secs_f64(per_element * self.elements_total as f64).ok()
    }

    /// Estimated time remaining
    pub fn eta(&self) -> Option<Duration> {
        self.estimated_total()
            .map(|total| total.saturating_sub(self.elapsed))
    }

    /// True once every requested element was written
    pub fn is_complete(&self) -> bool {
        self.elements_written >= self.elements_total
    }
}

/// Receiver of progress updates
pub trait ProgressSink {
    fn report(&mut self, update: &ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: FnMut(&ProgressUpdate),
{
    fn report(&mut self, update: &ProgressUpdate) {
        self(update)
    }
}

/// Sink that discards all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _update: &ProgressUpdate) {}
}

/// Decides when to emit progress updates
///
/// Owned by the writer for the duration of one dataset.
#[derive(Debug)]
pub struct ProgressTracker {
    /// Elements between updates
    interval: u64,

    /// Elements requested
    total: u64,

    /// Start of the payload write
    start: Instant,

    /// Element count of the last emitted update
    last_reported: Option<u64>,
}

impl ProgressTracker {
    /// Create a tracker for `total` elements, reporting every `interval`
    ///
    /// An interval of zero is treated as one.
    pub fn new(total: u64, interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            total,
            start: Instant::now(),
            last_reported: None,
        }
    }

    /// Reset the clock and emit the initial update
    ///
    /// `written` is non-zero only when resuming a partially written dataset.
    pub fn start(&mut self, written: u64, sink: &mut dyn ProgressSink) {
        self.start = Instant::now();
        self.emit(written, sink);
    }

    /// Called after each element with the running count
    #[inline(always)]
    pub fn record(&mut self, written: u64, sink: &mut dyn ProgressSink) {
        if written % self.interval == 0 {
            self.emit(written, sink);
        }
    }

    /// Emit the completion update unless it was just emitted
    pub fn finish(&mut self, sink: &mut dyn ProgressSink) {
        if self.last_reported != Some(self.total) {
            self.emit(self.total, sink);
        }
    }

    fn emit(&mut self, written: u64, sink: &mut dyn ProgressSink) {
        self.last_reported = Some(written);
        sink.report(&ProgressUpdate {
            elements_written: written,
            elements_total: self.total,
            elapsed: self.start.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(written: u64, total: u64, secs: u64) -> ProgressUpdate {
        ProgressUpdate {
            elements_written: written,
            elements_total: total,
            elapsed: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_fraction() {
        assert_eq!(update(0, 100, 0).fraction(), 0.0);
        assert_eq!(update(50, 100, 0).fraction(), 0.5);
        assert_eq!(update(100, 100, 0).fraction(), 1.0);
        assert_eq!(update(0, 0, 0).fraction(), 1.0);
    }

    #[test]
    fn test_estimated_total_and_eta() {
        let u = update(25, 100, 10);
        assert_eq!(u.estimated_total(), Some(Duration::from_secs(40)));
        assert_eq!(u.eta(), Some(Duration::from_secs(30)));

        assert_eq!(update(0, 100, 10).estimated_total(), None);
        assert_eq!(update(0, 100, 10).eta(), None);
    }

    #[test]
    fn test_estimated_total_out_of_range() {
        let u = update(1, u64::MAX, 10);
        assert_eq!(u.estimated_total(), None);
        assert_eq!(u.eta(), None);
        assert!(!u.is_complete());
    }

    #[test]
    fn test_tracker_interval_sampling() {
        let mut seen = Vec::new();
        {
            let mut sink = |u: &ProgressUpdate| seen.push(u.elements_written);
            let mut tracker = ProgressTracker::new(1_000_000, DEFAULT_PROGRESS_INTERVAL);
            tracker.start(0, &mut sink);
            for written in 1..=1_000_000 {
                tracker.record(written, &mut sink);
            }
            tracker.finish(&mut sink);
        }

        // start + 10 interval updates, completion already covered by the last one
        assert_eq!(seen.len(), 11);
        assert_eq!(seen[0], 0);
        assert_eq!(seen[1], 100_000);
        assert_eq!(*seen.last().unwrap(), 1_000_000);
    }

    #[test]
    fn test_tracker_empty_dataset() {
        let mut seen = Vec::new();
        {
            let mut sink = |u: &ProgressUpdate| seen.push(*u);
            let mut tracker = ProgressTracker::new(0, 10);
            tracker.start(0, &mut sink);
            tracker.finish(&mut sink);
        }

        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_complete());
    }

    #[test]
    fn test_tracker_zero_interval() {
        let mut count = 0;
        {
            let mut sink = |_: &ProgressUpdate| count += 1;
            let mut tracker = ProgressTracker::new(3, 0);
            for written in 1..=3 {
                tracker.record(written, &mut sink);
            }
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_no_progress() {
        let mut sink = NoProgress;
        sink.report(&update(1, 2, 3));
    }
}
