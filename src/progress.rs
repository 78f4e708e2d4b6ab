//! Progress reporting for bulk store teardown.
//!
//! Releasing a very large store can run for hours; the schedule here gives
//! operators evidence the process is still moving. Reporting is coarse for
//! most of the run and tightens near the end, where the per-percent work is
//! largest: 10-point steps up to 90%, 1-point steps up to 99%, then
//! 0.1-point steps.

/// Snapshot handed to the clear-progress callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearProgress {
    /// Threshold just crossed, in percent of entries released.
    pub percent: f64,
    /// Entries still held.
    pub remaining: u64,
    /// Entries held when the clear began.
    pub total: u64,
}

/// Coarse-to-fine reporting thresholds.
#[derive(Debug, Clone)]
pub struct ProgressSchedule {
    next: f64,
}

impl ProgressSchedule {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 0.0 }
    }

    /// Returns the armed threshold if `percent_complete` has passed it, and
    /// arms the following one. At most one threshold is reported per call;
    /// the caller advances once per released entry, so a burst that skips
    /// several thresholds still produces a monotonic signal.
    pub fn advance(&mut self, percent_complete: f64) -> Option<f64> {
        if percent_complete <= self.next {
            return None;
        }
        let crossed = self.next;
        self.next = if self.next < 90.0 {
            self.next + 10.0
        } else if self.next < 99.0 {
            self.next + 1.0
        } else {
            // Keep one decimal place; repeated float addition drifts.
            ((self.next + 0.1) * 10.0).round() / 10.0
        };
        Some(crossed)
    }
}

impl Default for ProgressSchedule {
    fn default() -> Self {
        Self::new()
    }
}
