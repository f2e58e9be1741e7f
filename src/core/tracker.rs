//! Typing session tracking and anomaly detection.
//!
//! The tracker records key-press timestamps during a capture session,
//! derives inter-key intervals, and flags intervals that are statistically
//! inconsistent with the typing cadence seen so far.

use crate::core::snapshot::KeyprintSnapshot;
use std::time::Instant;

/// Multiplier of the trailing average interval above which an interval is
/// flagged as anomalous.
///
/// This value is part of the keyprint wire contract: the remote matching
/// service consumes client-reported anomaly indices, so the heuristic must
/// not change.
pub const ANOMALY_THRESHOLD: f64 = 2.5;

/// Minimum number of intervals required before anomaly detection runs.
const MIN_INTERVALS_FOR_DETECTION: usize = 3;

/// Tracks keystroke timing for a single capture session.
///
/// The session starts empty, is mutated by each key press, and is cleared
/// explicitly with [`TypingTracker::reset`]. All state lives in the tracker;
/// there is no global timer or singleton.
///
/// # Example
///
/// ```
/// use keyprint::TypingTracker;
///
/// let mut tracker = TypingTracker::new();
/// tracker.record_key_press(0, false);
/// tracker.record_key_press(120, false);
/// tracker.record_key_press(250, true);
///
/// assert_eq!(tracker.intervals(), &[120, 130]);
/// assert_eq!(tracker.duration(), 250);
/// assert_eq!(tracker.backspace_count(), 1);
/// ```
#[derive(Debug)]
pub struct TypingTracker {
    /// Monotonic clock epoch for wall-clock key presses
    epoch: Instant,
    /// Timestamp of each key press, in milliseconds since the epoch
    key_times: Vec<u64>,
    /// Millisecond gaps between consecutive key presses
    intervals: Vec<u64>,
    /// Indices into `intervals` flagged as anomalous, in detection order
    anomalies: Vec<usize>,
    /// Number of backspace presses this session
    backspace_count: u64,
    /// Timestamp of the first key press
    start_time: Option<u64>,
    /// Timestamp of the most recent key press
    end_time: Option<u64>,
}

impl TypingTracker {
    /// Create a new, empty tracker.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            key_times: Vec::new(),
            intervals: Vec::new(),
            anomalies: Vec::new(),
            backspace_count: 0,
            start_time: None,
            end_time: None,
        }
    }

    /// Record a key press at the current time.
    ///
    /// Reads the tracker's monotonic clock and delegates to
    /// [`TypingTracker::record_key_press`].
    pub fn handle_key_press(&mut self, is_backspace: bool) {
        let now = self.epoch.elapsed().as_millis() as u64;
        self.record_key_press(now, is_backspace);
    }

    /// Record a key press at an explicit timestamp (milliseconds, monotonic).
    ///
    /// All inputs are accepted: a timestamp equal to the previous one yields
    /// a valid zero interval. The start time is set only by the first press;
    /// the end time is updated by every press.
    pub fn record_key_press(&mut self, timestamp_ms: u64, is_backspace: bool) {
        if self.start_time.is_none() {
            self.start_time = Some(timestamp_ms);
        }
        self.end_time = Some(timestamp_ms);

        if is_backspace {
            self.backspace_count += 1;
        }

        if let Some(&last) = self.key_times.last() {
            let interval = timestamp_ms.saturating_sub(last);
            self.intervals.push(interval);

            if self.intervals.len() > MIN_INTERVALS_FOR_DETECTION {
                self.detect_anomaly();
            }
        }

        self.key_times.push(timestamp_ms);
    }

    /// Check whether the newest interval is anomalous.
    ///
    /// Compares the newest interval against the mean of all earlier intervals
    /// times [`ANOMALY_THRESHOLD`]. One-sided and trailing: past intervals are
    /// never re-evaluated. Only called with at least 4 intervals, so the mean
    /// denominator is at least 3.
    fn detect_anomaly(&mut self) {
        let newest_index = self.intervals.len() - 1;
        let prior = &self.intervals[..newest_index];
        let mean = prior.iter().sum::<u64>() as f64 / prior.len() as f64;

        if self.intervals[newest_index] as f64 > mean * ANOMALY_THRESHOLD {
            self.anomalies.push(newest_index);
        }
    }

    /// Clear all session state.
    ///
    /// After a reset, every derived value reads the same as on a freshly
    /// constructed tracker.
    pub fn reset(&mut self) {
        self.key_times.clear();
        self.intervals.clear();
        self.anomalies.clear();
        self.backspace_count = 0;
        self.start_time = None;
        self.end_time = None;
    }

    /// Total session duration in milliseconds, or 0 before the first press.
    pub fn duration(&self) -> u64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }

    /// Mean inter-key interval rounded to the nearest millisecond, or 0 when
    /// no intervals have been recorded.
    pub fn average_interval(&self) -> u64 {
        if self.intervals.is_empty() {
            return 0;
        }
        let sum: u64 = self.intervals.iter().sum();
        (sum as f64 / self.intervals.len() as f64).round() as u64
    }

    /// Recorded inter-key intervals, oldest first.
    pub fn intervals(&self) -> &[u64] {
        &self.intervals
    }

    /// Indices of anomalous intervals, in detection order.
    pub fn anomalies(&self) -> &[usize] {
        &self.anomalies
    }

    /// Number of backspace presses this session.
    pub fn backspace_count(&self) -> u64 {
        self.backspace_count
    }

    /// Number of key presses recorded this session.
    pub fn key_count(&self) -> usize {
        self.key_times.len()
    }

    /// Take an immutable snapshot of the session for export.
    pub fn snapshot(&self) -> KeyprintSnapshot {
        KeyprintSnapshot {
            intervals: self.intervals.clone(),
            duration: self.duration(),
            backspace_count: self.backspace_count,
        }
    }
}

impl Default for TypingTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_presses(timestamps: &[u64]) -> TypingTracker {
        let mut tracker = TypingTracker::new();
        for &t in timestamps {
            tracker.record_key_press(t, false);
        }
        tracker
    }

    #[test]
    fn test_empty_tracker_derived_values() {
        let tracker = TypingTracker::new();
        assert_eq!(tracker.duration(), 0);
        assert_eq!(tracker.average_interval(), 0);
        assert!(tracker.intervals().is_empty());
        assert!(tracker.anomalies().is_empty());
        assert_eq!(tracker.backspace_count(), 0);
        assert_eq!(tracker.key_count(), 0);
    }

    #[test]
    fn test_intervals_follow_timestamps() {
        let tracker = tracker_with_presses(&[10, 110, 140, 400]);
        assert_eq!(tracker.intervals(), &[100, 30, 260]);
        assert_eq!(tracker.key_count(), 4);
    }

    #[test]
    fn test_duration_spans_first_to_last_press() {
        let tracker = tracker_with_presses(&[50, 150, 275]);
        assert_eq!(tracker.duration(), 225);

        let single = tracker_with_presses(&[300]);
        assert_eq!(single.duration(), 0);
    }

    #[test]
    fn test_identical_timestamps_yield_zero_interval() {
        let tracker = tracker_with_presses(&[100, 100]);
        assert_eq!(tracker.intervals(), &[0]);
    }

    #[test]
    fn test_backspace_counting() {
        let mut tracker = TypingTracker::new();
        tracker.record_key_press(0, false);
        tracker.record_key_press(80, true);
        tracker.record_key_press(160, true);
        assert_eq!(tracker.backspace_count(), 2);
    }

    #[test]
    fn test_average_interval_rounds_to_nearest() {
        // Intervals 100, 101: mean 100.5 rounds to 101
        let tracker = tracker_with_presses(&[0, 100, 201]);
        assert_eq!(tracker.average_interval(), 101);

        // Intervals 100, 100, 101: mean 100.33 rounds to 100
        let tracker = tracker_with_presses(&[0, 100, 200, 301]);
        assert_eq!(tracker.average_interval(), 100);
    }

    #[test]
    fn test_no_anomaly_detection_before_fourth_interval() {
        // Third interval is a huge outlier, but detection has not started yet
        let tracker = tracker_with_presses(&[0, 100, 200, 5000]);
        assert!(tracker.anomalies().is_empty());
    }

    #[test]
    fn test_anomaly_detected_on_slow_interval() {
        // intervals = [100, 100, 100, 600]; mean of first three = 100;
        // 600 > 100 * 2.5, so index 3 is anomalous
        let tracker = tracker_with_presses(&[0, 100, 200, 300, 900]);
        assert_eq!(tracker.intervals(), &[100, 100, 100, 600]);
        assert_eq!(tracker.anomalies(), &[3]);
    }

    #[test]
    fn test_anomaly_threshold_is_strict() {
        // intervals = [100, 100, 100, 250]; 250 == 100 * 2.5 exactly, not an anomaly
        let tracker = tracker_with_presses(&[0, 100, 200, 300, 550]);
        assert!(tracker.anomalies().is_empty());

        // One millisecond over the line is flagged
        let tracker = tracker_with_presses(&[0, 100, 200, 300, 551]);
        assert_eq!(tracker.anomalies(), &[3]);
    }

    #[test]
    fn test_anomalies_accumulate_in_detection_order() {
        let mut tracker = tracker_with_presses(&[0, 100, 200, 300, 900]);
        assert_eq!(tracker.anomalies(), &[3]);

        // Threshold now tracks the inflated mean (100+100+100+600)/4 = 225,
        // so the next slow interval must exceed 562.5 ms
        tracker.record_key_press(1500, false);
        assert_eq!(tracker.anomalies(), &[3, 4]);
    }

    #[test]
    fn test_fast_cadence_tightens_threshold() {
        // Fast typing (50 ms cadence) makes a 200 ms pause anomalous
        let tracker = tracker_with_presses(&[0, 50, 100, 150, 350]);
        assert_eq!(tracker.anomalies(), &[3]);
    }

    #[test]
    fn test_reset_matches_fresh_tracker() {
        let mut tracker = tracker_with_presses(&[0, 100, 200, 300, 900]);
        tracker.record_key_press(950, true);
        tracker.reset();

        let fresh = TypingTracker::new();
        assert_eq!(tracker.duration(), fresh.duration());
        assert_eq!(tracker.average_interval(), fresh.average_interval());
        assert_eq!(tracker.intervals(), fresh.intervals());
        assert_eq!(tracker.anomalies(), fresh.anomalies());
        assert_eq!(tracker.backspace_count(), fresh.backspace_count());
        assert_eq!(tracker.snapshot(), fresh.snapshot());
    }

    #[test]
    fn test_snapshot_is_a_stable_copy() {
        let mut tracker = tracker_with_presses(&[0, 100, 250]);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.intervals, vec![100, 150]);
        assert_eq!(snapshot.duration, 250);
        assert_eq!(snapshot.backspace_count, 0);

        // Further presses do not affect the snapshot already taken
        tracker.record_key_press(400, true);
        assert_eq!(snapshot.intervals, vec![100, 150]);
        assert_eq!(snapshot.backspace_count, 0);
    }

    #[test]
    fn test_handle_key_press_uses_monotonic_clock() {
        let mut tracker = TypingTracker::new();
        tracker.handle_key_press(false);
        tracker.handle_key_press(false);
        assert_eq!(tracker.key_count(), 2);
        assert_eq!(tracker.intervals().len(), 1);
    }
}
