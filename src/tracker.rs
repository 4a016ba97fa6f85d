//! Consecutive-failure accounting.

/// Counts failures since the last success and reports retry exhaustion.
///
/// Exhaustion is re-evaluated on every failure, so once the streak reaches
/// `max_retries` it keeps reporting `true` until a success resets it. The
/// caller decides what exhaustion means; this type only counts.
#[derive(Debug)]
pub(crate) struct FailureTracker {
    consecutive_failures: u32,
    max_retries: u32,
}

impl FailureTracker {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            consecutive_failures: 0,
            max_retries,
        }
    }

    pub(crate) fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Returns whether the failure streak has reached the retry limit.
    pub(crate) fn record_failure(&mut self) -> bool {
        self.consecutive_failures += 1;
        self.consecutive_failures >= self.max_retries
    }

    pub(crate) fn failures(&self) -> u32 {
        self.consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_reported_at_threshold() {
        let mut tracker = FailureTracker::new(3);
        assert_eq!(
            [
                tracker.record_failure(),
                tracker.record_failure(),
                tracker.record_failure(),
            ],
            [false, false, true]
        );
    }

    #[test]
    fn exhaustion_is_sticky_until_success() {
        let mut tracker = FailureTracker::new(2);
        tracker.record_failure();
        assert!(tracker.record_failure());
        assert!(tracker.record_failure());

        tracker.record_success();
        assert_eq!(tracker.failures(), 0);
        assert!(!tracker.record_failure());
    }

    #[test]
    fn success_resets_count_for_any_history() {
        let mut tracker = FailureTracker::new(5);
        for _ in 0..17 {
            tracker.record_failure();
        }
        tracker.record_success();
        assert_eq!(tracker.failures(), 0);
    }

    #[test]
    fn threshold_of_one_exhausts_immediately() {
        let mut tracker = FailureTracker::new(1);
        assert!(tracker.record_failure());
    }
}
