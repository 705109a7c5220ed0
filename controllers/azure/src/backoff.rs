//! # Fibonacci Backoff
//!
//! Requeue backoff for failed reconciliation passes. The reconciliation
//! engine itself never retries; the watcher's error policy asks this
//! calculator how long to wait before re-invoking a pass.
//!
//! The sequence is calculated in minutes: 1m, 1m, 2m, 3m, 5m, 8m, 10m
//! (max), then converted to seconds for the requeue action.

/// Fibonacci backoff calculator
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Minimum backoff value in minutes (for reset)
    min_minutes: u64,
    /// Previous backoff value in minutes
    prev_minutes: u64,
    /// Current backoff value in minutes
    current_minutes: u64,
    /// Maximum backoff value in minutes
    max_minutes: u64,
}

impl FibonacciBackoff {
    /// Create a new backoff with the given minimum and maximum, in minutes
    #[must_use]
    pub fn new(min_minutes: u64, max_minutes: u64) -> Self {
        Self {
            min_minutes,
            prev_minutes: 0,
            current_minutes: min_minutes,
            max_minutes,
        }
    }

    /// Get the next backoff duration in seconds and advance the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result_seconds = self.current_minutes * 60;

        let next_minutes = (self.prev_minutes + self.current_minutes).min(self.max_minutes);
        self.prev_minutes = self.current_minutes;
        self.current_minutes = next_minutes;

        result_seconds
    }

    /// Reset the sequence to its minimum after a successful pass
    pub fn reset(&mut self) {
        self.prev_minutes = 0;
        self.current_minutes = self.min_minutes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_follows_fibonacci_capped_at_max() {
        let mut backoff = FibonacciBackoff::new(1, 10);
        let observed: Vec<u64> = (0..8).map(|_| backoff.next_backoff_seconds()).collect();
        assert_eq!(observed, vec![60, 60, 120, 180, 300, 480, 600, 600]);
    }

    #[test]
    fn reset_returns_to_minimum() {
        let mut backoff = FibonacciBackoff::new(1, 10);
        for _ in 0..5 {
            backoff.next_backoff_seconds();
        }
        backoff.reset();
        assert_eq!(backoff.next_backoff_seconds(), 60);
    }
}
