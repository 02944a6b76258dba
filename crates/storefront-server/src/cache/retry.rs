//! Connection retry backoff.

use std::time::Duration;

/// Delay cap: no retry waits longer than two seconds.
pub const MAX_RETRY_DELAY_MS: u64 = 2000;

/// Returns the delay before retry `attempt` (1-based), or `None` to give up.
///
/// The delay grows linearly (`attempt * base_interval_ms`) and is capped at
/// [`MAX_RETRY_DELAY_MS`].
#[must_use]
pub fn retry_delay(attempt: u32, max_attempts: u32, base_interval_ms: u64) -> Option<Duration> {
    if attempt > max_attempts {
        return None;
    }
    let delay = (u64::from(attempt) * base_interval_ms).min(MAX_RETRY_DELAY_MS);
    Some(Duration::from_millis(delay))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_linearly() {
        assert_eq!(retry_delay(1, 10, 100), Some(Duration::from_millis(100)));
        assert_eq!(retry_delay(2, 10, 100), Some(Duration::from_millis(200)));
        assert_eq!(retry_delay(5, 10, 100), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_delay_is_capped() {
        assert_eq!(retry_delay(10, 50, 500), Some(Duration::from_millis(2000)));
        assert_eq!(retry_delay(50, 50, 100), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_gives_up_past_max_attempts() {
        assert_eq!(retry_delay(11, 10, 100), None);
        assert!(retry_delay(10, 10, 100).is_some());
    }

    #[test]
    fn test_zero_base_interval() {
        assert_eq!(retry_delay(3, 10, 0), Some(Duration::ZERO));
    }
}
