//! Timing constants plus the bookkeeping behind debounced search and toast
//! expiry.

use std::time::Duration;

use crate::message::DEFAULT_POLL_INTERVAL;

/// Quiet period before a search keystroke triggers a fetch.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// How long a toast stays up.
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

/// How often the shell checks whether the visible toast has expired.
pub const TOAST_SWEEP: Duration = Duration::from_millis(250);

/// Poll period from an optional whole-seconds override. Zero and
/// unparseable values fall back to [`DEFAULT_POLL_INTERVAL`].
pub fn poll_interval_from(raw: Option<&str>) -> Duration {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

/// Millisecond timestamp at which something shown at `shown_at_ms` expires.
pub fn deadline_after(shown_at_ms: i64, duration: Duration) -> i64 {
    let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
    shown_at_ms.saturating_add(millis)
}

/// Generation counter for debounced input.
///
/// Every keystroke takes a ticket with [`Debounce::arm`]. When its quiet
/// period ends, the keystroke applies only if no later one took a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Debounce {
    latest: u64,
}

impl Debounce {
    pub fn arm(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_match_the_ui_contract() {
        assert_eq!(SEARCH_DEBOUNCE, Duration::from_millis(500));
        assert_eq!(TOAST_DURATION, Duration::from_secs(5));
        assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_secs(30));
        assert!(TOAST_SWEEP < TOAST_DURATION);
    }

    #[test]
    fn poll_override_falls_back_on_zero_or_garbage() {
        assert_eq!(poll_interval_from(None), Duration::from_secs(30));
        assert_eq!(poll_interval_from(Some("0")), Duration::from_secs(30));
        assert_eq!(poll_interval_from(Some("soon")), Duration::from_secs(30));
        assert_eq!(poll_interval_from(Some("")), Duration::from_secs(30));
        assert_eq!(poll_interval_from(Some("5")), Duration::from_secs(5));
    }

    #[test]
    fn only_the_last_keystroke_applies() {
        let mut debounce = Debounce::default();
        let m = debounce.arm();
        let ma = debounce.arm();
        let mai = debounce.arm();

        assert!(!debounce.is_latest(m));
        assert!(!debounce.is_latest(ma));
        assert!(debounce.is_latest(mai));

        // A keystroke after the last timer fired starts a fresh window.
        let maiz = debounce.arm();
        assert!(!debounce.is_latest(mai));
        assert!(debounce.is_latest(maiz));
    }

    #[test]
    fn deadline_adds_the_duration() {
        assert_eq!(deadline_after(1_000, TOAST_DURATION), 6_000);
        assert_eq!(deadline_after(i64::MAX - 1, TOAST_DURATION), i64::MAX);
    }
}
