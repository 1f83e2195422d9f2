//! Debounced invocation for cooperative, single-threaded hosts.
//!
//! The host calls [`Debouncer::call`] on every notification and
//! [`Debouncer::poll`] from its event loop. Each call rearms the timer and
//! replaces the pending arguments, so only the last call before a quiet
//! interval comes out of `poll`.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

struct Pending<T> {
    deadline: Instant,
    args: T,
}

/// Holds at most one pending invocation.
///
/// Dropping the debouncer abandons whatever is pending.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet interval required before the pending call fires.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm the timer with `args`, starting now.
    pub fn call(&mut self, args: T) {
        self.call_at(Instant::now(), args);
    }

    /// (Re)arm the timer with `args`, as if called at `now`.
    pub fn call_at(&mut self, now: Instant, args: T) {
        if self.pending.is_some() {
            log::debug!("Debounce timer rearmed, replacing pending call");
        }
        self.pending = Some(Pending {
            deadline: now + self.delay,
            args,
        });
    }

    /// Take the pending arguments if the quiet interval has elapsed.
    pub fn poll(&mut self) -> Option<T> {
        self.poll_at(Instant::now())
    }

    /// [`Debouncer::poll`] against an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| now >= pending.deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.args)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending call will fire, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_nothing_fires_before_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.call_at(start, 1);

        assert!(debouncer.poll_at(start + Duration::from_millis(299)).is_none());
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.poll_at(start + DELAY), Some(1));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_last_call_wins() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.call_at(start, "first");
        debouncer.call_at(start + Duration::from_millis(100), "second");
        debouncer.call_at(start + Duration::from_millis(200), "third");

        // The first deadline has passed but every rearm pushed it back.
        assert!(debouncer.poll_at(start + Duration::from_millis(350)).is_none());
        assert_eq!(debouncer.poll_at(start + Duration::from_millis(500)), Some("third"));
        assert!(debouncer.poll_at(start + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_fires_once_per_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);

        debouncer.call_at(start, 1);
        assert_eq!(debouncer.poll_at(start + DELAY), Some(1));

        let later = start + Duration::from_secs(2);
        debouncer.call_at(later, 2);
        assert_eq!(debouncer.deadline(), Some(later + DELAY));
        assert_eq!(debouncer.poll_at(later + DELAY), Some(2));
    }

    #[test]
    fn test_idle_debouncer() {
        let mut debouncer: Debouncer<()> = Debouncer::new(DELAY);
        assert!(debouncer.poll().is_none());
        assert!(debouncer.deadline().is_none());
        assert_eq!(debouncer.delay(), DELAY);
    }
}
