//! Clock Module
//!
//! Time sources for entry expiry. The cache never reads the wall clock
//! directly; it asks the `Clock` it was built with.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

// == Clock Trait ==
/// A source of the current instant.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

// == System Clock ==
/// Reads the monotonic system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can hand one clone to a
/// cache and keep another to advance it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Creates a manual clock frozen at the current system instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a manual clock frozen at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::new();
        let first = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.now(), first);
    }

    #[test]
    fn test_manual_clock_advance_shared_between_clones() {
        let start = Instant::now();
        let clock = ManualClock::starting_at(start);
        let handle = clock.clone();

        handle.advance(Duration::from_millis(250));

        assert_eq!(clock.now(), start + Duration::from_millis(250));
    }
}
