use chrono::NaiveDateTime;

/// Wall-clock seam for the availability rules.
///
/// The calculator compares slot labels against "now" in local time; tests
/// inject fixed clocks instead of reading the system clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Fixed clock for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
