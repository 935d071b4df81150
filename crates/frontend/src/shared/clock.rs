use chrono::{DateTime, Utc};
use std::rc::Rc;

/// Source of "now" for caches. Swapped for a manual clock in tests.
pub type Clock = Rc<dyn Fn() -> DateTime<Utc>>;

pub fn system_clock() -> Clock {
    Rc::new(Utc::now)
}

#[cfg(test)]
pub mod manual {
    use super::Clock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that only moves when told to
    #[derive(Clone)]
    pub struct ManualClock {
        now: Rc<Cell<DateTime<Utc>>>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: Rc::new(Cell::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())),
            }
        }

        pub fn advance(&self, by: Duration) {
            self.now.set(self.now.get() + by);
        }

        pub fn clock(&self) -> Clock {
            let now = Rc::clone(&self.now);
            Rc::new(move || now.get())
        }
    }
}
