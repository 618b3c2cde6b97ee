use chrono::{Local, NaiveDate};

use crate::utils::dates::date_key;

/// Source of "today". The dashboard uses the local wall clock; tests pin a date.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    fn today_key(&self) -> String {
        date_key(self.today())
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
pub struct FixedClock(pub std::cell::Cell<NaiveDate>);

#[cfg(test)]
impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self(std::cell::Cell::new(date))
    }

    pub fn set(&self, date: NaiveDate) {
        self.0.set(date);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

pub fn advance_day_boundary(cached: &str, live: &str) -> bool {
    cached != live
}

/// Remembers which day the in-memory state belongs to.
///
/// Ticks and focus-regain events both ask the same question; whichever fires
/// first after midnight reports the crossing, later calls report nothing.
pub struct DayWatcher<C: Clock> {
    clock: C,
    current: String,
}

impl<C: Clock> DayWatcher<C> {
    pub fn new(clock: C) -> Self {
        let current = clock.today_key();
        Self { clock, current }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn on_tick(&mut self) -> bool {
        self.check()
    }

    pub fn on_focus_regain(&mut self) -> bool {
        self.check()
    }

    fn check(&mut self) -> bool {
        let live = self.clock.today_key();
        if advance_day_boundary(&self.current, &live) {
            log::info!("Day changed from {} to {}", self.current, live);
            self.current = live;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn boundary_is_any_difference() {
        assert!(!advance_day_boundary("2024-03-10", "2024-03-10"));
        assert!(advance_day_boundary("2024-03-10", "2024-03-11"));
        assert!(advance_day_boundary("2024-03-10", "2024-03-09"));
    }

    #[test]
    fn watcher_reports_a_crossing_once() {
        let clock = FixedClock::new(d(10));
        let mut watcher = DayWatcher::new(&clock);
        assert!(!watcher.on_tick());

        clock.set(d(11));
        assert!(watcher.on_focus_regain());
        assert_eq!(watcher.current(), "2024-03-11");
        assert!(!watcher.on_tick());
    }
}
