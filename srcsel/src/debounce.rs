// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::registry::Pin;
use std::collections::HashMap;
use std::time::Duration;

/// Suppresses edges that follow an accepted edge on the same pin within
/// the debounce period, inclusive.
///
/// Timestamps are the event timestamps reported by the kernel, in
/// nanoseconds, so the filter is unaffected by delays in reading events.
#[derive(Debug)]
pub struct Debouncer {
    period_ns: u64,
    last: HashMap<Pin, u64>,
}

impl Debouncer {
    pub fn new(period: Duration) -> Debouncer {
        Debouncer {
            period_ns: u64::try_from(period.as_nanos()).unwrap_or(u64::MAX),
            last: HashMap::new(),
        }
    }

    /// Returns true if the edge should be acted upon.
    pub fn accept(&mut self, pin: Pin, timestamp_ns: u64) -> bool {
        if let Some(last) = self.last.get(&pin) {
            // a timestamp earlier than the last accepted edge means the
            // clock was stepped, so start afresh
            if let Some(elapsed) = timestamp_ns.checked_sub(*last) {
                if elapsed <= self.period_ns {
                    return false;
                }
            }
        }
        self.last.insert(pin, timestamp_ns);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn suppresses_within_period() {
        let mut d = Debouncer::new(Duration::from_millis(200));
        assert!(d.accept(37, 1000 * MS));
        assert!(!d.accept(37, 1001 * MS));
        assert!(!d.accept(37, 1199 * MS));
        // the edge must come strictly after the period
        assert!(!d.accept(37, 1200 * MS));
        assert!(d.accept(37, 1200 * MS + 1));
    }

    #[test]
    fn period_runs_from_accepted_edge() {
        let mut d = Debouncer::new(Duration::from_millis(200));
        assert!(d.accept(37, 0));
        // bounces keep arriving, but do not extend the window
        assert!(!d.accept(37, 150 * MS));
        assert!(!d.accept(37, 190 * MS));
        assert!(d.accept(37, 210 * MS));
    }

    #[test]
    fn pins_are_independent() {
        let mut d = Debouncer::new(Duration::from_millis(200));
        assert!(d.accept(37, 0));
        assert!(d.accept(33, 10 * MS));
        assert!(!d.accept(37, 20 * MS));
        assert!(!d.accept(33, 30 * MS));
    }

    #[test]
    fn zero_period() {
        let mut d = Debouncer::new(Duration::ZERO);
        assert!(d.accept(37, 5));
        assert!(d.accept(37, 6));
    }

    #[test]
    fn clock_step_back() {
        let mut d = Debouncer::new(Duration::from_millis(200));
        assert!(d.accept(37, 500 * MS));
        assert!(d.accept(37, 100 * MS));
        assert!(!d.accept(37, 150 * MS));
    }
}
