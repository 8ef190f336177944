//! Deadline-based timers polled from the event loop.
//!
//! Nothing here sleeps or spawns. The owner passes in the current
//! [`Instant`] and the timers report what has come due since the last poll.

use std::time::{Duration, Instant};

/// A repeating timer that can be armed and cancelled.
#[derive(Debug, Clone)]
pub struct ProgressTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl ProgressTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Starts ticking: the first tick falls one period after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Counts whole periods elapsed by `now` and schedules the next one.
    ///
    /// A stalled loop catches up: three missed periods yield 3.
    pub fn take_elapsed(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        if self.period.is_zero() {
            return 0;
        }
        let mut ticks = 0;
        while due <= now {
            ticks += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        ticks
    }
}

/// Items held back until their delay elapses.
#[derive(Debug, Clone)]
pub struct Delayed<T> {
    delay: Duration,
    pending: Vec<(Instant, T)>,
}

impl<T> Delayed<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Vec::new(),
        }
    }

    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    /// Queues `item` to come due one delay after `now`.
    pub fn push(&mut self, item: T, now: Instant) {
        self.pending.push((now + self.delay, item));
    }

    /// Removes and returns everything due by `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = waiting;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, item)| item).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.iter().map(|(_, item)| item)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, _)| *at).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn unarmed_timer_never_fires() {
        let mut timer = ProgressTimer::new(2 * SEC);
        let t0 = Instant::now();
        assert_eq!(timer.take_elapsed(t0 + 60 * SEC), 0);
        assert!(!timer.is_armed());
    }

    #[test]
    fn timer_fires_once_per_period() {
        let mut timer = ProgressTimer::new(2 * SEC);
        let t0 = Instant::now();
        timer.arm(t0);

        assert_eq!(timer.take_elapsed(t0 + SEC), 0);
        assert_eq!(timer.take_elapsed(t0 + 2 * SEC), 1);
        assert_eq!(timer.take_elapsed(t0 + 3 * SEC), 0);
        assert_eq!(timer.next_due(), Some(t0 + 4 * SEC));
    }

    #[test]
    fn timer_catches_up_after_stall() {
        let mut timer = ProgressTimer::new(2 * SEC);
        let t0 = Instant::now();
        timer.arm(t0);

        assert_eq!(timer.take_elapsed(t0 + 7 * SEC), 3);
        assert_eq!(timer.next_due(), Some(t0 + 8 * SEC));
    }

    #[test]
    fn cancelled_timer_stops() {
        let mut timer = ProgressTimer::new(2 * SEC);
        let t0 = Instant::now();
        timer.arm(t0);
        timer.cancel();
        assert_eq!(timer.take_elapsed(t0 + 10 * SEC), 0);
        assert_eq!(timer.next_due(), None);
    }

    #[test]
    fn delayed_items_come_due_in_order() {
        let mut queue = Delayed::new(SEC);
        let t0 = Instant::now();
        queue.push("b", t0 + SEC);
        queue.push("a", t0);

        assert!(queue.take_due(t0).is_empty());
        assert_eq!(queue.next_due(), Some(t0 + SEC));

        assert_eq!(queue.take_due(t0 + 2 * SEC), vec!["a", "b"]);
        assert!(queue.next_due().is_none());
    }

    #[test]
    fn delayed_keeps_items_not_yet_due() {
        let mut queue = Delayed::new(SEC);
        let t0 = Instant::now();
        queue.push(1, t0);
        queue.push(2, t0 + 5 * SEC);

        assert_eq!(queue.take_due(t0 + SEC), vec![1]);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2]);
    }
}
