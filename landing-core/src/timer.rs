//! Logical-time primitives: clocks, a trailing debouncer, request sequencing
//! and the interval/timeout bookkeeping used by the carousel.
//!
//! Everything here takes `now` as an argument instead of reading the wall
//! clock, so callers decide whether time is real ([`SystemClock`]) or
//! simulated ([`ManualClock`]).

use std::{
    fmt::Debug,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::time::Instant;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, to: Duration) {
        self.nanos.store(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// A fired debounce: the value of the last trigger and its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<T> {
    pub seq: u64,
    pub value: T,
}

#[derive(Debug)]
struct Pending<T> {
    seq: u64,
    deadline: Duration,
    value: T,
}

/// Trailing debounce: only the last trigger of a burst fires, `delay` after it.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    seq: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            seq: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the quiet period.
    pub fn trigger(&mut self, value: T, now: Duration) -> u64 {
        self.seq += 1;
        self.pending = Some(Pending {
            seq: self.seq,
            deadline: now + self.delay,
            value,
        });
        self.seq
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<Ticket<T>> {
        if !self.pending.as_ref().is_some_and(|p| p.deadline <= now) {
            return None;
        }
        self.pending.take().map(|p| Ticket {
            seq: p.seq,
            value: p.value,
        })
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

/// Hands out request numbers; only the most recently issued one is current.
#[derive(Debug, Default)]
pub struct Latest {
    issued: u64,
}

impl Latest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.issued != 0 && seq == self.issued
    }

    /// Invalidate every outstanding request.
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }
}

/// Fixed-period repeating timer. Stopped until [`Interval::start`] is called.
///
/// A zero period never starts: it would be due again the moment it fired.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Option<Duration>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    pub fn start(&mut self, now: Duration) {
        self.next = (!self.period.is_zero()).then(|| now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.next
    }

    /// If a tick is due at or before `now`, consume it and return its time.
    pub fn fire(&mut self, now: Duration) -> Option<Duration> {
        let at = self.next.filter(|at| *at <= now)?;
        self.next = Some(at + self.period);
        Some(at)
    }
}

/// One-shot deadlines kept in firing order. Nothing is ever cancelled.
#[derive(Debug, Default)]
pub struct Timeouts {
    deadlines: Vec<Duration>,
}

impl Timeouts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Duration) {
        let idx = self.deadlines.partition_point(|d| *d <= at);
        self.deadlines.insert(idx, at);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines.first().copied()
    }

    /// Remove and return the earliest deadline if it is due.
    pub fn fire(&mut self, now: Duration) -> Option<Duration> {
        if self.deadlines.first().is_some_and(|at| *at <= now) {
            Some(self.deadlines.remove(0))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn debounce_keeps_only_last_trigger_of_burst() {
        let mut d = Debouncer::new(ms(200));
        d.trigger("p", ms(0));
        let last = d.trigger("pa", ms(50));

        assert_eq!(d.poll(ms(200)), None, "quiet period restarts on every trigger");
        let fired = d.poll(ms(250)).expect("should fire after quiet period");
        assert_eq!(fired, Ticket { seq: last, value: "pa" });
        assert_eq!(d.poll(ms(1000)), None, "fires once");
    }

    #[test]
    fn debounce_cancel_drops_pending() {
        let mut d = Debouncer::new(ms(200));
        d.trigger(1, ms(0));
        assert!(d.is_pending());
        assert!(d.cancel());
        assert!(!d.cancel());
        assert_eq!(d.poll(ms(500)), None);
    }

    #[test]
    fn latest_only_accepts_newest_sequence() {
        let mut latest = Latest::new();
        assert!(!latest.is_current(0));
        let first = latest.issue();
        let second = latest.issue();
        assert!(!latest.is_current(first));
        assert!(latest.is_current(second));
        latest.invalidate();
        assert!(!latest.is_current(second));
    }

    #[test]
    fn interval_fires_on_period_boundaries() {
        let mut iv = Interval::new(ms(3500));
        assert_eq!(iv.fire(ms(10_000)), None, "stopped interval never fires");

        iv.start(ms(0));
        assert_eq!(iv.fire(ms(3499)), None);
        assert_eq!(iv.fire(ms(7000)), Some(ms(3500)));
        assert_eq!(iv.fire(ms(7000)), Some(ms(7000)));
        assert_eq!(iv.fire(ms(7000)), None);
        iv.stop();
        assert!(!iv.is_running());
    }

    #[test]
    fn zero_period_interval_stays_stopped() {
        let mut iv = Interval::new(Duration::ZERO);
        iv.start(ms(0));

        assert!(!iv.is_running());
        assert_eq!(iv.next_deadline(), None);
        assert_eq!(iv.fire(ms(16)), None);
    }

    #[test]
    fn timeouts_fire_in_deadline_order() {
        let mut t = Timeouts::new();
        t.schedule(ms(700));
        t.schedule(ms(360));
        t.schedule(ms(500));
        assert_eq!(t.len(), 3);
        assert_eq!(t.fire(ms(600)), Some(ms(360)));
        assert_eq!(t.fire(ms(600)), Some(ms(500)));
        assert_eq!(t.fire(ms(600)), None);
        assert_eq!(t.next_deadline(), Some(ms(700)));
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(ms(50));
        clock.advance(ms(25));
        assert_eq!(clock.now(), ms(75));
        clock.set(ms(10));
        assert_eq!(clock.now(), ms(10));
    }
}
