//! Debounce and throttle
//!
//! Both take the current `Instant` explicitly so callers driving a
//! simulated clock get deterministic behaviour; the `*_now` variants read
//! the system clock.

use std::time::{Duration, Instant};

/// Delays a call until `wait` has passed without another call. The
/// arguments of the most recent call win.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self { wait, pending: None }
    }

    /// Record a call, restarting the wait
    pub fn call(&mut self, now: Instant, args: T) {
        self.pending = Some((now + self.wait, args));
    }

    pub fn call_now(&mut self, args: T) {
        self.call(Instant::now(), args);
    }

    /// Take the pending arguments once their deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, args)| args),
            _ => None,
        }
    }

    pub fn poll_now(&mut self) -> Option<T> {
        self.poll(Instant::now())
    }

    /// When the pending call fires
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending call
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Drops calls made within `delay` of the last executed call
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    last_call: Option<Instant>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay, last_call: None }
    }

    /// Run `f` unless the previous executed call was less than `delay` ago
    pub fn call<R>(&mut self, now: Instant, f: impl FnOnce() -> R) -> Option<R> {
        if let Some(last) = self.last_call {
            if now.saturating_duration_since(last) < self.delay {
                return None;
            }
        }
        self.last_call = Some(now);
        Some(f())
    }

    pub fn call_now<R>(&mut self, f: impl FnOnce() -> R) -> Option<R> {
        self.call(Instant::now(), f)
    }
}
