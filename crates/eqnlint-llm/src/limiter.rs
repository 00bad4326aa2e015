//! Minimum-interval rate limiting
//!
//! A permit is granted no sooner than `1 / qps` seconds after the previous
//! grant. Waiters are serialized, so concurrent callers receive permits in
//! turn and never as a burst. There is no token bucket: the limiter enforces
//! a minimum spacing between consecutive calls and nothing else.
//!
//! Two variants share the same [`PermitSchedule`]: [`AsyncRateLimiter`] for
//! callers on a tokio runtime and [`BlockingRateLimiter`] for plain threads.
//! A single limiter instance should be used from one calling style only.

use crate::lock;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Lowest accepted rate; anything smaller (including zero, negative or NaN) is clamped to it
pub const MIN_RATE: f64 = 1e-9;

/// Minimum spacing implied by a rate in calls per second
///
/// # Examples
///
/// ```
/// use eqnlint_llm::limiter::interval_for_rate;
/// use std::time::Duration;
///
/// assert_eq!(interval_for_rate(2.0), Duration::from_millis(500));
/// assert_eq!(interval_for_rate(0.0), interval_for_rate(1e-9));
/// ```
pub fn interval_for_rate(qps: f64) -> Duration {
    Duration::from_secs_f64(1.0 / qps.max(MIN_RATE))
}

/// Pure permit bookkeeping, independent of any clock
#[derive(Debug, Clone)]
pub struct PermitSchedule {
    interval: Duration,
    last: Option<Instant>,
}

impl PermitSchedule {
    /// Schedule for `qps` calls per second
    pub fn new(qps: f64) -> Self {
        Self {
            interval: interval_for_rate(qps),
            last: None,
        }
    }

    /// How long a caller arriving at `now` must wait for its permit
    pub fn delay_at(&self, now: Instant) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => last
                .checked_add(self.interval)
                .map(|ready| ready.saturating_duration_since(now))
                .unwrap_or(self.interval),
        }
    }

    /// Record a permit granted at `at`
    pub fn grant(&mut self, at: Instant) {
        self.last = Some(at);
    }

    /// Change the rate; the previous grant time is kept
    pub fn set_rate(&mut self, qps: f64) {
        self.interval = interval_for_rate(qps);
    }

    /// Forget the previous grant so the next permit is immediate
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Current minimum spacing
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time of the most recent grant
    pub fn last_permit(&self) -> Option<Instant> {
        self.last
    }
}

/// Rate limiter for async callers
///
/// Waiting happens while the internal lock is held, which is what serializes
/// concurrent callers. Dropping a pending `permit()` future leaves the
/// schedule untouched.
#[derive(Debug)]
pub struct AsyncRateLimiter {
    schedule: tokio::sync::Mutex<PermitSchedule>,
}

impl AsyncRateLimiter {
    /// Limiter for `qps` calls per second
    pub fn new(qps: f64) -> Self {
        Self {
            schedule: tokio::sync::Mutex::new(PermitSchedule::new(qps)),
        }
    }

    /// Wait until a permit is available, then take it
    pub async fn permit(&self) {
        let mut schedule = self.schedule.lock().await;
        let delay = schedule.delay_at(tokio::time::Instant::now().into_std());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        schedule.grant(tokio::time::Instant::now().into_std());
    }

    /// Change the rate for subsequent permits
    pub async fn set_rate(&self, qps: f64) {
        self.schedule.lock().await.set_rate(qps);
    }

    /// Make the next permit immediate
    pub async fn reset(&self) {
        self.schedule.lock().await.reset();
    }

    /// Current minimum spacing
    pub async fn interval(&self) -> Duration {
        self.schedule.lock().await.interval()
    }

    /// Time of the most recent grant
    pub async fn last_permit(&self) -> Option<Instant> {
        self.schedule.lock().await.last_permit()
    }
}

/// Time source for [`BlockingRateLimiter`]
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock that advances only when slept on
///
/// Intended for tests of blocking callers.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    /// Clock starting at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Move the clock forward without recording a sleep
    pub fn advance(&self, by: Duration) {
        *lock(&self.elapsed) += by;
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        *lock(&self.elapsed)
    }

    /// Every sleep requested so far
    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        lock(&self.sleeps).push(duration);
        self.advance(duration);
    }
}

/// Rate limiter for blocking callers
#[derive(Debug)]
pub struct BlockingRateLimiter<C: Clock = SystemClock> {
    clock: C,
    schedule: Mutex<PermitSchedule>,
}

impl BlockingRateLimiter<SystemClock> {
    /// Limiter for `qps` calls per second on the wall clock
    pub fn new(qps: f64) -> Self {
        Self::with_clock(qps, SystemClock)
    }
}

impl<C: Clock> BlockingRateLimiter<C> {
    /// Limiter driven by a custom clock
    pub fn with_clock(qps: f64, clock: C) -> Self {
        Self {
            clock,
            schedule: Mutex::new(PermitSchedule::new(qps)),
        }
    }

    /// Block until a permit is available, then take it
    pub fn permit(&self) {
        let mut schedule = lock(&self.schedule);
        let delay = schedule.delay_at(self.clock.now());
        if !delay.is_zero() {
            self.clock.sleep(delay);
        }
        schedule.grant(self.clock.now());
    }

    /// Change the rate for subsequent permits
    pub fn set_rate(&self, qps: f64) {
        lock(&self.schedule).set_rate(qps);
    }

    /// Make the next permit immediate
    pub fn reset(&self) {
        lock(&self.schedule).reset();
    }

    /// Current minimum spacing
    pub fn interval(&self) -> Duration {
        lock(&self.schedule).interval()
    }

    /// Time of the most recent grant
    pub fn last_permit(&self) -> Option<Instant> {
        lock(&self.schedule).last_permit()
    }

    /// The clock driving this limiter
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
