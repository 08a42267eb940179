use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub trait TimeSource {
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    origin: Instant,
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Time source driven by hand. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    nanos: Arc<AtomicU64>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now: Duration) {
        self.nanos.store(saturating_nanos(now), Ordering::Relaxed);
    }

    pub fn advance(&self, step: Duration) {
        let step = saturating_nanos(step);
        // fetch_update only fails when the closure returns None.
        let _ = self
            .nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |now| Some(now.saturating_add(step)));
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

/// Shared stop flag for one run of the animation loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub elapsed: f64,
    pub position: f64,
}

/// Tracks seconds since `start`. Every tick recomputes the absolute elapsed
/// time from the reference timestamp, so dropped or uneven frames never
/// accumulate error.
#[derive(Debug)]
pub struct SimulationClock<S: TimeSource = MonotonicTimeSource> {
    source: S,
    start: Option<Duration>,
    elapsed: f64,
    ticks: u64,
    token: CancelToken,
}

impl<S: TimeSource> SimulationClock<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            start: None,
            elapsed: 0.0,
            ticks: 0,
            token: CancelToken::new(),
        }
    }

    /// Captures the reference timestamp and resets elapsed time. A previous
    /// run, if any, is cancelled first.
    pub fn start(&mut self) -> CancelToken {
        self.token.cancel();
        self.token = CancelToken::new();
        self.start = Some(self.source.now());
        self.elapsed = 0.0;
        self.ticks = 0;
        tracing::info!("animation clock started");
        self.token.clone()
    }

    /// Advances elapsed time from the time source. Returns `None` once the
    /// clock is cancelled or before it has been started.
    pub fn tick(&mut self) -> Option<f64> {
        let start = self.start?;
        if self.token.is_cancelled() {
            return None;
        }
        let since_start = self.source.now().saturating_sub(start).as_secs_f64();
        // Never decreases, even if the source steps backwards.
        self.elapsed = self.elapsed.max(since_start);
        self.ticks += 1;
        Some(self.elapsed)
    }

    pub fn cancel(&mut self) {
        if self.start.is_some() && !self.token.is_cancelled() {
            tracing::info!(ticks = self.ticks, elapsed = self.elapsed, "animation clock cancelled");
        }
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some() && !self.token.is_cancelled()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: TimeSource> Drop for SimulationClock<S> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Cooperative wait between two ticks. Returns `false` to end the loop.
pub trait FrameScheduler {
    fn wait_for_frame(&mut self, cancel: &CancelToken) -> bool;
}

/// Paces frames on a wall-clock interval. Late frames are not made up;
/// the next deadline is measured from when the frame actually started.
#[derive(Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    pub fn from_rate(frames_per_second: f64) -> Self {
        let fps = if frames_per_second.is_finite() && frames_per_second > 0.0 {
            frames_per_second
        } else {
            60.0
        };
        Self::new(Duration::from_secs_f64(1.0 / fps))
    }
}

impl FrameScheduler for IntervalScheduler {
    fn wait_for_frame(&mut self, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if let Some(last) = self.last_frame {
            let deadline = last + self.interval;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        }
        self.last_frame = Some(Instant::now());
        !cancel.is_cancelled()
    }
}

/// Advances a [`ManualTimeSource`] by a fixed step per frame instead of
/// sleeping. Used for offline runs and deterministic tests.
#[derive(Debug)]
pub struct SteppedScheduler {
    source: ManualTimeSource,
    step: Duration,
    first: bool,
}

impl SteppedScheduler {
    pub fn new(source: ManualTimeSource, step: Duration) -> Self {
        Self {
            source,
            step,
            first: true,
        }
    }
}

impl FrameScheduler for SteppedScheduler {
    fn wait_for_frame(&mut self, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        if self.first {
            self.first = false;
        } else {
            self.source.advance(self.step);
        }
        true
    }
}
