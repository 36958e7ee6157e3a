//! Seams to the windowing/audio platform. The render loop only talks to these
//! traits; the terminal and off-screen implementations live in `surface` and
//! `terminal`.

use crate::color::Rgb;
use crate::error::Result;
use std::time::{Duration, Instant};

/// A drawable of fixed logical size.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self, color: Rgb);
    fn fill_circle(&mut self, x: i32, y: i32, radius: i32, color: Rgb);
    fn present(&mut self) -> Result<()>;
}

/// Non-blocking check for an external quit request.
pub trait ShutdownSignal {
    fn shutdown_requested(&mut self) -> Result<bool>;
}

/// Blocks until the next tick boundary.
pub trait TickGate {
    fn wait(&mut self);
}

/// Sleeps out the remainder of each `1/hz` frame budget.
pub struct FrameLimiter {
    period: Duration,
    last: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(hz: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / hz.max(1) as f64),
            last: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickGate for FrameLimiter {
    fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Gate that never waits; used for headless and scripted runs.
pub struct Unthrottled;

impl TickGate for Unthrottled {
    fn wait(&mut self) {}
}

/// Requests shutdown once `limit` polls have been answered, or earlier if the
/// wrapped signal fires.
pub struct TickBudget<S> {
    inner: S,
    remaining: u64,
}

impl<S> TickBudget<S> {
    pub fn new(inner: S, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }
}

impl<S: ShutdownSignal> ShutdownSignal for TickBudget<S> {
    fn shutdown_requested(&mut self) -> Result<bool> {
        if self.remaining == 0 {
            return Ok(true);
        }
        self.remaining -= 1;
        self.inner.shutdown_requested()
    }
}

/// Never requests shutdown.
pub struct NeverShutdown;

impl ShutdownSignal for NeverShutdown {
    fn shutdown_requested(&mut self) -> Result<bool> {
        Ok(false)
    }
}
