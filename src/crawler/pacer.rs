//! Tick pacing
//!
//! Ticks are spaced by wall-clock time measured start-to-start. How long a
//! tick's visits take has no influence on when the next tick begins.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Enforces a minimum interval between successive ticks
#[derive(Debug)]
pub struct Pacer {
    period: Duration,
    last_tick: Option<Instant>,
}

impl Pacer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_tick: None,
        }
    }

    /// Waits until the next tick may start and records its start time
    ///
    /// The first tick starts immediately. The pacer keeps its history across
    /// pause/resume, so resuming never produces two ticks closer than the period.
    pub async fn tick(&mut self) -> Instant {
        if let Some(last) = self.last_tick {
            sleep_until(last + self.period).await;
        }
        let now = Instant::now();
        self.last_tick = Some(now);
        now
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }
}
