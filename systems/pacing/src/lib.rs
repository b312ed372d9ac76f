#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick cadence timer.
//!
//! Turns elapsed wall-clock time into [`Command::Tick`] requests at a period
//! of `base_period / game_speed`. At most one tick is requested per call, so
//! ticks never overlap and a slow frame drops its backlog instead of bursting.

use std::time::Duration;

use log::debug;
use neon_snake_core::{Command, Event, GameStatus};

/// Tick period at a game speed of 1.0.
pub const DEFAULT_BASE_PERIOD: Duration = Duration::from_millis(150);

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    base_period: Duration,
}

impl Config {
    /// Creates a new configuration using the provided base period.
    #[must_use]
    pub const fn new(base_period: Duration) -> Self {
        Self { base_period }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PERIOD)
    }
}

/// Pure system that emits tick commands while the match is playing.
#[derive(Debug)]
pub struct Pacing {
    base_period: Duration,
    accumulator: Duration,
}

impl Pacing {
    /// Creates a new pacing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            base_period: config.base_period,
            accumulator: Duration::ZERO,
        }
    }

    /// Tick period for the provided cadence multiplier, or `None` when the
    /// multiplier cannot drive a timer.
    #[must_use]
    pub fn period(&self, game_speed: f32) -> Option<Duration> {
        if !game_speed.is_finite() || game_speed <= 0.0 || self.base_period.is_zero() {
            return None;
        }
        let nanos = self.base_period.as_nanos() as f64 / f64::from(game_speed);
        let period = Duration::from_nanos(nanos.round() as u64);
        (!period.is_zero()).then_some(period)
    }

    /// Consumes world events and the elapsed time to emit tick commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        status: GameStatus,
        game_speed: f32,
        elapsed: Duration,
        out: &mut Vec<Command>,
    ) {
        let restarted = events.iter().any(|event| {
            matches!(
                event,
                Event::GameSpeedChanged { .. }
                    | Event::BoardLevelChanged { .. }
                    | Event::GameStatusChanged { .. }
            )
        });
        if restarted {
            self.accumulator = Duration::ZERO;
        }

        if status != GameStatus::Playing {
            self.accumulator = Duration::ZERO;
            return;
        }

        let Some(period) = self.period(game_speed) else {
            self.accumulator = Duration::ZERO;
            return;
        };

        self.accumulator = self.accumulator.saturating_add(elapsed);
        if self.accumulator < period {
            return;
        }

        let overdue = self.accumulator - period;
        if overdue >= period {
            debug!("dropping {} overdue tick(s)", overdue.as_nanos() / period.as_nanos());
        }
        self.accumulator = Duration::ZERO;
        out.push(Command::Tick);
    }
}
