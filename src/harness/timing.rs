/*!
 * Run Timing
 * Leader-recorded timestamps around the compute phase
 */

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Elapsed time of a run's compute phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunTiming {
    elapsed: Duration,
}

impl RunTiming {
    pub const fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn as_nanos(&self) -> u128 {
        self.elapsed.as_nanos()
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Start/stop timestamps, written by the leader only
#[derive(Debug, Default)]
pub(crate) struct Stopwatch {
    started: Option<Instant>,
    stopped: Option<Instant>,
}

impl Stopwatch {
    pub(crate) fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    pub(crate) fn stop(&mut self) {
        self.stopped = Some(Instant::now());
    }

    /// `None` unless both timestamps were recorded
    pub(crate) fn timing(&self) -> Option<RunTiming> {
        match (self.started, self.stopped) {
            (Some(start), Some(stop)) => Some(RunTiming::new(stop.saturating_duration_since(start))),
            _ => None,
        }
    }
}
