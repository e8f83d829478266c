/*!
 * Run Configuration
 *
 * Lock, barrier and participant count for one fork-join run, validated
 * before any worker is spawned.
 */

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::limits::{DEFAULT_PARTICIPANTS, MAX_PARTICIPANTS};
use crate::core::sync::{BarrierKind, LockKind};
use serde::{Deserialize, Serialize};

/// Configuration of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Lock taken by workloads that need mutual exclusion
    pub lock: LockKind,
    /// Barrier delimiting the run's phases
    pub barrier: BarrierKind,
    /// Worker count, including the calling thread
    pub participants: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            lock: LockKind::default(),
            barrier: BarrierKind::default(),
            participants: DEFAULT_PARTICIPANTS,
        }
    }
}

impl RunConfig {
    pub const fn new(lock: LockKind, barrier: BarrierKind, participants: usize) -> Self {
        Self {
            lock,
            barrier,
            participants,
        }
    }

    pub const fn with_lock(mut self, lock: LockKind) -> Self {
        self.lock = lock;
        self
    }

    pub const fn with_barrier(mut self, barrier: BarrierKind) -> Self {
        self.barrier = barrier;
        self
    }

    pub const fn with_participants(mut self, participants: usize) -> Self {
        self.participants = participants;
        self
    }

    /// Reject configurations that cannot run as requested
    ///
    /// Counts are never adjusted: a Peterson lock asked to serve four
    /// participants is an error, not a silent downgrade to two.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.participants == 0 {
            return Err(ConfigError::NoParticipants);
        }
        if self.participants > MAX_PARTICIPANTS {
            return Err(ConfigError::TooManyParticipants {
                requested: self.participants,
                max: MAX_PARTICIPANTS,
            });
        }
        self.lock.check_participants(self.participants)
    }
}
