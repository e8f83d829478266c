/*!
 * Barrier Primitives
 *
 * Reusable all-arrive-then-release barriers:
 * - Native counting barrier (descheduling, parking_lot condvar)
 * - Sense-reversal barrier (spinning)
 *
 * Both are reusable for any number of phases without reinitialization, and
 * every write a participant made before `wait` is visible to every other
 * participant once its own `wait` for that phase returns.
 */

mod counting;
mod sense;

pub use counting::CountingBarrier;
pub use sense::SenseBarrier;

use super::participant::Participant;
use crate::core::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Barrier algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierKind {
    SenseReversal,
    #[default]
    NativeCounting,
}

impl BarrierKind {
    pub const ALL: [BarrierKind; 2] = [BarrierKind::SenseReversal, BarrierKind::NativeCounting];

    /// Command-line token
    pub const fn token(self) -> &'static str {
        match self {
            BarrierKind::SenseReversal => "sense",
            BarrierKind::NativeCounting => "pthread",
        }
    }
}

impl fmt::Display for BarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for BarrierKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sense" => Ok(BarrierKind::SenseReversal),
            "pthread" | "counting" => Ok(BarrierKind::NativeCounting),
            _ => Err(ConfigError::UnknownBarrier(s.to_string())),
        }
    }
}

/// A barrier instance of either algorithm
#[derive(Debug)]
pub enum Barrier {
    Counting(CountingBarrier),
    SenseReversal(SenseBarrier),
}

impl Barrier {
    pub fn new(kind: BarrierKind, participants: usize) -> ConfigResult<Self> {
        if participants == 0 {
            return Err(ConfigError::NoParticipants);
        }

        Ok(match kind {
            BarrierKind::NativeCounting => Barrier::Counting(CountingBarrier::new(participants)),
            BarrierKind::SenseReversal => Barrier::SenseReversal(SenseBarrier::new(participants)),
        })
    }

    pub fn kind(&self) -> BarrierKind {
        match self {
            Barrier::Counting(_) => BarrierKind::NativeCounting,
            Barrier::SenseReversal(_) => BarrierKind::SenseReversal,
        }
    }

    pub fn participants(&self) -> usize {
        match self {
            Barrier::Counting(barrier) => barrier.participants(),
            Barrier::SenseReversal(barrier) => barrier.participants(),
        }
    }

    /// Block `participant` until all participants reached this phase
    ///
    /// Returns `true` for the participant whose arrival released the phase.
    #[inline]
    pub fn wait(&self, participant: &mut Participant) -> bool {
        match self {
            Barrier::Counting(barrier) => barrier.wait(),
            Barrier::SenseReversal(barrier) => barrier.wait(participant.sense_mut()),
        }
    }
}
