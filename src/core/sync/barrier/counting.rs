/*!
 * Counting Barrier
 *
 * Blocking arrive-and-wait barrier on parking_lot's mutex and condvar.
 * Waiters are descheduled until the last arrival bumps the generation.
 */

use parking_lot::{Condvar, Mutex};

/// Arrival state of the current phase
#[derive(Debug, Default)]
struct Phase {
    arrived: usize,
    generation: u64,
}

/// Native blocking barrier
///
/// The generation counter separates phases, so a waiter woken late never
/// confuses the next phase's arrivals with its own release.
#[derive(Debug)]
pub struct CountingBarrier {
    phase: Mutex<Phase>,
    released: Condvar,
    participants: usize,
}

impl CountingBarrier {
    /// `participants` must be at least 1; [`Barrier::new`](super::Barrier::new) checks it
    pub fn new(participants: usize) -> Self {
        Self {
            phase: Mutex::new(Phase::default()),
            released: Condvar::new(),
            participants,
        }
    }

    /// Arrive and block until every participant has arrived
    ///
    /// Returns `true` for exactly one participant per phase: the last to arrive.
    pub fn wait(&self) -> bool {
        let mut phase = self.phase.lock();
        let generation = phase.generation;
        phase.arrived += 1;

        if phase.arrived == self.participants {
            phase.arrived = 0;
            phase.generation = generation.wrapping_add(1);
            drop(phase);
            self.released.notify_all();
            return true;
        }

        // Loop guards against spurious wakeups
        while phase.generation == generation {
            self.released.wait(&mut phase);
        }
        false
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Phases completed so far
    pub fn generation(&self) -> u64 {
        self.phase.lock().generation
    }
}
