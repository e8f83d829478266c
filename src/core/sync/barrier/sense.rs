/*!
 * Sense-Reversal Barrier
 *
 * Spinning barrier that tells phases apart by an alternating sense bit
 * instead of a generation counter.
 */

use crate::core::sync::backoff::spin_until;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Centralized sense-reversal barrier
///
/// Each participant keeps a private sense bit, starting `false`, and flips it
/// on every `wait`. The last arrival resets the counter and publishes its
/// sense, which releases everyone spinning for that value.
#[derive(Debug)]
pub struct SenseBarrier {
    arrived: AtomicUsize,
    sense: AtomicBool,
    participants: usize,
}

impl SenseBarrier {
    /// `participants` must be at least 1; [`Barrier::new`](super::Barrier::new) checks it
    pub fn new(participants: usize) -> Self {
        Self {
            arrived: AtomicUsize::new(0),
            sense: AtomicBool::new(false),
            participants,
        }
    }

    /// Arrive and spin until every participant has arrived
    ///
    /// `local_sense` is the caller's private sense bit and must not be shared
    /// with another participant. Returns `true` for the last arrival.
    pub fn wait(&self, local_sense: &mut bool) -> bool {
        *local_sense = !*local_sense;
        let sense = *local_sense;

        // AcqRel: the last arrival acquires every earlier arrival's writes
        // through the release sequence on the counter
        if self.arrived.fetch_add(1, Ordering::AcqRel) + 1 == self.participants {
            // Waiters cannot arrive for the next phase before they see the
            // sense flip below, so the reset is ordered before their increments
            self.arrived.store(0, Ordering::Relaxed);
            self.sense.store(sense, Ordering::Release);
            return true;
        }

        spin_until(|| self.sense.load(Ordering::Acquire) == sense);
        false
    }

    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Participants arrived in the current phase
    pub fn arrived(&self) -> usize {
        self.arrived.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_single_participant_flips_sense() {
        let barrier = SenseBarrier::new(1);
        let mut sense = false;

        assert!(barrier.wait(&mut sense));
        assert!(sense);
        assert!(barrier.wait(&mut sense));
        assert!(!sense);
        assert_eq!(barrier.arrived(), 0);
    }

    #[test]
    fn test_waiter_spins_until_last_arrival() {
        let barrier = Arc::new(SenseBarrier::new(2));
        let barrier_clone = barrier.clone();

        let handle = thread::spawn(move || {
            let mut sense = false;
            barrier_clone.wait(&mut sense)
        });

        while barrier.arrived() == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(!handle.is_finished());

        let mut sense = false;
        assert!(barrier.wait(&mut sense));
        assert!(!handle.join().unwrap());
        assert_eq!(barrier.arrived(), 0);
    }

    #[test]
    fn test_many_phases_one_leader_each() {
        const THREADS: usize = 4;
        const PHASES: usize = 200;

        let barrier = Arc::new(SenseBarrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let mut sense = false;
                    (0..PHASES).filter(|_| barrier.wait(&mut sense)).count()
                })
            })
            .collect();

        let leaders: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(leaders, PHASES);
    }
}
