/*!
 * Busy-Wait Backoff
 *
 * Every spinning primitive in this crate waits through `Backoff`: a short
 * exponential run of CPU pause hints, then yielding the time slice once the
 * wait has clearly outlived a critical section.
 */

use crate::core::limits::SPIN_LIMIT;
use std::hint::spin_loop;
use std::thread;

/// Exponential spin-then-yield backoff
///
/// A `Backoff` never touches shared memory, so a waiter backing off only
/// generates coherence traffic through the flag it re-reads between steps.
///
/// # Example
///
/// ```
/// use lockbench::core::sync::Backoff;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let ready = AtomicBool::new(true);
/// let mut backoff = Backoff::new();
/// while !ready.load(Ordering::Acquire) {
///     backoff.snooze();
/// }
/// ```
#[derive(Debug, Default)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    /// Create a fresh backoff at its shortest delay
    #[inline]
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    /// Wait a little before re-checking the condition
    #[inline]
    pub fn snooze(&mut self) {
        if self.step <= SPIN_LIMIT {
            for _ in 0..1u32 << self.step {
                spin_loop();
            }
            self.step += 1;
        } else {
            thread::yield_now();
        }
    }

    /// Whether the backoff has escalated to yielding
    #[inline]
    pub fn is_yielding(&self) -> bool {
        self.step > SPIN_LIMIT
    }

    /// Start over at the shortest delay
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

/// Spin until `done` returns true
#[inline]
pub fn spin_until(mut done: impl FnMut() -> bool) {
    let mut backoff = Backoff::new();
    while !done() {
        backoff.snooze();
    }
}
