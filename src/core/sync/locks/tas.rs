/*!
 * Test-and-Set Spin Locks
 *
 * Plain test-and-set and its test-and-test-and-set refinement. Neither is
 * fair: a waiter can starve under adversarial scheduling.
 */

use crate::core::sync::backoff::Backoff;
use std::sync::atomic::{AtomicBool, Ordering};

/// Test-and-set spin lock
///
/// Every acquisition attempt is a sequentially consistent compare-and-swap
/// of the flag, so waiters keep the cache line bouncing between cores.
#[derive(Debug, Default)]
pub struct TasLock {
    locked: AtomicBool,
}

impl TasLock {
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Spin until the flag flips from free to held
    #[inline]
    pub fn acquire(&self) {
        let mut backoff = Backoff::new();
        while !self.try_acquire() {
            backoff.snooze();
        }
    }

    /// Single compare-and-swap attempt
    #[inline]
    pub fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release the lock
    ///
    /// # Safety
    ///
    /// The caller must hold the lock. Releasing a lock held by someone else
    /// lets two participants into the critical section.
    #[inline]
    pub unsafe fn release(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

/// Test-and-test-and-set spin lock
///
/// Waiters spin on a plain load, which is served from their own cache while
/// the lock stays held, and only attempt the compare-and-swap once the load
/// reports the lock free.
#[derive(Debug, Default)]
pub struct TtasLock {
    locked: AtomicBool,
}

impl TtasLock {
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn acquire(&self) {
        let mut backoff = Backoff::new();
        loop {
            // Relaxed is enough here, the compare-and-swap below is the acquire
            while self.locked.load(Ordering::Relaxed) {
                backoff.snooze();
            }
            if self
                .locked
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }
        }
    }

    #[inline]
    pub fn try_acquire(&self) -> bool {
        !self.locked.load(Ordering::Relaxed)
            && self
                .locked
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
    }

    /// Release the lock
    ///
    /// # Safety
    ///
    /// The caller must hold the lock.
    #[inline]
    pub unsafe fn release(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}
