/*!
 * Native Mutex
 *
 * Blocking mutual exclusion backed by parking_lot's raw mutex: waiters are
 * descheduled instead of spinning once the short adaptive spin fails.
 */

use parking_lot::lock_api::RawMutex as RawMutexApi;
use parking_lot::RawMutex;

/// OS-assisted blocking lock
pub struct NativeMutex {
    raw: RawMutex,
}

impl NativeMutex {
    pub const fn new() -> Self {
        Self {
            raw: <RawMutex as RawMutexApi>::INIT,
        }
    }

    /// Block until the lock is held
    #[inline]
    pub fn acquire(&self) {
        self.raw.lock();
    }

    #[inline]
    pub fn try_acquire(&self) -> bool {
        self.raw.try_lock()
    }

    /// Release the lock
    ///
    /// # Safety
    ///
    /// The lock must be held by the current context.
    #[inline]
    pub unsafe fn release(&self) {
        unsafe { self.raw.unlock() };
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl Default for NativeMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NativeMutex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeMutex")
            .field("locked", &self.is_locked())
            .finish()
    }
}
