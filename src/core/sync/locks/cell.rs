/*!
 * Lock-Protected Cell
 * Couples a run's lock with the shared state it guards
 */

use super::{Lock, LockGuard, LockKind};
use crate::core::sync::participant::Participant;
use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

/// Shared state reachable only through its lock
///
/// # Example
///
/// ```
/// use lockbench::core::sync::{Lock, LockCell, LockKind};
///
/// let cell = LockCell::new(Lock::new(LockKind::Ticket, 1).unwrap(), 0u64);
/// let mut me = cell.participant().unwrap();
/// *cell.lock(&mut me) += 1;
/// assert_eq!(cell.into_inner(), 1);
/// ```
pub struct LockCell<T> {
    lock: Lock,
    data: UnsafeCell<T>,
}

// SAFETY: `data` is only reached through a held `lock`, or through the
// unsafe `get_unsynchronized` whose contract demands external exclusion.
unsafe impl<T: Send> Send for LockCell<T> {}
unsafe impl<T: Send> Sync for LockCell<T> {}

impl<T> LockCell<T> {
    pub fn new(lock: Lock, data: T) -> Self {
        Self {
            lock,
            data: UnsafeCell::new(data),
        }
    }

    /// Issue the next participant of the underlying lock
    #[inline]
    pub fn participant(&self) -> Option<Participant> {
        self.lock.participant()
    }

    /// Issue every participant still available, in id order
    pub fn participants(&self) -> impl Iterator<Item = Participant> + '_ {
        self.lock.participants()
    }

    /// Acquire the lock and borrow the data for the critical section
    #[inline]
    pub fn lock<'a>(&'a self, participant: &'a mut Participant) -> LockCellGuard<'a, T> {
        LockCellGuard {
            _guard: self.lock.acquire(participant),
            data: &self.data,
        }
    }

    /// Run `f` inside the critical section
    #[inline]
    pub fn with<R>(&self, participant: &mut Participant, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock(participant);
        f(&mut *guard)
    }

    /// Borrow the data without taking the lock
    ///
    /// # Safety
    ///
    /// No other reference to the data may exist until the returned borrow
    /// ends. Callers establish that exclusion by other means, such as a
    /// barrier-enforced turn order.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_unsynchronized(&self) -> &mut T {
        unsafe { &mut *self.data.get() }
    }

    /// Exclusive access through ownership, no locking needed
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn lock_kind(&self) -> LockKind {
        self.lock.kind()
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

/// Borrow of a [`LockCell`]'s data while its lock is held
pub struct LockCellGuard<'a, T> {
    _guard: LockGuard<'a>,
    data: &'a UnsafeCell<T>,
}

impl<T> Deref for LockCellGuard<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: the lock is held for the guard's lifetime
        unsafe { &*self.data.get() }
    }
}

impl<T> DerefMut for LockCellGuard<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the lock is held for the guard's lifetime
        unsafe { &mut *self.data.get() }
    }
}
