/*!
 * Peterson Locks
 *
 * Two-party mutual exclusion from per-side intent flags and a shared turn.
 * The algorithm is generic over the memory ordering used for the intent
 * flags: full sequential consistency, or release stores with acquire loads.
 */

use crate::core::sync::backoff::spin_until;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Memory ordering discipline of a Peterson lock
pub trait MemoryModel: Send + Sync + 'static {
    /// Short name used in logs
    const LABEL: &'static str;

    /// Publish "I want the lock"
    fn announce(flag: &AtomicBool);

    /// Give priority to the other side
    fn hand_over(turn: &AtomicUsize, other: usize);

    /// Read the other side's intent
    fn wants(flag: &AtomicBool) -> bool;

    /// Drop the intent flag on release
    fn withdraw(flag: &AtomicBool);
}

/// Every access sequentially consistent
#[derive(Debug)]
pub enum Sequential {}

impl MemoryModel for Sequential {
    const LABEL: &'static str = "seq_cst";

    #[inline]
    fn announce(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    #[inline]
    fn hand_over(turn: &AtomicUsize, other: usize) {
        turn.store(other, Ordering::SeqCst);
    }

    #[inline]
    fn wants(flag: &AtomicBool) -> bool {
        flag.load(Ordering::SeqCst)
    }

    #[inline]
    fn withdraw(flag: &AtomicBool) {
        flag.store(false, Ordering::SeqCst);
    }
}

/// Release stores and acquire loads on the intent flags
///
/// The turn hand-over is a sequentially consistent swap. A read-modify-write
/// on `turn` orders the preceding flag store before the following flag load,
/// which a plain store does not guarantee outside of x86.
#[derive(Debug)]
pub enum ReleaseAcquire {}

impl MemoryModel for ReleaseAcquire {
    const LABEL: &'static str = "acq_rel";

    #[inline]
    fn announce(flag: &AtomicBool) {
        flag.store(true, Ordering::Release);
    }

    #[inline]
    fn hand_over(turn: &AtomicUsize, other: usize) {
        turn.swap(other, Ordering::SeqCst);
    }

    #[inline]
    fn wants(flag: &AtomicBool) -> bool {
        flag.load(Ordering::Acquire)
    }

    #[inline]
    fn withdraw(flag: &AtomicBool) {
        flag.store(false, Ordering::Release);
    }
}

/// Two-party Peterson lock
///
/// Sides are `0` and `1`. Each side gets in within one turn of the other:
/// a side that re-requests the lock while the other waits always yields
/// the turn first.
///
/// # Panics
///
/// `acquire` and `release` panic when `side` is not 0 or 1.
#[derive(Debug)]
pub struct PetersonLock<M: MemoryModel> {
    wants_lock: [AtomicBool; 2],
    turn: AtomicUsize,
    _model: PhantomData<M>,
}

/// Peterson lock with sequentially consistent intent flags
pub type SequentialPeterson = PetersonLock<Sequential>;

/// Peterson lock with release/acquire intent flags
pub type ReleasePeterson = PetersonLock<ReleaseAcquire>;

impl<M: MemoryModel> PetersonLock<M> {
    pub const fn new() -> Self {
        Self {
            wants_lock: [AtomicBool::new(false), AtomicBool::new(false)],
            turn: AtomicUsize::new(0),
            _model: PhantomData,
        }
    }

    pub fn acquire(&self, side: usize) {
        let mine = &self.wants_lock[side];
        let other = side ^ 1;
        let theirs = &self.wants_lock[other];

        M::announce(mine);
        M::hand_over(&self.turn, other);

        spin_until(|| !(M::wants(theirs) && self.turn.load(Ordering::SeqCst) == other));
    }

    /// Release the lock
    ///
    /// # Safety
    ///
    /// `side` must currently hold the lock.
    #[inline]
    pub unsafe fn release(&self, side: usize) {
        M::withdraw(&self.wants_lock[side]);
    }

    /// Side the last arrival yielded to
    #[inline]
    pub fn turn(&self) -> usize {
        self.turn.load(Ordering::SeqCst)
    }

    /// Whether `side` has announced interest
    #[inline]
    pub fn wants(&self, side: usize) -> bool {
        self.wants_lock[side].load(Ordering::SeqCst)
    }

    /// Ordering label of this variant
    pub fn model(&self) -> &'static str {
        M::LABEL
    }
}

impl<M: MemoryModel> Default for PetersonLock<M> {
    fn default() -> Self {
        Self::new()
    }
}
