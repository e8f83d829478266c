/*!
 * MCS Queue Lock
 *
 * FIFO lock where each waiter spins on a flag in its own queue node. The
 * shared word is only the queue tail, touched once per acquire and at most
 * once per release.
 *
 * Queue nodes live in the lock, one slot per participant, so the tail and
 * every link always point into storage the lock owns. A holder that never
 * releases stalls the queue but cannot leave a dangling link behind.
 */

use crate::core::sync::backoff::{spin_until, Backoff};
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

/// Queue node of one participant slot
#[derive(Debug)]
struct McsNode {
    next: AtomicPtr<McsNode>,
    must_wait: AtomicBool,
}

impl McsNode {
    const fn new() -> Self {
        Self {
            next: AtomicPtr::new(ptr::null_mut()),
            must_wait: AtomicBool::new(false),
        }
    }

    #[inline]
    fn as_ptr(&self) -> *mut McsNode {
        self as *const McsNode as *mut McsNode
    }
}

/// MCS queue lock with a fixed number of participant slots
#[derive(Debug)]
pub struct McsLock {
    tail: AtomicPtr<McsNode>,
    nodes: Box<[McsNode]>,
}

impl McsLock {
    pub fn new(slots: usize) -> Self {
        Self {
            tail: AtomicPtr::new(ptr::null_mut()),
            nodes: (0..slots).map(|_| McsNode::new()).collect(),
        }
    }

    /// Participant slots
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Enqueue `slot`'s node and wait for the lock to be handed to it
    ///
    /// # Safety
    ///
    /// No other caller may use `slot` until the matching
    /// [`release`](Self::release) has returned.
    ///
    /// # Panics
    ///
    /// Panics when `slot` is not below [`slots`](Self::slots).
    pub unsafe fn acquire(&self, slot: usize) {
        let node = &self.nodes[slot];
        node.next.store(ptr::null_mut(), Ordering::Relaxed);
        node.must_wait.store(true, Ordering::Relaxed);

        let predecessor = self.tail.swap(node.as_ptr(), Ordering::AcqRel);
        if predecessor.is_null() {
            return;
        }

        // SAFETY: every non-null tail value points into `self.nodes`
        unsafe { (*predecessor).next.store(node.as_ptr(), Ordering::Release) };

        spin_until(|| !node.must_wait.load(Ordering::Acquire));
    }

    /// Hand the lock to the successor, or mark it free if there is none
    ///
    /// # Safety
    ///
    /// `slot` must hold the lock through a matching `acquire`.
    pub unsafe fn release(&self, slot: usize) {
        let node = &self.nodes[slot];
        let mut successor = node.next.load(Ordering::Acquire);

        if successor.is_null() {
            if self
                .tail
                .compare_exchange(
                    node.as_ptr(),
                    ptr::null_mut(),
                    Ordering::Release,
                    Ordering::Relaxed,
                )
                .is_ok()
            {
                return;
            }

            // A successor swapped itself into the tail but has not linked yet
            let mut backoff = Backoff::new();
            loop {
                successor = node.next.load(Ordering::Acquire);
                if !successor.is_null() {
                    break;
                }
                backoff.snooze();
            }
        }

        // SAFETY: links only ever point into `self.nodes`
        unsafe { (*successor).must_wait.store(false, Ordering::Release) };
    }

    /// Whether any participant holds or waits for the lock
    #[inline]
    pub fn is_locked(&self) -> bool {
        !self.tail.load(Ordering::Relaxed).is_null()
    }

    /// Slot at the end of the queue, the last one to enqueue
    pub fn tail_slot(&self) -> Option<usize> {
        let tail = self.tail.load(Ordering::Acquire);
        self.nodes.iter().position(|node| ptr::eq(node, tail))
    }
}
