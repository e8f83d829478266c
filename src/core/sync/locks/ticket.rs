/*!
 * Ticket Lock
 *
 * FIFO spin lock: arrival order is captured by a ticket dispenser and the
 * lock is handed to tickets strictly in the order they were drawn.
 */

use crate::core::sync::backoff::spin_until;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Ticket spin lock
///
/// # Fairness
///
/// Participants acquire in the order their `fetch_add` on the dispenser
/// landed. Counters wrap, so the lock stays correct past `usize::MAX`
/// acquisitions as long as fewer than `usize::MAX` participants wait at once.
#[derive(Debug, Default)]
pub struct TicketLock {
    next: AtomicUsize,
    serving: AtomicUsize,
}

impl TicketLock {
    pub const fn new() -> Self {
        Self {
            next: AtomicUsize::new(0),
            serving: AtomicUsize::new(0),
        }
    }

    /// Draw a ticket and spin until it is being served
    ///
    /// Returns the ticket that was drawn.
    #[inline]
    pub fn acquire(&self) -> usize {
        let ticket = self.next.fetch_add(1, Ordering::Relaxed);
        spin_until(|| self.serving.load(Ordering::Acquire) == ticket);
        ticket
    }

    /// Serve the next ticket
    ///
    /// # Safety
    ///
    /// The caller must hold the lock, otherwise a waiter is admitted while
    /// the holder is still inside.
    #[inline]
    pub unsafe fn release(&self) {
        self.serving.fetch_add(1, Ordering::Release);
    }

    /// Tickets drawn so far
    #[inline]
    pub fn tickets_issued(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }

    /// Ticket currently allowed in
    #[inline]
    pub fn now_serving(&self) -> usize {
        self.serving.load(Ordering::Relaxed)
    }

    /// Holder plus waiters
    #[inline]
    pub fn queue_len(&self) -> usize {
        self.tickets_issued().wrapping_sub(self.now_serving())
    }
}
