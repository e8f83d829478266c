/*!
 * Synchronization Primitives
 *
 * Mutual exclusion and barrier algorithms with distinct progress and
 * fairness guarantees:
 * - Spin locks: test-and-set, test-and-test-and-set (no fairness)
 * - Queue locks: ticket, MCS (strict FIFO, MCS spins locally)
 * - Peterson's two-party lock in two memory-ordering variants
 * - Native mutex and counting barrier (descheduling)
 * - Sense-reversal barrier (spinning)
 *
 * # Architecture
 *
 * Variants are closed sum types ([`LockAlgorithm`], [`Barrier`]) selected at
 * run configuration time by [`LockKind`] / [`BarrierKind`]. A [`Lock`] issues
 * one [`Participant`] per id and keeps each id's MCS queue node itself; the
 * participant carries its barrier sense bit, so no primitive relies on
 * thread-local state.
 */

mod backoff;
mod barrier;
mod locks;
mod participant;

pub use backoff::{spin_until, Backoff};
pub use barrier::{Barrier, BarrierKind, CountingBarrier, SenseBarrier};
pub use locks::{
    Lock, LockAlgorithm, LockCell, LockCellGuard, LockGuard, LockKind, McsLock, MemoryModel,
    NativeMutex, PetersonLock, ReleaseAcquire, ReleasePeterson, Sequential, SequentialPeterson,
    TasLock, TicketLock, TtasLock,
};
pub use participant::{Participant, ParticipantId};
