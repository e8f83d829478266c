/*!
 * Mutual Exclusion Primitives
 *
 * Seven interchangeable lock algorithms behind one closed sum type:
 * - Test-and-set and test-and-test-and-set spin locks (unfair)
 * - Ticket lock and MCS queue lock (FIFO)
 * - Native blocking mutex
 * - Peterson's two-party lock, sequentially consistent or release/acquire
 *
 * # Architecture
 *
 * The variant is chosen at run configuration time through [`LockKind`] and
 * dispatched with a `match` per call. The only safe way to take a [`Lock`]
 * is [`Lock::acquire`], which hands back a [`LockGuard`] that releases on
 * drop, so acquire/release pairs cannot be mismatched. Participants come
 * from [`Lock::participant`]; a lock admits only the ones it issued.
 */

mod cell;
mod mcs;
mod native;
mod peterson;
mod tas;
mod ticket;

pub use cell::{LockCell, LockCellGuard};
pub use mcs::McsLock;
pub use native::NativeMutex;
pub use peterson::{
    MemoryModel, PetersonLock, ReleaseAcquire, ReleasePeterson, Sequential, SequentialPeterson,
};
pub use tas::{TasLock, TtasLock};
pub use ticket::TicketLock;

use super::participant::{Participant, ParticipantId};
use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::limits::PETERSON_PARTICIPANTS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Lock algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockKind {
    TestAndSet,
    TestAndTestAndSet,
    Ticket,
    Mcs,
    #[default]
    NativeMutex,
    PetersonSequential,
    PetersonRelease,
}

impl LockKind {
    pub const ALL: [LockKind; 7] = [
        LockKind::TestAndSet,
        LockKind::TestAndTestAndSet,
        LockKind::Ticket,
        LockKind::Mcs,
        LockKind::NativeMutex,
        LockKind::PetersonSequential,
        LockKind::PetersonRelease,
    ];

    /// Command-line token
    pub const fn token(self) -> &'static str {
        match self {
            LockKind::TestAndSet => "tas",
            LockKind::TestAndTestAndSet => "ttas",
            LockKind::Ticket => "ticket",
            LockKind::Mcs => "mcs",
            LockKind::NativeMutex => "pthread",
            LockKind::PetersonSequential => "petersonseq",
            LockKind::PetersonRelease => "petersonrel",
        }
    }

    /// Participant cap imposed by the algorithm itself
    pub const fn max_participants(self) -> Option<usize> {
        match self {
            LockKind::PetersonSequential | LockKind::PetersonRelease => {
                Some(PETERSON_PARTICIPANTS)
            }
            _ => None,
        }
    }

    /// Whether grants follow arrival order
    pub const fn is_fifo(self) -> bool {
        matches!(self, LockKind::Ticket | LockKind::Mcs)
    }

    /// Reject participant counts this algorithm cannot serve
    pub fn check_participants(self, participants: usize) -> ConfigResult<()> {
        if participants == 0 {
            return Err(ConfigError::NoParticipants);
        }
        match self.max_participants() {
            Some(max) if participants > max => Err(ConfigError::TwoPartyLock {
                lock: self.token().to_string(),
                requested: participants,
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for LockKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tas" => Ok(LockKind::TestAndSet),
            "ttas" => Ok(LockKind::TestAndTestAndSet),
            "ticket" => Ok(LockKind::Ticket),
            "mcs" => Ok(LockKind::Mcs),
            "pthread" | "mutex" => Ok(LockKind::NativeMutex),
            "petersonseq" => Ok(LockKind::PetersonSequential),
            "petersonrel" => Ok(LockKind::PetersonRelease),
            _ => Err(ConfigError::UnknownLock(s.to_string())),
        }
    }
}

static NEXT_LOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one lock instance, never reused within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct LockId(u64);

impl LockId {
    fn next() -> Self {
        Self(NEXT_LOCK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The algorithm state behind a [`Lock`]
#[derive(Debug)]
pub enum LockAlgorithm {
    TestAndSet(TasLock),
    TestAndTestAndSet(TtasLock),
    Ticket(TicketLock),
    Mcs(McsLock),
    NativeMutex(NativeMutex),
    PetersonSequential(SequentialPeterson),
    PetersonRelease(ReleasePeterson),
}

/// A lock instance sized for a fixed set of participants
///
/// The lock issues its own participants, ids `1..=capacity`, each exactly
/// once, and only admits participants it issued. Two threads can therefore
/// never hold the same Peterson side or MCS queue slot.
#[derive(Debug)]
pub struct Lock {
    algorithm: LockAlgorithm,
    id: LockId,
    capacity: usize,
    issued: AtomicUsize,
}

impl Lock {
    /// Build a lock for a run of `participants` workers
    ///
    /// Fails for zero participants, and for more than two with a
    /// Peterson variant.
    pub fn new(kind: LockKind, participants: usize) -> ConfigResult<Self> {
        kind.check_participants(participants)?;

        let algorithm = match kind {
            LockKind::TestAndSet => LockAlgorithm::TestAndSet(TasLock::new()),
            LockKind::TestAndTestAndSet => LockAlgorithm::TestAndTestAndSet(TtasLock::new()),
            LockKind::Ticket => LockAlgorithm::Ticket(TicketLock::new()),
            LockKind::Mcs => LockAlgorithm::Mcs(McsLock::new(participants)),
            LockKind::NativeMutex => LockAlgorithm::NativeMutex(NativeMutex::new()),
            LockKind::PetersonSequential => LockAlgorithm::PetersonSequential(PetersonLock::new()),
            LockKind::PetersonRelease => LockAlgorithm::PetersonRelease(PetersonLock::new()),
        };

        Ok(Self {
            algorithm,
            id: LockId::next(),
            capacity: participants,
            issued: AtomicUsize::new(0),
        })
    }

    pub fn kind(&self) -> LockKind {
        match &self.algorithm {
            LockAlgorithm::TestAndSet(_) => LockKind::TestAndSet,
            LockAlgorithm::TestAndTestAndSet(_) => LockKind::TestAndTestAndSet,
            LockAlgorithm::Ticket(_) => LockKind::Ticket,
            LockAlgorithm::Mcs(_) => LockKind::Mcs,
            LockAlgorithm::NativeMutex(_) => LockKind::NativeMutex,
            LockAlgorithm::PetersonSequential(_) => LockKind::PetersonSequential,
            LockAlgorithm::PetersonRelease(_) => LockKind::PetersonRelease,
        }
    }

    /// Algorithm state, for inspecting queues and flags
    pub fn algorithm(&self) -> &LockAlgorithm {
        &self.algorithm
    }

    /// Participants this lock was sized for
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Issue the next participant
    ///
    /// Ids are handed out in order starting at 1. Returns `None` once all
    /// `capacity` participants have been issued.
    pub fn participant(&self) -> Option<Participant> {
        let issued = self
            .issued
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .ok()?;
        ParticipantId::new(issued + 1).map(|id| Participant::issued(id, self.id))
    }

    /// Issue every participant still available, in id order
    pub fn participants(&self) -> impl Iterator<Item = Participant> + '_ {
        std::iter::from_fn(|| self.participant())
    }

    /// Block until `participant` holds the lock
    ///
    /// # Panics
    ///
    /// Panics when `participant` was not issued by this lock.
    #[inline]
    pub fn acquire<'a>(&'a self, participant: &'a mut Participant) -> LockGuard<'a> {
        assert!(
            participant.issuer() == Some(self.id),
            "participant {} was not issued by this lock",
            participant.id()
        );

        // SAFETY: issued ids are unique per lock and below `capacity`, and
        // the `&mut` borrow keeps this participant out of any other acquire
        // until the guard drops.
        unsafe { self.acquire_raw(participant.id()) };
        LockGuard {
            lock: self,
            participant,
        }
    }

    /// # Safety
    ///
    /// `id` must be issued by this lock and not be inside another
    /// acquire/release pair.
    unsafe fn acquire_raw(&self, id: ParticipantId) {
        let slot = id.index();
        match &self.algorithm {
            LockAlgorithm::TestAndSet(lock) => lock.acquire(),
            LockAlgorithm::TestAndTestAndSet(lock) => lock.acquire(),
            LockAlgorithm::Ticket(lock) => {
                lock.acquire();
            }
            LockAlgorithm::Mcs(lock) => unsafe { lock.acquire(slot) },
            LockAlgorithm::NativeMutex(lock) => lock.acquire(),
            LockAlgorithm::PetersonSequential(lock) => lock.acquire(slot),
            LockAlgorithm::PetersonRelease(lock) => lock.acquire(slot),
        }
    }

    /// # Safety
    ///
    /// `id` must hold the lock through a matching `acquire_raw`.
    unsafe fn release_raw(&self, id: ParticipantId) {
        let slot = id.index();
        unsafe {
            match &self.algorithm {
                LockAlgorithm::TestAndSet(lock) => lock.release(),
                LockAlgorithm::TestAndTestAndSet(lock) => lock.release(),
                LockAlgorithm::Ticket(lock) => lock.release(),
                LockAlgorithm::Mcs(lock) => lock.release(slot),
                LockAlgorithm::NativeMutex(lock) => lock.release(),
                LockAlgorithm::PetersonSequential(lock) => lock.release(slot),
                LockAlgorithm::PetersonRelease(lock) => lock.release(slot),
            }
        }
    }
}

/// Held lock; released when dropped
///
/// Leaking a guard leaves the lock held forever. Every queue link stays
/// inside the lock's own storage, so the lock remains memory safe.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    lock: &'a Lock,
    participant: &'a mut Participant,
}

impl LockGuard<'_> {
    /// Holder of the lock
    pub fn holder(&self) -> ParticipantId {
        self.participant.id()
    }
}

impl Drop for LockGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: the guard exists only after a successful acquire by this
        // participant, and drop runs once.
        unsafe { self.lock.release_raw(self.participant.id()) };
    }
}
