/*!
 * Participants
 *
 * Identity and private synchronization state of one worker in a run.
 */

use super::locks::LockId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// 1-based participant identifier
///
/// Participant 1 is the leader: the calling thread of a run, and the only
/// participant that records timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(NonZeroUsize);

impl ParticipantId {
    /// The leader, participant 1
    pub const LEADER: Self = Self(NonZeroUsize::MIN);

    /// Returns `None` for 0; ids start at 1
    #[inline]
    pub const fn new(id: usize) -> Option<Self> {
        match NonZeroUsize::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Zero-based position, as used for turn ownership and Peterson sides
    #[inline]
    pub const fn index(self) -> usize {
        self.0.get() - 1
    }

    #[inline]
    pub const fn is_leader(self) -> bool {
        self.0.get() == 1
    }

    /// Ids `1..=participants`
    pub fn all(participants: usize) -> impl Iterator<Item = Self> {
        (1..=participants).filter_map(Self::new)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A worker's private synchronization state
///
/// Holds the id, the lock that issued it, and the local sense bit of the
/// sense-reversal barrier. Participants that take a lock come from
/// [`Lock::participant`](super::Lock::participant), which issues each id once
/// per lock, so no two live participants can claim the same side or queue
/// slot. Lock guards borrow the participant mutably for the critical section.
#[derive(Debug)]
pub struct Participant {
    id: ParticipantId,
    issuer: Option<LockId>,
    sense: bool,
}

impl Participant {
    pub(crate) const fn issued(id: ParticipantId, issuer: LockId) -> Self {
        Self {
            id,
            issuer: Some(issuer),
            sense: false,
        }
    }

    /// A participant for barrier-only use
    ///
    /// It belongs to no lock, so every `acquire` rejects it.
    pub const fn unbound(id: ParticipantId) -> Self {
        Self {
            id,
            issuer: None,
            sense: false,
        }
    }

    #[inline]
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    #[inline]
    pub(crate) fn issuer(&self) -> Option<LockId> {
        self.issuer
    }

    #[inline]
    pub(crate) fn sense_mut(&mut self) -> &mut bool {
        &mut self.sense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_ids() {
        assert!(ParticipantId::new(0).is_none());

        let second = ParticipantId::new(2).unwrap();
        assert_eq!(second.get(), 2);
        assert_eq!(second.index(), 1);
        assert!(!second.is_leader());
        assert!(ParticipantId::LEADER.is_leader());
        assert_eq!(ParticipantId::LEADER.index(), 0);
    }

    #[test]
    fn test_all_ids() {
        let ids: Vec<usize> = ParticipantId::all(3).map(ParticipantId::get).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ParticipantId::all(0).count(), 0);
    }

    #[test]
    fn test_fresh_participant_state() {
        let mut participant = Participant::unbound(ParticipantId::LEADER);
        assert_eq!(participant.id(), ParticipantId::LEADER);
        assert!(participant.issuer().is_none());
        assert!(!*participant.sense_mut());
    }
}
