/*!
 * Worker Context
 * Per-worker identity and the contiguous input slice it owns
 */

use crate::core::sync::ParticipantId;
use std::ops::Range;

/// Immutable description of one worker for the length of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerContext {
    pub id: ParticipantId,
    /// Input indices assigned to this worker, possibly empty
    pub range: Range<usize>,
}

impl WorkerContext {
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.id.is_leader()
    }

    /// Number of input elements assigned
    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Split `0..len` into `participants` contiguous ranges
///
/// The first `participants - 1` workers get `len / participants` indices
/// each and the last worker takes everything left over. Returns one context
/// per participant, in id order.
pub fn partition(len: usize, participants: usize) -> Vec<WorkerContext> {
    if participants == 0 {
        return Vec::new();
    }

    let share = len / participants;
    let mut low = 0;

    ParticipantId::all(participants)
        .map(|id| {
            let high = if id.get() == participants { len } else { low + share };
            let range = low..high;
            low = high;
            WorkerContext { id, range }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(len: usize, participants: usize) -> Vec<Range<usize>> {
        partition(len, participants)
            .into_iter()
            .map(|w| w.range)
            .collect()
    }

    #[test]
    fn test_even_split() {
        assert_eq!(ranges(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_last_takes_remainder() {
        assert_eq!(ranges(10, 3), vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_more_workers_than_elements() {
        assert_eq!(ranges(2, 4), vec![0..0, 0..0, 0..0, 0..2]);
        assert_eq!(ranges(0, 2), vec![0..0, 0..0]);
    }

    #[test]
    fn test_ids_and_leader() {
        let workers = partition(5, 2);
        assert_eq!(workers.len(), 2);
        assert!(workers[0].is_leader());
        assert_eq!(workers[1].id.get(), 2);
        assert_eq!(workers[1].len(), 3);
        assert!(partition(5, 0).is_empty());
    }
}
