/*!
 * Lock Integration Tests
 *
 * Mutual exclusion for every algorithm, FIFO grants for the queue locks and
 * bounded waiting for both Peterson variants
 */

use lockbench::core::sync::{Lock, LockAlgorithm, LockCell, LockKind, Participant, ParticipantId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Spin until `id` sits in the lock's queue
fn wait_until_queued(lock: &Lock, id: ParticipantId) {
    loop {
        let queued = match lock.algorithm() {
            LockAlgorithm::Ticket(ticket) => ticket.tickets_issued() >= id.get(),
            LockAlgorithm::Mcs(mcs) => mcs.tail_slot() == Some(id.index()),
            other => panic!("no observable queue in {other:?}"),
        };
        if queued {
            return;
        }
        thread::yield_now();
    }
}

/// Every participant increments a plain counter `iterations` times
fn contend(kind: LockKind, participants: usize, iterations: u64) -> u64 {
    let cell = LockCell::new(Lock::new(kind, participants).unwrap(), 0u64);
    let inside = AtomicBool::new(false);

    thread::scope(|scope| {
        for mut me in cell.participants() {
            let cell = &cell;
            let inside = &inside;
            scope.spawn(move || {
                for _ in 0..iterations {
                    let mut count = cell.lock(&mut me);
                    assert!(!inside.swap(true, Ordering::Relaxed), "two holders at once");
                    *count += 1;
                    inside.store(false, Ordering::Relaxed);
                }
            });
        }
    });

    cell.into_inner()
}

#[test]
fn test_mutual_exclusion_all_locks() {
    for kind in LockKind::ALL {
        for participants in [1, 2, 4, 8] {
            if kind.max_participants().is_some_and(|max| participants > max) {
                continue;
            }
            for iterations in [1, 1_000, 100_000] {
                assert_eq!(
                    contend(kind, participants, iterations),
                    participants as u64 * iterations,
                    "{kind} with {participants} participants x {iterations}"
                );
            }
        }
    }
}

#[test]
fn test_two_party_locks_reject_third_participant() {
    for kind in [LockKind::PetersonSequential, LockKind::PetersonRelease] {
        assert!(Lock::new(kind, 2).is_ok());
        assert!(Lock::new(kind, 3).is_err());
    }
}

/// Queue `waiters` behind a held lock one at a time, return the grant order
fn grant_order(kind: LockKind, waiters: usize) -> Vec<usize> {
    let lock = Arc::new(Lock::new(kind, waiters + 1).unwrap());
    let grants = Arc::new(Mutex::new(Vec::new()));

    let mut holder = lock.participant().unwrap();
    let guard = lock.acquire(&mut holder);

    let handles: Vec<_> = lock
        .participants()
        .collect::<Vec<_>>()
        .into_iter()
        .map(|mut me| {
            let id = me.id();
            let waiter = {
                let lock = lock.clone();
                let grants = grants.clone();
                thread::spawn(move || {
                    let _guard = lock.acquire(&mut me);
                    grants.lock().push(id.get());
                })
            };

            // This waiter is queued before the next one arrives
            wait_until_queued(&lock, id);
            waiter
        })
        .collect();

    drop(guard);
    for handle in handles {
        handle.join().unwrap();
    }

    let order = grants.lock().clone();
    order
}

#[test]
fn test_ticket_grants_in_arrival_order() {
    assert_eq!(grant_order(LockKind::Ticket, 4), vec![2, 3, 4, 5]);
}

#[test]
fn test_mcs_grants_in_arrival_order() {
    assert_eq!(grant_order(LockKind::Mcs, 4), vec![2, 3, 4, 5]);
}

#[test]
fn test_ticket_counts_waiters() {
    let lock = Arc::new(Lock::new(LockKind::Ticket, 3).unwrap());
    let mut holder = lock.participant().unwrap();
    let guard = lock.acquire(&mut holder);

    let handles: Vec<_> = lock
        .participants()
        .collect::<Vec<_>>()
        .into_iter()
        .map(|mut me| {
            let lock = lock.clone();
            thread::spawn(move || drop(lock.acquire(&mut me)))
        })
        .collect();

    match lock.algorithm() {
        LockAlgorithm::Ticket(ticket) => {
            while ticket.tickets_issued() < 3 {
                thread::yield_now();
            }
            assert_eq!(ticket.queue_len(), 3);
        }
        other => panic!("expected a ticket lock, got {other:?}"),
    }

    drop(guard);
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_peterson_bounded_waiting() {
    for kind in [LockKind::PetersonSequential, LockKind::PetersonRelease] {
        let lock = Arc::new(Lock::new(kind, 2).unwrap());
        let grants = Arc::new(Mutex::new(Vec::new()));

        let mut first = lock.participant().unwrap();
        let mut second = lock.participant().unwrap();
        let guard = lock.acquire(&mut first);

        let waiter = {
            let lock = lock.clone();
            let grants = grants.clone();
            thread::spawn(move || {
                let _guard = lock.acquire(&mut second);
                grants.lock().push(2);
            })
        };

        // Side 1 has announced and yielded the turn, so it is waiting
        match lock.algorithm() {
            LockAlgorithm::PetersonSequential(peterson) => {
                while !(peterson.wants(1) && peterson.turn() == 0) {
                    thread::yield_now();
                }
            }
            LockAlgorithm::PetersonRelease(peterson) => {
                while !(peterson.wants(1) && peterson.turn() == 0) {
                    thread::yield_now();
                }
            }
            other => panic!("expected a Peterson lock, got {other:?}"),
        }

        // 1 releases and immediately retries
        drop(guard);
        {
            let _guard = lock.acquire(&mut first);
            grants.lock().push(1);
        }

        waiter.join().unwrap();
        assert_eq!(*grants.lock(), vec![2, 1], "{kind}");
    }
}

#[test]
fn test_guard_reports_holder() {
    let lock = Lock::new(LockKind::NativeMutex, 4).unwrap();
    let mut me = lock.participants().nth(2).unwrap();
    let guard = lock.acquire(&mut me);
    assert_eq!(guard.holder().get(), 3);
}

#[test]
fn test_lock_never_issues_an_id_twice() {
    for kind in LockKind::ALL {
        let capacity = kind.max_participants().unwrap_or(4);
        let lock = Lock::new(kind, capacity).unwrap();

        // Racing issuers still split the ids between them
        let issued: Vec<Participant> = thread::scope(|scope| {
            let handles: Vec<_> = (0..capacity + 2)
                .map(|_| scope.spawn(|| lock.participant()))
                .collect();
            handles.into_iter().filter_map(|h| h.join().unwrap()).collect()
        });

        let mut ids: Vec<usize> = issued.iter().map(|p| p.id().get()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=capacity).collect::<Vec<_>>(), "{kind}");
        assert!(lock.participant().is_none(), "{kind}");
    }
}

#[test]
#[should_panic(expected = "was not issued by this lock")]
fn test_participant_bound_to_its_lock() {
    let first = Lock::new(LockKind::PetersonSequential, 2).unwrap();
    let second = Lock::new(LockKind::PetersonSequential, 2).unwrap();

    let mut mine = first.participant().unwrap();
    let _held = first.acquire(&mut mine);

    // Same id, issued elsewhere, cannot share side 0
    let mut borrowed = second.participant().unwrap();
    let _other = first.acquire(&mut borrowed);
}

#[test]
fn test_leaked_guard_keeps_queue_in_bounds() {
    let lock = Lock::new(LockKind::Mcs, 3).unwrap();
    {
        let mut leaked = lock.participant().unwrap();
        std::mem::forget(lock.acquire(&mut leaked));
    }

    match lock.algorithm() {
        LockAlgorithm::Mcs(mcs) => {
            assert!(mcs.is_locked());
            assert_eq!(mcs.tail_slot(), Some(0));
            assert_eq!(mcs.slots(), 3);
        }
        other => panic!("expected an MCS lock, got {other:?}"),
    }
}
