/*!
 * Fork-Join Harness
 *
 * Runs one workload across a fixed set of participants:
 * - Participant 1 (the leader) runs on the calling thread
 * - Participants 2..=N run on scoped OS threads, one each
 * - Every participant passes four barrier phases; the leader timestamps the
 *   compute phase between the second and third
 *
 * The lock, the barrier and the shared state live in a [`RunContext`] that
 * outlives every worker and is dropped exactly once, after all joined.
 */

mod config;
mod context;
mod timing;

pub use config::RunConfig;
pub use context::{partition, WorkerContext};
pub use timing::RunTiming;

use crate::core::errors::ConfigResult;
use crate::core::sync::{Barrier, BarrierKind, Lock, LockCell, LockKind, Participant};
use serde::Serialize;
use std::thread;
use timing::Stopwatch;
use tracing::{debug, error, info_span, trace, warn, Span};
use uuid::Uuid;

/// State shared by every participant of a run
pub struct RunContext<T> {
    state: LockCell<T>,
    barrier: Barrier,
}

impl<T> RunContext<T> {
    /// Workload state, guarded by the run's lock
    #[inline]
    pub fn state(&self) -> &LockCell<T> {
        &self.state
    }

    /// Wait on the run's barrier
    #[inline]
    pub fn wait(&self, participant: &mut Participant) -> bool {
        self.barrier.wait(participant)
    }

    #[inline]
    pub fn participants(&self) -> usize {
        self.barrier.participants()
    }

    pub fn lock_kind(&self) -> LockKind {
        self.state.lock_kind()
    }

    pub fn barrier_kind(&self) -> BarrierKind {
        self.barrier.kind()
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome<T> {
    pub value: T,
    pub timing: RunTiming,
    pub config: RunConfig,
    pub run_id: Uuid,
}

impl<T> RunOutcome<T> {
    /// Transform the value, keeping the run metadata
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RunOutcome<U> {
        RunOutcome {
            value: f(self.value),
            timing: self.timing,
            config: self.config,
            run_id: self.run_id,
        }
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            run_id: self.run_id,
            lock: self.config.lock,
            barrier: self.config.barrier,
            participants: self.config.participants,
            elapsed_ns: u64::try_from(self.timing.as_nanos()).unwrap_or(u64::MAX),
            elapsed_s: self.timing.as_secs_f64(),
        }
    }
}

/// Flat, serializable summary of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub lock: LockKind,
    pub barrier: BarrierKind,
    pub participants: usize,
    pub elapsed_ns: u64,
    pub elapsed_s: f64,
}

/// Run `work` once per participant over `0..input_len`
///
/// `state` becomes the run's shared state, reachable through
/// [`RunContext::state`] and returned in the outcome once every worker has
/// joined. The configuration is validated before anything is spawned.
pub fn run<T, F>(
    config: &RunConfig,
    input_len: usize,
    state: T,
    work: F,
) -> ConfigResult<RunOutcome<T>>
where
    T: Send,
    F: Fn(&WorkerContext, &mut Participant, &RunContext<T>) + Sync,
{
    if let Err(e) = config.validate() {
        warn!(error = %e, lock = %config.lock, participants = config.participants, "Rejected run configuration");
        return Err(e);
    }

    let shared = RunContext {
        state: LockCell::new(Lock::new(config.lock, config.participants)?, state),
        barrier: Barrier::new(config.barrier, config.participants)?,
    };

    let run_id = Uuid::new_v4();
    let span = info_span!(
        "run",
        %run_id,
        lock = %config.lock,
        barrier = %config.barrier,
        participants = config.participants
    );
    let _entered = span.enter();

    let mut stopwatch = Stopwatch::default();

    // Ids 1..=N come from the lock, matched to contexts in id order
    let participants: Vec<Participant> = shared.state.participants().collect();
    let mut workers = partition(input_len, config.participants)
        .into_iter()
        .zip(participants);

    thread::scope(|scope| {
        let leader = workers.next();

        for (ctx, participant) in workers {
            let shared = &shared;
            let work = &work;
            let span = Span::current();
            let id = ctx.id;

            let spawned = thread::Builder::new()
                .name(format!("lockbench-{id}"))
                .spawn_scoped(scope, move || {
                    let _entered = span.enter();
                    run_worker(&ctx, participant, shared, work, None);
                });

            if let Err(e) = spawned {
                // Workers already spawned are parked in the first phase
                error!(participant = %id, error = %e, "Failed to spawn worker thread");
                std::process::abort();
            }
        }

        if let Some((ctx, participant)) = leader {
            run_worker(&ctx, participant, &shared, &work, Some(&mut stopwatch));
        }
    });

    let timing = stopwatch.timing().unwrap_or_default();
    debug!(
        elapsed_ns = u64::try_from(timing.as_nanos()).unwrap_or(u64::MAX),
        elapsed_s = timing.as_secs_f64(),
        "Run complete"
    );

    Ok(RunOutcome {
        value: shared.state.into_inner(),
        timing,
        config: *config,
        run_id,
    })
}

/// The four-phase protocol every participant follows
fn run_worker<T, F>(
    ctx: &WorkerContext,
    mut participant: Participant,
    shared: &RunContext<T>,
    work: &F,
    mut stopwatch: Option<&mut Stopwatch>,
) where
    F: Fn(&WorkerContext, &mut Participant, &RunContext<T>),
{
    debug_assert_eq!(participant.id(), ctx.id);
    let leader = ctx.is_leader();

    shared.wait(&mut participant);
    if let Some(watch) = stopwatch.as_deref_mut() {
        trace!("Startup phase drained");
        watch.start();
    }

    shared.wait(&mut participant);
    work(ctx, &mut participant, shared);

    shared.wait(&mut participant);
    if let Some(watch) = stopwatch {
        watch.stop();
        trace!("Compute phase drained");
    }

    shared.wait(&mut participant);
    if leader {
        trace!("Teardown phase drained");
    }
}
