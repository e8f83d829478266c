/*!
 * Shared Counter
 *
 * Contention benchmark over a single shared counter, in two modes:
 * - Locked: every participant increments `iterations` times, each increment
 *   inside the run's lock
 * - Barrier turns: no lock is taken; participants walk
 *   `iterations * participants` global steps, the owner of step `i` is
 *   participant `i mod participants` (zero-based), and everyone waits on the
 *   barrier after every step
 */

use crate::core::errors::ConfigResult;
use crate::core::sync::{BarrierKind, LockKind, Participant};
use crate::harness::{self, RunConfig, RunContext, RunOutcome, WorkerContext};
use serde::{Deserialize, Serialize};

/// How participants serialize their increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterMode {
    #[default]
    Locked,
    BarrierTurns,
}

/// Final counter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterResult {
    pub value: u64,
    /// Zero-based participant index of every increment, when recorded
    pub order: Option<Vec<usize>>,
}

impl CounterResult {
    fn recording(capacity: usize) -> Self {
        Self {
            value: 0,
            order: Some(Vec::with_capacity(capacity)),
        }
    }

    #[inline]
    fn increment(&mut self, index: usize) {
        self.value += 1;
        if let Some(order) = &mut self.order {
            order.push(index);
        }
    }
}

/// Builder for one counter run
#[derive(Debug, Clone)]
pub struct CounterBenchmark {
    config: RunConfig,
    mode: CounterMode,
    iterations: u64,
    record_order: bool,
}

impl CounterBenchmark {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            mode: CounterMode::default(),
            iterations: 1,
            record_order: false,
        }
    }

    pub fn mode(mut self, mode: CounterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Increments per participant
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Keep the participant order of every increment in the result
    pub fn record_order(mut self, record: bool) -> Self {
        self.record_order = record;
        self
    }

    /// Total increments a correct run ends with
    pub fn expected(&self) -> u64 {
        self.iterations.saturating_mul(self.config.participants as u64)
    }

    pub fn run(&self) -> ConfigResult<RunOutcome<CounterResult>> {
        let state = if self.record_order {
            CounterResult::recording(usize::try_from(self.expected()).unwrap_or(0))
        } else {
            CounterResult::default()
        };

        let iterations = self.iterations;
        match self.mode {
            CounterMode::Locked => harness::run(&self.config, 0, state, |ctx, me, shared| {
                locked_increments(ctx, me, shared, iterations)
            }),
            CounterMode::BarrierTurns => harness::run(&self.config, 0, state, |ctx, me, shared| {
                turn_increments(ctx, me, shared, iterations)
            }),
        }
    }
}

fn locked_increments(
    ctx: &WorkerContext,
    me: &mut Participant,
    shared: &RunContext<CounterResult>,
    iterations: u64,
) {
    let index = ctx.id.index();
    for _ in 0..iterations {
        shared.state().lock(me).increment(index);
    }
}

fn turn_increments(
    ctx: &WorkerContext,
    me: &mut Participant,
    shared: &RunContext<CounterResult>,
    iterations: u64,
) {
    let index = ctx.id.index();
    let participants = shared.participants() as u64;

    for step in 0..iterations.saturating_mul(participants) {
        if step % participants == index as u64 {
            // SAFETY: only the owner of this step touches the counter, and
            // the barrier below orders it before the next owner's turn
            unsafe { shared.state().get_unsynchronized() }.increment(index);
        }
        shared.wait(me);
    }
}

/// Run the counter benchmark by primitive selection
///
/// The lock is built and validated in both modes, even though barrier-turn
/// runs never take it.
pub fn run_counter_benchmark(
    lock: LockKind,
    barrier: BarrierKind,
    barrier_only: bool,
    iterations: u64,
    participants: usize,
) -> ConfigResult<RunOutcome<u64>> {
    let mode = if barrier_only {
        CounterMode::BarrierTurns
    } else {
        CounterMode::Locked
    };

    CounterBenchmark::new(RunConfig::new(lock, barrier, participants))
        .mode(mode)
        .iterations(iterations)
        .run()
        .map(|outcome| outcome.map(|result| result.value))
}
