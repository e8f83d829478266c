/*!
 * lockbench
 *
 * Mutual exclusion and barrier algorithms, a fork-join harness that drives
 * them through barrier-delimited phases, and two contention workloads:
 * a partitioned bucket fill and a shared counter.
 */

pub mod core;
pub mod harness;
pub mod io;
pub mod monitoring;
pub mod workloads;

// Re-exports
pub use crate::core::errors::{ConfigError, ConfigResult, InputError, InputResult};
pub use crate::core::sync::{Barrier, BarrierKind, Lock, LockCell, LockKind, Participant, ParticipantId};
pub use harness::{run, RunConfig, RunContext, RunOutcome, RunReport, RunTiming, WorkerContext};
pub use monitoring::init_tracing;
pub use workloads::{
    bucket_fill, run_bucket_fill, run_counter_benchmark, CounterBenchmark, CounterMode,
    CounterResult,
};
