/*!
 * Workloads
 * Contention drivers built on the fork-join harness
 */

pub mod bucket;
pub mod counter;

pub use bucket::{bucket_count, bucket_fill, bucket_index, run_bucket_fill};
pub use counter::{run_counter_benchmark, CounterBenchmark, CounterMode, CounterResult};
