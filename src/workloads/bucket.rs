/*!
 * Partitioned Bucket Fill
 *
 * Parallel building block of a bucket sort. Each participant scatters its
 * slice of the input into shared ordered buckets, all insertions serialized
 * by the run's single lock, and the buckets are concatenated in index order
 * once every participant has joined.
 *
 * Buckets are sets: duplicate input values collapse into one output value.
 */

use crate::core::errors::ConfigResult;
use crate::core::limits::{
    BUCKET_OCCUPANCY, MEDIUM_INPUT_LIMIT, SMALL_INPUT_BUCKETS, SMALL_INPUT_LIMIT,
};
use crate::core::sync::{BarrierKind, LockKind};
use crate::harness::{self, RunConfig, RunOutcome};
use std::collections::BTreeSet;
use tracing::warn;

/// Bucket count for an input of `len` values
///
/// Aims for roughly constant occupancy: 10 buckets below 100 values, 100 up
/// to 1000 values, then one bucket per 100 values.
pub fn bucket_count(len: usize) -> usize {
    if len < SMALL_INPUT_LIMIT {
        SMALL_INPUT_BUCKETS
    } else if len > MEDIUM_INPUT_LIMIT {
        len / BUCKET_OCCUPANCY
    } else {
        BUCKET_OCCUPANCY
    }
}

/// Destination bucket of `value`
///
/// `value / buckets`, clamped into `0..buckets`. Monotone in `value`, so
/// concatenating buckets in index order yields sorted output.
pub fn bucket_index(value: i64, buckets: usize) -> usize {
    let last = buckets.saturating_sub(1);
    if value < 0 {
        return 0;
    }
    let index = value.unsigned_abs() / buckets.max(1) as u64;
    usize::try_from(index).map_or(last, |index| index.min(last))
}

/// Sort `input` into distinct ascending values using the configured primitives
pub fn bucket_fill(config: &RunConfig, input: &[i64]) -> ConfigResult<RunOutcome<Vec<i64>>> {
    if config.participants > input.len() {
        warn!(
            participants = config.participants,
            len = input.len(),
            "More participants than input values, some get an empty range"
        );
    }

    let buckets: Vec<BTreeSet<i64>> = vec![BTreeSet::new(); bucket_count(input.len())];

    let outcome = harness::run(config, input.len(), buckets, |ctx, me, shared| {
        for &value in &input[ctx.range.clone()] {
            shared.state().with(me, |buckets| {
                let index = bucket_index(value, buckets.len());
                buckets[index].insert(value);
            });
        }
    })?;

    Ok(outcome.map(|buckets| buckets.into_iter().flatten().collect()))
}

/// Bucket fill by primitive selection, returning only the sorted values
pub fn run_bucket_fill(
    lock: LockKind,
    barrier: BarrierKind,
    input: &[i64],
    participants: usize,
) -> ConfigResult<Vec<i64>> {
    let config = RunConfig::new(lock, barrier, participants);
    bucket_fill(&config, input).map(|outcome| outcome.value)
}
