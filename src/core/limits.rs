/*!
 * Run Limits and Constants
 *
 * Centralized location for thresholds and tuning knobs used by the harness,
 * the workloads and the spinning primitives.
 */

// =============================================================================
// PARTICIPANTS
// =============================================================================

/// Participants used when the caller does not ask for a specific count
pub const DEFAULT_PARTICIPANTS: usize = 4;

/// Upper bound on participants in a single run
/// Every participant is an OS thread spinning on shared memory
pub const MAX_PARTICIPANTS: usize = 256;

/// Participants supported by the Peterson variants
pub const PETERSON_PARTICIPANTS: usize = 2;

// =============================================================================
// BUCKET FILL
// =============================================================================

/// Inputs shorter than this use `SMALL_INPUT_BUCKETS`
pub const SMALL_INPUT_LIMIT: usize = 100;

/// Bucket count for small inputs
pub const SMALL_INPUT_BUCKETS: usize = 10;

/// Inputs longer than this get `len / BUCKET_OCCUPANCY` buckets
pub const MEDIUM_INPUT_LIMIT: usize = 1000;

/// Target average elements per bucket, also the bucket count for medium inputs
pub const BUCKET_OCCUPANCY: usize = 100;

// =============================================================================
// BUSY-WAIT TUNING
// =============================================================================

/// Exponent cap for the pause series: at most 2^SPIN_LIMIT pauses per step
/// Past it a waiter yields its time slice instead
/// [PERF] Keeps oversubscribed runs (more workers than cores) live
pub const SPIN_LIMIT: u32 = 6;
