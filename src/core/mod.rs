/*!
 * Core Module
 * Synchronization primitives, error types and run limits
 */

pub mod errors;
pub mod limits;
pub mod sync;

// Re-export for convenience
pub use errors::*;
