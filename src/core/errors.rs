/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for operations that validate a run configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Rejected run configurations
///
/// Every variant is raised before any worker thread is spawned.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("A run needs at least one participant")]
    #[diagnostic(
        code(config::no_participants),
        help("Pass a thread count of 1 or more.")
    )]
    NoParticipants,

    #[error("Requested {requested} participants, at most {max} are supported")]
    #[diagnostic(
        code(config::too_many_participants),
        help("Each participant is an OS thread. Lower the thread count.")
    )]
    TooManyParticipants { requested: usize, max: usize },

    #[error("Lock '{lock}' supports at most two participants, {requested} requested")]
    #[diagnostic(
        code(config::two_party_lock),
        help("Peterson locks are two-party algorithms. Run them with 1 or 2 threads.")
    )]
    TwoPartyLock { lock: String, requested: usize },

    #[error("Unknown lock '{0}'")]
    #[diagnostic(
        code(config::unknown_lock),
        help("Use one of: tas, ttas, ticket, mcs, pthread, petersonseq, petersonrel.")
    )]
    UnknownLock(String),

    #[error("Unknown barrier '{0}'")]
    #[diagnostic(
        code(config::unknown_barrier),
        help("Use one of: sense, pthread.")
    )]
    UnknownBarrier(String),
}

/// Result alias for integer-list file access
pub type InputResult<T> = Result<T, InputError>;

/// Failures reading or writing integer-list files
#[derive(Error, Debug, Diagnostic)]
pub enum InputError {
    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(input::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    #[diagnostic(code(input::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: '{token}' at position {position} is not an integer", path.display())]
    #[diagnostic(
        code(input::parse),
        help("Input files hold whitespace-separated signed integers.")
    )]
    Parse {
        path: PathBuf,
        token: String,
        position: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::TwoPartyLock {
            lock: "petersonseq".into(),
            requested: 4,
        };
        assert_eq!(
            err.to_string(),
            "Lock 'petersonseq' supports at most two participants, 4 requested"
        );
        assert_eq!(
            ConfigError::NoParticipants.to_string(),
            "A run needs at least one participant"
        );
    }

    #[test]
    fn test_error_serialization() {
        let err = ConfigError::TooManyParticipants {
            requested: 1000,
            max: 256,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"error_type\":\"too_many_participants\""));

        let back: ConfigError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = ConfigError::UnknownLock("spin".into());
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("config::unknown_lock"));
        assert!(err.help().is_some());
    }

    #[test]
    fn test_input_error_display() {
        let err = InputError::Parse {
            path: PathBuf::from("in.txt"),
            token: "12x".into(),
            position: 3,
        };
        assert_eq!(
            err.to_string(),
            "in.txt: '12x' at position 3 is not an integer"
        );
    }
}
