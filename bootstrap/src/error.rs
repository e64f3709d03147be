//! Bootstrap error types using thiserror 2.0.
//!
//! Seeding has no recovery semantics: the first failure aborts the run and
//! propagates to the enclosing test harness. Classification exists so
//! callers can recognize the documented failure modes, not to drive retries.

use thiserror::Error;

/// Bootstrap-specific errors.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Database instance unreachable
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// Principal already exists on the target partition
    #[error("principal {name:?} already exists on partition {database:?}")]
    DuplicatePrincipal {
        /// Principal name the server rejected
        name: String,
        /// Partition the creation was issued against
        database: String,
    },

    /// Administrative command rejected by the server
    #[error("command failed with code {code}: {message}")]
    CommandFailed {
        /// Server error code
        code: i32,
        /// Server error message
        message: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Driver error
    #[error("driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
}

/// Result type for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

impl BootstrapError {
    /// Check whether this error reports an already-existing principal.
    #[must_use]
    pub const fn is_duplicate_principal(&self) -> bool {
        matches!(self, Self::DuplicatePrincipal { .. })
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a duplicate-principal error.
    #[must_use]
    pub fn duplicate(name: impl Into<String>, database: impl Into<String>) -> Self {
        Self::DuplicatePrincipal {
            name: name.into(),
            database: database.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BootstrapError::unavailable("connection refused");
        assert_eq!(err.to_string(), "database unavailable: connection refused");

        let err = BootstrapError::duplicate("mongo_user", "mydb");
        assert_eq!(
            err.to_string(),
            "principal \"mongo_user\" already exists on partition \"mydb\""
        );
    }

    #[test]
    fn test_duplicate_classification() {
        assert!(BootstrapError::duplicate("mongo_user", "mydb").is_duplicate_principal());
        assert!(!BootstrapError::unavailable("timeout").is_duplicate_principal());
        assert!(
            !BootstrapError::CommandFailed {
                code: 13,
                message: "unauthorized".to_string(),
            }
            .is_duplicate_principal()
        );
    }

    #[test]
    fn test_command_failed_display() {
        let err = BootstrapError::CommandFailed {
            code: 13,
            message: "not authorized".to_string(),
        };
        assert_eq!(err.to_string(), "command failed with code 13: not authorized");
    }
}
