//! Error types for scoutbook.
//!
//! Two layers live here: [`ValidationError`] carries the user-facing messages
//! for rejected input, and [`Error`] wraps everything else (storage,
//! configuration, serialization) for callers that need to propagate failures.

use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before any state change took place.
///
/// The `Display` output of each variant is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An archive was requested without a name.
    #[error("Please enter a competition name.")]
    EmptyArchiveName,

    /// The total match count was not a positive integer within the cap.
    #[error("Please enter a valid number of matches (greater than 0, at most 1000).")]
    InvalidMatchCount,

    /// The team identifier for match setup was blank.
    #[error("Please enter your team number.")]
    EmptyTeamIdentifier,

    /// Finalize was requested while every schedule slot was blank.
    #[error("Please enter at least some team numbers in the schedule before finalizing.")]
    EmptySchedule,

    /// The match-scouting action is not allowed in the current phase.
    #[error("cannot {action} while match scouting is {from}")]
    InvalidTransition {
        /// Phase the schedule was in.
        from: &'static str,
        /// What the caller tried to do.
        action: &'static str,
    },
}

/// The main error type for scoutbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// User input was rejected.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for scoutbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a rejected user input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation failure behind this error, if any.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_user_facing() {
        assert_eq!(
            ValidationError::EmptyArchiveName.to_string(),
            "Please enter a competition name."
        );
        assert!(ValidationError::InvalidMatchCount
            .to_string()
            .contains("greater than 0"));
        assert!(ValidationError::EmptySchedule
            .to_string()
            .contains("before finalizing"));
    }

    #[test]
    fn test_validation_error_passes_message_through() {
        let err: Error = ValidationError::EmptyTeamIdentifier.into();
        assert_eq!(err.to_string(), "Please enter your team number.");
        assert!(err.is_validation());
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::EmptyTeamIdentifier)
        );
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = ValidationError::InvalidTransition {
            from: "finalized",
            action: "edit the schedule",
        };
        assert_eq!(
            err.to_string(),
            "cannot edit the schedule while match scouting is finalized"
        );
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
        assert!(!err.is_validation());
        assert!(err.as_validation().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "debounce_ms must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
