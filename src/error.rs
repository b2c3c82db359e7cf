use std::fmt;

use thiserror::Error;
use tracing::{Span, error};

/// The store operation a failure happened in. Its `Display` form is the
/// phrase used in error messages ("failed while adding user: ...").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    OpeningDatabase,
    Initializing,
    AddingUser,
    AuthenticatingUser,
    GettingUsers,
    AddingSchedule,
    GettingSchedule,
    AddingStudent,
    AddingGrade,
    GettingGrades,
    InspectingSchema,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::OpeningDatabase => "opening the database",
            Operation::Initializing => "initializing the database",
            Operation::AddingUser => "adding user",
            Operation::AuthenticatingUser => "authenticating user",
            Operation::GettingUsers => "getting users",
            Operation::AddingSchedule => "adding schedule",
            Operation::GettingSchedule => "getting schedule",
            Operation::AddingStudent => "adding student",
            Operation::AddingGrade => "adding grade",
            Operation::GettingGrades => "getting grades",
            Operation::InspectingSchema => "inspecting the schema",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed while {operation}: {source}")]
    Database {
        operation: Operation,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed while {operation}: {source}")]
    Credentials {
        operation: Operation,
        #[source]
        source: bcrypt::BcryptError,
    },
}

impl StorageError {
    pub fn operation(&self) -> Operation {
        match self {
            StorageError::Database { operation, .. } => *operation,
            StorageError::Credentials { operation, .. } => *operation,
        }
    }

    pub fn log_and_record(&self) {
        let message = self.to_string();
        let error_kind = match self {
            StorageError::Database { source, operation } => {
                error!(error = %message, operation = %operation, db_error = %source, "Database error");
                "database_error"
            }
            StorageError::Credentials { source, operation } => {
                error!(error = %message, operation = %operation, hash_error = %source, "Credential error");
                "credential_error"
            }
        };

        let current_span = Span::current();
        if !current_span.is_none() {
            current_span.record("error", tracing::field::display(true));
            current_span.record("error.type", tracing::field::display(error_kind));
            current_span.record("error.message", tracing::field::display(&message));
        }
    }
}

/// Attaches the failing operation to a driver-level result.
pub trait ResultExt<T> {
    fn during(self, operation: Operation) -> Result<T, StorageError>;
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn during(self, operation: Operation) -> Result<T, StorageError> {
        self.map_err(|source| {
            let err = StorageError::Database { operation, source };
            err.log_and_record();
            err
        })
    }
}

impl<T> ResultExt<T> for Result<T, bcrypt::BcryptError> {
    fn during(self, operation: Operation) -> Result<T, StorageError> {
        self.map_err(|source| {
            let err = StorageError::Credentials { operation, source };
            err.log_and_record();
            err
        })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Environment file error: {0}")]
    EnvFile(#[from] dotenvy::Error),
}
