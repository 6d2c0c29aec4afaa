// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use turnero_domain::{DomainError, Ticket};

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested ticket was not found.
    TicketNotFound(i64),
    /// The requested student was not found.
    StudentNotFound(i64),
    /// The requested procedure type was not found.
    ProcedureTypeNotFound(i64),
    /// The student already holds an active ticket.
    ///
    /// Carries the conflicting ticket so callers can show it.
    ActiveTicketExists {
        /// The student's currently active ticket.
        ticket: Box<Ticket>,
    },
    /// A student with this email is already registered.
    DuplicateEmail(String),
    /// The database write lock could not be acquired within the busy
    /// timeout. Transient: callers should retry.
    LockContention(String),
    /// A domain rule was violated while applying a mutation.
    DomainViolation(DomainError),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::TicketNotFound(id) => write!(f, "Ticket not found: {id}"),
            Self::StudentNotFound(id) => write!(f, "Student not found: {id}"),
            Self::ProcedureTypeNotFound(id) => write!(f, "Procedure type not found: {id}"),
            Self::ActiveTicketExists { ticket } => {
                write!(
                    f,
                    "Student {} already holds active ticket {}",
                    ticket.student_id, ticket.code
                )
            }
            Self::DuplicateEmail(email) => {
                write!(f, "A student with email {email} is already registered")
            }
            Self::LockContention(msg) => write!(f, "Database lock contention: {msg}"),
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(_, ref info)
                if info.message().contains("database is locked")
                    || info.message().contains("database table is locked") =>
            {
                Self::LockContention(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
