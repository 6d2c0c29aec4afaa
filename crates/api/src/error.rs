// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::request_response::TicketInfo;
use turnero_domain::DomainError;
use turnero_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent
/// the API contract. The server layer maps each variant onto exactly
/// one HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The student already holds an active ticket.
    ///
    /// Carries the blocking ticket so clients can show the student
    /// their current turn instead of a bare rejection.
    ActiveTicketConflict {
        /// The student's currently active ticket.
        ticket: Box<TicketInfo>,
    },
    /// A business rule was violated.
    RuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The requested lifecycle transition is not permitted.
    InvalidTransition {
        /// A human-readable description of why.
        message: String,
    },
    /// A transient condition; the caller should retry.
    Transient {
        /// A description of the transient condition.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::ActiveTicketConflict { ticket } => {
                write!(f, "Ya tienes un turno en curso: {}", ticket.code)
            }
            Self::RuleViolation { rule, message } => {
                write!(f, "Rule violation ({rule}): {message}")
            }
            Self::InvalidTransition { message } => {
                write!(f, "Invalid transition: {message}")
            }
            Self::Transient { message } => {
                write!(f, "Temporarily unavailable: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStudentName(message) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
        DomainError::InvalidStudentEmail(message) => ApiError::InvalidInput {
            field: String::from("email"),
            message,
        },
        DomainError::InvalidProcedureName(message) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
        DomainError::InvalidDuration { minutes } => ApiError::InvalidInput {
            field: String::from("estimated_duration_minutes"),
            message: format!("{minutes} is outside the accepted range of 1 to 480 minutes"),
        },
        DomainError::InvalidNotes(message) => ApiError::InvalidInput {
            field: String::from("notes"),
            message,
        },
        DomainError::InvalidDate(message) => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
        DomainError::InvalidTicketState { state } => ApiError::InvalidInput {
            field: String::from("state"),
            message: format!("'{state}' is not a ticket state"),
        },
        DomainError::InvalidProcedureStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("'{status}' is not a procedure status"),
        },
        DomainError::InvalidStateTransition { from, to, reason } => ApiError::InvalidTransition {
            message: format!("cannot move a ticket from '{from}' to '{to}': {reason}"),
        },
        DomainError::DailySequenceExhausted { sequence } => ApiError::RuleViolation {
            rule: String::from("daily_capacity"),
            message: format!("the daily ticket capacity is exhausted (sequence {sequence})"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::TicketNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {id} does not exist"),
        },
        PersistenceError::StudentNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Student {id} does not exist"),
        },
        PersistenceError::ProcedureTypeNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Procedure type"),
            message: format!("Procedure type {id} does not exist"),
        },
        PersistenceError::ActiveTicketExists { ticket } => ApiError::ActiveTicketConflict {
            ticket: Box::new(TicketInfo::from(*ticket)),
        },
        PersistenceError::DuplicateEmail(email) => ApiError::RuleViolation {
            rule: String::from("unique_email"),
            message: format!("A student with email {email} is already registered"),
        },
        PersistenceError::LockContention(message) => ApiError::Transient { message },
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
