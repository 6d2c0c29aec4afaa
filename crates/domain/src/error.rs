// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The ticket state string is not a valid state.
    InvalidTicketState {
        /// The unrecognized state value.
        state: String,
    },
    /// A ticket state transition is not permitted by the lifecycle rules.
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
        /// Why the transition is not permitted.
        reason: String,
    },
    /// The procedure status string is not a valid status.
    InvalidProcedureStatus {
        /// The unrecognized status value.
        status: String,
    },
    /// The daily ticket sequence is outside the range a code can encode.
    DailySequenceExhausted {
        /// The sequence number that could not be encoded.
        sequence: i64,
    },
    /// Student name is empty or invalid.
    InvalidStudentName(String),
    /// Student email is empty or invalid.
    InvalidStudentEmail(String),
    /// Procedure type name is empty or invalid.
    InvalidProcedureName(String),
    /// Estimated procedure duration is outside the accepted range.
    InvalidDuration {
        /// The rejected duration in minutes.
        minutes: i32,
    },
    /// Notes exceed the maximum stored length.
    InvalidNotes(String),
    /// A queue date filter is not a valid `YYYY-MM-DD` date.
    InvalidDate(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTicketState { state } => {
                write!(f, "Invalid ticket state: '{state}'")
            }
            Self::InvalidStateTransition { from, to, reason } => {
                write!(f, "Invalid transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidProcedureStatus { status } => {
                write!(f, "Invalid procedure status: '{status}'")
            }
            Self::DailySequenceExhausted { sequence } => {
                write!(
                    f,
                    "Daily ticket sequence {sequence} cannot be encoded in a ticket code"
                )
            }
            Self::InvalidStudentName(msg) => write!(f, "Invalid student name: {msg}"),
            Self::InvalidStudentEmail(msg) => write!(f, "Invalid student email: {msg}"),
            Self::InvalidProcedureName(msg) => write!(f, "Invalid procedure name: {msg}"),
            Self::InvalidDuration { minutes } => {
                write!(f, "Invalid estimated duration: {minutes} minutes")
            }
            Self::InvalidNotes(msg) => write!(f, "Invalid notes: {msg}"),
            Self::InvalidDate(msg) => write!(f, "Invalid date: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
