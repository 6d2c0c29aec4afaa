// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use turnero_domain::{ProcedureType, Student, Ticket};
use turnero_persistence::QueueEntry;

/// API request to register a student.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterStudentRequest {
    /// The student's display name.
    pub name: String,
    /// The student's email address, unique per student.
    pub email: String,
}

/// A student as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StudentInfo {
    /// The student's numeric identifier.
    pub student_id: i64,
    /// The student's display name.
    pub name: String,
    /// The student's email address.
    pub email: String,
    /// When the student was registered (UTC).
    pub created_at: String,
}

impl From<Student> for StudentInfo {
    fn from(student: Student) -> Self {
        Self {
            student_id: student.student_id,
            name: student.name,
            email: student.email,
            created_at: student.created_at,
        }
    }
}

/// API request to add a procedure type to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateProcedureTypeRequest {
    /// The procedure's display name.
    pub name: String,
    /// Estimated service duration in minutes, used for wait projections.
    pub estimated_duration_minutes: i32,
}

/// API request to change a procedure type's catalog status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetProcedureStatusRequest {
    /// The new status: `active`, `suspended`, or `deleted`.
    pub status: String,
}

/// A procedure type as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProcedureTypeInfo {
    /// The procedure type's numeric identifier.
    pub procedure_type_id: i64,
    /// The procedure's display name.
    pub name: String,
    /// Estimated service duration in minutes.
    pub estimated_duration_minutes: i32,
    /// The catalog status.
    pub status: String,
    /// When the procedure type was created (UTC).
    pub created_at: String,
    /// When the procedure type was last updated (UTC).
    pub updated_at: String,
}

impl From<ProcedureType> for ProcedureTypeInfo {
    fn from(procedure: ProcedureType) -> Self {
        Self {
            procedure_type_id: procedure.procedure_type_id,
            name: procedure.name,
            estimated_duration_minutes: procedure.estimated_duration_minutes,
            status: procedure.status.as_str().to_string(),
            created_at: procedure.created_at,
            updated_at: procedure.updated_at,
        }
    }
}

/// API request to admit a student into the queue.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestTicketRequest {
    /// The requesting student.
    pub student_id: i64,
    /// The procedure the student needs.
    pub procedure_type_id: i64,
    /// Optional free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request body for finish, cancel, and mark-absent transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionTicketRequest {
    /// Optional free-text notes; replaces stored notes when present.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request body for the generic state-change operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateTicketStatusRequest {
    /// The target lifecycle state (e.g. `atendiendo`, `cancelado`).
    pub state: String,
    /// Optional free-text notes; replaces stored notes when present.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A ticket as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TicketInfo {
    /// The ticket's numeric identifier.
    pub ticket_id: i64,
    /// The human-readable ticket code (e.g. `T250614007`).
    pub code: String,
    /// The owning student.
    pub student_id: i64,
    /// The requested procedure.
    pub procedure_type_id: i64,
    /// The lifecycle state.
    pub state: String,
    /// When the ticket was requested (UTC).
    pub requested_at: String,
    /// The calendar day the ticket belongs to (`YYYY-MM-DD`, UTC).
    pub requested_on: String,
    /// When service started, if it has.
    pub service_started_at: Option<String>,
    /// When service ended, if it has.
    pub service_ended_at: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Row creation timestamp (UTC).
    pub created_at: String,
    /// Last modification timestamp (UTC).
    pub updated_at: String,
}

impl From<Ticket> for TicketInfo {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id,
            code: ticket.code,
            student_id: ticket.student_id,
            procedure_type_id: ticket.procedure_type_id,
            state: ticket.state.as_str().to_string(),
            requested_at: ticket.requested_at,
            requested_on: ticket.requested_on,
            service_started_at: ticket.service_started_at,
            service_ended_at: ticket.service_ended_at,
            notes: ticket.notes,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}

/// API response for a ticket's queue position.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueuePositionResponse {
    /// The ticket's numeric identifier.
    pub ticket_id: i64,
    /// The ticket's lifecycle state.
    pub state: String,
    /// The 1-based position among same-day waiting tickets, or `None`
    /// once the ticket is no longer waiting.
    pub position: Option<i64>,
}

/// API response for a procedure's wait projection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WaitEstimateResponse {
    /// The procedure type the projection is for.
    pub procedure_type_id: i64,
    /// How many tickets are waiting for this procedure.
    pub waiting_count: i64,
    /// The procedure's estimated service duration in minutes.
    pub estimated_duration_minutes: i32,
    /// The projected wait in minutes: depth times duration.
    pub estimated_wait_minutes: i64,
}

/// A staff-panel queue entry: the ticket plus display fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QueueEntryInfo {
    /// The ticket.
    pub ticket: TicketInfo,
    /// The owning student's display name.
    pub student_name: String,
    /// The owning student's email address.
    pub student_email: String,
    /// The requested procedure's display name.
    pub procedure_name: String,
}

impl From<QueueEntry> for QueueEntryInfo {
    fn from(entry: QueueEntry) -> Self {
        Self {
            ticket: TicketInfo::from(entry.ticket),
            student_name: entry.student_name,
            student_email: entry.student_email,
            procedure_name: entry.procedure_name,
        }
    }
}
