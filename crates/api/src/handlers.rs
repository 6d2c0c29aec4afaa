// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers validate input, run the existence checks that belong to the
//! API contract, delegate to persistence, and translate errors. They
//! know nothing about HTTP; the server crate owns routing and status
//! codes.

use std::str::FromStr;

use tracing::info;

use turnero_domain::{
    ProcedureStatus, TicketState, estimated_wait_minutes, now_date, validate_duration_minutes,
    validate_notes, validate_procedure_name, validate_queue_date, validate_student_email,
    validate_student_name,
};
use turnero_persistence::Persistence;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateProcedureTypeRequest, ProcedureTypeInfo, QueueEntryInfo, QueuePositionResponse,
    RegisterStudentRequest, RequestTicketRequest, StudentInfo, TicketInfo,
    UpdateTicketStatusRequest, WaitEstimateResponse,
};

/// Looks up a student or reports a 404-class error.
fn require_student(persistence: &mut Persistence, student_id: i64) -> Result<(), ApiError> {
    persistence
        .get_student(student_id)
        .map_err(translate_persistence_error)?
        .map(|_| ())
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Student {student_id} does not exist"),
        })
}

/// Registers a student.
///
/// # Errors
///
/// Returns an error if the name or email is invalid, the email is
/// already registered, or persistence fails.
pub fn register_student(
    persistence: &mut Persistence,
    request: &RegisterStudentRequest,
) -> Result<StudentInfo, ApiError> {
    validate_student_name(&request.name).map_err(translate_domain_error)?;
    validate_student_email(&request.email).map_err(translate_domain_error)?;

    let student = persistence
        .create_student(request.name.trim(), request.email.trim())
        .map_err(translate_persistence_error)?;

    info!(student_id = student.student_id, "student registered");
    Ok(StudentInfo::from(student))
}

/// Adds a procedure type to the catalog, initially `active`.
///
/// # Errors
///
/// Returns an error if the name or duration is invalid, or persistence
/// fails.
pub fn create_procedure_type(
    persistence: &mut Persistence,
    request: &CreateProcedureTypeRequest,
) -> Result<ProcedureTypeInfo, ApiError> {
    validate_procedure_name(&request.name).map_err(translate_domain_error)?;
    validate_duration_minutes(request.estimated_duration_minutes)
        .map_err(translate_domain_error)?;

    let procedure = persistence
        .create_procedure_type(request.name.trim(), request.estimated_duration_minutes)
        .map_err(translate_persistence_error)?;

    info!(
        procedure_type_id = procedure.procedure_type_id,
        "procedure type created"
    );
    Ok(ProcedureTypeInfo::from(procedure))
}

/// Changes a procedure type's catalog status.
///
/// Suspension and deletion only block new admissions; existing tickets
/// continue through their lifecycle untouched.
///
/// # Errors
///
/// Returns an error if the status string is invalid, the procedure type
/// does not exist, or persistence fails.
pub fn set_procedure_status(
    persistence: &mut Persistence,
    procedure_type_id: i64,
    status: &str,
) -> Result<ProcedureTypeInfo, ApiError> {
    let status = ProcedureStatus::from_str(status).map_err(translate_domain_error)?;

    let procedure = persistence
        .set_procedure_status(procedure_type_id, status)
        .map_err(translate_persistence_error)?;

    info!(procedure_type_id, status = procedure.status.as_str(), "procedure status changed");
    Ok(ProcedureTypeInfo::from(procedure))
}

/// Lists all non-deleted procedure types.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn list_procedure_types(
    persistence: &mut Persistence,
) -> Result<Vec<ProcedureTypeInfo>, ApiError> {
    let procedures = persistence
        .list_procedure_types()
        .map_err(translate_persistence_error)?;
    Ok(procedures.into_iter().map(ProcedureTypeInfo::from).collect())
}

/// Admits a student into the queue.
///
/// The student and procedure must exist, the procedure must be active,
/// and the student must not already hold an active ticket.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown or inactive procedure or
/// an unknown student, `ActiveTicketConflict` if the student already
/// holds a ticket, or an error if persistence fails.
pub fn request_ticket(
    persistence: &mut Persistence,
    request: &RequestTicketRequest,
) -> Result<TicketInfo, ApiError> {
    validate_notes(request.notes.as_deref()).map_err(translate_domain_error)?;
    require_student(persistence, request.student_id)?;

    let procedure = persistence
        .get_procedure_type(request.procedure_type_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Procedure type"),
            message: format!("Procedure type {} does not exist", request.procedure_type_id),
        })?;
    // Suspended and deleted procedures are invisible to admission.
    if !procedure.status.is_active() {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Procedure type"),
            message: format!(
                "Procedure '{}' is {} and not accepting new tickets",
                procedure.name,
                procedure.status.as_str()
            ),
        });
    }

    let ticket = persistence
        .request_ticket(
            request.student_id,
            request.procedure_type_id,
            request.notes.as_deref(),
        )
        .map_err(translate_persistence_error)?;

    info!(ticket_id = ticket.ticket_id, code = %ticket.code, "ticket admitted");
    Ok(TicketInfo::from(ticket))
}

/// Calls the next waiting ticket of the current day.
///
/// Returns `Ok(None)` when no ticket is waiting; the server layer
/// reports that as not-found rather than an empty success.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn call_next(persistence: &mut Persistence) -> Result<Option<TicketInfo>, ApiError> {
    let called = persistence
        .call_next()
        .map_err(translate_persistence_error)?;
    if let Some(ticket) = &called {
        info!(ticket_id = ticket.ticket_id, code = %ticket.code, "ticket called");
    }
    Ok(called.map(TicketInfo::from))
}

fn transition(
    persistence: &mut Persistence,
    ticket_id: i64,
    new_state: TicketState,
    notes: Option<&str>,
) -> Result<TicketInfo, ApiError> {
    validate_notes(notes).map_err(translate_domain_error)?;
    let ticket = persistence
        .transition_ticket(ticket_id, new_state, notes)
        .map_err(translate_persistence_error)?;
    info!(ticket_id, state = ticket.state.as_str(), "ticket transitioned");
    Ok(TicketInfo::from(ticket))
}

/// Marks a ticket as served.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown ticket,
/// `InvalidTransition` if the lifecycle forbids it, or an error if
/// persistence fails.
pub fn finish_ticket(
    persistence: &mut Persistence,
    ticket_id: i64,
    notes: Option<&str>,
) -> Result<TicketInfo, ApiError> {
    transition(persistence, ticket_id, TicketState::Atendido, notes)
}

/// Cancels a ticket.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown ticket,
/// `InvalidTransition` if the lifecycle forbids it, or an error if
/// persistence fails.
pub fn cancel_ticket(
    persistence: &mut Persistence,
    ticket_id: i64,
    notes: Option<&str>,
) -> Result<TicketInfo, ApiError> {
    transition(persistence, ticket_id, TicketState::Cancelado, notes)
}

/// Marks a ticket's student as absent.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown ticket,
/// `InvalidTransition` if the lifecycle forbids it, or an error if
/// persistence fails.
pub fn mark_absent(
    persistence: &mut Persistence,
    ticket_id: i64,
    notes: Option<&str>,
) -> Result<TicketInfo, ApiError> {
    transition(persistence, ticket_id, TicketState::Ausente, notes)
}

/// Moves a ticket to an arbitrary target state.
///
/// The dedicated finish/cancel/absent operations cover the common
/// paths; this one exists for staff tooling that names the target state
/// directly. The lifecycle table still applies.
///
/// # Errors
///
/// Returns `InvalidInput` for an unrecognized state string,
/// `ResourceNotFound` for an unknown ticket, `InvalidTransition` if the
/// lifecycle forbids it, or an error if persistence fails.
pub fn update_ticket_status(
    persistence: &mut Persistence,
    ticket_id: i64,
    request: &UpdateTicketStatusRequest,
) -> Result<TicketInfo, ApiError> {
    let new_state = TicketState::from_str(&request.state).map_err(translate_domain_error)?;
    transition(persistence, ticket_id, new_state, request.notes.as_deref())
}

/// Retrieves a ticket.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown ticket, or an error if
/// persistence fails.
pub fn get_ticket_status(
    persistence: &mut Persistence,
    ticket_id: i64,
) -> Result<TicketInfo, ApiError> {
    persistence
        .get_ticket(ticket_id)
        .map_err(translate_persistence_error)?
        .map(TicketInfo::from)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {ticket_id} does not exist"),
        })
}

/// Computes a ticket's position in the day's waiting line.
///
/// Position is defined only while the ticket is waiting; for any other
/// state the position is `None`.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown ticket, or an error if
/// persistence fails.
pub fn queue_position(
    persistence: &mut Persistence,
    ticket_id: i64,
) -> Result<QueuePositionResponse, ApiError> {
    let ticket = get_ticket_status(persistence, ticket_id)?;

    let position = if ticket.state == TicketState::EnCola.as_str() {
        Some(
            persistence
                .queue_position(ticket_id)
                .map_err(translate_persistence_error)?,
        )
    } else {
        None
    };

    Ok(QueuePositionResponse {
        ticket_id,
        state: ticket.state,
        position,
    })
}

/// Projects the wait for a procedure: subqueue depth times estimated
/// duration. An approximation, not a promise.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown procedure type, or an
/// error if persistence fails.
pub fn wait_estimate(
    persistence: &mut Persistence,
    procedure_type_id: i64,
) -> Result<WaitEstimateResponse, ApiError> {
    let procedure = persistence
        .get_procedure_type(procedure_type_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Procedure type"),
            message: format!("Procedure type {procedure_type_id} does not exist"),
        })?;

    let waiting_count = persistence
        .count_waiting_for_procedure(procedure_type_id)
        .map_err(translate_persistence_error)?;

    Ok(WaitEstimateResponse {
        procedure_type_id,
        waiting_count,
        estimated_duration_minutes: procedure.estimated_duration_minutes,
        estimated_wait_minutes: estimated_wait_minutes(
            waiting_count,
            procedure.estimated_duration_minutes,
        ),
    })
}

/// Lists the active queue for a date, defaulting to today (UTC).
///
/// # Errors
///
/// Returns an error if the date is malformed or persistence fails.
pub fn list_queue(
    persistence: &mut Persistence,
    date: Option<&str>,
) -> Result<Vec<QueueEntryInfo>, ApiError> {
    let date = match date {
        Some(given) => {
            validate_queue_date(given).map_err(translate_domain_error)?;
            given.to_string()
        }
        None => now_date(),
    };

    let entries = persistence
        .list_queue(&date)
        .map_err(translate_persistence_error)?;
    Ok(entries.into_iter().map(QueueEntryInfo::from).collect())
}

/// Retrieves a student's active ticket, if any.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown student, or an error if
/// persistence fails.
pub fn current_ticket(
    persistence: &mut Persistence,
    student_id: i64,
) -> Result<Option<TicketInfo>, ApiError> {
    require_student(persistence, student_id)?;
    let ticket = persistence
        .find_active_ticket(student_id)
        .map_err(translate_persistence_error)?;
    Ok(ticket.map(TicketInfo::from))
}

/// Lists a student's ticket history, newest first, optionally filtered
/// by state.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown student, `InvalidInput`
/// for an unrecognized state filter, or an error if persistence fails.
pub fn list_student_tickets(
    persistence: &mut Persistence,
    student_id: i64,
    state: Option<&str>,
) -> Result<Vec<TicketInfo>, ApiError> {
    require_student(persistence, student_id)?;

    let state = state
        .map(TicketState::from_str)
        .transpose()
        .map_err(translate_domain_error)?;

    let tickets = persistence
        .list_tickets_for_student(student_id, state)
        .map_err(translate_persistence_error)?;
    Ok(tickets.into_iter().map(TicketInfo::from).collect())
}
