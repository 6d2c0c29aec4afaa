// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket query operations.
//!
//! The queue is a derived view, never in-memory state: every read here is
//! a filter over the durable ticket table, so multiple service instances
//! observe the same queue.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{QueueEntry, TicketRow};
use crate::diesel_schema::{procedure_types, students, tickets};
use crate::error::PersistenceError;
use turnero_domain::{Ticket, TicketState};

/// The two states that occupy a student's single active slot.
pub(crate) const ACTIVE_STATES: [&str; 2] = ["en_cola", "atendiendo"];

/// Retrieves a ticket by ID.
///
/// Returns `Ok(None)` if the ticket does not exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Option<Ticket>, PersistenceError> {
    let row: Option<TicketRow> = tickets::table
        .filter(tickets::ticket_id.eq(ticket_id))
        .select(TicketRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_ticket: {e}")))?;

    row.map(TicketRow::into_domain).transpose()
}

/// Finds the student's active ticket (`en_cola` or `atendiendo`), if any.
///
/// Oldest first, limit 1: a student can hold at most one, but if data
/// predating the admission rule contains several, the earliest wins.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_active_ticket(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Option<Ticket>, PersistenceError> {
    let row: Option<TicketRow> = tickets::table
        .filter(tickets::student_id.eq(student_id))
        .filter(tickets::state.eq_any(ACTIVE_STATES))
        .order((tickets::requested_at.asc(), tickets::ticket_id.asc()))
        .select(TicketRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_active_ticket: {e}")))?;

    row.map(TicketRow::into_domain).transpose()
}

/// Counts tickets created on a calendar date (`YYYY-MM-DD`).
///
/// The per-day code sequence is derived from this count.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_tickets_on(conn: &mut SqliteConnection, date: &str) -> Result<i64, PersistenceError> {
    tickets::table
        .filter(tickets::requested_on.eq(date))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_tickets_on: {e}")))
}

/// Computes a ticket's 1-based position among same-day waiting tickets.
///
/// Counts `en_cola` tickets with `requested_at` at or before this
/// ticket's, on this ticket's calendar day. The ticket itself is counted
/// while it is still waiting; once called, the result is the number of
/// still-waiting tickets that arrived before it.
///
/// # Errors
///
/// Returns `TicketNotFound` if the ticket does not exist, or an error if
/// the database query fails.
pub fn queue_position(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<i64, PersistenceError> {
    let ticket =
        get_ticket(conn, ticket_id)?.ok_or(PersistenceError::TicketNotFound(ticket_id))?;

    tickets::table
        .filter(tickets::state.eq(TicketState::EnCola.as_str()))
        .filter(tickets::requested_on.eq(&ticket.requested_on))
        .filter(tickets::requested_at.le(&ticket.requested_at))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("queue_position: {e}")))
}

/// Counts waiting (`en_cola`) tickets for one procedure type.
///
/// Feeds the wait projection: subqueue depth times estimated duration.
/// Deliberately not day-scoped, preserving the source behavior the
/// projection documents as approximate.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_waiting_for_procedure(
    conn: &mut SqliteConnection,
    procedure_type_id: i64,
) -> Result<i64, PersistenceError> {
    tickets::table
        .filter(tickets::procedure_type_id.eq(procedure_type_id))
        .filter(tickets::state.eq(TicketState::EnCola.as_str()))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_waiting_for_procedure: {e}")))
}

/// Lists the queue for a calendar date: `en_cola` and `atendiendo`
/// tickets joined with student display fields and procedure name,
/// oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_queue(
    conn: &mut SqliteConnection,
    date: &str,
) -> Result<Vec<QueueEntry>, PersistenceError> {
    let rows: Vec<(TicketRow, String, String, String)> = tickets::table
        .inner_join(students::table)
        .inner_join(procedure_types::table)
        .filter(tickets::state.eq_any(ACTIVE_STATES))
        .filter(tickets::requested_on.eq(date))
        .order((tickets::requested_at.asc(), tickets::ticket_id.asc()))
        .select((
            TicketRow::as_select(),
            students::name,
            students::email,
            procedure_types::name,
        ))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_queue: {e}")))?;

    rows.into_iter()
        .map(|(row, student_name, student_email, procedure_name)| {
            Ok(QueueEntry {
                ticket: row.into_domain()?,
                student_name,
                student_email,
                procedure_name,
            })
        })
        .collect()
}

/// Lists a student's tickets, newest first, optionally filtered by state.
///
/// This is the history view; terminal tickets are retained forever.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tickets_for_student(
    conn: &mut SqliteConnection,
    student_id: i64,
    state: Option<TicketState>,
) -> Result<Vec<Ticket>, PersistenceError> {
    let mut query = tickets::table
        .filter(tickets::student_id.eq(student_id))
        .select(TicketRow::as_select())
        .into_boxed();

    if let Some(state) = state {
        query = query.filter(tickets::state.eq(state.as_str()));
    }

    let rows: Vec<TicketRow> = query
        .order((tickets::requested_at.desc(), tickets::ticket_id.desc()))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_tickets_for_student: {e}")))?;

    rows.into_iter().map(TicketRow::into_domain).collect()
}
