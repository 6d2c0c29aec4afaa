// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket lifecycle mutations: admission, call-next, and state
//! transitions.
//!
//! All three read current state before writing, so each runs inside an
//! immediate transaction. The write lock is taken up front and held
//! until commit, which makes check-then-insert and select-then-update
//! atomic across connections.

use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::{NewTicketRow, TicketRow};
use crate::diesel_schema::tickets;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;
use turnero_domain::{
    Ticket, TicketState, format_date, format_ticket_code, format_timestamp,
};

/// Admits a student into the queue.
///
/// Inside one immediate transaction: rejects if the student already
/// holds an active ticket, assigns the next same-day code, and inserts
/// the ticket as `en_cola`. The active-ticket check and the insert are
/// covered by the same write lock, so two concurrent admissions for the
/// same student cannot both succeed.
///
/// # Errors
///
/// Returns `ActiveTicketExists` carrying the blocking ticket,
/// `DomainViolation` if the daily code sequence is exhausted, or an
/// error if the database operation fails.
pub fn insert_ticket(
    conn: &mut SqliteConnection,
    student_id: i64,
    procedure_type_id: i64,
    notes: Option<&str>,
) -> Result<Ticket, PersistenceError> {
    conn.immediate_transaction(|conn| {
        if let Some(existing) = queries::tickets::find_active_ticket(conn, student_id)? {
            return Err(PersistenceError::ActiveTicketExists {
                ticket: Box::new(existing),
            });
        }

        let moment = OffsetDateTime::now_utc();
        let now = format_timestamp(moment);
        let today = format_date(moment);

        let sequence = queries::tickets::count_tickets_on(conn, &today)? + 1;
        let row = NewTicketRow {
            code: format_ticket_code(moment.date(), sequence)?,
            student_id,
            procedure_type_id,
            state: TicketState::EnCola.as_str().to_string(),
            requested_at: now.clone(),
            requested_on: today.clone(),
            notes: notes.map(ToString::to_string),
            created_at: now.clone(),
            updated_at: now,
        };

        match diesel::insert_into(tickets::table).values(&row).execute(conn) {
            Ok(_) => {}
            // A code collision means a row landed outside this write path
            // (e.g. a second process before the lock was taken). Recompute
            // the sequence once; a second collision is a real error.
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                let sequence = queries::tickets::count_tickets_on(conn, &today)? + 1;
                let retry = NewTicketRow {
                    code: format_ticket_code(moment.date(), sequence)?,
                    ..row
                };
                diesel::insert_into(tickets::table)
                    .values(&retry)
                    .execute(conn)?;
            }
            Err(e) => return Err(e.into()),
        }

        let ticket_id = get_last_insert_rowid(conn)?;
        debug!(ticket_id, student_id, "admitted ticket into queue");

        queries::tickets::get_ticket(conn, ticket_id)?
            .ok_or(PersistenceError::TicketNotFound(ticket_id))
    })
}

/// Calls the next waiting ticket of the current calendar day.
///
/// Selects the oldest same-day `en_cola` ticket and moves it to
/// `atendiendo`, stamping `service_started_at`. Select and update share
/// one immediate transaction, so two concurrent staff members never
/// receive the same ticket.
///
/// Returns `Ok(None)` when no ticket is waiting today.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn call_next(conn: &mut SqliteConnection) -> Result<Option<Ticket>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let moment = OffsetDateTime::now_utc();
        let today = format_date(moment);

        let head: Option<TicketRow> = tickets::table
            .filter(tickets::state.eq(TicketState::EnCola.as_str()))
            .filter(tickets::requested_on.eq(&today))
            .order((tickets::requested_at.asc(), tickets::ticket_id.asc()))
            .select(TicketRow::as_select())
            .first(conn)
            .optional()
            .map_err(|e| PersistenceError::QueryFailed(format!("call_next: {e}")))?;

        let Some(row) = head else {
            return Ok(None);
        };

        let now = format_timestamp(moment);
        diesel::update(tickets::table.filter(tickets::ticket_id.eq(row.ticket_id)))
            .set((
                tickets::state.eq(TicketState::Atendiendo.as_str()),
                tickets::service_started_at.eq(&now),
                tickets::updated_at.eq(&now),
            ))
            .execute(conn)?;

        debug!(ticket_id = row.ticket_id, code = %row.code, "called next ticket");

        let ticket = queries::tickets::get_ticket(conn, row.ticket_id)?
            .ok_or(PersistenceError::TicketNotFound(row.ticket_id))?;
        Ok(Some(ticket))
    })
}

/// Applies a state transition to a ticket.
///
/// Validates the transition against the lifecycle rules, stamps service
/// timestamps where the new state requires them, and merges notes.
/// `service_started_at` is set on entering `atendiendo` or `atendido`
/// only if not already set; `service_ended_at` is set on `atendido`.
/// Notes passed here replace the stored notes; `None` keeps them.
///
/// # Errors
///
/// Returns `TicketNotFound` if the ticket does not exist,
/// `DomainViolation` if the lifecycle forbids the transition, or an
/// error if the database operation fails.
pub fn apply_transition(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    new_state: TicketState,
    notes: Option<&str>,
) -> Result<Ticket, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let row: TicketRow = tickets::table
            .filter(tickets::ticket_id.eq(ticket_id))
            .select(TicketRow::as_select())
            .first(conn)
            .optional()
            .map_err(|e| PersistenceError::QueryFailed(format!("apply_transition: {e}")))?
            .ok_or(PersistenceError::TicketNotFound(ticket_id))?;

        let current = TicketState::from_str(&row.state).map_err(|e| {
            PersistenceError::QueryFailed(format!("ticket {ticket_id} has {e}"))
        })?;
        current.validate_transition(new_state)?;

        let now = format_timestamp(OffsetDateTime::now_utc());

        let started = match new_state {
            TicketState::Atendiendo | TicketState::Atendido => {
                row.service_started_at.clone().or_else(|| Some(now.clone()))
            }
            _ => row.service_started_at.clone(),
        };
        let ended = if new_state == TicketState::Atendido {
            Some(now.clone())
        } else {
            row.service_ended_at.clone()
        };
        let merged_notes = notes.map(ToString::to_string).or_else(|| row.notes.clone());

        diesel::update(tickets::table.filter(tickets::ticket_id.eq(ticket_id)))
            .set((
                tickets::state.eq(new_state.as_str()),
                tickets::service_started_at.eq(started),
                tickets::service_ended_at.eq(ended),
                tickets::notes.eq(merged_notes),
                tickets::updated_at.eq(&now),
            ))
            .execute(conn)?;

        debug!(ticket_id, from = current.as_str(), to = new_state.as_str(), "ticket transition");

        queries::tickets::get_ticket(conn, ticket_id)?
            .ok_or(PersistenceError::TicketNotFound(ticket_id))
    })
}
