// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row models and conversions to domain types.

use std::str::FromStr;

use diesel::prelude::*;

use crate::diesel_schema::{procedure_types, students, tickets};
use crate::error::PersistenceError;
use turnero_domain::{ProcedureStatus, ProcedureType, Student, Ticket, TicketState};

/// Diesel Queryable struct for ticket rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub(crate) struct TicketRow {
    pub ticket_id: i64,
    pub code: String,
    pub student_id: i64,
    pub procedure_type_id: i64,
    pub state: String,
    pub requested_at: String,
    pub requested_on: String,
    pub service_started_at: Option<String>,
    pub service_ended_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TicketRow {
    /// Converts a stored row into the domain ticket.
    ///
    /// A state string the enum cannot parse means the row was written
    /// outside this core; surfaced as a query failure rather than a panic.
    pub fn into_domain(self) -> Result<Ticket, PersistenceError> {
        let state = TicketState::from_str(&self.state).map_err(|e| {
            PersistenceError::QueryFailed(format!("ticket {} has {e}", self.ticket_id))
        })?;
        Ok(Ticket {
            ticket_id: self.ticket_id,
            code: self.code,
            student_id: self.student_id,
            procedure_type_id: self.procedure_type_id,
            state,
            requested_at: self.requested_at,
            requested_on: self.requested_on,
            service_started_at: self.service_started_at,
            service_ended_at: self.service_ended_at,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Diesel Insertable struct for new ticket rows.
#[derive(Debug, Insertable)]
#[diesel(table_name = tickets)]
pub(crate) struct NewTicketRow {
    pub code: String,
    pub student_id: i64,
    pub procedure_type_id: i64,
    pub state: String,
    pub requested_at: String,
    pub requested_on: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Insertable struct for new student rows.
#[derive(Debug, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow {
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Diesel Queryable struct for student rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
pub(crate) struct StudentRow {
    pub student_id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl StudentRow {
    pub fn into_domain(self) -> Student {
        Student {
            student_id: self.student_id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

/// Diesel Insertable struct for new procedure type rows.
#[derive(Debug, Insertable)]
#[diesel(table_name = procedure_types)]
pub(crate) struct NewProcedureTypeRow {
    pub name: String,
    pub estimated_duration_minutes: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Queryable struct for procedure type rows.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = procedure_types)]
pub(crate) struct ProcedureTypeRow {
    pub procedure_type_id: i64,
    pub name: String,
    pub estimated_duration_minutes: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ProcedureTypeRow {
    pub fn into_domain(self) -> Result<ProcedureType, PersistenceError> {
        let status = ProcedureStatus::from_str(&self.status).map_err(|e| {
            PersistenceError::QueryFailed(format!(
                "procedure type {} has {e}",
                self.procedure_type_id
            ))
        })?;
        Ok(ProcedureType {
            procedure_type_id: self.procedure_type_id,
            name: self.name,
            estimated_duration_minutes: self.estimated_duration_minutes,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A queue view entry: the ticket joined with the display fields the
/// staff panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub ticket: Ticket,
    pub student_name: String,
    pub student_email: String,
    pub procedure_name: String,
}
