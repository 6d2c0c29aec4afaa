// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Turnero queue management system.
//!
//! This crate owns the durable ticket, student, and procedure catalog
//! state. It is built on Diesel over `SQLite`; the database is the only
//! source of truth for the queue, which exists purely as an ordering
//! over ticket rows.
//!
//! ## Concurrency
//!
//! Mutations that read before they write (admission, call-next, state
//! transitions) run inside `BEGIN IMMEDIATE` transactions. The write
//! lock is acquired before the first read and held until commit, so
//! concurrent writers serialize rather than race. File-based databases
//! additionally run in WAL mode so readers stay unblocked, with a
//! bounded busy timeout; expiry surfaces as
//! [`PersistenceError::LockContention`], which callers treat as
//! transient.
//!
//! ## Testing
//!
//! Standard tests run against uniquely-named shared in-memory
//! databases, so every test gets an isolated schema with no filesystem
//! dependency. Cross-connection contention tests use a temporary
//! database file instead, since the write lock only contends between
//! distinct connections.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;

use turnero_domain::{ProcedureStatus, ProcedureType, Student, Ticket, TicketState};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::QueueEntry;
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID,
/// eliminating time-based collisions between tests.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the ticket, student, and procedure tables.
///
/// Owns a single `SQLite` connection. Callers that need concurrent
/// access hold this behind their own synchronization; the write-lock
/// guarantees apply across adapters opened on the same database file.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique shared-cache database instance via
    /// an atomic counter, ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_turnero_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// Enables WAL mode so queue reads are not blocked while an
    /// admission or call-next transaction holds the write lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Students & Procedure Catalog
    // ========================================================================

    /// Registers a student.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is already registered, or
    /// an error if persistence fails.
    pub fn create_student(
        &mut self,
        name: &str,
        email: &str,
    ) -> Result<Student, PersistenceError> {
        mutations::catalog::create_student(&mut self.conn, name, email)
    }

    /// Retrieves a student by ID. Returns `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_student(&mut self, student_id: i64) -> Result<Option<Student>, PersistenceError> {
        queries::catalog::get_student(&mut self.conn, student_id)
    }

    /// Adds a procedure type to the catalog, initially `active`.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_procedure_type(
        &mut self,
        name: &str,
        estimated_duration_minutes: i32,
    ) -> Result<ProcedureType, PersistenceError> {
        mutations::catalog::create_procedure_type(&mut self.conn, name, estimated_duration_minutes)
    }

    /// Retrieves a procedure type by ID. Returns `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_procedure_type(
        &mut self,
        procedure_type_id: i64,
    ) -> Result<Option<ProcedureType>, PersistenceError> {
        queries::catalog::get_procedure_type(&mut self.conn, procedure_type_id)
    }

    /// Lists all non-deleted procedure types, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_procedure_types(&mut self) -> Result<Vec<ProcedureType>, PersistenceError> {
        queries::catalog::list_procedure_types(&mut self.conn)
    }

    /// Changes a procedure type's catalog status.
    ///
    /// # Errors
    ///
    /// Returns `ProcedureTypeNotFound` if absent, or an error if
    /// persistence fails.
    pub fn set_procedure_status(
        &mut self,
        procedure_type_id: i64,
        status: ProcedureStatus,
    ) -> Result<ProcedureType, PersistenceError> {
        mutations::catalog::set_procedure_status(&mut self.conn, procedure_type_id, status)
    }

    // ========================================================================
    // Ticket Admission & Lifecycle
    // ========================================================================

    /// Admits a student into the queue, assigning a same-day code.
    ///
    /// # Errors
    ///
    /// Returns `ActiveTicketExists` carrying the blocking ticket if the
    /// student already holds one, or an error if persistence fails.
    pub fn request_ticket(
        &mut self,
        student_id: i64,
        procedure_type_id: i64,
        notes: Option<&str>,
    ) -> Result<Ticket, PersistenceError> {
        mutations::tickets::insert_ticket(&mut self.conn, student_id, procedure_type_id, notes)
    }

    /// Atomically calls the next waiting ticket of the current day.
    ///
    /// Returns `Ok(None)` when the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn call_next(&mut self) -> Result<Option<Ticket>, PersistenceError> {
        mutations::tickets::call_next(&mut self.conn)
    }

    /// Applies a lifecycle transition to a ticket.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket does not exist,
    /// `DomainViolation` if the lifecycle forbids the transition, or an
    /// error if persistence fails.
    pub fn transition_ticket(
        &mut self,
        ticket_id: i64,
        new_state: TicketState,
        notes: Option<&str>,
    ) -> Result<Ticket, PersistenceError> {
        mutations::tickets::apply_transition(&mut self.conn, ticket_id, new_state, notes)
    }

    // ========================================================================
    // Queue & Ticket Queries
    // ========================================================================

    /// Retrieves a ticket by ID. Returns `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_ticket(&mut self, ticket_id: i64) -> Result<Option<Ticket>, PersistenceError> {
        queries::tickets::get_ticket(&mut self.conn, ticket_id)
    }

    /// Finds the student's active ticket, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_active_ticket(
        &mut self,
        student_id: i64,
    ) -> Result<Option<Ticket>, PersistenceError> {
        queries::tickets::find_active_ticket(&mut self.conn, student_id)
    }

    /// Computes a ticket's 1-based position among same-day waiting
    /// tickets.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` if the ticket does not exist, or an
    /// error if the query fails.
    pub fn queue_position(&mut self, ticket_id: i64) -> Result<i64, PersistenceError> {
        queries::tickets::queue_position(&mut self.conn, ticket_id)
    }

    /// Counts waiting tickets for one procedure type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_waiting_for_procedure(
        &mut self,
        procedure_type_id: i64,
    ) -> Result<i64, PersistenceError> {
        queries::tickets::count_waiting_for_procedure(&mut self.conn, procedure_type_id)
    }

    /// Lists the active queue for a calendar date (`YYYY-MM-DD`),
    /// oldest first, joined with student and procedure display fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_queue(&mut self, date: &str) -> Result<Vec<QueueEntry>, PersistenceError> {
        queries::tickets::list_queue(&mut self.conn, date)
    }

    /// Lists a student's tickets, newest first, optionally filtered by
    /// state.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tickets_for_student(
        &mut self,
        student_id: i64,
        state: Option<TicketState>,
    ) -> Result<Vec<Ticket>, PersistenceError> {
        queries::tickets::list_tickets_for_student(&mut self.conn, student_id, state)
    }
}
