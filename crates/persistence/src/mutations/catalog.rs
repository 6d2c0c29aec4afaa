// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student and procedure catalog mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::{NewProcedureTypeRow, NewStudentRow};
use crate::diesel_schema::{procedure_types, students};
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;
use turnero_domain::{ProcedureStatus, ProcedureType, Student, format_timestamp};

/// Registers a student.
///
/// # Errors
///
/// Returns `DuplicateEmail` if a student with the same email already
/// exists, or an error if the database operation fails.
pub fn create_student(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
) -> Result<Student, PersistenceError> {
    let now = format_timestamp(OffsetDateTime::now_utc());
    let row = NewStudentRow {
        name: name.to_string(),
        email: email.to_string(),
        created_at: now,
    };

    match diesel::insert_into(students::table).values(&row).execute(conn) {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::DuplicateEmail(email.to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let student_id = get_last_insert_rowid(conn)?;
    debug!(student_id, "registered student");

    queries::catalog::get_student(conn, student_id)?
        .ok_or(PersistenceError::StudentNotFound(student_id))
}

/// Adds a procedure type to the catalog, initially `active`.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_procedure_type(
    conn: &mut SqliteConnection,
    name: &str,
    estimated_duration_minutes: i32,
) -> Result<ProcedureType, PersistenceError> {
    let now = format_timestamp(OffsetDateTime::now_utc());
    let row = NewProcedureTypeRow {
        name: name.to_string(),
        estimated_duration_minutes,
        status: ProcedureStatus::Active.as_str().to_string(),
        created_at: now.clone(),
        updated_at: now,
    };

    diesel::insert_into(procedure_types::table)
        .values(&row)
        .execute(conn)?;

    let procedure_type_id = get_last_insert_rowid(conn)?;
    debug!(procedure_type_id, "added procedure type");

    queries::catalog::get_procedure_type(conn, procedure_type_id)?
        .ok_or(PersistenceError::ProcedureTypeNotFound(procedure_type_id))
}

/// Changes a procedure type's catalog status.
///
/// Suspending or deleting a procedure never touches its existing
/// tickets; it only blocks new admissions.
///
/// # Errors
///
/// Returns `ProcedureTypeNotFound` if the procedure type does not
/// exist, or an error if the database operation fails.
pub fn set_procedure_status(
    conn: &mut SqliteConnection,
    procedure_type_id: i64,
    status: ProcedureStatus,
) -> Result<ProcedureType, PersistenceError> {
    let now = format_timestamp(OffsetDateTime::now_utc());

    let updated = diesel::update(
        procedure_types::table.filter(procedure_types::procedure_type_id.eq(procedure_type_id)),
    )
    .set((
        procedure_types::status.eq(status.as_str()),
        procedure_types::updated_at.eq(&now),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ProcedureTypeNotFound(procedure_type_id));
    }
    debug!(procedure_type_id, status = status.as_str(), "procedure status changed");

    queries::catalog::get_procedure_type(conn, procedure_type_id)?
        .ok_or(PersistenceError::ProcedureTypeNotFound(procedure_type_id))
}
