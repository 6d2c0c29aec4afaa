// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student and procedure catalog queries.
//!
//! These back the external-collaborator checks of the admission
//! controller: student existence and procedure existence/activity.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{ProcedureTypeRow, StudentRow};
use crate::diesel_schema::{procedure_types, students};
use crate::error::PersistenceError;
use turnero_domain::{ProcedureType, Student};

/// Retrieves a student by ID.
///
/// Returns `Ok(None)` if the student does not exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_student(
    conn: &mut SqliteConnection,
    student_id: i64,
) -> Result<Option<Student>, PersistenceError> {
    let row: Option<StudentRow> = students::table
        .filter(students::student_id.eq(student_id))
        .select(StudentRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_student: {e}")))?;

    Ok(row.map(StudentRow::into_domain))
}

/// Retrieves a procedure type by ID.
///
/// Returns `Ok(None)` if the procedure type does not exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_procedure_type(
    conn: &mut SqliteConnection,
    procedure_type_id: i64,
) -> Result<Option<ProcedureType>, PersistenceError> {
    let row: Option<ProcedureTypeRow> = procedure_types::table
        .filter(procedure_types::procedure_type_id.eq(procedure_type_id))
        .select(ProcedureTypeRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_procedure_type: {e}")))?;

    row.map(ProcedureTypeRow::into_domain).transpose()
}

/// Lists all procedure types that have not been deleted from the catalog.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_procedure_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<ProcedureType>, PersistenceError> {
    let rows: Vec<ProcedureTypeRow> = procedure_types::table
        .filter(procedure_types::status.ne("deleted"))
        .order(procedure_types::name.asc())
        .select(ProcedureTypeRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_procedure_types: {e}")))?;

    rows.into_iter()
        .map(ProcedureTypeRow::into_domain)
        .collect()
}
