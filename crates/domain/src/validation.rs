// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Input validation for collaborator and ticket fields.
//!
//! Validation happens before anything touches the store; rejected input
//! never produces a row.

use crate::error::DomainError;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Maximum stored length for free-text notes.
pub const MAX_NOTES_LEN: usize = 500;

const MAX_NAME_LEN: usize = 120;
const MAX_EMAIL_LEN: usize = 254;
const MAX_DURATION_MINUTES: i32 = 480;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Validates a student display name.
///
/// # Errors
///
/// Returns an error if the name is empty or too long.
pub fn validate_student_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidStudentName(
            "name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidStudentName(format!(
            "name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates a student email address.
///
/// Intentionally shallow: presence of a local part and domain is enough
/// for a display/contact field at this boundary.
///
/// # Errors
///
/// Returns an error if the email is empty, too long, or malformed.
pub fn validate_student_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidStudentEmail(
            "email must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_EMAIL_LEN {
        return Err(DomainError::InvalidStudentEmail(format!(
            "email must not exceed {MAX_EMAIL_LEN} characters"
        )));
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::InvalidStudentEmail(format!(
            "'{trimmed}' is not a valid email address"
        ))),
    }
}

/// Validates a procedure type name.
///
/// # Errors
///
/// Returns an error if the name is empty or too long.
pub fn validate_procedure_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidProcedureName(
            "name must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidProcedureName(format!(
            "name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates an estimated procedure duration in minutes.
///
/// # Errors
///
/// Returns an error unless `0 < minutes <= 480`.
pub const fn validate_duration_minutes(minutes: i32) -> Result<(), DomainError> {
    if minutes < 1 || minutes > MAX_DURATION_MINUTES {
        return Err(DomainError::InvalidDuration { minutes });
    }
    Ok(())
}

/// Validates optional free-text notes.
///
/// # Errors
///
/// Returns an error if the notes exceed the maximum stored length.
pub fn validate_notes(notes: Option<&str>) -> Result<(), DomainError> {
    if let Some(text) = notes
        && text.len() > MAX_NOTES_LEN
    {
        return Err(DomainError::InvalidNotes(format!(
            "notes must not exceed {MAX_NOTES_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates a queue date filter (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the string is not a valid calendar date.
pub fn validate_queue_date(date: &str) -> Result<(), DomainError> {
    Date::parse(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| DomainError::InvalidDate(format!("'{date}' is not a valid YYYY-MM-DD date")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_name_rejects_empty() {
        assert!(validate_student_name("").is_err());
        assert!(validate_student_name("   ").is_err());
        assert!(validate_student_name("Ana Morales").is_ok());
    }

    #[test]
    fn test_student_name_rejects_overlong() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_student_name(&name).is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_student_email("ana@uni.edu").is_ok());
        assert!(validate_student_email("").is_err());
        assert!(validate_student_email("no-at-sign").is_err());
        assert!(validate_student_email("@uni.edu").is_err());
        assert!(validate_student_email("ana@").is_err());
    }

    #[test]
    fn test_duration_bounds() {
        assert!(validate_duration_minutes(1).is_ok());
        assert!(validate_duration_minutes(480).is_ok());
        assert!(validate_duration_minutes(0).is_err());
        assert!(validate_duration_minutes(-5).is_err());
        assert!(validate_duration_minutes(481).is_err());
    }

    #[test]
    fn test_notes_length() {
        assert!(validate_notes(None).is_ok());
        assert!(validate_notes(Some("breve")).is_ok());
        let long = "x".repeat(MAX_NOTES_LEN + 1);
        assert!(validate_notes(Some(&long)).is_err());
    }

    #[test]
    fn test_queue_date() {
        assert!(validate_queue_date("2025-06-14").is_ok());
        assert!(validate_queue_date("2025-13-01").is_err());
        assert!(validate_queue_date("14/06/2025").is_err());
        assert!(validate_queue_date("today").is_err());
    }
}
