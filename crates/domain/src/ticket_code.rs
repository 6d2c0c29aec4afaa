// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket display code formatting.
//!
//! Codes are human-scannable and unique per calendar day:
//! `T` + two-digit year + month + day + zero-padded daily sequence
//! (e.g. `T250614007` for the seventh ticket of 2025-06-14).

use crate::error::DomainError;
use time::Date;

/// Length of every ticket code. Display fields reserve exactly this much.
pub const TICKET_CODE_LEN: usize = 10;

/// Highest daily sequence a code can encode in three digits.
///
/// The 1000th ticket of a day is rejected rather than widening the code.
pub const MAX_DAILY_SEQUENCE: i64 = 999;

/// Formats the ticket code for the given day and daily sequence.
///
/// # Errors
///
/// Returns `DomainError::DailySequenceExhausted` if `sequence` is outside
/// `1..=MAX_DAILY_SEQUENCE`.
pub fn format_ticket_code(day: Date, sequence: i64) -> Result<String, DomainError> {
    if !(1..=MAX_DAILY_SEQUENCE).contains(&sequence) {
        return Err(DomainError::DailySequenceExhausted { sequence });
    }

    let code = format!(
        "T{:02}{:02}{:02}{:03}",
        day.year().rem_euclid(100),
        u8::from(day.month()),
        day.day(),
        sequence
    );

    debug_assert_eq!(code.len(), TICKET_CODE_LEN);
    Ok(code)
}
