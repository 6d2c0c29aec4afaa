// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod clock;
mod error;
mod estimate;
mod ticket_code;
mod ticket_state;
mod types;
mod validation;

pub use clock::{format_date, format_timestamp, now_date, now_timestamp};
pub use error::DomainError;
pub use estimate::estimated_wait_minutes;
pub use ticket_code::{MAX_DAILY_SEQUENCE, TICKET_CODE_LEN, format_ticket_code};
pub use ticket_state::TicketState;
pub use types::{ProcedureStatus, ProcedureType, Student, Ticket};
pub use validation::{
    MAX_NOTES_LEN, validate_duration_minutes, validate_notes, validate_procedure_name,
    validate_queue_date, validate_student_email, validate_student_name,
};
