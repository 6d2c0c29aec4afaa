// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Turnero queue management system.
//!
//! This crate sits between the HTTP server and the persistence layer.
//! It owns the request/response contract, validates input before it
//! reaches the store, and translates domain and persistence errors into
//! the API error taxonomy. Handlers are transport-agnostic free
//! functions; the server crate maps them onto routes and status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    call_next, cancel_ticket, create_procedure_type, current_ticket, finish_ticket,
    get_ticket_status, list_procedure_types, list_queue, list_student_tickets, mark_absent,
    queue_position, register_student, request_ticket, set_procedure_status, update_ticket_status,
    wait_estimate,
};
pub use request_response::{
    CreateProcedureTypeRequest, ProcedureTypeInfo, QueueEntryInfo, QueuePositionResponse,
    RegisterStudentRequest, RequestTicketRequest, SetProcedureStatusRequest, StudentInfo,
    TicketInfo, TransitionTicketRequest, UpdateTicketStatusRequest, WaitEstimateResponse,
};
