// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket lifecycle tests: finish, cancel, and mark-absent
//! transitions, service timestamps, and terminal-state immutability.

use super::{seed_basic, test_persistence};
use crate::{Persistence, PersistenceError};
use turnero_domain::{DomainError, Ticket, TicketState};

fn admit_one(persistence: &mut Persistence) -> Ticket {
    let (student, procedure) = seed_basic(persistence);
    persistence
        .request_ticket(student.student_id, procedure.procedure_type_id, None)
        .expect("admission")
}

#[test]
fn finish_after_serving_sets_end_and_keeps_start() {
    let mut persistence = test_persistence();
    admit_one(&mut persistence);
    let called = persistence
        .call_next()
        .expect("call next")
        .expect("queue not empty");
    let started = called.service_started_at.clone().expect("started stamp");

    let finished = persistence
        .transition_ticket(called.ticket_id, TicketState::Atendido, None)
        .expect("finish");

    assert_eq!(finished.state, TicketState::Atendido);
    assert_eq!(finished.service_started_at.as_deref(), Some(started.as_str()));
    let ended = finished.service_ended_at.expect("ended stamp");
    assert!(ended >= started);
}

#[test]
fn finish_directly_from_queue_stamps_both_timestamps() {
    let mut persistence = test_persistence();
    let ticket = admit_one(&mut persistence);

    let finished = persistence
        .transition_ticket(ticket.ticket_id, TicketState::Atendido, None)
        .expect("finish from queue");

    assert_eq!(finished.state, TicketState::Atendido);
    assert!(finished.service_started_at.is_some());
    assert_eq!(finished.service_started_at, finished.service_ended_at);
}

#[test]
fn finishing_twice_is_rejected_and_state_is_unchanged() {
    let mut persistence = test_persistence();
    let ticket = admit_one(&mut persistence);
    let finished = persistence
        .transition_ticket(ticket.ticket_id, TicketState::Atendido, None)
        .expect("finish");

    let err = persistence
        .transition_ticket(ticket.ticket_id, TicketState::Atendido, None)
        .expect_err("repeat finish must fail");
    assert!(matches!(
        err,
        PersistenceError::DomainViolation(DomainError::InvalidStateTransition { .. })
    ));

    let reloaded = persistence
        .get_ticket(ticket.ticket_id)
        .expect("query")
        .expect("ticket exists");
    assert_eq!(reloaded.state, TicketState::Atendido);
    assert_eq!(reloaded.updated_at, finished.updated_at);
}

#[test]
fn cancel_from_queue_keeps_service_timestamps_null() {
    let mut persistence = test_persistence();
    let ticket = admit_one(&mut persistence);

    let cancelled = persistence
        .transition_ticket(ticket.ticket_id, TicketState::Cancelado, Some("ya no lo necesito"))
        .expect("cancel");

    assert_eq!(cancelled.state, TicketState::Cancelado);
    assert!(cancelled.service_started_at.is_none());
    assert!(cancelled.service_ended_at.is_none());
    assert_eq!(cancelled.notes.as_deref(), Some("ya no lo necesito"));
}

#[test]
fn mark_absent_while_being_served() {
    let mut persistence = test_persistence();
    admit_one(&mut persistence);
    let called = persistence
        .call_next()
        .expect("call next")
        .expect("queue not empty");

    let absent = persistence
        .transition_ticket(called.ticket_id, TicketState::Ausente, Some("no se presento"))
        .expect("mark absent");

    assert_eq!(absent.state, TicketState::Ausente);
    assert!(absent.service_started_at.is_some());
    assert!(absent.service_ended_at.is_none());
}

#[test]
fn tickets_never_return_to_the_queue() {
    let mut persistence = test_persistence();
    admit_one(&mut persistence);
    let called = persistence
        .call_next()
        .expect("call next")
        .expect("queue not empty");

    let err = persistence
        .transition_ticket(called.ticket_id, TicketState::EnCola, None)
        .expect_err("re-queue must fail");
    assert!(matches!(
        err,
        PersistenceError::DomainViolation(DomainError::InvalidStateTransition { .. })
    ));
}

#[test]
fn terminal_tickets_reject_every_transition() {
    let mut persistence = test_persistence();
    let ticket = admit_one(&mut persistence);
    persistence
        .transition_ticket(ticket.ticket_id, TicketState::Cancelado, None)
        .expect("cancel");

    for target in [
        TicketState::EnCola,
        TicketState::Atendiendo,
        TicketState::Atendido,
        TicketState::Ausente,
    ] {
        let err = persistence
            .transition_ticket(ticket.ticket_id, target, None)
            .expect_err("terminal ticket must be immutable");
        assert!(matches!(err, PersistenceError::DomainViolation(_)));
    }
}

#[test]
fn transition_on_unknown_ticket_is_not_found() {
    let mut persistence = test_persistence();
    let err = persistence
        .transition_ticket(4242, TicketState::Cancelado, None)
        .expect_err("unknown ticket");
    assert!(matches!(err, PersistenceError::TicketNotFound(4242)));
}

#[test]
fn transition_without_notes_keeps_admission_notes() {
    let mut persistence = test_persistence();
    let (student, procedure) = seed_basic(&mut persistence);
    let ticket = persistence
        .request_ticket(student.student_id, procedure.procedure_type_id, Some("tramite urgente"))
        .expect("admission");

    let finished = persistence
        .transition_ticket(ticket.ticket_id, TicketState::Atendido, None)
        .expect("finish");
    assert_eq!(finished.notes.as_deref(), Some("tramite urgente"));
}
