// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end handler tests for the ticket lifecycle: admission,
//! call-next, transitions, positions, and the wait projection.

use super::{admission_request, seed_procedure, seed_student, test_persistence};
use crate::error::ApiError;
use crate::request_response::UpdateTicketStatusRequest;
use crate::{
    call_next, cancel_ticket, current_ticket, finish_ticket, get_ticket_status, list_queue,
    list_student_tickets, mark_absent, queue_position, request_ticket, update_ticket_status,
    wait_estimate,
};

#[test]
fn admission_conflict_carries_the_blocking_ticket() {
    let mut persistence = test_persistence();
    let student = seed_student(&mut persistence, "Ana", "ana@uni.edu");
    let procedure = seed_procedure(&mut persistence, "Kardex", 5);

    let first = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect("first admission");

    let err = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect_err("second admission");

    match err {
        ApiError::ActiveTicketConflict { ticket } => {
            assert_eq!(ticket.ticket_id, first.ticket_id);
            assert_eq!(ticket.code, first.code);
            assert_eq!(ticket.state, "en_cola");
        }
        other => panic!("expected ActiveTicketConflict, got {other:?}"),
    }
}

#[test]
fn call_next_returns_none_on_empty_queue() {
    let mut persistence = test_persistence();
    assert!(call_next(&mut persistence).expect("call next").is_none());
}

#[test]
fn full_lifecycle_request_call_finish() {
    let mut persistence = test_persistence();
    let student = seed_student(&mut persistence, "Ana", "ana@uni.edu");
    let procedure = seed_procedure(&mut persistence, "Constancia", 10);

    let admitted = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect("admission");
    assert_eq!(admitted.state, "en_cola");

    let called = call_next(&mut persistence)
        .expect("call next")
        .expect("queue not empty");
    assert_eq!(called.ticket_id, admitted.ticket_id);
    assert_eq!(called.state, "atendiendo");

    let finished = finish_ticket(&mut persistence, called.ticket_id, Some("entregado"))
        .expect("finish");
    assert_eq!(finished.state, "atendido");
    assert!(finished.service_ended_at.is_some());
    assert_eq!(finished.notes.as_deref(), Some("entregado"));

    // The slot frees up once the ticket is terminal.
    assert!(
        current_ticket(&mut persistence, student.student_id)
            .expect("current ticket")
            .is_none()
    );
}

#[test]
fn finishing_a_finished_ticket_is_an_invalid_transition() {
    let mut persistence = test_persistence();
    let student = seed_student(&mut persistence, "Ana", "ana@uni.edu");
    let procedure = seed_procedure(&mut persistence, "Kardex", 5);
    let ticket = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect("admission");

    finish_ticket(&mut persistence, ticket.ticket_id, None).expect("finish");
    let err = finish_ticket(&mut persistence, ticket.ticket_id, None).expect_err("repeat finish");
    assert!(matches!(err, ApiError::InvalidTransition { .. }));
}

#[test]
fn cancel_and_absent_report_unknown_tickets() {
    let mut persistence = test_persistence();
    let err = cancel_ticket(&mut persistence, 777, None).expect_err("unknown ticket");
    assert!(matches!(
        err,
        ApiError::ResourceNotFound { resource_type, .. } if resource_type == "Ticket"
    ));
    let err = mark_absent(&mut persistence, 777, None).expect_err("unknown ticket");
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn generic_transition_honors_the_lifecycle_table() {
    let mut persistence = test_persistence();
    let student = seed_student(&mut persistence, "Ana", "ana@uni.edu");
    let procedure = seed_procedure(&mut persistence, "Kardex", 5);
    let ticket = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect("admission");

    let updated = update_ticket_status(
        &mut persistence,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            state: String::from("atendiendo"),
            notes: None,
        },
    )
    .expect("move to atendiendo");
    assert_eq!(updated.state, "atendiendo");
    assert!(updated.service_started_at.is_some());

    // Backwards into the queue is never legal.
    let err = update_ticket_status(
        &mut persistence,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            state: String::from("en_cola"),
            notes: None,
        },
    )
    .expect_err("re-queue");
    assert!(matches!(err, ApiError::InvalidTransition { .. }));

    let err = update_ticket_status(
        &mut persistence,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            state: String::from("bogus"),
            notes: None,
        },
    )
    .expect_err("unknown state");
    assert!(matches!(
        err,
        ApiError::InvalidInput { field, .. } if field == "state"
    ));
}

#[test]
fn queue_position_is_none_once_called() {
    let mut persistence = test_persistence();
    let procedure = seed_procedure(&mut persistence, "Kardex", 5);
    let ana = seed_student(&mut persistence, "Ana", "ana@uni.edu");
    let luis = seed_student(&mut persistence, "Luis", "luis@uni.edu");

    let first = request_ticket(
        &mut persistence,
        &admission_request(ana.student_id, procedure.procedure_type_id),
    )
    .expect("admission");
    let second = request_ticket(
        &mut persistence,
        &admission_request(luis.student_id, procedure.procedure_type_id),
    )
    .expect("admission");

    let pos = queue_position(&mut persistence, second.ticket_id).expect("position");
    assert_eq!(pos.position, Some(2));

    call_next(&mut persistence).expect("call next");

    let pos = queue_position(&mut persistence, first.ticket_id).expect("position");
    assert_eq!(pos.state, "atendiendo");
    assert_eq!(pos.position, None);

    let pos = queue_position(&mut persistence, second.ticket_id).expect("position");
    assert_eq!(pos.position, Some(1));
}

#[test]
fn wait_estimate_multiplies_depth_by_duration() {
    let mut persistence = test_persistence();
    let procedure = seed_procedure(&mut persistence, "Titulacion", 30);
    for (name, email) in [("Ana", "ana@uni.edu"), ("Luis", "luis@uni.edu")] {
        let student = seed_student(&mut persistence, name, email);
        request_ticket(
            &mut persistence,
            &admission_request(student.student_id, procedure.procedure_type_id),
        )
        .expect("admission");
    }

    let estimate = wait_estimate(&mut persistence, procedure.procedure_type_id).expect("estimate");
    assert_eq!(estimate.waiting_count, 2);
    assert_eq!(estimate.estimated_duration_minutes, 30);
    assert_eq!(estimate.estimated_wait_minutes, 60);

    let err = wait_estimate(&mut persistence, 999).expect_err("unknown procedure");
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn queue_listing_defaults_to_today() {
    let mut persistence = test_persistence();
    let procedure = seed_procedure(&mut persistence, "Kardex", 5);
    let student = seed_student(&mut persistence, "Ana", "ana@uni.edu");
    let ticket = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect("admission");

    let entries = list_queue(&mut persistence, None).expect("queue");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].ticket.ticket_id, ticket.ticket_id);
    assert_eq!(entries[0].student_name, "Ana");
    assert_eq!(entries[0].procedure_name, "Kardex");

    let entries = list_queue(&mut persistence, Some("1999-01-01")).expect("queue");
    assert!(entries.is_empty());
}

#[test]
fn student_history_tracks_the_whole_lifecycle() {
    let mut persistence = test_persistence();
    let procedure = seed_procedure(&mut persistence, "Kardex", 5);
    let student = seed_student(&mut persistence, "Ana", "ana@uni.edu");

    let first = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect("admission");
    cancel_ticket(&mut persistence, first.ticket_id, None).expect("cancel");

    let second = request_ticket(
        &mut persistence,
        &admission_request(student.student_id, procedure.procedure_type_id),
    )
    .expect("re-admission");

    let all = list_student_tickets(&mut persistence, student.student_id, None).expect("history");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].ticket_id, second.ticket_id);

    let cancelled =
        list_student_tickets(&mut persistence, student.student_id, Some("cancelado"))
            .expect("filtered");
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].ticket_id, first.ticket_id);

    let status = get_ticket_status(&mut persistence, first.ticket_id).expect("status");
    assert_eq!(status.state, "cancelado");
}
