// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod ticket_flow_tests;

use crate::request_response::{
    CreateProcedureTypeRequest, ProcedureTypeInfo, RegisterStudentRequest, RequestTicketRequest,
    StudentInfo,
};
use crate::{create_procedure_type, register_student};
use turnero_persistence::Persistence;

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn seed_student(persistence: &mut Persistence, name: &str, email: &str) -> StudentInfo {
    register_student(
        persistence,
        &RegisterStudentRequest {
            name: name.to_string(),
            email: email.to_string(),
        },
    )
    .expect("student registered")
}

pub fn seed_procedure(persistence: &mut Persistence, name: &str, minutes: i32) -> ProcedureTypeInfo {
    create_procedure_type(
        persistence,
        &CreateProcedureTypeRequest {
            name: name.to_string(),
            estimated_duration_minutes: minutes,
        },
    )
    .expect("procedure type created")
}

pub fn admission_request(student_id: i64, procedure_type_id: i64) -> RequestTicketRequest {
    RequestTicketRequest {
        student_id,
        procedure_type_id,
        notes: None,
    }
}
