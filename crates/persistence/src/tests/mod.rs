// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod lifecycle_tests;

use crate::Persistence;
use turnero_domain::{ProcedureType, Student};

/// Creates an isolated in-memory persistence instance.
pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn seed_student(persistence: &mut Persistence, name: &str, email: &str) -> Student {
    persistence
        .create_student(name, email)
        .expect("student created")
}

pub fn seed_procedure(persistence: &mut Persistence, name: &str, minutes: i32) -> ProcedureType {
    persistence
        .create_procedure_type(name, minutes)
        .expect("procedure type created")
}

/// Seeds one student and one procedure type, the minimum for admission.
pub fn seed_basic(persistence: &mut Persistence) -> (Student, ProcedureType) {
    let student = seed_student(persistence, "Ana Torres", "ana.torres@uni.edu");
    let procedure = seed_procedure(persistence, "Constancia de estudios", 10);
    (student, procedure)
}
