// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wait-time projection.
//!
//! The projection is a simple queueing approximation: depth of the
//! procedure's waiting subqueue times the procedure's estimated duration.
//! It is not an exact ETA — tickets of other procedure types ahead in the
//! global queue are not weighted, and the currently-served ticket's
//! remaining time is excluded.

/// Projects the wait in minutes for a new ticket of a procedure type.
///
/// `waiting_count` is the number of tickets currently waiting for the same
/// procedure type, evaluated before the new ticket is inserted.
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn estimated_wait_minutes(waiting_count: i64, estimated_duration_minutes: i32) -> i64 {
    let waiting = if waiting_count > 0 { waiting_count } else { 0 };
    let duration = if estimated_duration_minutes > 0 {
        estimated_duration_minutes as i64
    } else {
        0
    };
    waiting.saturating_mul(duration)
}
