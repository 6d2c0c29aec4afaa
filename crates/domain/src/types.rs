// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core domain types for the queue system.

use crate::error::DomainError;
use crate::ticket_state::TicketState;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single queued service request ("turno") tied to one student and one
/// procedure type.
///
/// Tickets are never deleted; terminal states keep the historical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Surrogate key, monotonically assigned by the store.
    pub ticket_id: i64,
    /// Display code, unique per calendar day (`T250614007`).
    pub code: String,
    /// The requesting student (non-owning reference).
    pub student_id: i64,
    /// The requested procedure type (read-only reference).
    pub procedure_type_id: i64,
    /// Current lifecycle state.
    pub state: TicketState,
    /// Creation moment; the sole FIFO ordering key.
    pub requested_at: String,
    /// Calendar day of `requested_at` (`YYYY-MM-DD`).
    pub requested_on: String,
    /// Set once when service begins (or when finishing directly).
    pub service_started_at: Option<String>,
    /// Set when service completes; always after `service_started_at`.
    pub service_ended_at: Option<String>,
    /// Free-text notes, set on cancel/absent/update.
    pub notes: Option<String>,
    /// Row creation timestamp.
    pub created_at: String,
    /// Touched by every write.
    pub updated_at: String,
}

impl Ticket {
    /// Returns true if this ticket occupies the student's active slot.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

/// A student known to the service (external collaborator data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub student_id: i64,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Availability of a procedure type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureStatus {
    /// Offered; tickets may be requested.
    Active,
    /// Temporarily unavailable.
    Suspended,
    /// Removed from the catalog (rows retained for history).
    Deleted,
}

impl ProcedureStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
        }
    }

    /// Returns true if tickets may be requested for this procedure.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "deleted" => Ok(Self::Deleted),
            _ => Err(DomainError::InvalidProcedureStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl FromStr for ProcedureStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ProcedureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalogued administrative procedure ("trámite") with an estimated
/// service duration used for wait projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureType {
    pub procedure_type_id: i64,
    pub name: String,
    pub estimated_duration_minutes: i32,
    pub status: ProcedureStatus,
    pub created_at: String,
    pub updated_at: String,
}
