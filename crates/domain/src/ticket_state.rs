// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket state tracking and transition logic.
//!
//! This module defines ticket lifecycle states and the legal-transition
//! table. States move along a DAG: a ticket never re-enters the queue,
//! and terminal states admit no further transitions.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ticket lifecycle states.
///
/// A ticket is created waiting (`EnCola`), is pulled into service
/// (`Atendiendo`), and ends in exactly one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    /// Waiting in the queue
    EnCola,
    /// Currently being served by staff
    Atendiendo,
    /// Service completed
    Atendido,
    /// Cancelled before or during service
    Cancelado,
    /// Marked absent when called
    Ausente,
}

impl TicketState {
    /// Returns the string representation of the state.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnCola => "en_cola",
            Self::Atendiendo => "atendiendo",
            Self::Atendido => "atendido",
            Self::Cancelado => "cancelado",
            Self::Ausente => "ausente",
        }
    }

    /// Parses a state from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTicketState` if the string is not a valid state.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "en_cola" => Ok(Self::EnCola),
            "atendiendo" => Ok(Self::Atendiendo),
            "atendido" => Ok(Self::Atendido),
            "cancelado" => Ok(Self::Cancelado),
            "ausente" => Ok(Self::Ausente),
            _ => Err(DomainError::InvalidTicketState {
                state: s.to_string(),
            }),
        }
    }

    /// Returns true if the ticket occupies the student's single active slot.
    ///
    /// A student may hold at most one ticket in an active state at a time.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::EnCola | Self::Atendiendo)
    }

    /// Returns true if this state is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Atendido | Self::Cancelado | Self::Ausente)
    }

    /// Validates if a transition from this state to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_state: Self) -> Result<(), DomainError> {
        // Cannot transition from terminal states
        if self.is_terminal() {
            return Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: new_state.as_str().to_string(),
                reason: "cannot transition from a terminal state".to_string(),
            });
        }

        // Tickets never re-enter the queue
        if new_state == Self::EnCola {
            return Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: new_state.as_str().to_string(),
                reason: "tickets never re-enter the queue".to_string(),
            });
        }

        // Valid transitions based on current state
        let valid = match self {
            Self::EnCola => matches!(
                new_state,
                Self::Atendiendo | Self::Atendido | Self::Cancelado | Self::Ausente
            ),
            Self::Atendiendo => {
                matches!(new_state, Self::Atendido | Self::Cancelado | Self::Ausente)
            }
            Self::Atendido | Self::Cancelado | Self::Ausente => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: new_state.as_str().to_string(),
                reason: "transition not permitted by ticket lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for TicketState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for TicketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
