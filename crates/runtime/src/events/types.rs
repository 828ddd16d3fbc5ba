//! Event types for different topics.

use combat_core::{ActionReport, CombatState, Outcome, Slot};
use serde::{Deserialize, Serialize};

use crate::combat::Destination;

/// Events related to the turn loop (lightweight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// `actor` is about to act after `elapsed` time units.
    Started {
        actor: Slot,
        elapsed: f64,
        charging: bool,
    },

    /// The combat is over and leaves for `destination`.
    Ended {
        destination: Destination,
        screen: String,
        outcome: Option<Outcome>,
    },
}

/// Events related to combat state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateEvent {
    /// An action was committed with the given change records.
    ActionResolved { report: Box<ActionReport> },

    /// The committed state should be persisted.
    SaveRequested { state: Box<CombatState> },

    /// A player choice was rejected; the player chooses again.
    ChoiceRejected { actor: Slot, error: String },
}
