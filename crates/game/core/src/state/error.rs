//! Scenario validation errors.
//!
//! Raised while building a [`CombatState`](super::CombatState) from a
//! scenario, before any combat state exists.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::{AbilityId, Side};

/// Malformed scenario descriptors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    /// A side has no characters at all.
    #[error("the {side} side has no characters")]
    EmptySide { side: Side },

    /// A side has more characters than there are slots.
    #[error("the {side} side has {count} characters (max: {max})")]
    TooManyCharacters {
        side: Side,
        count: usize,
        max: usize,
    },

    /// A character lists the same ability twice.
    #[error("character '{name}' lists ability '{ability}' more than once")]
    DuplicateSkill { name: String, ability: AbilityId },
}

impl CombatError for ScenarioError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ScenarioError::*;
        match self {
            EmptySide { .. } => "SCENARIO_EMPTY_SIDE",
            TooManyCharacters { .. } => "SCENARIO_TOO_MANY_CHARACTERS",
            DuplicateSkill { .. } => "SCENARIO_DUPLICATE_SKILL",
        }
    }
}
