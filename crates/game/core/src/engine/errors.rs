//! Errors surfaced by the combat engine.

use crate::ability::TargetKind;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{AbilityId, ItemId, Outcome, ScenarioError, Side, Slot, StepId};

use super::TurnPhase;

/// Errors surfaced while scheduling turns or resolving actions.
///
/// Invariant violations are fatal: they mean corrupted data or a logic bug
/// and the encounter must not continue. Choice errors leave the engine
/// untouched so the caller may choose again.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    // ===== invariant violations =====
    #[error("unknown ability '{0}'")]
    UnknownAbility(AbilityId),

    #[error("unknown item '{0}'")]
    UnknownItem(ItemId),

    #[error("ability '{0}' is registered twice")]
    DuplicateAbility(AbilityId),

    #[error("ability '{ability}' has an effect that cannot take '{target}' targets")]
    EffectShapeMismatch { ability: AbilityId, target: TargetKind },

    #[error("step {open} is still open")]
    StepAlreadyOpen { open: StepId },

    #[error("step {provided} is not the open step")]
    StaleStep { provided: StepId },

    #[error("no living character is ready after advancing time")]
    NoReadyActor,

    #[error("no living characters left to schedule")]
    NoLivingCombatants,

    #[error("engine is in phase {phase:?}, expected {expected}")]
    WrongPhase {
        phase: TurnPhase,
        expected: &'static str,
    },

    #[error("combat already finished ({0:?})")]
    CombatFinished(Outcome),

    // ===== choice errors =====
    #[error("{actor} does not know ability '{ability}'")]
    AbilityNotKnown { actor: Slot, ability: AbilityId },

    #[error("item '{0}' is not held")]
    ItemNotHeld(ItemId),

    #[error("{0} cannot use items")]
    ItemsNotAllowed(Slot),

    #[error("a '{kind}' ability needs a target")]
    MissingTarget { kind: TargetKind },

    #[error("no living target at {side}[{index}]")]
    InvalidTarget { side: Side, index: usize },

    #[error("{0} is not charging an ability")]
    NotCharging(Slot),

    #[error("{0} must continue its charged ability")]
    ChargeInProgress(Slot),
}

impl EngineError {
    /// True for errors the caller can correct by choosing differently.
    pub fn is_choice_error(&self) -> bool {
        self.severity() == ErrorSeverity::Validation
    }
}

impl CombatError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        use EngineError::*;
        match self {
            UnknownAbility(_)
            | UnknownItem(_)
            | DuplicateAbility(_)
            | EffectShapeMismatch { .. }
            | StepAlreadyOpen { .. }
            | StaleStep { .. }
            | NoReadyActor
            | NoLivingCombatants
            | WrongPhase { .. }
            | CombatFinished(_) => ErrorSeverity::Fatal,

            AbilityNotKnown { .. }
            | ItemNotHeld(_)
            | ItemsNotAllowed(_)
            | MissingTarget { .. }
            | InvalidTarget { .. }
            | NotCharging(_)
            | ChargeInProgress(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use EngineError::*;
        match self {
            UnknownAbility(_) => "ENGINE_UNKNOWN_ABILITY",
            UnknownItem(_) => "ENGINE_UNKNOWN_ITEM",
            DuplicateAbility(_) => "ENGINE_DUPLICATE_ABILITY",
            EffectShapeMismatch { .. } => "ENGINE_EFFECT_SHAPE_MISMATCH",
            StepAlreadyOpen { .. } => "ENGINE_STEP_ALREADY_OPEN",
            StaleStep { .. } => "ENGINE_STALE_STEP",
            NoReadyActor => "ENGINE_NO_READY_ACTOR",
            NoLivingCombatants => "ENGINE_NO_LIVING_COMBATANTS",
            WrongPhase { .. } => "ENGINE_WRONG_PHASE",
            CombatFinished(_) => "ENGINE_COMBAT_FINISHED",
            AbilityNotKnown { .. } => "ENGINE_ABILITY_NOT_KNOWN",
            ItemNotHeld(_) => "ENGINE_ITEM_NOT_HELD",
            ItemsNotAllowed(_) => "ENGINE_ITEMS_NOT_ALLOWED",
            MissingTarget { .. } => "ENGINE_MISSING_TARGET",
            InvalidTarget { .. } => "ENGINE_INVALID_TARGET",
            NotCharging(_) => "ENGINE_NOT_CHARGING",
            ChargeInProgress(_) => "ENGINE_CHARGE_IN_PROGRESS",
        }
    }
}

/// Errors raised while turning a scenario into a running engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CombatError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SetupError::Scenario(error) => error.severity(),
            SetupError::Engine(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SetupError::Scenario(error) => error.error_code(),
            SetupError::Engine(error) => error.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_errors_are_validation_and_the_rest_fatal() {
        let not_known = EngineError::AbilityNotKnown {
            actor: Slot::player(0),
            ability: "slash".into(),
        };
        assert!(not_known.is_choice_error());
        assert!(!not_known.severity().is_invariant_violation());

        let stuck = EngineError::NoReadyActor;
        assert!(!stuck.is_choice_error());
        assert!(stuck.severity().is_invariant_violation());
        assert_eq!(stuck.error_code(), "ENGINE_NO_READY_ACTOR");

        let empty = SetupError::from(ScenarioError::EmptySide {
            side: Side::Enemies,
        });
        assert_eq!(empty.severity(), ErrorSeverity::Validation);
        assert_eq!(empty.error_code(), "SCENARIO_EMPTY_SIDE");
    }
}
