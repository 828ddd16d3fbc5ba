//! Turn scheduling and action resolution.
//!
//! The [`CombatEngine`] is the authoritative owner of a [`CombatState`]. Every
//! mutation, including time advancement, flows through a [`Transaction`] that
//! the engine opens and commits; at most one step is open at a time.
//!
//! Lifecycle:
//! `Idle → AdvanceTime → ResolveAction → (AdvanceTime | Finished)`
//!
//! Actor selection happens inside [`CombatEngine::next_turn`] right after time
//! advances, so it never appears as a resting phase.

mod errors;
mod resolve;
mod turns;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use errors::{EngineError, SetupError};
pub use resolve::{ActionReport, Resolution, TurnAction};
pub use turns::TurnStart;

use crate::ability::Catalog;
use crate::state::{CombatState, CommitReport, Outcome, Scenario, Slot, StepId, Transaction};

/// Where the engine stands in the turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Built but not started; the win/lose check has not run yet.
    Idle,
    /// Waiting for [`CombatEngine::next_turn`].
    AdvanceTime,
    /// `actor` must act through [`CombatEngine::resolve`].
    ResolveAction { actor: Slot },
    Finished(Outcome),
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::AdvanceTime => "advance_time",
            TurnPhase::ResolveAction { .. } => "resolve_action",
            TurnPhase::Finished(_) => "finished",
        }
    }
}

/// Combat engine that owns the state, schedules turns and applies abilities.
#[derive(Debug)]
pub struct CombatEngine {
    catalog: Arc<Catalog>,
    state: CombatState,
    phase: TurnPhase,
    open_step: Option<StepId>,
    next_step: u64,
    save_requested: bool,
}

impl CombatEngine {
    /// Creates an engine over `state`, fresh or resumed.
    ///
    /// Both sides must be populated, and every skill, charge and held item
    /// must exist in `catalog`.
    pub fn new(catalog: Arc<Catalog>, state: CombatState) -> Result<Self, SetupError> {
        state.validate()?;
        catalog.validate_state(&state)?;
        Ok(Self {
            catalog,
            state,
            phase: TurnPhase::Idle,
            open_step: None,
            next_step: 0,
            save_requested: false,
        })
    }

    /// Builds the initial state from `scenario` and wraps it in an engine.
    pub fn from_scenario(
        catalog: Arc<Catalog>,
        scenario: &Scenario,
        seed: u64,
    ) -> Result<Self, SetupError> {
        let state = CombatState::from_scenario(scenario, seed)?;
        Self::new(catalog, state)
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn into_state(self) -> CombatState {
        self.state
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            TurnPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Actor whose action is awaited, if any.
    pub fn current_actor(&self) -> Option<Slot> {
        match self.phase {
            TurnPhase::ResolveAction { actor } => Some(actor),
            _ => None,
        }
    }

    /// Opens a step over the current state.
    ///
    /// Fails while another step is open. The returned transaction must be
    /// handed back to [`commit`](Self::commit) or [`abandon`](Self::abandon);
    /// dropping it leaves the step open and blocks every later step.
    pub fn start_step(&mut self) -> Result<Transaction, EngineError> {
        if let Some(open) = self.open_step {
            return Err(EngineError::StepAlreadyOpen { open });
        }
        let step = StepId(self.next_step);
        self.next_step += 1;
        self.open_step = Some(step);
        Ok(Transaction::open(step, &self.state))
    }

    /// Clamps life and writes the step's changes into the live state.
    pub fn commit(&mut self, tx: Transaction) -> Result<CommitReport, EngineError> {
        self.close_step(tx.step())?;
        Ok(tx.commit_into(&mut self.state))
    }

    /// Discards an open step without touching the state.
    pub fn abandon(&mut self, tx: Transaction) -> Result<(), EngineError> {
        self.close_step(tx.step())
    }

    fn close_step(&mut self, step: StepId) -> Result<(), EngineError> {
        match self.open_step {
            Some(open) if open == step => {
                self.open_step = None;
                Ok(())
            }
            _ => Err(EngineError::StaleStep { provided: step }),
        }
    }

    pub fn save_requested(&self) -> bool {
        self.save_requested
    }

    /// Returns and clears the save flag set by each committed action.
    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }

    /// Re-derives the outcome from the live state and moves to `Finished`
    /// when one side is wiped out.
    fn judge(&mut self) -> Option<Outcome> {
        let outcome = self.state.outcome();
        self.phase = match outcome {
            Some(outcome) => TurnPhase::Finished(outcome),
            None => TurnPhase::AdvanceTime,
        };
        outcome
    }

    fn expect_phase(&self, expected: TurnPhase) -> Result<(), EngineError> {
        match self.phase {
            phase if phase == expected => Ok(()),
            TurnPhase::Finished(outcome) => Err(EngineError::CombatFinished(outcome)),
            phase => Err(EngineError::WrongPhase {
                phase,
                expected: expected.as_str(),
            }),
        }
    }
}
