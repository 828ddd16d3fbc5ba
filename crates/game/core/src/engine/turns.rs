use serde::{Deserialize, Serialize};

use crate::state::{Charge, CommitReport, Side, Slot};

use super::{CombatEngine, EngineError, TurnPhase};

/// Start of a scheduled turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnStart {
    pub actor: Slot,
    /// Time units that passed before the actor became ready.
    pub elapsed: f64,
    /// Set when the actor is in the middle of a multi-turn ability.
    pub charge: Option<Charge>,
    /// Countdown changes of the time advance.
    pub changes: CommitReport,
}

/// Turn scheduling methods for CombatEngine.
impl CombatEngine {
    /// Leaves `Idle`, judging the initial state first.
    ///
    /// An encounter that starts with a wiped side finishes immediately.
    pub fn begin(&mut self) -> Result<TurnPhase, EngineError> {
        self.expect_phase(TurnPhase::Idle)?;
        self.judge();
        Ok(self.phase)
    }

    /// Advances every living countdown by the smallest living countdown.
    ///
    /// Dead characters keep their countdown. Returns the elapsed time.
    pub fn advance_time(&mut self) -> Result<(f64, CommitReport), EngineError> {
        self.expect_phase(TurnPhase::AdvanceTime)?;
        let dt = self
            .state
            .players
            .iter()
            .chain(self.state.enemies.iter())
            .filter(|character| character.is_alive())
            .map(|character| character.next_turn)
            .min_by(f64::total_cmp)
            .ok_or(EngineError::NoLivingCombatants)?;

        let tx = self.start_step()?;
        tx.advance_time(dt);
        let changes = self.commit(tx)?;
        Ok((dt, changes))
    }

    /// Picks the actor whose countdown reached zero.
    ///
    /// Enemies are scanned before players, each side in slot order, so an
    /// enemy wins every tie.
    pub fn select_actor(&self) -> Result<Slot, EngineError> {
        [Side::Enemies, Side::Players]
            .into_iter()
            .flat_map(|side| self.state.living_slots(side))
            .find(|slot| {
                self.state
                    .character(*slot)
                    .is_some_and(|character| character.next_turn <= 0.0)
            })
            .ok_or(EngineError::NoReadyActor)
    }

    /// Advances time and selects the next actor.
    ///
    /// After this call the engine waits in `ResolveAction` for
    /// [`CombatEngine::resolve`].
    pub fn next_turn(&mut self) -> Result<TurnStart, EngineError> {
        let (elapsed, changes) = self.advance_time()?;
        let actor = self.select_actor()?;
        self.phase = TurnPhase::ResolveAction { actor };
        let charge = self
            .state
            .character(actor)
            .and_then(|character| character.charge.clone());
        Ok(TurnStart {
            actor,
            elapsed,
            charge,
            changes,
        })
    }
}
