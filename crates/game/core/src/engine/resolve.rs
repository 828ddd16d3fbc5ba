//! Action resolution for the current actor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ability::{AbilityDescriptor, TargetChoice, validate_choice};
use crate::rng::{Dice, compute_seed};
use crate::state::{AbilityId, Charge, CommitReport, ItemId, Outcome, Side, Slot, Transaction};

use super::{CombatEngine, EngineError, TurnPhase};

/// Seed context for ability effect rolls.
const EFFECT_CONTEXT: u32 = 0;

/// What the current actor does with its turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    /// Use a known ability.
    Ability {
        ability: AbilityId,
        target: TargetChoice,
    },
    /// Use a held item (player side only).
    Item { item: ItemId, target: TargetChoice },
    /// Spend a turn on the ability being charged.
    ContinueCharge,
}

/// How an action played out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The effect was applied.
    Applied,
    /// A multi-turn ability started; the effect lands after `remaining` turns.
    ChargeStarted { remaining: u32 },
    /// The charge continues for `remaining` more turns.
    Charging { remaining: u32 },
    /// The charge completed but its target is gone.
    Fizzled,
}

/// Result of [`CombatEngine::resolve`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionReport {
    pub actor: Slot,
    pub ability: AbilityId,
    /// Set when the ability came from an item.
    pub item: Option<ItemId>,
    pub resolution: Resolution,
    pub changes: CommitReport,
    /// Set when this action ended the encounter.
    pub outcome: Option<Outcome>,
}

/// What the step has to do once it is open.
enum Plan {
    Apply,
    StartCharge(u32),
    Charging(u32),
    Release,
}

impl CombatEngine {
    /// Applies `action` for the current actor in a single step.
    ///
    /// Choice errors are reported before a step opens and leave the engine
    /// waiting for another action. On success the actor's turn ends, the
    /// nonce advances, a save is requested and the outcome is re-judged.
    pub fn resolve(&mut self, action: TurnAction) -> Result<ActionReport, EngineError> {
        let actor = match self.phase {
            TurnPhase::ResolveAction { actor } => actor,
            TurnPhase::Finished(outcome) => return Err(EngineError::CombatFinished(outcome)),
            phase => {
                return Err(EngineError::WrongPhase {
                    phase,
                    expected: "resolve_action",
                });
            }
        };
        let catalog = Arc::clone(&self.catalog);
        let character = self
            .state
            .character(actor)
            .ok_or(EngineError::NoReadyActor)?;

        let (descriptor, item, target, plan) = match &action {
            TurnAction::Ability { ability, target } => {
                if character.charge.is_some() {
                    return Err(EngineError::ChargeInProgress(actor));
                }
                if !character.knows(ability) {
                    return Err(EngineError::AbilityNotKnown {
                        actor,
                        ability: ability.clone(),
                    });
                }
                let descriptor = catalog.ability(ability)?;
                let plan = match descriptor.extra_turns {
                    0 => Plan::Apply,
                    turns => Plan::StartCharge(turns),
                };
                (descriptor, None, *target, plan)
            }
            TurnAction::Item { item, target } => {
                if actor.side != Side::Players {
                    return Err(EngineError::ItemsNotAllowed(actor));
                }
                if character.charge.is_some() {
                    return Err(EngineError::ChargeInProgress(actor));
                }
                if !self.state.holds_item(item) {
                    return Err(EngineError::ItemNotHeld(item.clone()));
                }
                let descriptor = catalog.ability(&catalog.item(item)?.ability)?;
                (descriptor, Some(item.clone()), *target, Plan::Apply)
            }
            TurnAction::ContinueCharge => {
                let charge = character
                    .charge
                    .as_ref()
                    .ok_or(EngineError::NotCharging(actor))?;
                let descriptor = catalog.ability(&charge.ability)?;
                let plan = match charge.remaining.saturating_sub(1) {
                    0 => Plan::Release,
                    remaining => Plan::Charging(remaining),
                };
                (descriptor, None, charge.target, plan)
            }
        };
        if matches!(plan, Plan::Apply | Plan::StartCharge(_)) {
            validate_choice(&self.state, descriptor.target, actor, target)?;
        }
        let forget = descriptor.single_use && matches!(action, TurnAction::Ability { .. });

        let mut dice = Dice::new(compute_seed(
            self.state.seed,
            self.state.nonce,
            actor.code(),
            EFFECT_CONTEXT,
        ));
        let tx = self.start_step()?;
        let applied = run_plan(
            &tx,
            descriptor,
            actor,
            target,
            &plan,
            forget,
            item.as_ref(),
            &mut dice,
        );
        let resolution = match applied {
            Ok(resolution) => resolution,
            Err(error) => {
                self.abandon(tx)?;
                return Err(error);
            }
        };
        let changes = self.commit(tx)?;

        self.state.nonce += 1;
        self.save_requested = true;
        let outcome = self.judge();

        Ok(ActionReport {
            actor,
            ability: descriptor.ability_id(),
            item,
            resolution,
            changes,
            outcome,
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn run_plan(
    tx: &Transaction,
    descriptor: &AbilityDescriptor,
    actor: Slot,
    target: TargetChoice,
    plan: &Plan,
    forget: bool,
    item: Option<&ItemId>,
    dice: &mut Dice,
) -> Result<Resolution, EngineError> {
    let handle = tx.char(actor).ok_or(EngineError::NoReadyActor)?;
    if forget {
        handle.forget(&descriptor.ability_id());
    }
    if let Some(item) = item {
        if !tx.consume_item(item) {
            return Err(EngineError::ItemNotHeld(item.clone()));
        }
    }

    let charge = |remaining| Charge {
        ability: descriptor.ability_id(),
        target,
        remaining,
    };
    let resolution = match *plan {
        Plan::Apply => {
            descriptor.apply(tx, actor, target, dice)?;
            Resolution::Applied
        }
        Plan::StartCharge(remaining) => {
            handle.set_charge(Some(charge(remaining)));
            Resolution::ChargeStarted { remaining }
        }
        Plan::Charging(remaining) => {
            handle.set_charge(Some(charge(remaining)));
            Resolution::Charging { remaining }
        }
        Plan::Release => {
            handle.set_charge(None);
            if validate_choice(tx.baseline(), descriptor.target, actor, target).is_ok() {
                descriptor.apply(tx, actor, target, dice)?;
                Resolution::Applied
            } else {
                Resolution::Fizzled
            }
        }
    };
    handle.end_turn();
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Catalog;
    use crate::element::{Element, ElementMap};
    use crate::state::{CharClass, Character, CombatState, SideRoster, Stats};

    fn archer(name: &str, next_turn: f64) -> Character {
        let mut character = Character::new(name, Element::Dark);
        character.class = Some(CharClass::Archer);
        character.damage = ElementMap::from([(Element::Normal, 10.0)]);
        character.skills = vec!["shoot".into(), "arrowofdeath".into()];
        character.next_turn = next_turn;
        character
    }

    fn target(name: &str, next_turn: f64) -> Character {
        let mut character = Character::new(name, Element::Normal);
        character.next_turn = next_turn;
        character
    }

    fn engine(state: CombatState) -> CombatEngine {
        let mut engine = CombatEngine::new(Arc::new(Catalog::standard()), state).unwrap();
        engine.begin().unwrap();
        engine
    }

    fn duel(player: Character, enemy: Character) -> CombatEngine {
        engine(CombatState {
            players: SideRoster::from_iter([player]),
            enemies: SideRoster::from_iter([enemy]),
            player_items: vec!["heal_scroll".into()],
            seed: 5,
            nonce: 0,
        })
    }

    fn shoot() -> TurnAction {
        TurnAction::Ability {
            ability: "shoot".into(),
            target: TargetChoice::Index(0),
        }
    }

    #[test]
    fn resolved_action_ends_the_turn_and_requests_a_save() {
        let mut engine = duel(archer("Rand", 0.0), target("Aura", 50.0));
        engine.next_turn().unwrap();
        let report = engine.resolve(shoot()).unwrap();

        assert_eq!(report.resolution, Resolution::Applied);
        assert_eq!(report.outcome, None);
        assert_eq!(engine.state().enemies[0].life, 90.0);
        assert_eq!(engine.state().players[0].next_turn, 100.0);
        assert_eq!(engine.state().nonce, 1);
        assert_eq!(engine.phase(), TurnPhase::AdvanceTime);
        assert!(engine.take_save_request());
        assert!(!engine.take_save_request());
    }

    #[test]
    fn choice_errors_leave_the_turn_open() {
        let mut engine = duel(archer("Rand", 0.0), target("Aura", 50.0));
        engine.next_turn().unwrap();
        let before = engine.state().clone();

        let unknown = TurnAction::Ability {
            ability: "slash".into(),
            target: TargetChoice::Index(0),
        };
        assert!(matches!(
            engine.resolve(unknown),
            Err(EngineError::AbilityNotKnown { .. })
        ));
        let missing = TurnAction::Ability {
            ability: "shoot".into(),
            target: TargetChoice::Implicit,
        };
        assert!(matches!(
            engine.resolve(missing),
            Err(EngineError::MissingTarget { .. })
        ));
        assert!(matches!(
            engine.resolve(TurnAction::ContinueCharge),
            Err(EngineError::NotCharging(_))
        ));

        assert_eq!(engine.state(), &before);
        assert_eq!(engine.current_actor(), Some(Slot::player(0)));
        assert!(engine.resolve(shoot()).is_ok());
    }

    #[test]
    fn items_cast_their_ability_and_are_consumed() {
        let mut hurt = archer("Rand", 0.0);
        hurt.life = 40.0;
        hurt.stats = Stats::new(0.0, 0.0, 20.0, 0.0);
        let mut engine = duel(hurt, target("Aura", 50.0));
        engine.next_turn().unwrap();
        let report = engine
            .resolve(TurnAction::Item {
                item: "heal_scroll".into(),
                target: TargetChoice::Index(0),
            })
            .unwrap();
        assert_eq!(report.ability, AbilityId::from("heal"));
        assert_eq!(report.item, Some(ItemId::from("heal_scroll")));
        // Archers cannot learn heal, but scrolls ignore class. 20 / 2 = 10.
        assert_eq!(engine.state().players[0].life, 50.0);
        assert!(engine.state().player_items.is_empty());
    }

    #[test]
    fn enemies_cannot_use_items() {
        let mut engine = duel(target("Hector", 50.0), archer("Rand", 0.0));
        engine.next_turn().unwrap();
        assert!(matches!(
            engine.resolve(TurnAction::Item {
                item: "heal_scroll".into(),
                target: TargetChoice::Index(0),
            }),
            Err(EngineError::ItemsNotAllowed(_))
        ));
    }

    #[test]
    fn charged_ability_lands_after_its_extra_turn() {
        let mut engine = duel(archer("Rand", 0.0), target("Aura", 500.0));
        engine.next_turn().unwrap();
        let started = engine
            .resolve(TurnAction::Ability {
                ability: "arrowofdeath".into(),
                target: TargetChoice::Index(0),
            })
            .unwrap();
        assert_eq!(started.resolution, Resolution::ChargeStarted { remaining: 1 });
        assert_eq!(engine.state().enemies[0].life, 100.0);
        // Single use: forgotten as soon as it is chosen.
        assert!(!engine.state().players[0].knows(&"arrowofdeath".into()));

        let turn = engine.next_turn().unwrap();
        assert_eq!(turn.actor, Slot::player(0));
        assert!(turn.charge.is_some());
        assert!(matches!(
            engine.resolve(shoot()),
            Err(EngineError::ChargeInProgress(_))
        ));
        let landed = engine.resolve(TurnAction::ContinueCharge).unwrap();
        assert_eq!(landed.resolution, Resolution::Applied);
        // 10 normal damage doubled into dark.
        assert_eq!(engine.state().enemies[0].life, 80.0);
        assert_eq!(engine.state().players[0].speed, -20.0);
        assert!(engine.state().players[0].charge.is_none());
    }

    #[test]
    fn charge_fizzles_when_its_target_dies() {
        let mut state = CombatState {
            players: SideRoster::from_iter([archer("Rand", 0.0), archer("Vex", 60.0)]),
            enemies: SideRoster::from_iter([target("Aura", 500.0), target("Husk", 500.0)]),
            player_items: Vec::new(),
            seed: 5,
            nonce: 0,
        };
        state.players[1].damage = ElementMap::from([(Element::Normal, 200.0)]);
        let mut engine = engine(state);

        engine.next_turn().unwrap();
        engine
            .resolve(TurnAction::Ability {
                ability: "arrowofdeath".into(),
                target: TargetChoice::Index(0),
            })
            .unwrap();
        // Vex kills the charged target first.
        assert_eq!(engine.next_turn().unwrap().actor, Slot::player(1));
        engine.resolve(shoot()).unwrap();
        assert_eq!(engine.state().enemies[0].life, 0.0);

        assert_eq!(engine.next_turn().unwrap().actor, Slot::player(0));
        let report = engine.resolve(TurnAction::ContinueCharge).unwrap();
        assert_eq!(report.resolution, Resolution::Fizzled);
        assert_eq!(engine.state().enemies[1].life, 100.0);
    }

    #[test]
    fn killing_the_last_enemy_finishes_the_combat() {
        let mut strong = archer("Rand", 0.0);
        strong.damage = ElementMap::from([(Element::Normal, 150.0)]);
        let mut engine = duel(strong, target("Aura", 50.0));
        engine.next_turn().unwrap();
        let report = engine.resolve(shoot()).unwrap();
        assert_eq!(report.outcome, Some(Outcome::Victory));
        assert_eq!(engine.phase(), TurnPhase::Finished(Outcome::Victory));
        assert!(report.changes.deaths().eq([Slot::enemy(0)]));
    }
}
