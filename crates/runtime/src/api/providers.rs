//! Asynchronous abstractions for sourcing player and enemy intent.
//!
//! Runtime users plug in [`PlayerInput`], [`Selector`] and [`EnemyPolicy`]
//! implementations so combat can run with human input, scripted fixtures, or
//! AI policies.
use async_trait::async_trait;
use combat_core::{
    AbilityId, Catalog, CombatState, ItemId, Slot, TargetChoice, TargetKind, TurnAction,
    validate_choice,
};
use serde::{Deserialize, Serialize};

use super::errors::{Result, RuntimeError};

/// Options offered to a player character at the start of its turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMenu {
    pub actor: Slot,
    /// Known abilities, in skill order.
    pub abilities: Vec<AbilityId>,
    /// Items held by the player side.
    pub items: Vec<ItemId>,
}

impl TurnMenu {
    pub fn for_actor(state: &CombatState, actor: Slot) -> Self {
        let abilities = state
            .character(actor)
            .map(|character| character.skills.clone())
            .unwrap_or_default();
        Self {
            actor,
            abilities,
            items: state.player_items.clone(),
        }
    }
}

/// A player's pick from the turn menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuChoice {
    Ability(AbilityId),
    Item(ItemId),
    /// Leave the combat for the exit destination.
    Exit,
}

/// Source of player menu choices (UI, scripted input, tests).
#[async_trait]
pub trait PlayerInput: Send + Sync {
    /// Pick an entry of `menu` for the acting player.
    async fn choose(&self, menu: &TurnMenu, state: &CombatState) -> Result<MenuChoice>;
}

/// Character-index selection for single-target abilities.
#[async_trait]
pub trait Selector: Send + Sync {
    /// Pick one of `candidates`, or `None` to cancel back to the menu.
    async fn select(
        &self,
        actor: Slot,
        kind: TargetKind,
        candidates: &[Slot],
        state: &CombatState,
    ) -> Result<Option<Slot>>;
}

/// Decision procedure for enemy turns.
#[async_trait]
pub trait EnemyPolicy: Send + Sync {
    /// Produce the complete action for the acting enemy.
    async fn decide(&self, actor: Slot, state: &CombatState, catalog: &Catalog)
    -> Result<TurnAction>;
}

/// Uses the first known ability that has a valid target, aimed at the first
/// living candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstAbilityPolicy;

impl FirstAbilityPolicy {
    /// The action this policy would take, if any ability is usable.
    pub fn plan(actor: Slot, state: &CombatState, catalog: &Catalog) -> Option<TurnAction> {
        let character = state.character(actor)?;
        character.skills.iter().find_map(|ability| {
            let descriptor = catalog.get_ability(ability)?;
            let target = first_choice(state, actor, descriptor.target);
            validate_choice(state, descriptor.target, actor, target)
                .ok()
                .map(|()| TurnAction::Ability {
                    ability: ability.clone(),
                    target,
                })
        })
    }
}

/// First living slot on the selection side, or `Implicit` for kinds that
/// need no selection.
pub fn first_choice(state: &CombatState, actor: Slot, kind: TargetKind) -> TargetChoice {
    match kind.selection_side(actor.side) {
        Some(side) => state
            .living_slots(side)
            .next()
            .map_or(TargetChoice::Implicit, |slot| TargetChoice::Index(slot.index)),
        None => TargetChoice::Implicit,
    }
}

#[async_trait]
impl EnemyPolicy for FirstAbilityPolicy {
    async fn decide(
        &self,
        actor: Slot,
        state: &CombatState,
        catalog: &Catalog,
    ) -> Result<TurnAction> {
        Self::plan(actor, state, catalog).ok_or(RuntimeError::NoUsableAction { actor })
    }
}
