//! Scenario descriptors and encounter initialization.
//!
//! A [`Scenario`] is the plain-data description of an encounter as authored:
//! characters without a turn countdown, plus the player side's items.
//! [`CombatState::from_scenario`] validates it and copies it into a fresh
//! authoritative state, so later changes to the descriptor never reach a
//! running combat.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    AbilityId, CharClass, Character, CombatState, ItemId, ScenarioError, Side, Slot, Stats,
};
use crate::config::CombatConfig;
use crate::element::{Element, ElementMap};
use crate::rng::{Dice, compute_seed};
use crate::speed::time_from_speed;

/// Seed context for initial turn rolls.
const INITIAL_TURN_CONTEXT: u32 = 1;

/// A character as authored in a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSpec {
    pub name: String,
    #[serde(default = "full_life")]
    pub life: f64,
    #[serde(default)]
    pub speed: f64,
    /// Usually omitted; rolled when the encounter starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_turn: Option<f64>,
    #[serde(default)]
    pub resists: ElementMap,
    #[serde(default)]
    pub damage: ElementMap,
    #[serde(default)]
    pub stats: Stats,
    pub element: Element,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<CharClass>,
    #[serde(default)]
    pub skills: Vec<AbilityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spritesheet: Option<String>,
}

fn full_life() -> f64 {
    CombatConfig::MAX_LIFE
}

impl CharacterSpec {
    pub fn new(name: impl Into<String>, element: Element) -> Self {
        Self {
            name: name.into(),
            life: full_life(),
            speed: 0.0,
            next_turn: None,
            resists: ElementMap::new(),
            damage: ElementMap::new(),
            stats: Stats::default(),
            element,
            class: None,
            skills: Vec::new(),
            spritesheet: None,
        }
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let mut seen = BTreeSet::new();
        for ability in &self.skills {
            if !seen.insert(ability) {
                return Err(ScenarioError::DuplicateSkill {
                    name: self.name.clone(),
                    ability: ability.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builds the live character, rolling a countdown in
    /// `[0, time_from_speed(speed))` for living characters without one.
    fn instantiate(&self, dice: &mut Dice) -> Character {
        let next_turn = match self.next_turn {
            Some(next_turn) => next_turn,
            None if self.life > 0.0 => dice.next_f64() * time_from_speed(self.speed),
            None => 0.0,
        };
        Character {
            name: self.name.clone(),
            life: self.life,
            speed: self.speed,
            next_turn,
            resists: self.resists.clone(),
            damage: self.damage.clone(),
            stats: self.stats,
            element: self.element,
            class: self.class,
            skills: self.skills.clone(),
            spritesheet: self.spritesheet.clone(),
            charge: None,
        }
    }
}

/// Inbound encounter description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub players: Vec<CharacterSpec>,
    pub enemies: Vec<CharacterSpec>,
    #[serde(default)]
    pub player_items: Vec<ItemId>,
}

impl Scenario {
    pub fn side(&self, side: Side) -> &[CharacterSpec] {
        match side {
            Side::Players => &self.players,
            Side::Enemies => &self.enemies,
        }
    }

    /// Checks side sizes and skill lists without building anything.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for side in Side::ALL {
            let specs = self.side(side);
            if specs.is_empty() {
                return Err(ScenarioError::EmptySide { side });
            }
            if specs.len() > CombatConfig::MAX_SIDE {
                return Err(ScenarioError::TooManyCharacters {
                    side,
                    count: specs.len(),
                    max: CombatConfig::MAX_SIDE,
                });
            }
            specs.iter().try_for_each(CharacterSpec::validate)?;
        }
        Ok(())
    }
}

impl CombatState {
    /// Validates `scenario` and builds the initial state of an encounter.
    ///
    /// Missing countdowns are rolled from `seed`, so the same scenario and seed
    /// always start identically.
    pub fn from_scenario(scenario: &Scenario, seed: u64) -> Result<Self, ScenarioError> {
        scenario.validate()?;

        let build = |side: Side| -> ArrayVec<Character, { CombatConfig::MAX_SIDE }> {
            scenario
                .side(side)
                .iter()
                .enumerate()
                .map(|(index, spec)| {
                    let slot = Slot::new(side, index);
                    let mut dice = Dice::new(compute_seed(seed, 0, slot.code(), INITIAL_TURN_CONTEXT));
                    spec.instantiate(&mut dice)
                })
                .collect()
        };

        Ok(Self {
            players: build(Side::Players),
            enemies: build(Side::Enemies),
            player_items: scenario.player_items.clone(),
            seed,
            nonce: 0,
        })
    }
}
