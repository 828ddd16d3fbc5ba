//! Authoritative combat state representation.
//!
//! This module owns the data describing both sides of an encounter, the
//! scenario descriptors they are built from, and the transaction type through
//! which all mutation flows. Runtime layers clone or query this state but
//! mutate it exclusively through the engine.
mod character;
mod error;
mod scenario;
mod transaction;

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

pub use character::{AbilityId, CharClass, Character, Charge, ItemId, Stats};
pub use error::ScenarioError;
pub use scenario::{CharacterSpec, Scenario};
pub use transaction::{Change, ChangeRecord, CharHandle, CommitReport, StepId, Transaction};

use crate::config::CombatConfig;

/// Characters on one side, in slot order.
pub type SideRoster = ArrayVec<Character, { CombatConfig::MAX_SIDE }>;

/// The two opposing sides of an encounter.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Players,
    Enemies,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Players, Side::Enemies];

    pub fn opponent(self) -> Side {
        match self {
            Side::Players => Side::Enemies,
            Side::Enemies => Side::Players,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Players => "players",
            Side::Enemies => "enemies",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a character: a side plus an index in `0..4`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Slot {
    pub side: Side,
    pub index: usize,
}

impl Slot {
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    pub const fn player(index: usize) -> Self {
        Self::new(Side::Players, index)
    }

    pub const fn enemy(index: usize) -> Self {
        Self::new(Side::Enemies, index)
    }

    /// Dense numeric code used to mix the slot into random seeds.
    pub fn code(self) -> u32 {
        let side = match self.side {
            Side::Players => 0,
            Side::Enemies => 1,
        };
        (side * CombatConfig::MAX_SIDE + self.index) as u32
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.side, self.index)
    }
}

/// How a finished encounter ended for the player side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Canonical snapshot of an encounter.
///
/// Plain data only: it serializes at every commit boundary and is what the
/// outer game persists and reads back after combat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    pub players: SideRoster,
    pub enemies: SideRoster,
    #[serde(default)]
    pub player_items: Vec<ItemId>,
    /// Base seed for every random roll. Set once at encounter start.
    #[serde(default)]
    pub seed: u64,
    /// Number of committed actions; mixed into random seeds.
    #[serde(default)]
    pub nonce: u64,
}

impl CombatState {
    pub fn side(&self, side: Side) -> &[Character] {
        match side {
            Side::Players => &self.players,
            Side::Enemies => &self.enemies,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut [Character] {
        match side {
            Side::Players => &mut self.players,
            Side::Enemies => &mut self.enemies,
        }
    }

    pub fn character(&self, slot: Slot) -> Option<&Character> {
        self.side(slot.side).get(slot.index)
    }

    pub fn character_mut(&mut self, slot: Slot) -> Option<&mut Character> {
        self.side_mut(slot.side).get_mut(slot.index)
    }

    /// Populated slots of `side` in index order.
    pub fn slots(&self, side: Side) -> impl Iterator<Item = Slot> + '_ {
        (0..self.side(side).len()).map(move |index| Slot::new(side, index))
    }

    /// Populated slots of both sides, players first.
    pub fn all_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots(Side::Players).chain(self.slots(Side::Enemies))
    }

    /// Slots of `side` whose character has life > 0.
    pub fn living_slots(&self, side: Side) -> impl Iterator<Item = Slot> + '_ {
        self.slots(side).filter(move |slot| {
            self.character(*slot)
                .is_some_and(Character::is_alive)
        })
    }

    /// True iff every populated slot of `side` has life <= 0.
    pub fn side_lost(&self, side: Side) -> bool {
        self.side(side).iter().all(|character| !character.is_alive())
    }

    pub fn players_lost(&self) -> bool {
        self.side_lost(Side::Players)
    }

    pub fn enemies_lost(&self) -> bool {
        self.side_lost(Side::Enemies)
    }

    /// Win/lose judgement. Defeat is checked first.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.players_lost() {
            Some(Outcome::Defeat)
        } else if self.enemies_lost() {
            Some(Outcome::Victory)
        } else {
            None
        }
    }

    /// Rejects a state with an empty side.
    ///
    /// Roster capacity already bounds each side to the slot count.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        for side in Side::ALL {
            if self.side(side).is_empty() {
                return Err(ScenarioError::EmptySide { side });
            }
        }
        Ok(())
    }

    pub fn holds_item(&self, item: &ItemId) -> bool {
        self.player_items.contains(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn state(players: &[f64], enemies: &[f64]) -> CombatState {
        let roster = |lives: &[f64], prefix: &str| -> SideRoster {
            lives
                .iter()
                .enumerate()
                .map(|(i, life)| {
                    let mut character = Character::new(format!("{prefix}{i}"), Element::Normal);
                    character.life = *life;
                    character
                })
                .collect()
        };
        CombatState {
            players: roster(players, "p"),
            enemies: roster(enemies, "e"),
            player_items: Vec::new(),
            seed: 0,
            nonce: 0,
        }
    }

    #[test]
    fn ongoing_while_both_sides_stand() {
        assert_eq!(state(&[10.0, 0.0], &[5.0]).outcome(), None);
    }

    #[test]
    fn all_enemies_down_is_victory() {
        let state = state(&[0.0, 40.0], &[0.0, 0.0]);
        assert!(state.enemies_lost());
        assert_eq!(state.outcome(), Some(Outcome::Victory));
    }

    #[test]
    fn mutual_wipeout_is_defeat() {
        assert_eq!(state(&[0.0], &[0.0]).outcome(), Some(Outcome::Defeat));
    }

    #[test]
    fn living_slots_skip_the_dead() {
        let state = state(&[0.0, 40.0, 3.0], &[1.0]);
        let living: Vec<_> = state.living_slots(Side::Players).collect();
        assert_eq!(living, vec![Slot::player(1), Slot::player(2)]);
    }

    #[test]
    fn slot_codes_are_unique() {
        let codes: std::collections::BTreeSet<_> = (0..4)
            .flat_map(|i| [Slot::player(i).code(), Slot::enemy(i).code()])
            .collect();
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut original = state(&[100.0], &[60.0]);
        original.player_items.push("flash_scroll".into());
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"playerItems\""));
        let restored: CombatState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }
}
