//! Combatant records.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ability::TargetChoice;
use crate::element::{Element, ElementMap};
use crate::speed::time_from_speed;

/// Identifier of an ability in the catalog (`"slash"`, `"heal"`, ...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityId(String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AbilityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a combat item held by the player side.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Character classes gate which abilities a character may learn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CharClass {
    Fighter,
    Archer,
    Mage,
}

/// Primary attributes. Abilities scale their effects from these.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub strength: f64,
    pub dexterity: f64,
    pub magic: f64,
    pub vitality: f64,
}

impl Stats {
    pub fn new(strength: f64, dexterity: f64, magic: f64, vitality: f64) -> Self {
        Self {
            strength,
            dexterity,
            magic,
            vitality,
        }
    }

    /// Adds every field of `deltas`; negative deltas reduce a stat.
    pub fn apply_deltas(&mut self, deltas: &Stats) {
        self.strength += deltas.strength;
        self.dexterity += deltas.dexterity;
        self.magic += deltas.magic;
        self.vitality += deltas.vitality;
    }
}

/// A multi-turn ability in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub ability: AbilityId,
    pub target: TargetChoice,
    /// Turns still to spend before the ability is applied.
    pub remaining: u32,
}

/// One combatant for the duration of an encounter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    /// In `[0, 100]` after every commit; 0 means dead.
    pub life: f64,
    pub speed: f64,
    /// Time units until this character acts.
    pub next_turn: f64,
    #[serde(default)]
    pub resists: ElementMap,
    /// Base attack profile before stat scaling.
    #[serde(default)]
    pub damage: ElementMap,
    #[serde(default)]
    pub stats: Stats,
    pub element: Element,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<CharClass>,
    /// Unique, ordered. Single-use abilities are removed once chosen.
    #[serde(default)]
    pub skills: Vec<AbilityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spritesheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<Charge>,
}

impl Character {
    /// A fresh character at full life, speed 0, ready to act immediately.
    pub fn new(name: impl Into<String>, element: Element) -> Self {
        Self {
            name: name.into(),
            life: crate::config::CombatConfig::MAX_LIFE,
            speed: 0.0,
            next_turn: 0.0,
            resists: ElementMap::new(),
            damage: ElementMap::new(),
            stats: Stats::default(),
            element,
            class: None,
            skills: Vec::new(),
            spritesheet: None,
            charge: None,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn knows(&self, ability: &AbilityId) -> bool {
        self.skills.contains(ability)
    }

    /// Time units this character waits between two of its turns.
    pub fn time_between_turns(&self) -> f64 {
        time_from_speed(self.speed)
    }

    /// Drops `ability` from the skill list. Returns false if it was not known.
    pub fn forget(&mut self, ability: &AbilityId) -> bool {
        let before = self.skills.len();
        self.skills.retain(|known| known != ability);
        self.skills.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_at_zero_life() {
        let mut hero = Character::new("Hector", Element::Light);
        assert!(hero.is_alive());
        hero.life = 0.0;
        assert!(!hero.is_alive());
    }

    #[test]
    fn forgetting_removes_the_skill_once() {
        let mut hero = Character::new("Rand", Element::Dark);
        hero.skills = vec!["shoot".into(), "terrify".into()];
        assert!(hero.forget(&"terrify".into()));
        assert!(!hero.forget(&"terrify".into()));
        assert_eq!(hero.skills, vec![AbilityId::from("shoot")]);
    }

    #[test]
    fn character_fields_use_camel_case() {
        let mut hero = Character::new("Eowylle", Element::Life);
        hero.next_turn = 12.5;
        let json = serde_json::to_value(&hero).unwrap();
        assert_eq!(json["nextTurn"], 12.5);
        assert_eq!(json["element"], "life");
        assert!(json.get("charge").is_none());
    }

    #[test]
    fn stat_deltas_accumulate() {
        let mut stats = Stats::new(10.0, 5.0, 0.0, 8.0);
        stats.apply_deltas(&Stats {
            magic: 3.0,
            strength: -2.0,
            ..Stats::default()
        });
        assert_eq!(stats, Stats::new(8.0, 5.0, 3.0, 8.0));
    }
}
