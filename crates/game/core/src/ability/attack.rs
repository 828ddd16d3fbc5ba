//! Attack shaping shared by the standard abilities.
//!
//! A character's base attack profile is scaled by its strength and
//! dexterity. Normal damage receives the full bonus, every other element half.

use crate::element::{Element, ElementMap};
use crate::state::CharHandle;

/// Strength and dexterity weights of a scaled attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackScaling {
    pub strength: f64,
    pub dexterity: f64,
}

impl AttackScaling {
    /// Melee favours strength.
    pub const MELEE: Self = Self {
        strength: 0.012,
        dexterity: 0.006,
    };

    /// Ranged favours dexterity.
    pub const RANGED: Self = Self {
        strength: 0.006,
        dexterity: 0.012,
    };
}

/// Scales `caster`'s attack profile. Zero and absent elements are skipped.
pub fn scaled_attack(caster: CharHandle<'_>, scaling: AttackScaling) -> ElementMap {
    let stats = caster.stats();
    let bonus_normal = stats.strength * scaling.strength + stats.dexterity * scaling.dexterity;
    let bonus_elemental = bonus_normal / 2.0;

    caster
        .attack_damage()
        .iter()
        .filter(|(_, value)| *value != 0.0)
        .map(|(element, value)| {
            let bonus = if element == Element::Normal {
                bonus_normal
            } else {
                bonus_elemental
            };
            (element, value * (1.0 + bonus))
        })
        .collect()
}

pub fn melee_attack(caster: CharHandle<'_>) -> ElementMap {
    scaled_attack(caster, AttackScaling::MELEE)
}

pub fn ranged_attack(caster: CharHandle<'_>) -> ElementMap {
    scaled_attack(caster, AttackScaling::RANGED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Character, CombatState, SideRoster, Stats, StepId, Transaction};

    fn with_caster(f: impl FnOnce(CharHandle<'_>)) {
        let mut caster = Character::new("Hector", Element::Light);
        caster.stats = Stats::new(50.0, 25.0, 0.0, 0.0);
        caster.damage = ElementMap::from([
            (Element::Normal, 10.0),
            (Element::Light, 4.0),
            (Element::Dark, 0.0),
        ]);
        let state = CombatState {
            players: SideRoster::from_iter([caster]),
            enemies: SideRoster::from_iter([Character::new("Aura", Element::Dark)]),
            player_items: Vec::new(),
            seed: 0,
            nonce: 0,
        };
        let tx = Transaction::open(StepId(0), &state);
        f(tx.player_char(0).unwrap());
    }

    #[test]
    fn melee_weights_strength() {
        with_caster(|caster| {
            let attack = melee_attack(caster);
            // bonus = 50 * 0.012 + 25 * 0.006 = 0.75
            assert!((attack.value(Element::Normal) - 17.5).abs() < 1e-9);
            assert!((attack.value(Element::Light) - 4.0 * 1.375).abs() < 1e-9);
        });
    }

    #[test]
    fn ranged_weights_dexterity() {
        with_caster(|caster| {
            let attack = ranged_attack(caster);
            // bonus = 50 * 0.006 + 25 * 0.012 = 0.6
            assert!((attack.value(Element::Normal) - 16.0).abs() < 1e-9);
        });
    }

    #[test]
    fn zero_entries_are_dropped() {
        with_caster(|caster| {
            let attack = melee_attack(caster);
            assert!(!attack.contains(Element::Dark));
            assert_eq!(attack.len(), 2);
        });
    }
}
