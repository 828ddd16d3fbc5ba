//! Target kinds and their resolution into character handles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::state::{CharHandle, CombatState, Side, Slot, Transaction};

/// What an ability targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// One living opponent.
    Enemy,
    /// Every living opponent.
    Enemies,
    /// One living member of the caster's side.
    Ally,
    /// Every living member of the caster's side.
    Allies,
    /// The caster.
    #[serde(rename = "self")]
    SelfOnly,
    /// Every living character on both sides.
    All,
}

impl TargetKind {
    /// True when the effect receives a single handle.
    pub fn is_single(self) -> bool {
        matches!(self, Self::Enemy | Self::Ally | Self::SelfOnly)
    }

    /// Side from which an explicit index is chosen, if any.
    pub fn selection_side(self, caster: Side) -> Option<Side> {
        match self {
            Self::Enemy => Some(caster.opponent()),
            Self::Ally => Some(caster),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enemy => "enemy",
            Self::Enemies => "enemies",
            Self::Ally => "ally",
            Self::Allies => "allies",
            Self::SelfOnly => "self",
            Self::All => "all",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller's target selection, relative to the caster.
///
/// `Index` picks a slot on the side given by
/// [`TargetKind::selection_side`]; kinds without a selection take `Implicit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetChoice {
    Implicit,
    Index(usize),
}

/// Resolved targets, shaped like the effect that consumes them.
#[derive(Clone, Debug)]
pub enum Target<'t> {
    Single(CharHandle<'t>),
    Group(Vec<CharHandle<'t>>),
}

/// Resolves `choice` for `kind` into handles of `tx`.
///
/// Group kinds include only characters alive at the start of the step.
pub fn resolve_target<'t>(
    tx: &'t Transaction,
    kind: TargetKind,
    caster: Slot,
    choice: TargetChoice,
) -> Result<Target<'t>, EngineError> {
    match kind {
        TargetKind::Enemy | TargetKind::Ally => {
            let side = if kind == TargetKind::Enemy {
                caster.side.opponent()
            } else {
                caster.side
            };
            let TargetChoice::Index(index) = choice else {
                return Err(EngineError::MissingTarget { kind });
            };
            tx.char(Slot::new(side, index))
                .filter(CharHandle::is_alive)
                .map(Target::Single)
                .ok_or(EngineError::InvalidTarget { side, index })
        }
        TargetKind::SelfOnly => tx
            .char(caster)
            .map(Target::Single)
            .ok_or(EngineError::InvalidTarget {
                side: caster.side,
                index: caster.index,
            }),
        TargetKind::Enemies => Ok(Target::Group(tx.living_chars(caster.side.opponent()))),
        TargetKind::Allies => Ok(Target::Group(tx.living_chars(caster.side))),
        TargetKind::All => {
            let mut handles = tx.living_player_chars();
            handles.extend(tx.living_enemy_chars());
            Ok(Target::Group(handles))
        }
    }
}

/// Checks `choice` against `state` without opening a step.
pub fn validate_choice(
    state: &CombatState,
    kind: TargetKind,
    caster: Slot,
    choice: TargetChoice,
) -> Result<(), EngineError> {
    let Some(side) = kind.selection_side(caster.side) else {
        return Ok(());
    };
    let TargetChoice::Index(index) = choice else {
        return Err(EngineError::MissingTarget { kind });
    };
    match state.character(Slot::new(side, index)) {
        Some(character) if character.is_alive() => Ok(()),
        _ => Err(EngineError::InvalidTarget { side, index }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::state::{Character, SideRoster, StepId};

    fn state() -> CombatState {
        let mut fallen = Character::new("Fallen", Element::Normal);
        fallen.life = 0.0;
        CombatState {
            players: SideRoster::from_iter([
                Character::new("Hector", Element::Light),
                Character::new("Eowylle", Element::Life),
            ]),
            enemies: SideRoster::from_iter([fallen, Character::new("Aura", Element::Dark)]),
            player_items: Vec::new(),
            seed: 0,
            nonce: 0,
        }
    }

    fn slots(target: Target<'_>) -> Vec<Slot> {
        match target {
            Target::Single(handle) => vec![handle.slot()],
            Target::Group(handles) => handles.iter().map(CharHandle::slot).collect(),
        }
    }

    #[test]
    fn single_enemy_indexes_the_opposing_side() {
        let state = state();
        let tx = Transaction::open(StepId(0), &state);
        let target =
            resolve_target(&tx, TargetKind::Enemy, Slot::player(0), TargetChoice::Index(1))
                .unwrap();
        assert_eq!(slots(target), vec![Slot::enemy(1)]);

        // From the enemy side, "enemy" means a player.
        let target =
            resolve_target(&tx, TargetKind::Enemy, Slot::enemy(1), TargetChoice::Index(0))
                .unwrap();
        assert_eq!(slots(target), vec![Slot::player(0)]);
    }

    #[test]
    fn dead_or_missing_targets_are_rejected() {
        let state = state();
        let tx = Transaction::open(StepId(0), &state);
        let dead =
            resolve_target(&tx, TargetKind::Enemy, Slot::player(0), TargetChoice::Index(0));
        assert!(matches!(dead, Err(EngineError::InvalidTarget { index: 0, .. })));
        let empty = resolve_target(&tx, TargetKind::Ally, Slot::player(0), TargetChoice::Index(3));
        assert!(matches!(empty, Err(EngineError::InvalidTarget { index: 3, .. })));
        let missing = resolve_target(&tx, TargetKind::Ally, Slot::player(0), TargetChoice::Implicit);
        assert!(matches!(missing, Err(EngineError::MissingTarget { .. })));
    }

    #[test]
    fn group_kinds_contain_only_the_living() {
        let state = state();
        let tx = Transaction::open(StepId(0), &state);
        let enemies =
            resolve_target(&tx, TargetKind::Enemies, Slot::player(0), TargetChoice::Implicit)
                .unwrap();
        assert_eq!(slots(enemies), vec![Slot::enemy(1)]);
        let all =
            resolve_target(&tx, TargetKind::All, Slot::player(0), TargetChoice::Implicit).unwrap();
        assert_eq!(
            slots(all),
            vec![Slot::player(0), Slot::player(1), Slot::enemy(1)]
        );
    }

    #[test]
    fn self_ignores_the_choice() {
        let state = state();
        let tx = Transaction::open(StepId(0), &state);
        let target =
            resolve_target(&tx, TargetKind::SelfOnly, Slot::player(1), TargetChoice::Index(3))
                .unwrap();
        assert_eq!(slots(target), vec![Slot::player(1)]);
    }

    #[test]
    fn validation_agrees_with_resolution() {
        let state = state();
        let caster = Slot::player(0);
        assert!(validate_choice(&state, TargetKind::Enemy, caster, TargetChoice::Index(1)).is_ok());
        assert_eq!(
            validate_choice(&state, TargetKind::Enemy, caster, TargetChoice::Index(0)),
            Err(EngineError::InvalidTarget {
                side: Side::Enemies,
                index: 0
            })
        );
        assert!(validate_choice(&state, TargetKind::All, caster, TargetChoice::Implicit).is_ok());
    }

    #[test]
    fn target_kinds_serialize_like_the_catalog_names_them() {
        assert_eq!(serde_json::to_value(TargetKind::SelfOnly).unwrap(), "self");
        assert_eq!(serde_json::to_value(TargetKind::Enemies).unwrap(), "enemies");
    }
}
