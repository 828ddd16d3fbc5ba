//! Ability descriptors and the catalog that registers them.
//!
//! An ability pairs immutable metadata with an effect function. Effects only
//! see [`CharHandle`]s: they read the step's baseline and queue their changes
//! into the transaction. Target resolution happens before the effect runs, so
//! the effect's shape ([`Effect::Single`] or [`Effect::Group`]) is fixed by the
//! descriptor's [`TargetKind`].

mod attack;
mod standard;
mod target;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use attack::{AttackScaling, melee_attack, ranged_attack, scaled_attack};
pub use target::{Target, TargetChoice, TargetKind, resolve_target, validate_choice};

use crate::element::{Element, are_allied};
use crate::engine::EngineError;
use crate::rng::Dice;
use crate::state::{AbilityId, CharClass, CharHandle, CombatState, ItemId, Slot, Transaction};

/// Effect on a single resolved target: `(dice, caster, target)`.
pub type SingleEffect = fn(&mut Dice, CharHandle<'_>, CharHandle<'_>);

/// Effect on every resolved target at once: `(dice, caster, targets)`.
pub type GroupEffect = fn(&mut Dice, CharHandle<'_>, &[CharHandle<'_>]);

/// Effect function, tagged by the shape of target it receives.
#[derive(Clone, Copy, Debug)]
pub enum Effect {
    Single(SingleEffect),
    Group(GroupEffect),
}

impl Effect {
    /// True if this effect can consume targets of `kind`.
    pub fn accepts(&self, kind: TargetKind) -> bool {
        match self {
            Effect::Single(_) => kind.is_single(),
            Effect::Group(_) => !kind.is_single(),
        }
    }
}

/// Which character classes may learn an ability.
///
/// Serialized as `"any"` or the class name (`"fighter"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ClassRestriction {
    Any,
    Only(CharClass),
}

impl fmt::Display for ClassRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassRestriction::Any => f.write_str("any"),
            ClassRestriction::Only(class) => write!(f, "{class}"),
        }
    }
}

impl FromStr for ClassRestriction {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(ClassRestriction::Any),
            class => class.parse().map(ClassRestriction::Only),
        }
    }
}

impl From<ClassRestriction> for String {
    fn from(restriction: ClassRestriction) -> Self {
        restriction.to_string()
    }
}

impl TryFrom<String> for ClassRestriction {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl ClassRestriction {
    pub fn admits(self, class: Option<CharClass>) -> bool {
        match self {
            ClassRestriction::Any => true,
            ClassRestriction::Only(required) => class == Some(required),
        }
    }
}

/// Animation the view plays when the ability is used.
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
pub enum Animation {
    Slash,
    Shoot,
    Spellcast,
}

/// Immutable description of one ability.
#[derive(Clone, Debug)]
pub struct AbilityDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub element: Element,
    pub class: ClassRestriction,
    pub target: TargetKind,
    /// Removed from the user's skills once chosen.
    pub single_use: bool,
    /// Turns spent charging before the effect is applied.
    pub extra_turns: u32,
    pub animation: Animation,
    pub on_scroll: bool,
    pub on_skillbook: bool,
    pub effect: Effect,
}

impl AbilityDescriptor {
    pub fn ability_id(&self) -> AbilityId {
        AbilityId::from(self.id)
    }

    /// A character can learn an ability of its own or an allied element,
    /// provided its class is admitted.
    pub fn learnable_by(&self, element: Element, class: Option<CharClass>) -> bool {
        let element_fits = element == self.element || are_allied(element, self.element);
        element_fits && self.class.admits(class)
    }

    /// Resolves targets inside `tx` and runs the effect with `caster`.
    pub fn apply(
        &self,
        tx: &Transaction,
        caster: Slot,
        choice: TargetChoice,
        dice: &mut Dice,
    ) -> Result<(), EngineError> {
        let caster_handle = tx.char(caster).ok_or(EngineError::InvalidTarget {
            side: caster.side,
            index: caster.index,
        })?;
        match (self.effect, resolve_target(tx, self.target, caster, choice)?) {
            (Effect::Single(effect), Target::Single(target)) => effect(dice, caster_handle, target),
            (Effect::Group(effect), Target::Group(targets)) => {
                effect(dice, caster_handle, &targets)
            }
            _ => {
                return Err(EngineError::EffectShapeMismatch {
                    ability: self.ability_id(),
                    target: self.target,
                });
            }
        }
        Ok(())
    }

    /// Item id of the scroll carrying this ability.
    pub fn scroll_id(&self) -> ItemId {
        ItemId::new(format!("{}_scroll", self.id))
    }
}

/// A consumable that casts an ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    pub id: ItemId,
    pub name: String,
    pub ability: AbilityId,
}

/// Registry of abilities and items, keyed by identifier.
///
/// Built once and shared read-only by the engine.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    abilities: BTreeMap<AbilityId, AbilityDescriptor>,
    items: BTreeMap<ItemId, ItemDescriptor>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard abilities plus one scroll per scroll-eligible ability.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for descriptor in standard::abilities() {
            catalog.abilities.insert(descriptor.ability_id(), descriptor);
        }
        catalog.register_scrolls();
        catalog
    }

    /// Adds an ability, checking its effect shape against its target kind.
    pub fn register_ability(&mut self, descriptor: AbilityDescriptor) -> Result<(), EngineError> {
        let id = descriptor.ability_id();
        if !descriptor.effect.accepts(descriptor.target) {
            return Err(EngineError::EffectShapeMismatch {
                ability: id,
                target: descriptor.target,
            });
        }
        if self.abilities.contains_key(&id) {
            return Err(EngineError::DuplicateAbility(id));
        }
        self.abilities.insert(id, descriptor);
        Ok(())
    }

    /// Adds an item. Its ability must already be registered.
    pub fn register_item(&mut self, item: ItemDescriptor) -> Result<(), EngineError> {
        self.ability(&item.ability)?;
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Registers `<ability>_scroll` for every scroll-eligible ability.
    pub fn register_scrolls(&mut self) {
        let scrolls: Vec<ItemDescriptor> = self
            .scroll_abilities()
            .map(|descriptor| ItemDescriptor {
                id: descriptor.scroll_id(),
                name: format!("Scroll of {}", descriptor.name),
                ability: descriptor.ability_id(),
            })
            .collect();
        for scroll in scrolls {
            self.items.insert(scroll.id.clone(), scroll);
        }
    }

    pub fn get_ability(&self, id: &AbilityId) -> Option<&AbilityDescriptor> {
        self.abilities.get(id)
    }

    /// Looks up an ability; an unknown identifier is an invariant violation.
    pub fn ability(&self, id: &AbilityId) -> Result<&AbilityDescriptor, EngineError> {
        self.get_ability(id)
            .ok_or_else(|| EngineError::UnknownAbility(id.clone()))
    }

    pub fn item(&self, id: &ItemId) -> Result<&ItemDescriptor, EngineError> {
        self.items
            .get(id)
            .ok_or_else(|| EngineError::UnknownItem(id.clone()))
    }

    pub fn abilities(&self) -> impl Iterator<Item = &AbilityDescriptor> {
        self.abilities.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemDescriptor> {
        self.items.values()
    }

    pub fn scroll_abilities(&self) -> impl Iterator<Item = &AbilityDescriptor> {
        self.abilities().filter(|descriptor| descriptor.on_scroll)
    }

    pub fn skillbook_abilities(&self) -> impl Iterator<Item = &AbilityDescriptor> {
        self.abilities().filter(|descriptor| descriptor.on_skillbook)
    }

    /// Abilities a character of `element` and `class` could learn.
    pub fn learnable_by(
        &self,
        element: Element,
        class: Option<CharClass>,
    ) -> impl Iterator<Item = &AbilityDescriptor> {
        self.abilities()
            .filter(move |descriptor| descriptor.learnable_by(element, class))
    }

    /// Checks that every skill, held item and charge in `state` is registered.
    pub fn validate_state(&self, state: &CombatState) -> Result<(), EngineError> {
        for slot in state.all_slots() {
            let Some(character) = state.character(slot) else {
                continue;
            };
            for skill in &character.skills {
                self.ability(skill)?;
            }
            if let Some(charge) = &character.charge {
                self.ability(&charge.ability)?;
            }
        }
        for item in &state.player_items {
            self.item(item)?;
        }
        Ok(())
    }
}
