//! Speculative steps over the combat state.
//!
//! A [`Transaction`] holds two copies of the state: the baseline, which is
//! what every read observes, and a shadow that collects every mutation. Ability
//! effects receive [`CharHandle`]s, so several characters can be read and
//! changed at once without aliasing the live state. Nothing becomes
//! authoritative until the engine commits the step, at which point life is
//! clamped and the shadow replaces the live characters wholesale.

use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AbilityId, Character, Charge, CombatState, ItemId, Side, Slot, Stats};
use crate::config::CombatConfig;
use crate::element::{Element, ElementMap};
use crate::speed::change_next_turn;

/// Identifies one step of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepId(pub u64);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn clamp_life(life: f64) -> f64 {
    life.clamp(0.0, CombatConfig::MAX_LIFE)
}

/// Current and target value of one animated quantity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub current: f64,
    pub target: f64,
}

impl Change {
    #[inline]
    pub fn changed(&self) -> bool {
        self.current != self.target
    }

    pub fn delta(&self) -> f64 {
        self.target - self.current
    }
}

/// What a step did to one character, as the view layer animates it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub slot: Slot,
    /// Target life is already clamped to `[0, 100]`.
    pub life: Change,
    pub next_turn: Change,
    pub speed: Change,
}

impl ChangeRecord {
    fn between(slot: Slot, current: &Character, target: &Character) -> Self {
        Self {
            slot,
            life: Change {
                current: current.life,
                target: clamp_life(target.life),
            },
            next_turn: Change {
                current: current.next_turn,
                target: target.next_turn,
            },
            speed: Change {
                current: current.speed,
                target: target.speed,
            },
        }
    }

    pub fn did_life_change(&self) -> bool {
        self.life.changed()
    }

    pub fn cur_life(&self) -> f64 {
        self.life.current
    }

    pub fn target_life(&self) -> f64 {
        self.life.target
    }

    pub fn did_next_turn_change(&self) -> bool {
        self.next_turn.changed()
    }

    pub fn cur_next_turn(&self) -> f64 {
        self.next_turn.current
    }

    pub fn target_next_turn(&self) -> f64 {
        self.next_turn.target
    }

    pub fn did_speed_change(&self) -> bool {
        self.speed.changed()
    }

    pub fn cur_speed(&self) -> f64 {
        self.speed.current
    }

    pub fn target_speed(&self) -> f64 {
        self.speed.target
    }

    /// True when none of the animated quantities changed.
    pub fn is_unchanged(&self) -> bool {
        !(self.did_life_change() || self.did_next_turn_change() || self.did_speed_change())
    }

    /// True when this step takes the character from alive to dead.
    pub fn is_death(&self) -> bool {
        self.life.current > 0.0 && self.life.target <= 0.0
    }
}

/// Change records of a committed step, one per populated slot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitReport {
    pub step: Option<StepId>,
    pub records: Vec<ChangeRecord>,
}

impl CommitReport {
    pub fn record(&self, slot: Slot) -> Option<&ChangeRecord> {
        self.records.iter().find(|record| record.slot == slot)
    }

    /// Records that changed something, in slot order.
    pub fn changed(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter().filter(|record| !record.is_unchanged())
    }

    /// Slots that died in this step.
    pub fn deaths(&self) -> impl Iterator<Item = Slot> + '_ {
        self.records
            .iter()
            .filter(|record| record.is_death())
            .map(|record| record.slot)
    }
}

/// One open step: a baseline and the shadow it is turned into.
///
/// Created by [`CombatEngine::start_step`](crate::engine::CombatEngine::start_step)
/// and consumed by `commit` or `abandon`; both take the transaction by value,
/// so a finished step cannot be mutated again.
#[derive(Debug)]
#[must_use = "an open step blocks the engine until it is committed or abandoned"]
pub struct Transaction {
    step: StepId,
    baseline: CombatState,
    shadow: RefCell<CombatState>,
}

impl Transaction {
    pub(crate) fn open(step: StepId, state: &CombatState) -> Self {
        Self {
            step,
            baseline: state.clone(),
            shadow: RefCell::new(state.clone()),
        }
    }

    pub fn step(&self) -> StepId {
        self.step
    }

    /// The state as it was when the step opened.
    pub fn baseline(&self) -> &CombatState {
        &self.baseline
    }

    /// Handle for a populated slot.
    pub fn char(&self, slot: Slot) -> Option<CharHandle<'_>> {
        let current = self.baseline.character(slot)?;
        Some(CharHandle {
            tx: self,
            slot,
            current,
        })
    }

    pub fn player_char(&self, index: usize) -> Option<CharHandle<'_>> {
        self.char(Slot::player(index))
    }

    pub fn enemy_char(&self, index: usize) -> Option<CharHandle<'_>> {
        self.char(Slot::enemy(index))
    }

    /// Handles for every populated slot of `side`, in index order.
    pub fn chars(&self, side: Side) -> Vec<CharHandle<'_>> {
        self.baseline
            .slots(side)
            .filter_map(|slot| self.char(slot))
            .collect()
    }

    /// Like [`Transaction::chars`], restricted to characters with life > 0.
    pub fn living_chars(&self, side: Side) -> Vec<CharHandle<'_>> {
        self.baseline
            .living_slots(side)
            .filter_map(|slot| self.char(slot))
            .collect()
    }

    pub fn player_chars(&self) -> Vec<CharHandle<'_>> {
        self.chars(Side::Players)
    }

    pub fn enemy_chars(&self) -> Vec<CharHandle<'_>> {
        self.chars(Side::Enemies)
    }

    pub fn living_player_chars(&self) -> Vec<CharHandle<'_>> {
        self.living_chars(Side::Players)
    }

    pub fn living_enemy_chars(&self) -> Vec<CharHandle<'_>> {
        self.living_chars(Side::Enemies)
    }

    /// Pending changes of one populated slot.
    pub fn change_record(&self, slot: Slot) -> Option<ChangeRecord> {
        let current = self.baseline.character(slot)?;
        let shadow = self.shadow.borrow();
        let target = shadow.character(slot)?;
        Some(ChangeRecord::between(slot, current, target))
    }

    pub fn player_change_record(&self, index: usize) -> Option<ChangeRecord> {
        self.change_record(Slot::player(index))
    }

    pub fn enemy_change_record(&self, index: usize) -> Option<ChangeRecord> {
        self.change_record(Slot::enemy(index))
    }

    /// Pending changes of every populated slot, players first.
    pub fn change_records(&self) -> Vec<ChangeRecord> {
        self.baseline
            .all_slots()
            .filter_map(|slot| self.change_record(slot))
            .collect()
    }

    /// Removes one copy of `item` from the player side's items.
    pub(crate) fn consume_item(&self, item: &ItemId) -> bool {
        let mut shadow = self.shadow.borrow_mut();
        match shadow.player_items.iter().position(|held| held == item) {
            Some(position) => {
                shadow.player_items.remove(position);
                true
            }
            None => false,
        }
    }

    /// Subtracts `dt` from the countdown of every living character.
    pub(crate) fn advance_time(&self, dt: f64) {
        let mut shadow = self.shadow.borrow_mut();
        for side in Side::ALL {
            for character in shadow.side_mut(side) {
                if character.is_alive() {
                    character.next_turn -= dt;
                }
            }
        }
    }

    fn update(&self, slot: Slot, f: impl FnOnce(&mut Character)) {
        if let Some(target) = self.shadow.borrow_mut().character_mut(slot) {
            f(target);
        }
    }

    /// Clamps life and overwrites `live` with the shadow.
    pub(crate) fn commit_into(self, live: &mut CombatState) -> CommitReport {
        let records = self.change_records();
        let mut shadow = self.shadow.into_inner();
        for side in Side::ALL {
            for character in shadow.side_mut(side) {
                character.life = clamp_life(character.life);
            }
        }
        live.players = shadow.players;
        live.enemies = shadow.enemies;
        live.player_items = shadow.player_items;
        CommitReport {
            step: Some(self.step),
            records,
        }
    }
}

/// Capability over one character inside a [`Transaction`].
///
/// Reads observe the step's baseline; mutations accumulate in the shadow and
/// only become visible after commit.
#[derive(Clone, Copy)]
pub struct CharHandle<'t> {
    tx: &'t Transaction,
    slot: Slot,
    current: &'t Character,
}

impl fmt::Debug for CharHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharHandle")
            .field("step", &self.tx.step)
            .field("slot", &self.slot)
            .field("name", &self.current.name)
            .finish()
    }
}

impl<'t> CharHandle<'t> {
    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn name(&self) -> &'t str {
        &self.current.name
    }

    pub fn life(&self) -> f64 {
        self.current.life
    }

    pub fn is_alive(&self) -> bool {
        self.current.is_alive()
    }

    pub fn next_turn(&self) -> f64 {
        self.current.next_turn
    }

    pub fn speed(&self) -> f64 {
        self.current.speed
    }

    pub fn resists(&self) -> &'t ElementMap {
        &self.current.resists
    }

    pub fn stats(&self) -> &'t Stats {
        &self.current.stats
    }

    pub fn attack_damage(&self) -> &'t ElementMap {
        &self.current.damage
    }

    pub fn element(&self) -> Element {
        self.current.element
    }

    /// Pending changes of this character.
    pub fn change_record(&self) -> Option<ChangeRecord> {
        self.tx.change_record(self.slot)
    }

    /// Adds each entry to the resistances; absent elements start from 0.
    pub fn change_resists(&self, deltas: &ElementMap) {
        self.tx
            .update(self.slot, |target| target.resists.apply_deltas(deltas));
    }

    pub fn change_stats(&self, deltas: &Stats) {
        self.tx
            .update(self.slot, |target| target.stats.apply_deltas(deltas));
    }

    pub fn change_attack_damage(&self, deltas: &ElementMap) {
        self.tx
            .update(self.slot, |target| target.damage.apply_deltas(deltas));
    }

    /// Negative amounts count as zero here and in the mutators below.
    pub fn deal_damage(&self, amount: f64) {
        let amount = amount.max(0.0);
        self.tx.update(self.slot, |target| target.life -= amount);
    }

    pub fn heal(&self, amount: f64) {
        let amount = amount.max(0.0);
        self.tx.update(self.slot, |target| target.life += amount);
    }

    /// Pushes the next turn back by `time` units.
    pub fn delay(&self, time: f64) {
        let time = time.max(0.0);
        self.tx.update(self.slot, |target| target.next_turn += time);
    }

    pub fn speed_up(&self, amount: f64) {
        self.change_speed(amount.max(0.0));
    }

    pub fn slow_down(&self, amount: f64) {
        self.change_speed(-amount.max(0.0));
    }

    /// Shifts speed and rescales the pending countdown to the new cycle.
    fn change_speed(&self, delta: f64) {
        self.tx.update(self.slot, |target| {
            let old_speed = target.speed;
            target.speed += delta;
            target.next_turn = change_next_turn(target.next_turn, old_speed, target.speed);
        });
    }

    /// Ends this character's turn: the countdown restarts from the speed the
    /// action left it with.
    pub(crate) fn end_turn(&self) {
        self.tx.update(self.slot, |target| {
            target.next_turn += target.time_between_turns();
        });
    }

    pub(crate) fn set_charge(&self, charge: Option<Charge>) {
        self.tx.update(self.slot, |target| target.charge = charge);
    }

    pub(crate) fn forget(&self, ability: &AbilityId) {
        self.tx.update(self.slot, |target| {
            target.forget(ability);
        });
    }
}
