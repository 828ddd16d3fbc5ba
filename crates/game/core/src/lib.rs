//! Deterministic turn-based combat rules shared by every frontend.
//!
//! `combat-core` defines the canonical rules (elements, abilities, characters,
//! turn scheduling) and exposes pure APIs that the runtime and offline tools
//! reuse. All state mutation flows through [`engine::CombatEngine`], which opens
//! one [`state::Transaction`] per step and commits it atomically.
pub mod ability;
pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod rng;
pub mod speed;
pub mod state;

pub use ability::{
    AbilityDescriptor, Animation, AttackScaling, Catalog, ClassRestriction, Effect, GroupEffect,
    ItemDescriptor, SingleEffect, Target, TargetChoice, TargetKind, melee_attack, ranged_attack,
    resolve_target, scaled_attack, validate_choice,
};
pub use config::CombatConfig;
pub use element::{
    Element, ElementMap, are_allied, are_opposed, compute_damage, resist_multiplier,
};
pub use engine::{
    ActionReport, CombatEngine, EngineError, Resolution, SetupError, TurnAction, TurnPhase,
    TurnStart,
};
pub use error::{CombatError, ErrorSeverity};
pub use rng::{Dice, compute_seed};
pub use speed::{change_next_turn, time_from_speed};
pub use state::{
    AbilityId, ChangeRecord, CharClass, CharHandle, Character, CharacterSpec, Charge,
    CombatState, CommitReport, ItemId, Outcome, Scenario, ScenarioError, Side, SideRoster, Slot,
    Stats, StepId, Transaction,
};
