//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration.

pub mod errors;
pub mod handle;
pub mod providers;

pub use errors::{ProviderKind, Result, RuntimeError};
pub use handle::CombatHandle;
pub use providers::{
    EnemyPolicy, FirstAbilityPolicy, MenuChoice, PlayerInput, Selector, TurnMenu, first_choice,
};
