//! Runtime orchestration for turn-based combat.
//!
//! This crate wires the deterministic combat engine to its external
//! collaborators (view, player input, target selection, enemy policy) and
//! exposes a builder-based API. Consumers embed [`Combat`] to run an
//! encounter and observe it through [`CombatHandle`].
//!
//! Modules are organized by responsibility:
//! - [`combat`] hosts the orchestrator, its builder and configuration
//! - [`api`] exposes the types downstream clients implement or call
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`view`] defines the view-layer contract and bundled views
pub mod api;
pub mod combat;
pub mod events;
pub mod view;

pub use api::{
    CombatHandle, EnemyPolicy, FirstAbilityPolicy, MenuChoice, PlayerInput, ProviderKind, Result,
    RuntimeError, Selector, TurnMenu, first_choice,
};
pub use combat::{
    Combat, CombatBuilder, CombatExit, Destination, Destinations, RuntimeConfig,
};
pub use events::{Event, EventBus, StateEvent, Topic, TurnEvent};
pub use view::{CombatView, Curtain, NullView, TracingView};
