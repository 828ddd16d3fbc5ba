//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the combat engine, the view layer, and action providers
//! so clients can bubble them up with consistent context.
use std::fmt;

use combat_core::{EngineError, SetupError, Slot};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("{kind} provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("combat requires a scenario or a state before building")]
    MissingScenario,

    #[error("{actor} has no usable action")]
    NoUsableAction { actor: Slot },

    #[error("view failed: {0}")]
    View(String),

    #[error("{kind} provider failed: {message}")]
    Provider { kind: ProviderKind, message: String },

    #[error("setup task join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Player,
    Selector,
    Enemy,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Selector => "selector",
            ProviderKind::Enemy => "enemy",
        };
        write!(f, "{}", label)
    }
}
