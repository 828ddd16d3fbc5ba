//! View-layer contract consumed by the combat orchestrator.
//!
//! The view owns sprites, banners, curtains and life/timeline animation. The
//! orchestrator only awaits its completion signals and feeds it state.
use async_trait::async_trait;
use combat_core::{ActionReport, Character, CombatState, Outcome, Slot, TurnStart};
use serde::{Deserialize, Serialize};

use crate::api::Result;

mod tracing_view;

pub use tracing_view::TracingView;

/// Curtain color drawn over the battlefield when combat ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Curtain {
    /// Victory.
    Light,
    /// Defeat.
    Dark,
}

impl From<Outcome> for Curtain {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Victory => Curtain::Light,
            Outcome::Defeat => Curtain::Dark,
        }
    }
}

/// Sink for everything the combat shows.
///
/// Each method resolves when its animation or load has finished.
#[async_trait]
pub trait CombatView: Send + Sync {
    /// Load and place one character. Setup runs these concurrently.
    async fn prepare_character(&self, slot: Slot, character: &Character) -> Result<()>;

    /// Play the intro banner.
    async fn show_banner(&self) -> Result<()>;

    /// Fade the opening curtain away.
    async fn lift_curtain(&self) -> Result<()>;

    /// Dismiss the intro banner.
    async fn hide_banner(&self) -> Result<()>;

    async fn show_turn(&self, _turn: &TurnStart, _state: &CombatState) -> Result<()> {
        Ok(())
    }

    /// Animate the change records of a resolved action.
    async fn show_action(&self, report: &ActionReport, state: &CombatState) -> Result<()>;

    /// Fade to `curtain` before leaving the combat.
    async fn drop_curtain(&self, curtain: Curtain) -> Result<()>;
}

/// A view that shows nothing and finishes every request immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullView;

#[async_trait]
impl CombatView for NullView {
    async fn prepare_character(&self, _slot: Slot, _character: &Character) -> Result<()> {
        Ok(())
    }

    async fn show_banner(&self) -> Result<()> {
        Ok(())
    }

    async fn lift_curtain(&self) -> Result<()> {
        Ok(())
    }

    async fn hide_banner(&self) -> Result<()> {
        Ok(())
    }

    async fn show_action(&self, _report: &ActionReport, _state: &CombatState) -> Result<()> {
        Ok(())
    }

    async fn drop_curtain(&self, _curtain: Curtain) -> Result<()> {
        Ok(())
    }
}
