//! A view that narrates combat through `tracing`.
use async_trait::async_trait;
use combat_core::{ActionReport, Character, CombatState, Slot, TurnStart};

use super::{CombatView, Curtain};
use crate::api::Result;

/// Logs every view request at `info`, and change records at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingView;

#[async_trait]
impl CombatView for TracingView {
    async fn prepare_character(&self, slot: Slot, character: &Character) -> Result<()> {
        tracing::info!(
            "{slot}: {} ({}) life {:.1}, speed {:.1}, next turn {:.1}",
            character.name,
            character.element,
            character.life,
            character.speed,
            character.next_turn
        );
        Ok(())
    }

    async fn show_banner(&self) -> Result<()> {
        tracing::info!("Get ready!");
        Ok(())
    }

    async fn lift_curtain(&self) -> Result<()> {
        Ok(())
    }

    async fn hide_banner(&self) -> Result<()> {
        Ok(())
    }

    async fn show_turn(&self, turn: &TurnStart, state: &CombatState) -> Result<()> {
        let name = state
            .character(turn.actor)
            .map_or("?", |character| character.name.as_str());
        match &turn.charge {
            Some(charge) => tracing::info!(
                "{} ({}) keeps charging {} after {:.1}",
                name,
                turn.actor,
                charge.ability,
                turn.elapsed
            ),
            None => tracing::info!("{} ({}) acts after {:.1}", name, turn.actor, turn.elapsed),
        }
        Ok(())
    }

    async fn show_action(&self, report: &ActionReport, state: &CombatState) -> Result<()> {
        tracing::info!(
            "{} used {} ({:?})",
            report.actor,
            report.ability,
            report.resolution
        );
        for record in report.changes.changed() {
            let name = state
                .character(record.slot)
                .map_or("?", |character| character.name.as_str());
            tracing::debug!(
                "  {name}: life {:.1} -> {:.1}, speed {:.1} -> {:.1}, next turn {:.1} -> {:.1}",
                record.cur_life(),
                record.target_life(),
                record.cur_speed(),
                record.target_speed(),
                record.cur_next_turn(),
                record.target_next_turn()
            );
        }
        Ok(())
    }

    async fn drop_curtain(&self, curtain: Curtain) -> Result<()> {
        tracing::info!("Curtain falls ({:?})", curtain);
        Ok(())
    }
}
