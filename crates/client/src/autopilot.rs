//! Unattended player input: every hero plays like an enemy would.
use std::sync::Arc;

use async_trait::async_trait;
use combat_core::{Catalog, CombatState, Slot, TargetKind, TurnAction};
use combat_runtime::{FirstAbilityPolicy, MenuChoice, PlayerInput, Result, Selector, TurnMenu};

/// Picks the first usable ability and the first living target.
///
/// Leaves the combat when the acting hero has nothing usable.
#[derive(Clone, Debug)]
pub struct AutoPilot {
    catalog: Arc<Catalog>,
}

impl AutoPilot {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl PlayerInput for AutoPilot {
    async fn choose(&self, menu: &TurnMenu, state: &CombatState) -> Result<MenuChoice> {
        let choice = match FirstAbilityPolicy::plan(menu.actor, state, &self.catalog) {
            Some(TurnAction::Ability { ability, .. }) => MenuChoice::Ability(ability),
            _ => MenuChoice::Exit,
        };
        tracing::debug!("{} picks {:?}", menu.actor, choice);
        Ok(choice)
    }
}

#[async_trait]
impl Selector for AutoPilot {
    async fn select(
        &self,
        _actor: Slot,
        _kind: TargetKind,
        candidates: &[Slot],
        _state: &CombatState,
    ) -> Result<Option<Slot>> {
        Ok(candidates.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Character, Element, SideRoster};

    fn state(skills: &[&str]) -> CombatState {
        let mut hero = Character::new("Hector", Element::Order);
        hero.skills = skills.iter().map(|&skill| skill.into()).collect();
        CombatState {
            players: SideRoster::from_iter([hero]),
            enemies: SideRoster::from_iter([Character::new("Aura", Element::Light)]),
            player_items: Vec::new(),
            seed: 0,
            nonce: 0,
        }
    }

    #[tokio::test]
    async fn picks_the_first_known_ability() {
        let pilot = AutoPilot::new(Arc::new(Catalog::standard()));
        let state = state(&["slash", "justice"]);
        let menu = TurnMenu::for_actor(&state, Slot::player(0));

        let choice = pilot.choose(&menu, &state).await.unwrap();
        assert_eq!(choice, MenuChoice::Ability("slash".into()));

        let target = pilot
            .select(Slot::player(0), TargetKind::Enemy, &[Slot::enemy(0)], &state)
            .await
            .unwrap();
        assert_eq!(target, Some(Slot::enemy(0)));
    }

    #[tokio::test]
    async fn exits_when_nothing_is_usable() {
        let pilot = AutoPilot::new(Arc::new(Catalog::standard()));
        let state = state(&[]);
        let menu = TurnMenu::for_actor(&state, Slot::player(0));
        assert_eq!(pilot.choose(&menu, &state).await.unwrap(), MenuChoice::Exit);
    }
}
