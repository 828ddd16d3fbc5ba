//! High-level combat orchestrator.
//!
//! [`Combat`] owns the engine and the injected collaborators, and sequences
//! an encounter: setup, reveal, the turn loop, then resolution or exit. Each
//! view or input request is a continuation point the orchestrator awaits
//! before moving on; no two requests of the same stage overlap except the
//! per-character setup loads, which are joined as a barrier.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use combat_core::{
    ActionReport, Catalog, CombatConfig, CombatEngine, CombatState, Outcome, Scenario, Side, Slot,
    TargetChoice, TargetKind, TurnAction, TurnStart,
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::api::{
    CombatHandle, EnemyPolicy, FirstAbilityPolicy, MenuChoice, PlayerInput, ProviderKind, Result,
    RuntimeError, Selector, TurnMenu,
};
use crate::events::{EventBus, StateEvent, TurnEvent};
use crate::view::{CombatView, Curtain, NullView};

/// Where the combat hands control when it ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Win,
    Lose,
    Exit,
}

impl From<Outcome> for Destination {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Victory => Destination::Win,
            Outcome::Defeat => Destination::Lose,
        }
    }
}

/// Screen names for each [`Destination`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destinations {
    pub win: String,
    pub lose: String,
    pub exit: String,
}

impl Destinations {
    pub fn screen(&self, destination: Destination) -> &str {
        match destination {
            Destination::Win => &self.win,
            Destination::Lose => &self.lose,
            Destination::Exit => &self.exit,
        }
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self {
            win: "combat_end".to_string(),
            lose: "combat_end".to_string(),
            exit: "main_menu".to_string(),
        }
    }
}

/// Runtime configuration shared by the orchestrator and its event bus.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    pub destinations: Destinations,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            destinations: Destinations::default(),
            event_buffer_size: 100,
        }
    }
}

impl RuntimeConfig {
    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_WIN_SCREEN` - Destination after a victory (default: combat_end)
    /// - `COMBAT_LOSE_SCREEN` - Destination after a defeat (default: combat_end)
    /// - `COMBAT_EXIT_SCREEN` - Destination when the player leaves (default: main_menu)
    /// - `COMBAT_SEED` - Seed for every roll of the encounter
    /// - `COMBAT_EVENT_BUFFER` - Event capacity per topic (default: 100)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(screen) = read_env::<String>("COMBAT_WIN_SCREEN") {
            config.destinations.win = screen;
        }
        if let Some(screen) = read_env::<String>("COMBAT_LOSE_SCREEN") {
            config.destinations.lose = screen;
        }
        if let Some(screen) = read_env::<String>("COMBAT_EXIT_SCREEN") {
            config.destinations.exit = screen;
        }
        if let Some(seed) = read_env::<u64>("COMBAT_SEED") {
            config.combat.seed = seed;
        }
        if let Some(size) = read_env::<usize>("COMBAT_EVENT_BUFFER") {
            config.event_buffer_size = size.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// How a combat ended, with the state left for whatever comes next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatExit {
    pub destination: Destination,
    /// Screen name configured for `destination`.
    pub screen: String,
    /// `None` when the player left before either side was wiped out.
    pub outcome: Option<Outcome>,
    pub state: CombatState,
}

/// Combat orchestrator.
///
/// Design: Combat owns the engine and drives it to completion.
/// [`CombatHandle`] provides a cloneable façade for observers.
pub struct Combat {
    config: RuntimeConfig,
    engine: CombatEngine,
    view: Arc<dyn CombatView>,
    input: Arc<dyn PlayerInput>,
    selector: Arc<dyn Selector>,
    enemy_policy: Arc<dyn EnemyPolicy>,
    handle: CombatHandle,
}

impl Combat {
    /// Create a new combat builder
    pub fn builder() -> CombatBuilder {
        CombatBuilder::new()
    }

    /// Get a cloneable handle to this combat
    pub fn handle(&self) -> CombatHandle {
        self.handle.clone()
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn state(&self) -> &CombatState {
        self.engine.state()
    }

    /// Run the encounter to its end.
    ///
    /// Fatal engine errors and collaborator failures abort the combat; a
    /// rejected player choice only sends the player back to the menu.
    pub async fn run(mut self) -> Result<CombatExit> {
        tracing::info!(
            "Combat starting: {} players vs {} enemies",
            self.state().players.len(),
            self.state().enemies.len()
        );

        self.setup().await?;
        self.reveal().await?;
        self.engine.begin()?;

        loop {
            if let Some(outcome) = self.engine.outcome() {
                return self.finish(outcome).await;
            }
            if self.handle.exit_requested() {
                tracing::info!("Exit requested");
                return Ok(self.leave(Destination::Exit, None));
            }

            let turn = self.engine.next_turn()?;
            self.announce(&turn).await?;

            let report = if turn.charge.is_some() {
                self.engine.resolve(TurnAction::ContinueCharge)?
            } else {
                match turn.actor.side {
                    Side::Enemies => self.enemy_turn(turn.actor).await?,
                    Side::Players => match self.player_turn(turn.actor).await? {
                        Some(report) => report,
                        None => {
                            tracing::info!("{} chose to exit", turn.actor);
                            return Ok(self.leave(Destination::Exit, None));
                        }
                    },
                }
            };
            self.after_action(report).await?;
        }
    }

    /// Loads every character concurrently alongside the intro banner and
    /// waits for all of them.
    async fn setup(&self) -> Result<()> {
        let state = self.engine.state();
        let mut loads = JoinSet::new();
        for slot in state.all_slots() {
            let Some(character) = state.character(slot).cloned() else {
                continue;
            };
            let view = Arc::clone(&self.view);
            loads.spawn(async move { view.prepare_character(slot, &character).await });
        }
        tracing::debug!("Preparing {} characters", loads.len());

        let characters = async {
            while let Some(joined) = loads.join_next().await {
                joined.map_err(RuntimeError::WorkerJoin)??;
            }
            Ok::<_, RuntimeError>(())
        };
        let (characters, banner) = tokio::join!(characters, self.view.show_banner());
        characters?;
        banner
    }

    async fn reveal(&self) -> Result<()> {
        let (curtain, banner) = tokio::join!(self.view.lift_curtain(), self.view.hide_banner());
        curtain?;
        banner
    }

    async fn announce(&self, turn: &TurnStart) -> Result<()> {
        self.handle.event_bus().publish(TurnEvent::Started {
            actor: turn.actor,
            elapsed: turn.elapsed,
            charging: turn.charge.is_some(),
        });
        self.view.show_turn(turn, self.engine.state()).await
    }

    async fn enemy_turn(&mut self, actor: Slot) -> Result<ActionReport> {
        let action = self
            .enemy_policy
            .decide(actor, self.engine.state(), self.engine.catalog())
            .await?;
        tracing::debug!("{} decided {:?}", actor, action);
        Ok(self.engine.resolve(action)?)
    }

    /// Menu, then target selection, until the engine accepts an action.
    ///
    /// Returns `None` when the player picks exit.
    async fn player_turn(&mut self, actor: Slot) -> Result<Option<ActionReport>> {
        loop {
            let menu = TurnMenu::for_actor(self.engine.state(), actor);
            let choice = self.input.choose(&menu, self.engine.state()).await?;
            let action = match choice {
                MenuChoice::Exit => return Ok(None),
                MenuChoice::Ability(ability) => {
                    let kind = self.engine.catalog().ability(&ability)?.target;
                    match self.select_target(actor, kind).await? {
                        Some(target) => TurnAction::Ability { ability, target },
                        None => continue,
                    }
                }
                MenuChoice::Item(item) => {
                    let catalog = self.engine.catalog();
                    let kind = catalog.ability(&catalog.item(&item)?.ability)?.target;
                    match self.select_target(actor, kind).await? {
                        Some(target) => TurnAction::Item { item, target },
                        None => continue,
                    }
                }
            };

            match self.engine.resolve(action) {
                Ok(report) => return Ok(Some(report)),
                Err(error) if error.is_choice_error() => {
                    tracing::warn!("{}: {}", actor, error);
                    self.handle
                        .event_bus()
                        .publish(StateEvent::ChoiceRejected {
                            actor,
                            error: error.to_string(),
                        });
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Asks the selector for single-target kinds; `None` means cancel.
    async fn select_target(&self, actor: Slot, kind: TargetKind) -> Result<Option<TargetChoice>> {
        let Some(side) = kind.selection_side(actor.side) else {
            return Ok(Some(TargetChoice::Implicit));
        };
        let state = self.engine.state();
        let candidates: Vec<Slot> = state.living_slots(side).collect();
        let chosen = self
            .selector
            .select(actor, kind, &candidates, state)
            .await?;
        Ok(chosen.map(|slot| TargetChoice::Index(slot.index)))
    }

    async fn after_action(&mut self, report: ActionReport) -> Result<()> {
        self.view.show_action(&report, self.engine.state()).await?;

        let bus = self.handle.event_bus();
        bus.publish(StateEvent::ActionResolved {
            report: Box::new(report),
        });
        if self.engine.take_save_request() {
            bus.publish(StateEvent::SaveRequested {
                state: Box::new(self.engine.state().clone()),
            });
        }
        Ok(())
    }

    async fn finish(self, outcome: Outcome) -> Result<CombatExit> {
        tracing::info!("Combat finished: {:?}", outcome);
        self.view.drop_curtain(Curtain::from(outcome)).await?;
        Ok(self.leave(Destination::from(outcome), Some(outcome)))
    }

    fn leave(self, destination: Destination, outcome: Option<Outcome>) -> CombatExit {
        let screen = self.config.destinations.screen(destination).to_string();
        self.handle.event_bus().publish(TurnEvent::Ended {
            destination,
            screen: screen.clone(),
            outcome,
        });
        CombatExit {
            destination,
            screen,
            outcome,
            state: self.engine.into_state(),
        }
    }
}

/// Builder for [`Combat`] with flexible configuration.
pub struct CombatBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<Catalog>>,
    scenario: Option<Scenario>,
    state: Option<CombatState>,
    view: Option<Arc<dyn CombatView>>,
    input: Option<Arc<dyn PlayerInput>>,
    selector: Option<Arc<dyn Selector>>,
    enemy_policy: Option<Arc<dyn EnemyPolicy>>,
}

impl CombatBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            scenario: None,
            state: None,
            view: None,
            input: None,
            selector: None,
            enemy_policy: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Ability and item catalog (default: the standard catalog)
    pub fn catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Start a fresh encounter from a scenario
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Resume a saved state; takes precedence over a scenario
    pub fn state(mut self, state: CombatState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set the view (default: [`NullView`])
    pub fn view(mut self, view: impl CombatView + 'static) -> Self {
        self.view = Some(Arc::new(view));
        self
    }

    /// Set player menu input (required)
    pub fn player_input(mut self, input: impl PlayerInput + 'static) -> Self {
        self.input = Some(Arc::new(input));
        self
    }

    /// Set the target selector (required)
    pub fn selector(mut self, selector: impl Selector + 'static) -> Self {
        self.selector = Some(Arc::new(selector));
        self
    }

    /// Set the enemy policy (default: [`FirstAbilityPolicy`])
    pub fn enemy_policy(mut self, policy: impl EnemyPolicy + 'static) -> Self {
        self.enemy_policy = Some(Arc::new(policy));
        self
    }

    /// Build the combat, validating the scenario before any state exists
    pub fn build(self) -> Result<Combat> {
        let input = self.input.ok_or(RuntimeError::ProviderNotSet {
            kind: ProviderKind::Player,
        })?;
        let selector = self.selector.ok_or(RuntimeError::ProviderNotSet {
            kind: ProviderKind::Selector,
        })?;
        let catalog = self
            .catalog
            .unwrap_or_else(|| Arc::new(Catalog::standard()));

        let engine = match (self.state, self.scenario) {
            (Some(state), _) => CombatEngine::new(catalog, state)?,
            (None, Some(scenario)) => {
                CombatEngine::from_scenario(catalog, &scenario, self.config.combat.seed)?
            }
            (None, None) => return Err(RuntimeError::MissingScenario),
        };

        let handle = CombatHandle::new(EventBus::with_capacity(self.config.event_buffer_size));

        Ok(Combat {
            config: self.config,
            engine,
            view: self.view.unwrap_or_else(|| Arc::new(NullView)),
            input,
            selector,
            enemy_policy: self
                .enemy_policy
                .unwrap_or_else(|| Arc::new(FirstAbilityPolicy)),
            handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_maps_to_destination() {
        assert_eq!(Destination::from(Outcome::Victory), Destination::Win);
        assert_eq!(Destination::from(Outcome::Defeat), Destination::Lose);
        let destinations = Destinations::default();
        assert_eq!(destinations.screen(Destination::Exit), "main_menu");
    }

    #[test]
    fn default_config_uses_default_seed() {
        let config = RuntimeConfig::default();
        assert_eq!(config.combat.seed, CombatConfig::DEFAULT_SEED);
        assert_eq!(config.event_buffer_size, 100);
    }
}
