//! Combat client binary.
//!
//! Plays one encounter headlessly and prints the resulting state as JSON.
//!
//! ```bash
//! # Bundled test combat
//! cargo run -p combat-client
//!
//! # Custom scenario, verbose engine logs
//! RUST_LOG=combat_runtime=debug cargo run -p combat-client -- duel.ron
//! ```
use std::sync::Arc;

use anyhow::{Context, Result};
use combat_client::{AutoPilot, ClientConfig, logging};
use combat_content::{ContentFactory, ScenarioLoader, TEST_COMBAT};
use combat_runtime::{Combat, RuntimeConfig, TracingView};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env().with_args(std::env::args().skip(1));
    let runtime_config = RuntimeConfig::from_env();

    logging::setup_logging()?;
    tracing::info!("Starting combat client");
    tracing::info!("Seed: {:#x}", runtime_config.combat.seed);

    // 1. Content
    let scenario = match &config.scenario {
        Some(path) => ScenarioLoader::load(path)?,
        None => ScenarioLoader::from_str(TEST_COMBAT)?,
    };
    let factory = config
        .data_dir
        .clone()
        .map_or_else(ContentFactory::bundled, ContentFactory::new);
    let catalog = Arc::new(factory.load_catalog()?);

    // 2. Combat
    let pilot = AutoPilot::new(Arc::clone(&catalog));
    let combat = Combat::builder()
        .config(runtime_config)
        .catalog(catalog)
        .scenario(scenario)
        .view(TracingView)
        .player_input(pilot.clone())
        .selector(pilot)
        .build()?;

    let handle = combat.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, leaving after the current action");
            handle.request_exit();
        }
    });

    let exit = combat.run().await?;
    tracing::info!("Combat over: {:?} -> {}", exit.destination, exit.screen);

    // 3. Result
    let json = serde_json::to_string_pretty(&exit)?;
    match &config.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
