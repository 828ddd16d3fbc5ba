//! Data-driven combat content and loaders.
//!
//! This crate houses bundled encounter data and the loaders that read it:
//! - Combat scenarios (data-driven via RON)
//! - Extra item catalogs (data-driven via RON)
//!
//! Content is turned into combat-core types on load and never appears in
//! combat state by reference.

pub mod loaders;

pub use loaders::{ContentFactory, ItemCatalog, ItemLoader, LoadResult, ScenarioLoader};

/// Directory holding the data files shipped with this crate.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// The bundled test encounter, embedded at compile time.
pub const TEST_COMBAT: &str = include_str!("../data/scenarios/test_combat.ron");
