//! Content loaders for reading combat data from files.

pub mod factory;
pub mod item;
pub mod scenario;

pub use factory::ContentFactory;
pub use item::{ItemCatalog, ItemLoader};
pub use scenario::ScenarioLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))
}
