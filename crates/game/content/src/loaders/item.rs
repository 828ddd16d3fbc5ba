//! Item catalog loader.

use std::path::Path;

use combat_core::{Catalog, ItemDescriptor};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDescriptor>,
}

/// Loader for item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item descriptors from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDescriptor>> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(catalog.items)
    }

    /// Registers every item of `path` into `catalog`.
    ///
    /// Items whose ability is not registered are rejected.
    pub fn load_into(path: &Path, catalog: &mut Catalog) -> LoadResult<usize> {
        let items = Self::load(path)?;
        let count = items.len();
        for item in items {
            let id = item.id.clone();
            catalog
                .register_item(item)
                .map_err(|e| anyhow::anyhow!("Item '{}' in {}: {}", id, path.display(), e))?;
        }
        Ok(count)
    }
}
