//! Content factory for building combat inputs from data files.

use std::path::{Path, PathBuf};

use combat_core::{Catalog, Scenario};

use crate::loaders::{ItemLoader, LoadResult, ScenarioLoader};

/// Content factory that loads combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── items.ron        (optional)
/// └── scenarios/
///     └── test_combat.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(crate::bundled_data_dir())
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// The standard catalog plus the items of `items.ron`, if present.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let mut catalog = Catalog::standard();
        let path = self.data_dir.join("items.ron");
        if path.exists() {
            ItemLoader::load_into(&path, &mut catalog)?;
        }
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_catalog_adds_data_items() {
        let catalog = ContentFactory::bundled().load_catalog().unwrap();
        let tome = catalog.item(&"tome_of_terror".into()).unwrap();
        assert_eq!(tome.ability.as_str(), "terrify");
        assert!(catalog.item(&"heal_scroll".into()).is_ok());
    }
}
