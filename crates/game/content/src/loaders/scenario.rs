//! Combat scenario loader.

use std::path::Path;

use anyhow::Context;
use combat_core::Scenario;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load and validate a scenario from a RON file.
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::from_str(&content).with_context(|| format!("in scenario {}", path.display()))
    }

    /// Parse and validate a scenario from RON text.
    ///
    /// Side sizes and skill lists are checked here so a malformed file is
    /// rejected before any combat state exists.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        scenario.validate()?;
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{AbilityId, Element, Side};

    use super::*;

    #[test]
    fn bundled_test_combat_parses() {
        let scenario = ScenarioLoader::from_str(crate::TEST_COMBAT).unwrap();
        assert_eq!(scenario.players.len(), 3);
        assert_eq!(scenario.enemies.len(), 1);
        assert!(scenario.player_items.is_empty());

        let hector = &scenario.players[0];
        assert_eq!(hector.name, "Hector");
        assert_eq!(hector.element, Element::Order);
        assert_eq!(hector.speed, 10.0);
        assert_eq!(hector.resists.value(Element::Normal), 22.0);
        assert_eq!(hector.next_turn, None);

        let aura = &scenario.side(Side::Enemies)[0];
        assert!(aura.damage.is_empty());
        assert!(aura.skills.contains(&AbilityId::from("impositionoforder")));
    }

    #[test]
    fn empty_side_is_rejected() {
        let text = r#"(players: [(name: "Solo", element: normal)], enemies: [])"#;
        let error = ScenarioLoader::from_str(text).unwrap_err();
        assert!(error.to_string().contains("enemies"), "{error}");
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let text = r#"(
            players: [(name: "Solo", element: chaos)],
            enemies: [(name: "Foe", element: normal, nextTurn: Some(3.0))],
        )"#;
        let scenario = ScenarioLoader::from_str(text).unwrap();
        let solo = &scenario.players[0];
        assert_eq!(solo.life, 100.0);
        assert_eq!(solo.speed, 0.0);
        assert!(solo.skills.is_empty());
        assert_eq!(scenario.enemies[0].next_turn, Some(3.0));
    }
}
