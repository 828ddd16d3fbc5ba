//! Client configuration read from the environment and the command line.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where the client finds its content and where it writes the result.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Scenario file to play. The bundled test combat when unset.
    pub scenario: Option<PathBuf>,
    /// Directory holding `items.ron`. The bundled data when unset.
    pub data_dir: Option<PathBuf>,
    /// File receiving the final state as JSON. Stdout when unset.
    pub output: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_SCENARIO` - Path of a scenario RON file
    /// - `COMBAT_DATA_DIR` - Content directory for the item catalog
    /// - `COMBAT_OUTPUT` - Path receiving the final state
    pub fn from_env() -> Self {
        Self {
            scenario: read_env("COMBAT_SCENARIO"),
            data_dir: read_env("COMBAT_DATA_DIR"),
            output: read_env("COMBAT_OUTPUT"),
        }
    }

    /// A positional scenario path overrides `COMBAT_SCENARIO`.
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(path) = args.next() {
            self.scenario = Some(PathBuf::from(path));
        }
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok()?.parse().ok()
}
