/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CombatConfig {
    /// Base seed for every deterministic roll of an encounter.
    pub seed: u64,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Maximum number of characters on one side of an encounter.
    pub const MAX_SIDE: usize = 4;
    /// Life is clamped into `[0, MAX_LIFE]` on every commit.
    pub const MAX_LIFE: f64 = 100.0;
    /// Time units between turns at speed 0.
    pub const BASE_TURN_TIME: f64 = 100.0;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0x5EED_C0DE;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
