//! Common error infrastructure for combat-core.
//!
//! Domain errors ([`crate::engine::EngineError`], [`crate::state::ScenarioError`])
//! live next to the code that raises them and share the classification trait
//! defined here.

/// Severity level of an error, used for categorization and handling strategy.
///
/// - **Validation**: invalid input that must be rejected as-is
/// - **Fatal**: corrupted scenario or logic bug, the encounter cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// Examples: empty side in a scenario, ability the actor does not know.
    Validation,

    /// Examples: unknown ability identifier, second open step, no ready actor.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// True for invariant violations that must never be silently recovered.
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
