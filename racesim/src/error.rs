use crate::core::race::RacePhase;

/// Errors returned by the race simulator. Both kinds are recoverable, the caller is expected to
/// ignore the requested action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Bad horse count, bad constants or reconfiguration while racing.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation is not allowed in the current race phase.
    #[error("Operation '{operation}' is not allowed in phase {phase:?}")]
    InvalidState {
        operation: &'static str,
        phase: RacePhase,
    },
}
