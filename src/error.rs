//! Error types for the counting engine.

use thiserror::Error;

use crate::mem::AllocAim;
use crate::state::EngineState;

/// Errors surfaced by the public engine operations.
///
/// `CounterOverflow` and `AllocFailed` are fatal: the context transitions
/// to [`EngineState::Error`] and stops advancing. `InvalidArg` and `State`
/// leave the context state unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Invalid construction or reconfiguration parameter.
    #[error("invalid argument: {0}")]
    InvalidArg(&'static str),

    /// Operation invoked in a state that forbids it.
    #[error("operation not allowed in engine state {0:?}")]
    State(EngineState),

    /// A rainflow matrix counter would exceed its saturation limit.
    #[error("rainflow matrix counter overflow")]
    CounterOverflow,

    /// The allocator hook failed to provide a buffer at init.
    #[error("allocation failed for {0:?} buffer")]
    AllocFailed(AllocAim),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
