//! Engine lifecycle states.
//!
//! Init0 → Init → Busy ↔ BusyInterim → Finalize → Finished, plus a
//! terminal Error state reached on counter overflow or allocation failure.

/// Lifecycle state of a counting context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No buffers held. Reachable only through `deinit`.
    Init0,
    /// Buffers allocated, no sample seen yet.
    Init,
    /// At least one sample seen, no interim turning point tracked.
    Busy,
    /// A trailing interim turning point tracks the current run.
    BusyInterim,
    /// Finalization in progress. Not observable outside `finalize`.
    Finalize,
    /// Terminal success state. Further feeding is rejected.
    Finished,
    /// Terminal failure state.
    Error,
}

impl EngineState {
    /// True while `feed` and `finalize` may be called.
    #[inline]
    pub const fn accepts_samples(self) -> bool {
        matches!(self, Self::Init | Self::Busy | Self::BusyInterim)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feeding_states() {
        assert!(EngineState::Init.accepts_samples());
        assert!(EngineState::Busy.accepts_samples());
        assert!(EngineState::BusyInterim.accepts_samples());

        assert!(!EngineState::Init0.accepts_samples());
        assert!(!EngineState::Finalize.accepts_samples());
        assert!(!EngineState::Finished.accepts_samples());
        assert!(!EngineState::Error.accepts_samples());
    }
}
