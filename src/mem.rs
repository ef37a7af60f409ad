//! Pluggable allocation for the context-owned buffers.
//!
//! The residue buffer and the rainflow matrix are requested exactly once,
//! at context construction, through an allocator hook. Every request is
//! tagged with its purpose so custom implementations can pool per kind
//! (one arena per aim, for instance). Buffers are released when the
//! context is deinitialized or dropped.

use crate::residue::TurningPoint;

/// Purpose tag of a buffer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocAim {
    /// The residue buffer (turning points).
    Residue,
    /// The rainflow matrix counters.
    Matrix,
    /// Scratch space. Reserved, unused by the core engine.
    Temp,
}

/// Allocator hook for engine buffers.
///
/// Returning `None` fails the pending construction with
/// [`EngineError::AllocFailed`](crate::EngineError::AllocFailed).
pub trait EngineAlloc {
    /// Provide an empty turning point buffer with room for `cap` points.
    fn point_buffer(&mut self, cap: usize, aim: AllocAim) -> Option<Vec<TurningPoint>>;

    /// Provide a zeroed counter buffer of `len` cells.
    fn count_buffer(&mut self, len: usize, aim: AllocAim) -> Option<Vec<u32>>;
}

/// Default allocator, backed by the global heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAlloc;

impl EngineAlloc for DefaultAlloc {
    fn point_buffer(&mut self, cap: usize, _aim: AllocAim) -> Option<Vec<TurningPoint>> {
        Some(Vec::with_capacity(cap))
    }

    fn count_buffer(&mut self, len: usize, _aim: AllocAim) -> Option<Vec<u32>> {
        Some(vec![0; len])
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
