//! Turning points and the residue buffer.

use serde::{Deserialize, Serialize};

/// A confirmed or candidate turning point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningPoint {
    /// Sample value.
    pub value: f64,
    /// Class index assigned at feed time, base 0.
    pub cls: u32,
    /// Position in the input stream, base 1.
    pub pos: u64,
}

/// Ordered turning points that have not yet been absorbed into a closed
/// cycle, plus an optional trailing interim point.
///
/// Capacity is fixed at construction. The four point rule keeps the
/// confirmed count below `2 · class_count` for inputs inside the class
/// window; the interim point lives in its own slot and never competes for
/// capacity.
#[derive(Debug)]
pub(crate) struct Residue {
    points: Vec<TurningPoint>,
    interim: Option<TurningPoint>,
    cap: usize,
}

impl Residue {
    pub(crate) fn new(points: Vec<TurningPoint>, cap: usize) -> Self {
        Self {
            points,
            interim: None,
            cap,
        }
    }

    /// Number of confirmed turning points.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    /// Confirmed turning points, oldest first.
    #[inline]
    pub(crate) fn points(&self) -> &[TurningPoint] {
        &self.points
    }

    /// The candidate extremum of the current run, if one is tracked.
    #[inline]
    pub(crate) fn interim(&self) -> Option<&TurningPoint> {
        self.interim.as_ref()
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> f64 {
        self.points[index].value
    }

    #[inline]
    pub(crate) fn at(&self, index: usize) -> TurningPoint {
        self.points[index]
    }

    /// Append a confirmed turning point.
    pub(crate) fn push(&mut self, tp: TurningPoint) {
        debug_assert!(self.points.len() < self.cap, "residue capacity exceeded");
        self.points.push(tp);
    }

    /// Track `tp` as the interim point, replacing any previous one.
    #[inline]
    pub(crate) fn set_interim(&mut self, tp: TurningPoint) {
        self.interim = Some(tp);
    }

    /// Confirm the interim point by appending it to the residue.
    pub(crate) fn promote_interim(&mut self) -> Option<TurningPoint> {
        let tp = self.interim.take()?;
        self.push(tp);
        Some(tp)
    }

    /// Remove `count` points starting at `index`, shifting the suffix left.
    pub(crate) fn remove(&mut self, index: usize, count: usize) {
        debug_assert!(index + count <= self.points.len());
        self.points.drain(index..index + count);
    }

    /// Drop all confirmed points.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.points.clear();
    }

    /// Release the backing storage.
    pub(crate) fn release(&mut self) {
        self.points = Vec::new();
        self.interim = None;
        self.cap = 0;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
