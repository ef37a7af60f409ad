//! Class binning of continuous sample values.

use crate::consts::MAX_CLASS_COUNT;
use crate::error::{EngineError, EngineResult};

/// Uniform class grid: `count` bins of `width`, starting at `offset`.
///
/// A count of zero disables counting entirely; the engine then only runs
/// the turning point filter.
#[derive(Debug, Clone, Copy)]
pub struct ClassParams {
    /// Number of classes.
    pub count: u32,
    /// Width of one class.
    pub width: f64,
    /// Lower edge of class 0.
    pub offset: f64,
}

impl ClassParams {
    pub(crate) fn validate(&self) -> EngineResult<()> {
        if self.count > MAX_CLASS_COUNT {
            return Err(EngineError::InvalidArg("class_count exceeds 512"));
        }
        if self.count > 0 && !(self.width > 0.0) {
            return Err(EngineError::InvalidArg("class_width must be > 0"));
        }
        Ok(())
    }

    /// Class index of `value`: `floor((value - offset) / width)`.
    ///
    /// The cast saturates, so values below the grid give class 0. Values at
    /// or above the upper edge give indices >= `count`; those are pinned by
    /// [`index_clamped`](Self::index_clamped) at cycle counting time only.
    #[inline]
    pub fn index_of(&self, value: f64) -> u32 {
        ((value - self.offset) / self.width) as u32
    }

    /// Class index of `value`, pinned into `[0, count)`.
    #[inline]
    pub fn index_clamped(&self, value: f64) -> u32 {
        debug_assert!(self.count > 0);
        self.index_of(value).min(self.count - 1)
    }

    /// Midpoint of class `c`.
    #[inline]
    pub fn class_mean(&self, c: u32) -> f64 {
        self.width * (0.5 + f64::from(c)) + self.offset
    }

    /// Upper edge of class `c`.
    #[inline]
    pub fn class_upper(&self, c: u32) -> f64 {
        self.width * (1.0 + f64::from(c)) + self.offset
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
