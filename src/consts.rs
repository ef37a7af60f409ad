//! Shared constants of the counting engine.

use static_assertions::const_assert;

/// Maximum number of classes a context may be configured with.
pub const MAX_CLASS_COUNT: u32 = 512;

/// Counter increment for one full closed cycle.
pub const FULL_CYCLE_INCREMENT: u32 = 2;

/// Counter increment for one half cycle (reserved for residual methods
/// that count the leftover residue as half cycles).
pub const HALF_CYCLE_INCREMENT: u32 = 1;

/// Saturation limit for a single rainflow matrix counter.
/// Exceeding it is a fatal error.
pub const COUNTS_LIMIT: u32 = u32::MAX - FULL_CYCLE_INCREMENT;

/// Minimum residue capacity: two points to define a slope plus one slot
/// for the interim point.
pub const RESIDUE_CAP_MIN: usize = 3;

const_assert!(HALF_CYCLE_INCREMENT > 0);
const_assert!(HALF_CYCLE_INCREMENT <= FULL_CYCLE_INCREMENT);
const_assert!(COUNTS_LIMIT <= u32::MAX - FULL_CYCLE_INCREMENT);
const_assert!(RESIDUE_CAP_MIN >= 3);
