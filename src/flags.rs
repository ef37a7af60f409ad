//! Counting options and residual methods.

use bitflags::bitflags;

bitflags! {
    /// Selects which counters a context maintains.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CountFlags: u32 {
        /// Maintain the rainflow (from class, to class) matrix.
        const RFM = 0x01;
        /// Accumulate pseudo damage over the Wöhler curve.
        const DAMAGE = 0x02;
        /// Rainflow matrix plus pseudo damage.
        const DEFAULT = Self::RFM.bits() | Self::DAMAGE.bits();
    }
}

impl Default for CountFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How the residue is treated at finalization.
///
/// `None` and `Ignore` are synonyms: pending counts are flushed and the
/// leftover residue stays untouched. Further methods are reserved.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidualMethod {
    /// No residue handling.
    #[default]
    None,
    /// Leave the residue as-is.
    Ignore,
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_both_counters() {
        let flags = CountFlags::default();
        assert!(flags.contains(CountFlags::RFM));
        assert!(flags.contains(CountFlags::DAMAGE));
    }
}
