//! Wöhler (S-N) curve and pseudo damage evaluation.
//!
//! Damage of one full cycle with amplitude `Sa` is `(Sa/SD)^|k| / ND`,
//! evaluated in logarithmic form to keep precision for small amplitudes.
//! The resulting number is a relative (pseudo) damage, meaningful only in
//! comparison with other values from the same curve.

use serde::{Deserialize, Serialize};

/// Wöhler curve parameters. The slope is stored as `-|k|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WohlerCurve {
    sd: f64,
    nd: f64,
    k: f64,
}

impl Default for WohlerCurve {
    /// Fictive default curve: SD = 10³, ND = 10⁷, k = -5.
    fn default() -> Self {
        Self::new(1e3, 1e7, -5.0)
    }
}

impl WohlerCurve {
    /// Build a curve from endurance amplitude `sd`, endurance cycle count
    /// `nd` and slope `k`. The sign of `k` is ignored; it is stored
    /// negative.
    pub fn new(sd: f64, nd: f64, k: f64) -> Self {
        Self {
            sd,
            nd,
            k: -k.abs(),
        }
    }

    /// Endurance amplitude SD.
    #[inline]
    pub const fn sd(&self) -> f64 {
        self.sd
    }

    /// Endurance cycle count ND.
    #[inline]
    pub const fn nd(&self) -> f64 {
        self.nd
    }

    /// Slope k, always negative.
    #[inline]
    pub const fn k(&self) -> f64 {
        self.k
    }

    /// Pseudo damage of one full cycle with amplitude `sa`.
    ///
    /// `D = exp(|k|·(ln sa - ln SD) - ln ND)`. Zero amplitude contributes
    /// nothing.
    pub fn damage_at(&self, sa: f64) -> f64 {
        if !(sa > 0.0) {
            return 0.0;
        }
        let sd_log = self.sd.ln();
        let nd_log = self.nd.ln();
        (self.k.abs() * (sa.ln() - sd_log) - nd_log).exp()
    }

    /// Pseudo damage of one full cycle between `class_from` and `class_to`
    /// on a grid of width `class_width`.
    ///
    /// The amplitude is half the class range; diagonal cycles carry no
    /// damage.
    pub fn cycle_damage(&self, class_from: u32, class_to: u32, class_width: f64) -> f64 {
        if class_from == class_to {
            return 0.0;
        }
        let range = class_width * f64::from(class_from.abs_diff(class_to));
        self.damage_at(range / 2.0)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
