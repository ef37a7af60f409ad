//! The rainflow counting context.
//!
//! Couples the turning point filter with the four point cycle detector and
//! the counter sinks. Samples stream in through [`RainflowEngine::feed`];
//! closed cycles accumulate in the rainflow matrix and the damage
//! accumulator, readable at any time through the query methods. Results
//! depend only on the concatenated sample sequence, never on how it was
//! chunked across `feed` calls.

use crate::consts::{FULL_CYCLE_INCREMENT, HALF_CYCLE_INCREMENT, RESIDUE_CAP_MIN};
use crate::error::{EngineError, EngineResult};
use crate::filter::{self, FilterState};
use crate::flags::{CountFlags, ResidualMethod};
use crate::matrix::RainflowMatrix;
use crate::mem::{AllocAim, DefaultAlloc, EngineAlloc};
use crate::quantize::ClassParams;
use crate::residue::{Residue, TurningPoint};
use crate::state::EngineState;
use crate::wohler::WohlerCurve;

/// Streaming rainflow cycle counting engine (4 point method).
///
/// ```
/// use rainflow_core::{CountFlags, RainflowEngine, ResidualMethod};
///
/// let mut engine = RainflowEngine::new(4, 1.0, 0.5, 0.99, CountFlags::DEFAULT)?;
/// engine.feed(&[1.0, 3.0, 2.0, 4.0])?;
/// engine.finalize(ResidualMethod::Ignore)?;
///
/// assert_eq!(engine.rfm().unwrap().cycles(2, 1), 1.0);
/// assert_eq!(engine.residue().len(), 2);
/// # Ok::<(), rainflow_core::EngineError>(())
/// ```
#[derive(Debug)]
pub struct RainflowEngine {
    state: EngineState,
    last_error: Option<EngineError>,
    class: ClassParams,
    hysteresis: f64,
    flags: CountFlags,
    full_inc: u32,
    half_inc: u32,
    /// Increment applied to the current cycle; equals `full_inc` until a
    /// residual method that counts half cycles exists.
    curr_inc: u32,
    wohler: WohlerCurve,
    filter: FilterState,
    residue: Residue,
    matrix: Option<RainflowMatrix>,
    damage: f64,
    pos: u64,
}

impl RainflowEngine {
    /// Create a context with the default heap allocator.
    ///
    /// `class_count` may be 0 to disable counting (turning point extraction
    /// still runs); otherwise it is limited to 512 and `class_width` must
    /// be positive. `hysteresis` must be nonnegative.
    pub fn new(
        class_count: u32,
        class_width: f64,
        class_offset: f64,
        hysteresis: f64,
        flags: CountFlags,
    ) -> EngineResult<Self> {
        Self::with_alloc(
            class_count,
            class_width,
            class_offset,
            hysteresis,
            flags,
            &mut DefaultAlloc,
        )
    }

    /// Create a context routing buffer allocation through `alloc`.
    pub fn with_alloc(
        class_count: u32,
        class_width: f64,
        class_offset: f64,
        hysteresis: f64,
        flags: CountFlags,
        alloc: &mut dyn EngineAlloc,
    ) -> EngineResult<Self> {
        let class = ClassParams {
            count: class_count,
            width: class_width,
            offset: class_offset,
        };
        class.validate()?;

        if !(hysteresis >= 0.0) {
            return Err(EngineError::InvalidArg("hysteresis must be >= 0"));
        }

        // Two points define a slope and one slot tracks the interim point;
        // with classes the four point rule bounds the residue by 2·n.
        let residue_cap = (2 * class_count as usize).max(RESIDUE_CAP_MIN);
        let points = alloc
            .point_buffer(residue_cap, AllocAim::Residue)
            .ok_or(EngineError::AllocFailed(AllocAim::Residue))?;

        let matrix = if class_count > 0 && flags.contains(CountFlags::RFM) {
            let len = class_count as usize * class_count as usize;
            let counts = alloc
                .count_buffer(len, AllocAim::Matrix)
                .ok_or(EngineError::AllocFailed(AllocAim::Matrix))?;
            Some(RainflowMatrix::new(counts, class_count))
        } else {
            None
        };

        tracing::debug!(
            class_count,
            class_width,
            class_offset,
            hysteresis,
            ?flags,
            "rainflow context initialized"
        );

        Ok(Self {
            state: EngineState::Init,
            last_error: None,
            class,
            hysteresis,
            flags,
            full_inc: FULL_CYCLE_INCREMENT,
            half_inc: HALF_CYCLE_INCREMENT,
            curr_inc: FULL_CYCLE_INCREMENT,
            wohler: WohlerCurve::default(),
            filter: FilterState::new(),
            residue: Residue::new(points, residue_cap),
            matrix,
            damage: 0.0,
            pos: 0,
        })
    }

    // ─── Feeding ────────────────────────────────────────────────────

    /// Feed a batch of samples. Consecutive calls are equivalent to one
    /// call with the concatenated data.
    pub fn feed(&mut self, samples: &[f64]) -> EngineResult<()> {
        if !self.state.accepts_samples() {
            return Err(self.reject(EngineError::State(self.state)));
        }

        for &value in samples {
            self.pos += 1;
            let cls = if self.class.count > 0 {
                self.class.index_of(value)
            } else {
                0
            };
            let pt = TurningPoint {
                value,
                cls,
                pos: self.pos,
            };
            if let Err(err) = self.feed_once(pt) {
                return Err(self.raise(err));
            }
        }
        Ok(())
    }

    /// Process one classified sample: filter, then look for closed cycles.
    fn feed_once(&mut self, pt: TurningPoint) -> EngineResult<()> {
        let confirmed = filter::filter_point(
            &mut self.filter,
            &mut self.state,
            &mut self.residue,
            self.hysteresis,
            pt,
        );

        if confirmed.is_some() {
            if self.class.count > 0 {
                self.find_closed_cycles()?;
            } else if self.residue.len() > 1 {
                // Without classes there is nothing to count; keep only the
                // newest confirmed point as slope reference.
                self.residue.remove(0, 1);
            }
        }
        Ok(())
    }

    // ─── Four point cycle detection ─────────────────────────────────

    /// Scan the residue tail for closed cycles.
    ///
    /// While the last four confirmed points `A, B, C, D` satisfy
    /// `min(A,D) <= min(B,C)` and `max(B,C) <= max(A,D)` (ties close), the
    /// inner pair `(B, C)` is counted in traversal direction and removed.
    /// The first failing tail stops the scan.
    fn find_closed_cycles(&mut self) -> EngineResult<()> {
        while self.residue.len() >= 4 {
            let idx = self.residue.len() - 4;

            let a = self.residue.value(idx);
            let b = self.residue.value(idx + 1);
            let c = self.residue.value(idx + 2);
            let d = self.residue.value(idx + 3);

            let (b_lo, b_hi) = if b <= c { (b, c) } else { (c, b) };
            let (a_lo, a_hi) = if a <= d { (a, d) } else { (d, a) };

            if a_lo <= b_lo && b_hi <= a_hi {
                let from = self.residue.at(idx + 1);
                let to = self.residue.at(idx + 2);
                self.process_cycle(from, to)?;
                self.residue.remove(idx + 1, 2);
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Count one closed cycle into the enabled sinks.
    fn process_cycle(&mut self, from: TurningPoint, to: TurningPoint) -> EngineResult<()> {
        let class_from = self.class.index_clamped(from.value);
        let class_to = self.class.index_clamped(to.value);

        if class_from == class_to {
            return Ok(());
        }

        tracing::trace!(
            class_from,
            class_to,
            from_pos = from.pos,
            to_pos = to.pos,
            "cycle closed"
        );

        if self.flags.contains(CountFlags::DAMAGE) {
            let damage = self
                .wohler
                .cycle_damage(class_from, class_to, self.class.width);
            self.damage += damage / f64::from(self.full_inc) * f64::from(self.curr_inc);
        }

        if self.flags.contains(CountFlags::RFM) {
            if let Some(matrix) = self.matrix.as_mut() {
                matrix.increment(class_from, class_to, self.curr_inc)?;
            }
        }
        Ok(())
    }

    // ─── Finalization ───────────────────────────────────────────────

    /// Finalize the count: the interim point becomes a confirmed turning
    /// point and the detector runs once more. With `None`/`Ignore` the
    /// remaining residue stays untouched.
    pub fn finalize(&mut self, method: ResidualMethod) -> EngineResult<()> {
        if !self.state.accepts_samples() {
            return Err(self.reject(EngineError::State(self.state)));
        }

        let result = match method {
            ResidualMethod::None | ResidualMethod::Ignore => self.finalize_feed(),
        };

        if let Err(err) = result {
            return Err(self.raise(err));
        }

        if self.class.count == 0 {
            self.residue.clear();
        }

        self.state = EngineState::Finished;
        tracing::debug!(
            residue_cnt = self.residue.len(),
            damage = self.damage,
            "rainflow context finalized"
        );
        Ok(())
    }

    /// Promote the interim point and give the detector a last chance.
    fn finalize_feed(&mut self) -> EngineResult<()> {
        if self.state == EngineState::BusyInterim {
            self.residue.promote_interim();
            self.state = EngineState::Busy;
            self.find_closed_cycles()?;
        }
        self.state = EngineState::Finalize;
        Ok(())
    }

    /// Release both context-owned buffers and return to the unallocated
    /// state. Any further feeding or finalizing is rejected.
    pub fn deinit(&mut self) {
        self.residue.release();
        self.matrix = None;
        self.filter.reset();
        self.pos = 0;
        self.state = EngineState::Init0;
        tracing::debug!("rainflow context deinitialized");
    }

    // ─── Reconfiguration ────────────────────────────────────────────

    /// Replace the Wöhler curve parameters.
    ///
    /// `sd` and `nd` must be positive; the sign of `k` is ignored.
    pub fn set_wohler(&mut self, sd: f64, nd: f64, k: f64) -> EngineResult<()> {
        if !(sd > 0.0) || !(nd > 0.0) || !k.is_finite() {
            return Err(self.reject(EngineError::InvalidArg("Woehler parameters out of range")));
        }
        self.wohler = WohlerCurve::new(sd, nd, k);
        Ok(())
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Current lifecycle state.
    #[inline]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Last error recorded on this context.
    #[inline]
    pub const fn last_error(&self) -> Option<EngineError> {
        self.last_error
    }

    /// Confirmed residue, oldest first.
    #[inline]
    pub fn residue(&self) -> &[TurningPoint] {
        self.residue.points()
    }

    /// Interim turning point of the current run, if any.
    #[inline]
    pub fn residue_interim(&self) -> Option<&TurningPoint> {
        self.residue.interim()
    }

    /// Rainflow matrix, if enabled.
    #[inline]
    pub fn rfm(&self) -> Option<&RainflowMatrix> {
        self.matrix.as_ref()
    }

    /// Accumulated pseudo damage.
    #[inline]
    pub const fn pseudo_damage(&self) -> f64 {
        self.damage
    }

    /// Number of classes.
    #[inline]
    pub const fn class_count(&self) -> u32 {
        self.class.count
    }

    /// Class width.
    #[inline]
    pub const fn class_width(&self) -> f64 {
        self.class.width
    }

    /// Lower edge of class 0.
    #[inline]
    pub const fn class_offset(&self) -> f64 {
        self.class.offset
    }

    /// Midpoint of class `c`.
    #[inline]
    pub fn class_mean(&self, c: u32) -> f64 {
        self.class.class_mean(c)
    }

    /// Upper edge of class `c`.
    #[inline]
    pub fn class_upper(&self, c: u32) -> f64 {
        self.class.class_upper(c)
    }

    /// Hysteresis of the turning point filter.
    #[inline]
    pub const fn hysteresis(&self) -> f64 {
        self.hysteresis
    }

    /// Counter increment of one full cycle.
    #[inline]
    pub const fn full_inc(&self) -> u32 {
        self.full_inc
    }

    /// Counter increment of one half cycle (reserved).
    #[inline]
    pub const fn half_inc(&self) -> u32 {
        self.half_inc
    }

    /// Wöhler curve in use.
    #[inline]
    pub const fn wohler(&self) -> &WohlerCurve {
        &self.wohler
    }

    // ─── Error bookkeeping ──────────────────────────────────────────

    /// Record a fatal error and pin the terminal Error state.
    fn raise(&mut self, err: EngineError) -> EngineError {
        self.state = EngineState::Error;
        self.last_error = Some(err);
        err
    }

    /// Record a recoverable error without touching the state.
    fn reject(&mut self, err: EngineError) -> EngineError {
        self.last_error = Some(err);
        err
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(class_count: u32) -> RainflowEngine {
        RainflowEngine::new(class_count, 1.0, 0.5, 0.99, CountFlags::DEFAULT).unwrap()
    }

    #[test]
    fn state_progression_while_feeding() {
        let mut e = engine(4);
        assert_eq!(e.state(), EngineState::Init);

        e.feed(&[2.0]).unwrap();
        assert_eq!(e.state(), EngineState::Busy);

        e.feed(&[2.5]).unwrap();
        assert_eq!(e.state(), EngineState::Busy);

        e.feed(&[4.0]).unwrap();
        assert_eq!(e.state(), EngineState::BusyInterim);
        assert_eq!(e.residue().len(), 1);
        assert_eq!(e.residue_interim().unwrap().value, 4.0);
    }

    #[test]
    fn counter_increments_default() {
        let e = engine(4);
        assert_eq!(e.full_inc(), FULL_CYCLE_INCREMENT);
        assert_eq!(e.half_inc(), HALF_CYCLE_INCREMENT);
    }

    #[test]
    fn no_classes_keeps_a_single_slope_reference() {
        let mut e = RainflowEngine::new(0, 0.0, 0.0, 0.5, CountFlags::DEFAULT).unwrap();
        e.feed(&[0.0, 4.0, 1.0, 5.0, 0.5, 6.0]).unwrap();
        assert!(e.rfm().is_none());
        assert!(e.residue().len() <= 1);
        assert!(e.residue_interim().is_some());
    }

    #[test]
    fn damage_only_context_has_no_matrix() {
        let mut e = RainflowEngine::new(4, 1.0, 0.5, 0.99, CountFlags::DAMAGE).unwrap();
        e.feed(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        e.finalize(ResidualMethod::None).unwrap();
        assert!(e.rfm().is_none());
        assert!(e.pseudo_damage() > 0.0);
    }

    #[test]
    fn rfm_only_context_accumulates_no_damage() {
        let mut e = RainflowEngine::new(4, 1.0, 0.5, 0.99, CountFlags::RFM).unwrap();
        e.feed(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        e.finalize(ResidualMethod::None).unwrap();
        assert_eq!(e.pseudo_damage(), 0.0);
        assert_eq!(e.rfm().unwrap().sum(), u64::from(FULL_CYCLE_INCREMENT));
    }

    #[test]
    fn cycle_damage_matches_the_curve() {
        let mut e = engine(4);
        e.feed(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        e.finalize(ResidualMethod::None).unwrap();

        // One cycle between classes 2 and 1: amplitude is width/2.
        let expected = e.wohler().damage_at(0.5);
        assert!((e.pseudo_damage() - expected).abs() < 1e-30);
    }

    #[test]
    fn out_of_window_cycle_is_pinned_to_the_last_class() {
        // Samples above the grid still count, clamped to class count - 1.
        let mut e = engine(4);
        e.feed(&[1.0, 8.0, 2.0, 9.0]).unwrap();
        e.finalize(ResidualMethod::None).unwrap();
        let m = e.rfm().unwrap();
        assert_eq!(m.count(3, 1), FULL_CYCLE_INCREMENT);
    }
}
