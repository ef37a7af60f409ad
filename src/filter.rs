//! Combined hysteresis and peak-valley filter.
//!
//! Turns the raw sample stream into confirmed turning points. Phase one
//! tracks running extrema until the first reversal larger than the
//! hysteresis is seen; from then on every sample is checked against the
//! interim point of the current run.

use crate::residue::{Residue, TurningPoint};
use crate::state::EngineState;

/// Mutable filter state: pre-first-turning-point extrema and the direction
/// of the current run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FilterState {
    /// Running local minimum (0) and maximum (1).
    extrema: [TurningPoint; 2],
    /// Direction of the current run: -1 falling, +1 rising, 0 unknown.
    slope: i8,
}

impl FilterState {
    pub(crate) fn new() -> Self {
        let nil = TurningPoint {
            value: 0.0,
            cls: 0,
            pos: 0,
        };
        Self {
            extrema: [nil, nil],
            slope: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Absolute difference and sign of `to - from`. A zero delta counts as
/// rising.
#[inline]
pub(crate) fn value_delta(from: f64, to: f64) -> (f64, i8) {
    let delta = to - from;
    (delta.abs(), if delta < 0.0 { -1 } else { 1 })
}

/// Feed one classified sample through the filter.
///
/// Returns the newly confirmed turning point when this sample confirmed
/// one; the caller then runs the cycle detector. Drives `state` between
/// `Init`, `Busy` and `BusyInterim`.
pub(crate) fn filter_point(
    filter: &mut FilterState,
    state: &mut EngineState,
    residue: &mut Residue,
    hysteresis: f64,
    pt: TurningPoint,
) -> Option<TurningPoint> {
    match *state {
        EngineState::Init => {
            // Very first sample: start the local min-max search.
            filter.extrema = [pt, pt];
            *state = EngineState::Busy;
            None
        }
        EngineState::Busy => {
            // Still searching for the first turning point.
            let mut reversal = None;
            if pt.value < filter.extrema[0].value {
                filter.extrema[0] = pt;
                reversal = Some(Slope::Falling);
            } else if pt.value > filter.extrema[1].value {
                filter.extrema[1] = pt;
                reversal = Some(Slope::Rising);
            }

            let delta = filter.extrema[1].value - filter.extrema[0].value;

            if let Some(slope) = reversal {
                if delta > hysteresis {
                    // On a falling slope the maximum is the first turning
                    // point, on a rising slope the minimum; the current
                    // sample becomes the interim point.
                    let first = match slope {
                        Slope::Falling => filter.extrema[1],
                        Slope::Rising => filter.extrema[0],
                    };
                    residue.push(first);
                    filter.slope = match slope {
                        Slope::Falling => -1,
                        Slope::Rising => 1,
                    };
                    residue.set_interim(pt);
                    *state = EngineState::BusyInterim;
                    return Some(first);
                }
            }
            None
        }
        EngineState::BusyInterim => {
            let Some(interim) = residue.interim().copied() else {
                debug_assert!(false, "no interim point in BusyInterim");
                return None;
            };
            let (delta, sign) = value_delta(interim.value, pt.value);

            if sign == filter.slope {
                // Run continues, the interim extremum moves with it.
                // Equal values keep the earliest position.
                if interim.value != pt.value {
                    residue.set_interim(pt);
                }
                None
            } else if delta > hysteresis {
                // Reversal beyond the hysteresis band: the interim point is
                // confirmed, the sample starts the next run.
                filter.slope = sign;
                let confirmed = residue.promote_interim();
                residue.set_interim(pt);
                confirmed
            } else {
                // Reversal inside the hysteresis band.
                None
            }
        }
        _ => None,
    }
}

/// Direction of the first reversal during the extrema search.
#[derive(Debug, Clone, Copy)]
enum Slope {
    Falling,
    Rising,
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(value: f64, pos: u64) -> TurningPoint {
        TurningPoint { value, cls: 0, pos }
    }

    struct Harness {
        filter: FilterState,
        state: EngineState,
        residue: Residue,
        hysteresis: f64,
    }

    impl Harness {
        fn new(hysteresis: f64) -> Self {
            Self {
                filter: FilterState::new(),
                state: EngineState::Init,
                residue: Residue::new(Vec::with_capacity(16), 16),
                hysteresis,
            }
        }

        fn feed(&mut self, value: f64, pos: u64) -> Option<TurningPoint> {
            filter_point(
                &mut self.filter,
                &mut self.state,
                &mut self.residue,
                self.hysteresis,
                tp(value, pos),
            )
        }
    }

    #[test]
    fn zero_delta_counts_as_rising() {
        assert_eq!(value_delta(1.0, 1.0), (0.0, 1));
        assert_eq!(value_delta(1.0, 3.0), (2.0, 1));
        assert_eq!(value_delta(3.0, 1.0), (2.0, -1));
    }

    #[test]
    fn rising_start_emits_the_minimum_first() {
        let mut h = Harness::new(0.5);
        assert!(h.feed(1.0, 1).is_none());
        let first = h.feed(3.0, 2).expect("first turning point");
        assert_eq!(first.value, 1.0);
        assert_eq!(first.pos, 1);
        assert_eq!(h.state, EngineState::BusyInterim);
        assert_eq!(h.residue.interim().unwrap().value, 3.0);
    }

    #[test]
    fn falling_start_emits_the_maximum_first() {
        let mut h = Harness::new(0.5);
        h.feed(4.0, 1);
        let first = h.feed(2.0, 2).expect("first turning point");
        assert_eq!(first.value, 4.0);
        assert_eq!(first.pos, 1);
    }

    #[test]
    fn wiggles_inside_the_band_are_dropped() {
        let mut h = Harness::new(1.0);
        h.feed(0.0, 1);
        h.feed(5.0, 2);
        assert_eq!(h.state, EngineState::BusyInterim);

        // Reversal smaller than the hysteresis: nothing happens.
        assert!(h.feed(4.5, 3).is_none());
        assert_eq!(h.residue.interim().unwrap().value, 5.0);

        // Continuation past the old extremum moves the interim point.
        assert!(h.feed(5.5, 4).is_none());
        assert_eq!(h.residue.interim().unwrap().value, 5.5);
        assert_eq!(h.residue.interim().unwrap().pos, 4);
    }

    #[test]
    fn flat_run_keeps_the_earliest_position() {
        let mut h = Harness::new(0.5);
        h.feed(0.0, 1);
        h.feed(5.0, 2);
        assert!(h.feed(5.0, 3).is_none());
        assert_eq!(h.residue.interim().unwrap().pos, 2);
    }

    #[test]
    fn confirmed_point_is_the_previous_interim() {
        let mut h = Harness::new(0.5);
        h.feed(0.0, 1);
        h.feed(5.0, 2);
        let confirmed = h.feed(1.0, 3).expect("second turning point");
        assert_eq!(confirmed.value, 5.0);
        assert_eq!(confirmed.pos, 2);
        assert_eq!(h.residue.len(), 2);
        assert_eq!(h.residue.interim().unwrap().value, 1.0);
    }
}
