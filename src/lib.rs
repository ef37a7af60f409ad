//! Streaming rainflow cycle counting (4 point method) for fatigue
//! analysis.
//!
//! Scalar load samples are fed incrementally into a [`RainflowEngine`].
//! The engine extracts closed hysteresis cycles per the ASTM E1049 / FVA
//! four point rule, accumulates them in a from-class × to-class
//! [`RainflowMatrix`] and integrates relative damage over a
//! [`WohlerCurve`]. Turning points that never close a cycle remain in the
//! residue, available for downstream processing.
//!
//! Counting runs in four stages:
//!
//! 1. hysteresis filtering
//! 2. peak-valley filtering
//! 3. discretization into uniform classes
//! 4. four point cycle counting
//!
//! The produced matrix, damage and residue depend only on the
//! concatenated sample sequence, not on how it was chunked across
//! [`RainflowEngine::feed`] calls.
//!
//! ```
//! use rainflow_core::{CountFlags, RainflowEngine, ResidualMethod};
//!
//! let mut engine = RainflowEngine::new(4, 1.0, 0.5, 0.99, CountFlags::DEFAULT)?;
//! engine.feed(&[1.0, 3.0])?;
//! engine.feed(&[2.0, 4.0])?;
//! engine.finalize(ResidualMethod::Ignore)?;
//!
//! let rfm = engine.rfm().unwrap();
//! assert_eq!(rfm.cycles(2, 1), 1.0);
//! assert_eq!(engine.pseudo_damage(), engine.wohler().damage_at(0.5));
//! # Ok::<(), rainflow_core::EngineError>(())
//! ```

pub mod consts;
pub mod engine;
pub mod error;
mod filter;
pub mod flags;
pub mod matrix;
pub mod mem;
pub mod quantize;
pub mod residue;
pub mod state;
pub mod wohler;

pub use engine::RainflowEngine;
pub use error::{EngineError, EngineResult};
pub use flags::{CountFlags, ResidualMethod};
pub use matrix::RainflowMatrix;
pub use mem::{AllocAim, DefaultAlloc, EngineAlloc};
pub use residue::TurningPoint;
pub use state::EngineState;
pub use wohler::WohlerCurve;
