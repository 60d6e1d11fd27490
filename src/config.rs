//! Detection tolerances.

use crate::Fp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Overlap tolerance added to each rectangle's extent in rectangle-rectangle tests.
pub const RECT_TOLERANCE: Fp = 0.1;
/// Per-tick displacement below which a rectangle is not swept at all.
pub const SWEEP_THRESHOLD: Fp = 1e-3;
/// Per-axis displacement below which the swept test treats that axis as stationary.
pub const AXIS_THRESHOLD: Fp = 1e-6;

/// Tolerances used by a [`CollisionManager`](crate::CollisionManager).
///
/// The defaults match the free functions [`intersects`](crate::intersects) and
/// [`swept::sweep_test`](crate::narrow::swept::sweep_test).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Rectangles closer than this on both axes count as touching.
    pub rect_tolerance: Fp,
    /// Displacement a moving rectangle must exceed on some axis to be swept.
    pub sweep_threshold: Fp,
    /// Displacement under which a swept axis counts as non-moving.
    pub axis_threshold: Fp,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rect_tolerance: RECT_TOLERANCE,
            sweep_threshold: SWEEP_THRESHOLD,
            axis_threshold: AXIS_THRESHOLD,
        }
    }
}

impl Config {
    /// Whether a per-tick displacement is large enough to warrant the swept test.
    #[inline]
    pub fn is_sweepable(&self, disp: crate::Vec2) -> bool {
        disp.x.abs() > self.sweep_threshold || disp.y.abs() > self.sweep_threshold
    }
}
