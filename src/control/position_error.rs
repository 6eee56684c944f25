// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wraparound-aware position error between a target angle and a tracked angle.

use core::f32::consts::{PI, TAU};
use micromath::F32Ext;

/// Returns true if the short arc between `a` and `b` (radians, normalized) crosses the 0/2π seam.
///
/// A gap wider than half a turn bridges when its lower end sits in the first half. A narrower gap
/// bridges when both ends sit past half a turn.
pub fn bridges_zero(a: f32, b: f32) -> bool {
    if a == b {
        return false;
    }

    let lo = a.min(b);
    let hi = a.max(b);
    let diff = hi - lo;

    if diff > PI {
        lo < PI
    } else {
        lo > PI && hi < TAU
    }
}

/// Error magnitude and direction, recomputed wholesale on every update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionError {
    /// Absolute angular difference (radians)
    magnitude: f32,
    leading: bool,
    /// Always `!leading`
    lagging: bool,
}

impl Default for PositionError {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionError {
    pub fn new() -> Self {
        Self {
            magnitude: 0.0,
            leading: false,
            lagging: true,
        }
    }

    /// Recompute the error of `actual` against `target`.
    ///
    /// Crossing the seam inverts the direction test.
    pub fn update(&mut self, target: f32, actual: f32) {
        self.magnitude = (target - actual).abs();

        self.leading = if bridges_zero(target, actual) {
            actual > target
        } else {
            target > actual
        };
        self.lagging = !self.leading;
    }

    /// Absolute error (radians).
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    #[inline]
    pub fn is_leading(&self) -> bool {
        self.leading
    }

    #[inline]
    pub fn is_lagging(&self) -> bool {
        self.lagging
    }
}
