// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Normalized angle value type.
//!
//! All controller angles are radians kept in `[0, 2π)`.

use core::f32::consts::TAU;

/// Wrap any finite angle (radians) into `[0, 2π)`.
///
/// Negative angles are wrapped up into range as well as large positive ones. Non-finite input is a
/// caller contract violation: `NaN` propagates and the call still returns in constant time.
#[inline]
pub fn normalize(value: f32) -> f32 {
    let wrapped = value % TAU;
    let wrapped = if wrapped < 0.0 { wrapped + TAU } else { wrapped };

    // A tiny negative remainder can round up to exactly 2π.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// An angle in radians that is always stored normalized.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AngularPosition {
    p: f32,
}

impl AngularPosition {
    /// Create a position from any angle in radians.
    #[inline]
    pub fn new(radians: f32) -> Self {
        Self {
            p: normalize(radians),
        }
    }

    /// Replace the stored angle.
    #[inline]
    pub fn set(&mut self, radians: f32) {
        self.p = normalize(radians);
    }

    /// Accumulate `delta` radians onto the stored angle.
    #[inline]
    pub fn add(&mut self, delta: f32) {
        self.p = normalize(self.p + delta);
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.p
    }
}
