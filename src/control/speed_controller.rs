// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop speed controller for one tracker axis.
//!
//! The controller dead-reckons its own position from the speed it last commanded, compares that
//! estimate against the target angle, and picks a new speed from one of two regimes:
//!
//! - **Fast** when the error exceeds the tracking threshold (5% of a turn by default): run at the
//!   full ceiling, forwards or in reverse.
//! - **Tracking** otherwise: follow the target speed, scaled down when leading or boosted in
//!   proportion to the error when lagging.
//!
//! Positive speed moves the axis anti-clockwise, which decreases the angle.
//!
//! Typical usage pattern:
//!
//! ```
//! use skytrack::control::SpeedController;
//!
//! let mut controller = SpeedController::new(0.5);
//!
//! for _ in 0..100 {
//!     let speed = controller.tick(0.01, 1.2, -0.02);
//!     assert!(speed.abs() <= 0.5);
//! }
//! ```

use core::f32::consts::{PI, TAU};
use core::fmt;
use micromath::F32Ext;

use crate::control::{AngularPosition, PositionError};
use crate::diagnostics::Report;
use crate::error::Error;

/// Fraction of a turn above which the controller switches to fast mode.
pub const TRACKING_THRESHOLD: f32 = 0.05;

/// Speed scale applied to the target speed when the error is leading.
pub const LEADING_SPEED_FACTOR: f32 = 0.8;

/// Angular spacing between commanded waypoints (2°).
pub const WAYPOINT_SPACING: f32 = PI / 90.0;

/// Speed regime picked on the last tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Tracking,
    Fast,
}

/// Per-axis speed controller state and configuration.
pub struct SpeedController {
    /// Commanded speed; the sign is the rotation direction
    speed: f32,
    /// Speed of the target itself, as supplied on the last tick
    target_relative_speed: f32,
    max_speed: f32,

    estimated_position: AngularPosition,
    target_relative_position: AngularPosition,
    last_known_position: AngularPosition,
    next_known_position: AngularPosition,
    error: PositionError,

    tracking_threshold: f32,
    leading_factor: f32,
    waypoint_spacing: f32,

    mode: Mode,
}

impl SpeedController {
    /// Create a controller at rest at angle zero.
    ///
    /// `max_speed` is the speed ceiling, in the same units as the speeds passed to
    /// [`tick`](Self::tick).
    pub fn new(max_speed: f32) -> Self {
        Self {
            speed: 0.0,
            target_relative_speed: 0.0,
            max_speed,

            estimated_position: AngularPosition::new(0.0),
            target_relative_position: AngularPosition::new(0.0),
            last_known_position: AngularPosition::new(0.0),
            next_known_position: AngularPosition::new(0.0),
            error: PositionError::new(),

            tracking_threshold: TRACKING_THRESHOLD,
            leading_factor: LEADING_SPEED_FACTOR,
            waypoint_spacing: WAYPOINT_SPACING,

            mode: Mode::Tracking,
        }
    }

    /// Like [`new`](Self::new), but rejects a ceiling that is not finite and strictly positive.
    pub fn try_new(max_speed: f32) -> Result<Self, Error> {
        if !max_speed.is_finite() || max_speed <= 0.0 {
            return Err(Error::InvalidMaxSpeed(max_speed));
        }
        Ok(Self::new(max_speed))
    }

    /// Set the fraction of a turn above which fast mode kicks in.
    ///
    /// The lagging tracking regime divides by the threshold, so it must be finite and strictly
    /// positive.
    pub fn with_tracking_threshold(mut self, fraction: f32) -> Result<Self, Error> {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Err(Error::InvalidTrackingThreshold(fraction));
        }
        self.tracking_threshold = fraction;
        Ok(self)
    }

    /// Set the target-speed scale used while leading in tracking mode.
    pub fn with_leading_factor(mut self, factor: f32) -> Self {
        self.leading_factor = factor;
        self
    }

    /// Set the spacing used by [`next_position`](Self::next_position).
    pub fn with_waypoint_spacing(mut self, radians: f32) -> Self {
        self.waypoint_spacing = radians;
        self
    }

    /// Run one control step and return the new speed command.
    ///
    /// - `dt`: time since the previous tick, in the time unit of the speeds
    /// - `target_angle`: target position (radians, any range)
    /// - `target_speed`: angular speed of the target itself
    ///
    /// All inputs must be finite.
    pub fn tick(&mut self, dt: f32, target_angle: f32, target_speed: f32) -> f32 {
        self.target_relative_position.set(target_angle);
        self.estimated_position.add(-self.speed * dt);
        self.error.update(
            self.target_relative_position.get(),
            self.estimated_position.get(),
        );

        self.target_relative_speed = target_speed;
        self.set_new_speed();

        self.speed
    }

    fn set_new_speed(&mut self) {
        let fractional_error = self.fractional_error();
        let mode = if fractional_error > self.tracking_threshold {
            Mode::Fast
        } else {
            Mode::Tracking
        };

        if mode != self.mode {
            log::debug!(
                "speed controller: {:?} -> {:?} at {} of a turn",
                self.mode,
                mode,
                fractional_error
            );
            self.mode = mode;
        }

        self.speed = match (mode, self.error.is_leading()) {
            // Ahead by a long way: run in reverse
            (Mode::Fast, true) => -self.max_speed,
            (Mode::Fast, false) => self.max_speed,
            // Let the target catch up
            (Mode::Tracking, true) => self.target_relative_speed * self.leading_factor,
            (Mode::Tracking, false) => {
                let headroom = self.max_speed - self.target_relative_speed;
                self.target_relative_speed
                    + headroom * fractional_error / self.tracking_threshold
            }
        };
    }

    /// Current speed command.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Target speed supplied on the last tick.
    #[inline]
    pub fn target_speed(&self) -> f32 {
        self.target_relative_speed
    }

    /// Target angle supplied on the last tick, normalized.
    #[inline]
    pub fn target_position(&self) -> f32 {
        self.target_relative_position.get()
    }

    /// Dead-reckoned position (radians).
    #[inline]
    pub fn estimated_position(&self) -> f32 {
        self.estimated_position.get()
    }

    #[inline]
    pub fn error(&self) -> &PositionError {
        &self.error
    }

    /// Error magnitude as a fraction of a full turn.
    #[inline]
    pub fn fractional_error(&self) -> f32 {
        self.error.magnitude() / TAU
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Last known position plus one waypoint spacing.
    pub fn next_position(&self) -> f32 {
        self.last_known_position.get() + self.waypoint_spacing
    }

    /// Distance from the next known position to the current estimate (radians).
    pub fn distance_to_next(&self) -> f32 {
        (self.next_known_position.get() - self.estimated_position.get()).abs()
    }

    /// Record a position confirmed by an external source such as an encoder.
    pub fn set_last_known_position(&mut self, radians: f32) {
        self.last_known_position.set(radians);
    }

    pub fn set_next_known_position(&mut self, radians: f32) {
        self.next_known_position.set(radians);
    }

    /// Overwrite the dead-reckoned estimate, e.g. when the axis is homed.
    pub fn set_estimated_position(&mut self, radians: f32) {
        self.estimated_position.set(radians);
    }
}

impl Report for SpeedController {
    fn report<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        let direction = if self.error.is_leading() { "leading" } else { "lagging" };
        write!(w, "\tSpeed: {:.5}\r\n", self.speed)?;
        write!(w, "\tEstimate: {:.4}\r\n", self.estimated_position.get())?;
        write!(w, "\tTarget: {:.4}\r\n", self.target_relative_position.get())?;
        write!(w, "\tError: {:.4} {}\r\n", self.error.magnitude(), direction)?;
        write!(w, "\tMode: {:?}\r\n", self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A controller at rest at `actual`, ticked once against `target` with zero elapsed time.
    fn settled(max: f32, actual: f32, target: f32, target_speed: f32) -> SpeedController {
        let mut c = SpeedController::new(max);
        c.set_estimated_position(actual);
        c.tick(0.0, target, target_speed);
        c
    }

    #[test]
    fn fresh_controller_far_from_target_runs_flat_out() {
        let mut c = SpeedController::new(1.0);
        let speed = c.tick(1.0, PI, 0.0);

        assert_relative_eq!(c.fractional_error(), 0.5);
        assert_eq!(c.mode(), Mode::Fast);
        // π is ahead of 0 without crossing the seam, so the error is leading and the axis runs
        // in reverse, which increases the angle towards the target.
        assert!(c.error().is_leading());
        assert_eq!(speed, -1.0);
    }

    #[test]
    fn fast_mode_always_saturates() {
        let targets = [0.4, 1.0, 2.0, PI, 4.0, 5.0, 5.8];
        for &target in &targets {
            for &actual in &[0.0, 0.5, 3.5, 6.0] {
                let c = settled(2.5, actual, target, 0.3);
                if c.fractional_error() > TRACKING_THRESHOLD {
                    assert_eq!(c.speed().abs(), 2.5);
                    assert_eq!(c.mode(), Mode::Fast);
                }
            }
        }
    }

    #[test]
    fn speed_is_continuous_across_the_regime_boundary() {
        let target = 1.0;
        let boundary = target + TRACKING_THRESHOLD * TAU;
        let eps = 1e-4;

        let below = settled(1.0, boundary - eps, target, 0.2);
        let above = settled(1.0, boundary + eps, target, 0.2);

        assert_eq!(below.mode(), Mode::Tracking);
        assert_eq!(above.mode(), Mode::Fast);
        assert!(!below.error().is_leading());
        assert!(!above.error().is_leading());
        assert_relative_eq!(below.speed(), above.speed(), epsilon = 1e-3);
    }

    #[test]
    fn tracking_while_leading_undershoots_target_speed() {
        let c = settled(1.0, 0.9, 1.0, 0.25);
        assert_eq!(c.mode(), Mode::Tracking);
        assert!(c.error().is_leading());
        assert_relative_eq!(c.speed(), 0.2);
    }

    #[test]
    fn tracking_while_lagging_scales_catch_up_with_error() {
        let target = 1.0;
        let half = 0.5 * TRACKING_THRESHOLD * TAU;
        let c = settled(1.0, target + half, target, 0.2);

        assert_eq!(c.mode(), Mode::Tracking);
        assert!(c.error().is_lagging());
        // Halfway to the threshold: halfway through the headroom
        assert_relative_eq!(c.speed(), 0.6, epsilon = 1e-4);
    }

    #[test]
    fn on_target_follows_target_speed() {
        let c = settled(1.0, 2.0, 2.0, -0.3);
        assert_eq!(c.mode(), Mode::Tracking);
        assert_relative_eq!(c.speed(), -0.3);
    }

    #[test]
    fn dead_reckoning_uses_previous_speed() {
        let mut c = SpeedController::new(1.0);
        c.tick(1.0, PI, 0.0);
        assert_eq!(c.estimated_position(), 0.0);

        // -1.0 speed for 0.5 time units moves the estimate 0.5 rad anti-clockwise
        c.tick(0.5, PI, 0.0);
        assert_relative_eq!(c.estimated_position(), 0.5);
    }

    #[test]
    fn crosses_the_seam_the_short_way() {
        let mut c = SpeedController::new(0.5);
        c.set_estimated_position(TAU - 0.1);

        for _ in 0..20 {
            c.tick(0.1, 0.1, 0.0);
            let p = c.estimated_position();
            assert!(p < 1.0 || p > 5.0, "estimate wandered the long way to {}", p);
        }
        assert!(c.estimated_position() < 1.0);
        assert_eq!(c.mode(), Mode::Tracking);
    }

    #[test]
    fn keeps_a_ramping_target_within_the_tracking_band() {
        let rate = 0.01;
        let dt = 0.1;
        let mut c = SpeedController::new(0.05);
        let mut target = 0.5;

        for i in 0..2000 {
            target += rate * dt;
            c.tick(dt, target, -rate);
            if i > 200 {
                assert!(c.fractional_error() < 0.06, "tick {}: {}", i, c.fractional_error());
            }
        }
    }

    #[test]
    fn waypoint_queries() {
        let mut c = SpeedController::new(1.0);
        c.set_last_known_position(1.0);
        assert_relative_eq!(c.next_position(), 1.0 + WAYPOINT_SPACING);

        c.set_next_known_position(c.next_position());
        c.set_estimated_position(0.5);
        assert_relative_eq!(c.distance_to_next(), 0.5 + WAYPOINT_SPACING, epsilon = 1e-6);
    }

    #[test]
    fn builders_override_policy_constants() {
        let c = SpeedController::new(1.0)
            .with_tracking_threshold(0.1)
            .unwrap()
            .with_leading_factor(0.5)
            .with_waypoint_spacing(0.2);

        let mut c = c;
        c.set_estimated_position(0.9);
        c.tick(0.0, 1.0, 0.4);
        assert_relative_eq!(c.speed(), 0.2);
        assert_relative_eq!(c.next_position(), 0.2);
    }

    #[test]
    fn report_shows_speed_estimate_and_mode() {
        extern crate std;

        let mut c = SpeedController::new(1.0);
        c.tick(1.0, PI, 0.0);

        let mut out = std::string::String::new();
        c.report(&mut out).unwrap();
        assert_eq!(
            out,
            "\tSpeed: -1.00000\r\n\tEstimate: 0.0000\r\n\tTarget: 3.1416\r\n\tError: 3.1416 leading\r\n\tMode: Fast\r\n"
        );
    }

    #[test]
    fn try_new_rejects_bad_ceilings() {
        assert!(SpeedController::try_new(1.0).is_ok());
        assert_eq!(
            SpeedController::try_new(0.0).err(),
            Some(Error::InvalidMaxSpeed(0.0))
        );
        assert!(SpeedController::try_new(f32::NAN).is_err());
        assert!(SpeedController::try_new(f32::INFINITY).is_err());
    }

    #[test]
    fn tracking_threshold_must_be_positive() {
        for bad in [0.0, -0.05, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                SpeedController::new(1.0).with_tracking_threshold(bad),
                Err(Error::InvalidTrackingThreshold(_))
            ));
        }

        // Smallest usable threshold still gives a finite on-target command
        let mut c = SpeedController::new(1.0)
            .with_tracking_threshold(f32::MIN_POSITIVE)
            .unwrap();
        let speed = c.tick(0.0, 0.0, 0.1);
        assert!(speed.is_finite());
        assert_eq!(c.mode(), Mode::Tracking);
    }
}
