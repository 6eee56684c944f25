// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Per-axis closed-loop speed control for the tracker.
//!
//! ## Modules
//!
//! - [`angle`] - Normalized angle value type.
//! - [`position_error`] - Error magnitude and direction across the 0/2π seam.
//! - [`speed_controller`] - Two-regime speed controller driven once per control tick.

pub mod angle;
pub mod position_error;
pub mod speed_controller;

pub use angle::{normalize, AngularPosition};
pub use position_error::{bridges_zero, PositionError};
pub use speed_controller::{Mode, SpeedController};
