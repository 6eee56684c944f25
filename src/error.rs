// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Configuration errors.
//!
//! The control and decoding operations themselves are total; only construction-time validation
//! can fail.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Speed ceiling was not a finite, strictly positive value.
    InvalidMaxSpeed(f32),
    /// Tracking threshold was not a finite, strictly positive fraction.
    InvalidTrackingThreshold(f32),
    /// Encoder step size was zero, or the edge count was outside `1..=127`.
    InvalidStep,
    /// No remapping strategy exists for this machine ID.
    UnknownMachine(u8),
    /// Diagnostic module index out of range.
    UnknownDebugModule(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidMaxSpeed(v) => write!(f, "max speed must be finite and > 0, got {}", v),
            Error::InvalidTrackingThreshold(v) => {
                write!(f, "tracking threshold must be finite and > 0, got {}", v)
            }
            Error::InvalidStep => write!(f, "encoder step size must be non-zero"),
            Error::UnknownMachine(id) => write!(f, "unknown machine id {}", id),
            Error::UnknownDebugModule(id) => write!(f, "unknown debug module {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn display_names_the_offending_value() {
        assert_eq!(
            Error::UnknownMachine(7).to_string(),
            "unknown machine id 7"
        );
        assert_eq!(
            Error::InvalidMaxSpeed(-1.5).to_string(),
            "max speed must be finite and > 0, got -1.5"
        );
        assert_eq!(
            Error::InvalidTrackingThreshold(0.0).to_string(),
            "tracking threshold must be finite and > 0, got 0"
        );
    }
}
