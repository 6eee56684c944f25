// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Commands and replies of the host serial protocol.
//!
//! Every message is one ASCII line terminated by `\n`:
//!
//! | Line | Command |
//! | ---- | ------- |
//! | `AZ<int>` / `AL<int>` | Target azimuth / altitude (hdegrees) |
//! | `AZ<int>AL<int>` | Both targets at once, in tenths of a degree |
//! | `AZS<int>` / `ALS<int>` | Target speed (1e-5 deg/s) |
//! | `AZP<int>` / `ALP<int>` | Overwrite the encoder position (hdegrees) |
//! | `ENGAGE` / `RELEASE` | Motors on / off |
//! | `DBG<module><0\|1>` | Toggle a diagnostic report |

use crate::diagnostics::DebugModule;

/// Longest accepted line, excluding the terminator.
pub const MAX_LINE_LEN: usize = 24;

pub const LINE_END: u8 = b'\n';

// Keywords
pub const KW_AZIMUTH: &[u8] = b"AZ";
pub const KW_ALTITUDE: &[u8] = b"AL";
pub const KW_ENGAGE: &[u8] = b"ENGAGE";
pub const KW_RELEASE: &[u8] = b"RELEASE";
pub const KW_DEBUG: &[u8] = b"DBG";

// Suffixes after an axis keyword
pub const SUFFIX_SPEED: u8 = b'S';
pub const SUFFIX_POSITION: u8 = b'P';

/// Hundredths per tenth of a degree, for the combined target line.
pub const HDEG_PER_TDEG: i32 = 10;

/// Host to tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TargetAzimuth(i32),
    TargetAltitude(i32),
    /// Both targets, already scaled to hdegrees.
    Target { azimuth: i32, altitude: i32 },
    /// 1e-5 deg/s
    AzimuthSpeed(i32),
    AltitudeSpeed(i32),
    SetAzimuth(i32),
    SetAltitude(i32),
    Engage,
    Release,
    Debug { module: DebugModule, on: bool },
}

/// Tracker to host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Online,
    Offline,
}

impl Reply {
    pub fn as_str(self) -> &'static str {
        match self {
            Reply::Online => "ONLINE",
            Reply::Offline => "OFFLINE",
        }
    }
}
