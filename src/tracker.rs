// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-axis tracker application state.
//!
//! [`Tracker`] ties together one [`SpeedController`] and one [`QuadratureDecoder`] per axis, the
//! machine remapping, and the diagnostic tasks. It is driven from the main loop:
//!
//! - [`handle`](Tracker::handle) each parsed serial command,
//! - [`sample`](Tracker::sample) the encoder channels as often as possible,
//! - [`tick`](Tracker::tick) at the control period and forward the speeds to the motors,
//! - [`report_due`](Tracker::report_due) to print enabled diagnostics.
//!
//! Host units are hundredths of a degree for angles and 1e-5 deg/s for speeds. The controllers
//! run in radians and radians per second.

use core::f32::consts::PI;
use core::fmt::{self, Write};

use crate::control::SpeedController;
use crate::diagnostics::{DebugModule, DebugTasks, Report};
use crate::encoder::{DecoderConfig, QuadratureDecoder};
use crate::error::Error;
use crate::machine::{Machine, MoveRequest};
use crate::protocol::{Command, Reply};

/// Radians per hundredth of a degree.
const RAD_PER_HDEG: f32 = PI / 18_000.0;
/// Radians per second per host speed unit.
const RAD_S_PER_SPEED_UNIT: f32 = PI / 18_000_000.0;

#[inline]
pub fn hdeg_to_rad(hdegrees: i32) -> f32 {
    hdegrees as f32 * RAD_PER_HDEG
}

/// Convert a host speed in 1e-5 deg/s into rad/s.
#[inline]
pub fn speed_to_rad_s(speed: i32) -> f32 {
    speed as f32 * RAD_S_PER_SPEED_UNIT
}

/// Construction parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    pub machine: Machine,
    /// Speed ceiling for both axes (rad/s)
    pub max_speed: f32,
    pub azimuth: DecoderConfig,
    pub altitude: DecoderConfig,
}

impl TrackerConfig {
    /// Both axes use the legacy decoder with `hdegrees_per_tick`.
    pub const fn new(machine: Machine, max_speed: f32, hdegrees_per_tick: i32) -> Self {
        Self {
            machine,
            max_speed,
            azimuth: DecoderConfig::replica(hdegrees_per_tick),
            altitude: DecoderConfig::replica(hdegrees_per_tick),
        }
    }

    pub fn with_decoders(mut self, azimuth: DecoderConfig, altitude: DecoderConfig) -> Self {
        self.azimuth = azimuth;
        self.altitude = altitude;
        self
    }
}

/// Controller and encoder of one axis.
pub struct Axis {
    pub controller: SpeedController,
    pub decoder: QuadratureDecoder,
    /// Remapped target angle (radians)
    target_angle: f32,
    /// Target speed (rad/s)
    target_speed: f32,
}

impl Axis {
    fn new(name: &'static str, max_speed: f32, decoder: DecoderConfig) -> Result<Self, Error> {
        Ok(Self {
            controller: SpeedController::try_new(max_speed)?,
            decoder: QuadratureDecoder::try_new(name, decoder)?,
            target_angle: 0.0,
            target_speed: 0.0,
        })
    }

    fn set_target(&mut self, hdegrees: i32) {
        self.decoder.set_target(hdegrees);
        self.target_angle = hdeg_to_rad(hdegrees);
    }

    /// Home the axis: the encoder and the estimate both jump to `hdegrees`.
    fn set_position(&mut self, hdegrees: i32) {
        self.decoder.set_position(hdegrees);
        let radians = hdeg_to_rad(hdegrees);
        self.controller.set_estimated_position(radians);
        self.reconcile();
    }

    /// Feed the latest encoder position back into the controller's waypoints.
    fn reconcile(&mut self) {
        self.controller
            .set_last_known_position(hdeg_to_rad(self.decoder.position()));
        let next = self.controller.next_position();
        self.controller.set_next_known_position(next);
    }

    fn sample(&mut self, (a, b): (bool, bool)) {
        if self.decoder.update(a, b).is_some() {
            self.reconcile();
        }
    }

    #[inline]
    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    #[inline]
    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }
}

/// Speed commands for both axes (rad/s, positive is anti-clockwise).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AxisSpeeds {
    pub azimuth: f32,
    pub altitude: f32,
}

pub struct Tracker {
    azimuth: Axis,
    altitude: Axis,
    machine: Machine,
    debug: DebugTasks,
    engaged: bool,
    /// Last generic request, before remapping
    request: MoveRequest,
}

impl Tracker {
    /// Create a released tracker with both axes at zero.
    pub fn new(config: TrackerConfig) -> Result<Self, Error> {
        Ok(Self {
            azimuth: Axis::new("Azimuth", config.max_speed, config.azimuth)?,
            altitude: Axis::new("Altitude", config.max_speed, config.altitude)?,
            machine: config.machine,
            debug: DebugTasks::new(),
            engaged: false,
            request: MoveRequest::default(),
        })
    }

    /// Apply one host command. Engage and release are acknowledged with a reply.
    pub fn handle(&mut self, command: Command) -> Option<Reply> {
        match command {
            Command::TargetAzimuth(azimuth) => {
                self.request.azimuth = azimuth;
                self.apply_request();
            }
            Command::TargetAltitude(altitude) => {
                self.request.altitude = altitude;
                self.apply_request();
            }
            Command::Target { azimuth, altitude } => {
                self.request = MoveRequest::new(azimuth, altitude);
                self.apply_request();
            }
            Command::AzimuthSpeed(speed) => self.azimuth.target_speed = speed_to_rad_s(speed),
            Command::AltitudeSpeed(speed) => self.altitude.target_speed = speed_to_rad_s(speed),
            Command::SetAzimuth(hdegrees) => self.azimuth.set_position(hdegrees),
            Command::SetAltitude(hdegrees) => self.altitude.set_position(hdegrees),
            Command::Engage => {
                log::info!("motors engaged");
                self.engaged = true;
                return Some(Reply::Online);
            }
            Command::Release => {
                log::info!("motors released");
                self.engaged = false;
                return Some(Reply::Offline);
            }
            Command::Debug { module, on } => self.debug.set(module, on),
        }
        None
    }

    fn apply_request(&mut self) {
        let remapped = self.machine.remap(self.request);
        self.azimuth.set_target(remapped.azimuth);
        self.altitude.set_target(remapped.altitude);
    }

    /// Latch the encoders' current `(A, B)` levels before the first [`sample`](Self::sample).
    pub fn seed(&mut self, azimuth: (bool, bool), altitude: (bool, bool)) {
        self.azimuth.decoder.seed(azimuth.0, azimuth.1);
        self.altitude.decoder.seed(altitude.0, altitude.1);
    }

    /// Feed one sample of each encoder's `(A, B)` levels.
    pub fn sample(&mut self, azimuth: (bool, bool), altitude: (bool, bool)) {
        self.azimuth.sample(azimuth);
        self.altitude.sample(altitude);
    }

    /// Run one control step of `dt` seconds. A released tracker commands zero speed.
    pub fn tick(&mut self, dt: f32) -> AxisSpeeds {
        if !self.engaged {
            return AxisSpeeds::default();
        }

        AxisSpeeds {
            azimuth: tick_axis(&mut self.azimuth, dt),
            altitude: tick_axis(&mut self.altitude, dt),
        }
    }

    /// Advance the diagnostic timers and write every report that is due.
    pub fn report_due<W: Write>(&mut self, elapsed_ms: u32, w: &mut W) -> fmt::Result {
        let azimuth = &self.azimuth;
        let altitude = &self.altitude;
        let mut result = Ok(());

        self.debug.tick(elapsed_ms, |module| {
            if result.is_ok() {
                result = report_module(azimuth, altitude, module, w);
            }
        });
        result
    }

    /// Write the report of one module regardless of its timer.
    pub fn report<W: Write>(&self, module: DebugModule, w: &mut W) -> fmt::Result {
        report_module(&self.azimuth, &self.altitude, module, w)
    }

    #[inline]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    #[inline]
    pub fn machine(&self) -> Machine {
        self.machine
    }

    /// Last move request as sent by the host.
    #[inline]
    pub fn request(&self) -> MoveRequest {
        self.request
    }

    pub fn azimuth(&self) -> &Axis {
        &self.azimuth
    }

    pub fn altitude(&self) -> &Axis {
        &self.altitude
    }

    pub fn debug_tasks(&self) -> &DebugTasks {
        &self.debug
    }
}

fn tick_axis(axis: &mut Axis, dt: f32) -> f32 {
    axis.controller.tick(dt, axis.target_angle, axis.target_speed)
}

fn report_module<W: Write>(
    azimuth: &Axis,
    altitude: &Axis,
    module: DebugModule,
    w: &mut W,
) -> fmt::Result {
    match module {
        DebugModule::AzPosition => azimuth.decoder.report(w),
        DebugModule::AlPosition => altitude.decoder.report(w),
        DebugModule::AzSpeed => {
            w.write_str("Azimuth speed:\r\n")?;
            azimuth.controller.report(w)
        }
        DebugModule::AlSpeed => {
            w.write_str("Altitude speed:\r\n")?;
            altitude.controller.report(w)
        }
    }
}
