// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-machine translation of generic move requests into axis coordinates.
//!
//! The host always speaks in azimuth `0..36000` and altitude `-9000..=9000` hundredths of a
//! degree. Each mechanical build maps that onto its own axis travel.

use crate::error::Error;

/// A full turn in hundredths of a degree.
pub const HDEG_PER_TURN: i32 = 36_000;
const HALF_TURN: i32 = HDEG_PER_TURN / 2;
const QUARTER_TURN: i32 = HDEG_PER_TURN / 4;

/// Target pair in hundredths of a degree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveRequest {
    pub azimuth: i32,
    pub altitude: i32,
}

impl MoveRequest {
    pub const fn new(azimuth: i32, altitude: i32) -> Self {
        Self { azimuth, altitude }
    }
}

/// Mechanical build of the tracker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Machine {
    /// Altitude axis travels 0..180°, azimuth only covers half a turn.
    OriginalPrototype,
    /// Full rotation on both axes.
    Massive,
    Small,
}

impl Machine {
    /// Look up a machine by its configuration ID (1, 2 or 3).
    pub fn from_id(id: u8) -> Result<Self, Error> {
        match id {
            1 => Ok(Machine::OriginalPrototype),
            2 => Ok(Machine::Massive),
            3 => Ok(Machine::Small),
            _ => Err(Error::UnknownMachine(id)),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Machine::OriginalPrototype => 1,
            Machine::Massive => 2,
            Machine::Small => 3,
        }
    }

    /// Translate a generic request into this machine's axis coordinates.
    ///
    /// For [`Machine::OriginalPrototype`] the back-half altitude mirror is taken as
    /// `18000 − altitude`, a reflection about the zenith. That convention is assumed: the
    /// prototype's mirror helper was never available to confirm it, so check it on the hardware
    /// before relying on back-half altitudes.
    pub fn remap(self, request: MoveRequest) -> MoveRequest {
        match self {
            Machine::OriginalPrototype => {
                // Shift -90..90 into 0..180
                let mut azimuth = request.azimuth;
                let mut altitude = request.altitude + QUARTER_TURN;

                // Back half of the sky: turn around and tip over the zenith
                if azimuth >= HALF_TURN {
                    azimuth = reciprocal(azimuth);
                    // Assumed mirror convention, see above
                    altitude = HALF_TURN - altitude;
                }
                MoveRequest::new(azimuth, altitude)
            }
            // TODO: Small has its own travel limits once its mechanics are measured
            Machine::Massive | Machine::Small => request,
        }
    }
}

/// The opposite bearing, in `0..HDEG_PER_TURN`.
pub fn reciprocal(hdegrees: i32) -> i32 {
    (hdegrees + HALF_TURN).rem_euclid(HDEG_PER_TURN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for id in 1..=3 {
            assert_eq!(Machine::from_id(id).map(Machine::id), Ok(id));
        }
        assert_eq!(Machine::from_id(0), Err(Error::UnknownMachine(0)));
        assert_eq!(Machine::from_id(4), Err(Error::UnknownMachine(4)));
    }

    #[test]
    fn prototype_front_half_only_shifts_altitude() {
        let out = Machine::OriginalPrototype.remap(MoveRequest::new(4500, 3000));
        assert_eq!(out, MoveRequest::new(4500, 12_000));

        let horizon = Machine::OriginalPrototype.remap(MoveRequest::new(0, -9000));
        assert_eq!(horizon, MoveRequest::new(0, 0));
    }

    #[test]
    fn prototype_back_half_flips_over_the_zenith() {
        // 225° at 30° elevation is 45° with the altitude axis tipped past vertical
        let out = Machine::OriginalPrototype.remap(MoveRequest::new(22_500, 3000));
        assert_eq!(out, MoveRequest::new(4500, 6000));

        let due_south = Machine::OriginalPrototype.remap(MoveRequest::new(18_000, 0));
        assert_eq!(due_south, MoveRequest::new(0, 9000));
    }

    #[test]
    fn other_machines_pass_through() {
        let request = MoveRequest::new(27_000, -4500);
        assert_eq!(Machine::Massive.remap(request), request);
        assert_eq!(Machine::Small.remap(request), request);
    }

    #[test]
    fn reciprocal_wraps() {
        assert_eq!(reciprocal(0), 18_000);
        assert_eq!(reciprocal(27_000), 9000);
        assert_eq!(reciprocal(-100), 17_900);
    }
}
