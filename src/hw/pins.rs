// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 tracker controller.

use stm32f7xx_hal::{
    gpio::{gpioa, Alternate},
    pac,
    prelude::*,
};

use super::PulledUp;

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub azimuth: AzimuthEncoderPins,
    pub altitude: AltitudeEncoderPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Azimuth encoder A/B channels
pub struct AzimuthEncoderPins {
    pub a: PulledUp<'A', 0>,
    pub b: PulledUp<'A', 1>,
}

/// Altitude encoder A/B channels
pub struct AltitudeEncoderPins {
    pub a: PulledUp<'A', 6>,
    pub b: PulledUp<'A', 7>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA) -> Self {
        let gpioa = gpioa.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            azimuth: AzimuthEncoderPins {
                a: PulledUp::new(gpioa.pa0.into_pull_up_input()),
                b: PulledUp::new(gpioa.pa1.into_pull_up_input()),
            },

            altitude: AltitudeEncoderPins {
                a: PulledUp::new(gpioa.pa6.into_pull_up_input()),
                b: PulledUp::new(gpioa.pa7.into_pull_up_input()),
            },
        }
    }
}
