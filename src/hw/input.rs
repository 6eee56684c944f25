// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `embedded-hal` 1.0 input pins over the HAL's GPIO types.
//!
//! The encoder sampler is written against `embedded_hal::digital::InputPin`; the HAL's own pins
//! expose infallible inherent reads, which this wrapper forwards.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use stm32f7xx_hal::gpio::{Input, Pin, PullUp};

/// GPIO input with the internal pull-up enabled, for open-collector encoder outputs.
pub struct PulledUp<const P: char, const N: u8>(Pin<P, N, Input<PullUp>>);

impl<const P: char, const N: u8> PulledUp<P, N> {
    #[inline]
    pub fn new(pin: Pin<P, N, Input<PullUp>>) -> Self {
        Self(pin)
    }

    pub fn free(self) -> Pin<P, N, Input<PullUp>> {
        self.0
    }
}

impl<const P: char, const N: u8> ErrorType for PulledUp<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> InputPin for PulledUp<P, N> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.is_low())
    }
}
