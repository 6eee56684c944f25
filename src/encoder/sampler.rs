// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Reads the A/B channels of an incremental encoder from two GPIO inputs.
//!
//! The sampler owns the pins; the [`QuadratureDecoder`] it feeds is passed in on each call so the
//! decoder can live with the rest of the axis state.

use embedded_hal::digital::InputPin;

use crate::encoder::{Direction, QuadratureDecoder};

/// Which channel failed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError<EA, EB> {
    ChannelA(EA),
    ChannelB(EB),
}

pub struct EncoderSampler<A, B> {
    pin_a: A,
    pin_b: B,
}

impl<A, B> EncoderSampler<A, B>
where
    A: InputPin,
    B: InputPin,
{
    pub fn new(pin_a: A, pin_b: B) -> Self {
        Self { pin_a, pin_b }
    }

    /// Take the pins and seed `decoder` with their current levels.
    pub fn attach(
        pin_a: A,
        pin_b: B,
        decoder: &mut QuadratureDecoder,
    ) -> Result<Self, SampleError<A::Error, B::Error>> {
        let mut sampler = Self::new(pin_a, pin_b);
        sampler.seed(decoder)?;
        Ok(sampler)
    }

    /// Read both channels, high = `true`.
    pub fn read(&mut self) -> Result<(bool, bool), SampleError<A::Error, B::Error>> {
        let a = self.pin_a.is_high().map_err(SampleError::ChannelA)?;
        let b = self.pin_b.is_high().map_err(SampleError::ChannelB)?;
        Ok((a, b))
    }

    /// Latch the current pin levels into `decoder` as its reference state.
    pub fn seed(
        &mut self,
        decoder: &mut QuadratureDecoder,
    ) -> Result<(), SampleError<A::Error, B::Error>> {
        let (a, b) = self.read()?;
        decoder.seed(a, b);
        Ok(())
    }

    /// Sample both channels once and feed them to `decoder`.
    pub fn poll(
        &mut self,
        decoder: &mut QuadratureDecoder,
    ) -> Result<Option<Direction>, SampleError<A::Error, B::Error>> {
        let (a, b) = self.read()?;
        Ok(decoder.update(a, b))
    }

    /// Release the pins.
    pub fn free(self) -> (A, B) {
        (self.pin_a, self.pin_b)
    }
}
