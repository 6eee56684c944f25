// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Incremental Encoder Decoding
//!
//! - [`quadrature`] - Debounce-then-commit decoder from channel levels to hdegrees.
//! - [`sampler`] - Reads two `embedded-hal` input pins and feeds a decoder.

pub mod quadrature;
pub mod sampler;

pub use quadrature::{
    ChannelState, CommitDirection, DecoderConfig, Direction, LatchPolicy, QuadratureDecoder,
    Transition,
};
pub use sampler::{EncoderSampler, SampleError};
