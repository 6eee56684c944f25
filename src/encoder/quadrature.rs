// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debounced quadrature decoding of two digital channels into an absolute position.
//!
//! Each change of the `(A, B)` pair relative to the latched state is classified from a 4-bit code
//! (old A, old B, new A, new B). Valid edges move a signed counter; once the counter reaches
//! [`EDGES_PER_TICK`] in either direction the decoder commits one step of `hdegrees_per_tick` to
//! the position.
//!
//! Two behaviour switches select between the legacy decoder and a corrected one:
//!
//! | Switch | Legacy | Corrected |
//! | ------ | ------ | --------- |
//! | [`CommitDirection`] | `Replica`: the sign is read after the counter reset, so every commit steps backwards | `PreResetSign` |
//! | [`LatchPolicy`] | `OnCommit`: the reference state only moves on commit | `EveryEdge` |

use core::fmt;

use crate::diagnostics::Report;
use crate::error::Error;

/// Net valid edges that make up one committed step.
pub const EDGES_PER_TICK: u8 = 10;

/// Direction of a committed step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Classification of a 4-bit quadrature code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Neither channel changed.
    NoOp,
    /// One Gray-code step forwards (`00 -> 01 -> 11 -> 10 -> 00`, written `AB`).
    Forward,
    /// One Gray-code step backwards.
    Backward,
    /// Both channels flipped at once: noise or a skipped state.
    Invalid,
}

impl Transition {
    /// Classify `code = A + 2B + 4A' + 8B'`. Only the low four bits are used.
    pub fn classify(code: u8) -> Self {
        match code & 0x0F {
            1 | 7 | 8 | 14 => Transition::Forward,
            2 | 4 | 11 | 13 => Transition::Backward,
            0 | 5 | 10 | 15 => Transition::NoOp,
            _ => Transition::Invalid,
        }
    }

    /// Classify the move from `old` to `new`.
    #[inline]
    pub fn between(old: ChannelState, new: ChannelState) -> Self {
        Self::classify(old.bits() | (new.bits() << 2))
    }
}

/// Sampled level of both encoder channels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelState {
    pub a: bool,
    pub b: bool,
}

impl ChannelState {
    #[inline]
    pub const fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }

    /// `A` in bit 0, `B` in bit 1.
    #[inline]
    pub const fn bits(self) -> u8 {
        (self.a as u8) | ((self.b as u8) << 1)
    }
}

/// How the commit step decides which way to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommitDirection {
    /// Read the counter sign after it has been reset. Every commit moves backwards.
    Replica,
    /// Use the counter sign captured just before the reset.
    PreResetSign,
}

/// When the reference channel state advances.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LatchPolicy {
    /// Only on a commit; between commits every sample is compared to the same reference.
    OnCommit,
    /// On every observed change.
    EveryEdge,
}

/// Decoder configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecoderConfig {
    /// Magnitude of one committed step, in hundredths of a degree
    pub hdegrees_per_tick: i32,
    /// Net valid edges per committed step, `1..=127`
    pub edges_per_tick: u8,
    pub commit_direction: CommitDirection,
    pub latch: LatchPolicy,
}

impl DecoderConfig {
    /// Legacy behaviour, both defects included.
    pub const fn replica(hdegrees_per_tick: i32) -> Self {
        Self {
            hdegrees_per_tick,
            edges_per_tick: EDGES_PER_TICK,
            commit_direction: CommitDirection::Replica,
            latch: LatchPolicy::OnCommit,
        }
    }

    /// Signed commits and a reference state that follows every edge.
    pub const fn corrected(hdegrees_per_tick: i32) -> Self {
        Self {
            hdegrees_per_tick,
            edges_per_tick: EDGES_PER_TICK,
            commit_direction: CommitDirection::PreResetSign,
            latch: LatchPolicy::EveryEdge,
        }
    }

    pub fn with_edges_per_tick(mut self, edges: u8) -> Self {
        self.edges_per_tick = edges;
        self
    }

    /// Check that a step is non-zero and the commit threshold is reachable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.hdegrees_per_tick == 0
            || self.edges_per_tick == 0
            || self.edges_per_tick > i8::MAX as u8
        {
            return Err(Error::InvalidStep);
        }
        Ok(())
    }
}

/// Encoder state machine for one axis.
pub struct QuadratureDecoder {
    /// Diagnostic label
    name: &'static str,
    /// Reference channel state new samples are compared against
    latched: ChannelState,

    /// Absolute position (hdegrees)
    position: i32,
    /// Stored for reporting only
    target: i32,
    last_tick_position: i32,

    /// Net valid edges since the last commit
    state_change_counter: i8,

    hdegrees_per_tick: i32,
    edges_per_tick: u8,
    commit_direction: CommitDirection,
    latch: LatchPolicy,
}

impl QuadratureDecoder {
    /// Create a decoder at position zero with both channels assumed low.
    ///
    /// Use [`seed`](Self::seed) with the real pin levels before the first update. The
    /// configuration must already be validated; outside the crate use [`try_new`](Self::try_new).
    pub(crate) fn new(name: &'static str, config: DecoderConfig) -> Self {
        Self {
            name,
            latched: ChannelState::default(),
            position: 0,
            target: 0,
            last_tick_position: 0,
            state_change_counter: 0,
            hdegrees_per_tick: config.hdegrees_per_tick,
            edges_per_tick: config.edges_per_tick,
            commit_direction: config.commit_direction,
            latch: config.latch,
        }
    }

    /// Validate `config` and create a decoder at position zero with both channels assumed low.
    pub fn try_new(name: &'static str, config: DecoderConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::new(name, config))
    }

    /// Latch the current channel levels as the reference state and drop partial progress.
    pub fn seed(&mut self, a: bool, b: bool) {
        self.latched = ChannelState::new(a, b);
        self.state_change_counter = 0;
    }

    /// Feed one sample of both channels. Returns the direction of a committed step, if any.
    ///
    /// Calling this with the latched levels is a no-op.
    pub fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        let sample = ChannelState::new(a, b);
        if sample == self.latched {
            return None;
        }

        match Transition::between(self.latched, sample) {
            Transition::Forward => self.state_change_counter += 1,
            Transition::Backward => self.state_change_counter -= 1,
            Transition::Invalid => {
                log::trace!(
                    "{}: invalid quadrature code {:04b}",
                    self.name,
                    self.latched.bits() | (sample.bits() << 2)
                );
            }
            Transition::NoOp => {}
        }

        if self.latch == LatchPolicy::EveryEdge {
            self.latched = sample;
        }

        if self.state_change_counter.unsigned_abs() < self.edges_per_tick {
            return None;
        }

        let pre_reset = self.state_change_counter;
        self.state_change_counter = 0;

        let sign = match self.commit_direction {
            CommitDirection::Replica => self.state_change_counter,
            CommitDirection::PreResetSign => pre_reset,
        };

        let direction = if sign > 0 {
            self.last_tick_position = self.last_tick_position.wrapping_add(self.hdegrees_per_tick);
            Direction::Forward
        } else {
            self.last_tick_position = self.last_tick_position.wrapping_sub(self.hdegrees_per_tick);
            Direction::Backward
        };
        self.position = self.last_tick_position;

        // Commit first, then advance the reference state
        self.latched = sample;

        log::debug!("{}: {:?} step to {}", self.name, direction, self.position);
        Some(direction)
    }

    /// Absolute position in hundredths of a degree.
    #[inline]
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Overwrite the absolute position, e.g. after homing. Later steps continue from here.
    pub fn set_position(&mut self, hdegrees: i32) {
        self.position = hdegrees;
        self.last_tick_position = hdegrees;
    }

    #[inline]
    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn set_target(&mut self, hdegrees: i32) {
        self.target = hdegrees;
    }

    /// Latched `(A, B)` reference levels.
    #[inline]
    pub fn pin_states(&self) -> (bool, bool) {
        (self.latched.a, self.latched.b)
    }

    #[inline]
    pub fn state_change_counter(&self) -> i8 {
        self.state_change_counter
    }

    #[inline]
    pub fn hdegrees_per_tick(&self) -> i32 {
        self.hdegrees_per_tick
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Report for QuadratureDecoder {
    fn report<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        let (a, b) = self.pin_states();
        write!(w, "{}:\r\n", self.name)?;
        write!(w, "\tPosition: {}\r\n", self.position)?;
        write!(w, "\tTarget: {}\r\n", self.target)?;
        write!(w, "\tState: {}, {}\r\n", a as u8, b as u8)
    }
}
