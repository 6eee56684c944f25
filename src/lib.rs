// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Skytrack Firmware
//!
//! This crate contains the firmware for a two-axis (azimuth/altitude) satellite tracker, written
//! in Rust, targeting an STM32F777 MCU. A host streams target angles and speeds over a serial
//! line; the firmware turns them into per-axis speed commands and tracks the axes with
//! incremental encoders.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`control`] | Wraparound-aware angle types and the per-axis speed controller |
//! | [`encoder`] | Quadrature decoding of incremental encoders |
//! | [`machine`] | Per-machine remapping of move requests |
//! | [`diagnostics`] | Periodic debug reports |
//! | [`protocol`] | Host serial command parser |
//! | [`tracker`] | Two-axis application state |
//! | `hw` | MCU-level wrappers: pins, USART console, logger (feature `firmware`) |
//!
//! Everything except `hw` is hardware-independent and builds and tests on the host.
//!
//! ## Getting Started
//!
//! Run the tests on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod control;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod machine;
pub mod protocol;
pub mod tracker;

#[cfg(feature = "firmware")]
pub mod hw;

pub use error::Error;
