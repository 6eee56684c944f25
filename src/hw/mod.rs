// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F777 board support: pins, USART console and the `log` backend.

pub mod console;
pub mod input;
pub mod pins;
pub mod usart;

pub use input::PulledUp;
pub use pins::BoardPins;
pub use usart::{Usart, UsartRx};
