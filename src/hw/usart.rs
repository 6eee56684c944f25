// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! The transmit half carries the host protocol replies, the diagnostic reports and the log
//! output. The receive half is polled from the main loop, one byte at a time.
//!
//! Note: When using `write!`, be sure to include `\r\n` (CRLF) in the format string; the host
//! parser and most terminals expect it.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

use crate::protocol::Reply;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

pub struct UsartRx<U: Instance> {
    rx: Rx<U>,
}

impl<U: Instance> Usart<U> {
    /// Split a configured serial port into the console writer and the command reader.
    pub fn split<PINS: Pins<U>>(serial: Serial<U, PINS>) -> (Self, UsartRx<U>) {
        let (tx, rx) = serial.split();
        (Self { tx }, UsartRx { rx })
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Send a status reply line to the host.
    #[inline]
    pub fn reply(&mut self, reply: Reply) {
        self.println(reply.as_str());
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> UsartRx<U> {
    /// Next received byte, or `None` if the receiver is empty.
    ///
    /// A byte lost to a framing, noise or overrun error is skipped; the line parser resynchronises
    /// on the next terminator.
    pub fn read_byte(&mut self) -> Option<u8> {
        match self.rx.read() {
            Ok(b) => Some(b),
            Err(nb::Error::WouldBlock) => None,
            Err(nb::Error::Other(e)) => {
                log::trace!("usart rx error: {:?}", e);
                None
            }
        }
    }
}

// Implement `core::fmt::Write` so we can use `write!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}
