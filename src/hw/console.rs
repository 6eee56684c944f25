// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared debug console on USART1 and the `log` backend that writes to it.
//!
//! The transmitter is parked in a critical-section mutex so that the logger, the protocol replies
//! and the diagnostic reports can all reach it. Do not log from inside a [`with`] closure: the
//! console is already borrowed there.

use core::cell::RefCell;
use core::fmt::{self, Write};

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record};
use stm32f7xx_hal::pac::USART1;

use super::Usart;

pub type ConsoleUsart = Usart<USART1>;

static CONSOLE: Mutex<RefCell<Option<ConsoleUsart>>> = Mutex::new(RefCell::new(None));
static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = with(|w| {
            write!(
                w,
                "[{}] {}: {}\r\n",
                record.level(),
                record.target(),
                record.args()
            )
        });
    }

    fn flush(&self) {
        let _ = with(|w| {
            w.flush();
            Ok(())
        });
    }
}

/// Take ownership of the console transmitter and install the logger at `level`.
pub fn init(usart: ConsoleUsart, level: LevelFilter) {
    interrupt::free(|cs| CONSOLE.borrow(cs).replace(Some(usart)));

    // Fails only if a logger is already installed
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Run `f` with exclusive access to the console. Does nothing before [`init`].
pub fn with<F>(f: F) -> fmt::Result
where
    F: FnOnce(&mut ConsoleUsart) -> fmt::Result,
{
    interrupt::free(|cs| match CONSOLE.borrow(cs).borrow_mut().as_mut() {
        Some(usart) => f(usart),
        None => Ok(()),
    })
}
