// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use core::convert::Infallible;

use cortex_m::delay::Delay;
use cortex_m::peripheral::DWT;
use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use skytrack::encoder::{EncoderSampler, SampleError};
use skytrack::hw::{console, BoardPins, Usart};
use skytrack::machine::Machine;
use skytrack::protocol::{Parser, Reply};
use skytrack::tracker::{Tracker, TrackerConfig};

/// 1 = original prototype, 2 = massive tracker, 3 = small tracker
const MACHINE_ID: u8 = 1;

const BAUD_RATE: u32 = 115_200;

/// Axis speed ceiling (rad/s)
const MAX_SPEED: f32 = 0.35;
const HDEGREES_PER_TICK: i32 = 25;

/// Pause between encoder samples
const SAMPLE_PERIOD_US: u32 = 100;
/// Minimum time between control ticks
const CONTROL_PERIOD_MS: u32 = 10;

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let sysclk_hz = clocks.sysclk().raw();
    let mut delay = Delay::new(cp.SYST, sysclk_hz);

    // Cycle counter for measuring the control period
    cp.DCB.enable_trace();
    cp.DWT.enable_cycle_counter();
    let cycles_per_ms = sysclk_hz / 1000;
    let control_period_cycles = cycles_per_ms * CONTROL_PERIOD_MS;

    let pins = BoardPins::new(dp.GPIOA);

    // USART1 (host link and console)
    let usart_cfg = Config {
        baud_rate: BAUD_RATE.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let (usart, mut rx) = Usart::split(serial);
    console::init(usart, log::LevelFilter::Info);

    let config = match Machine::from_id(MACHINE_ID) {
        Ok(machine) => TrackerConfig::new(machine, MAX_SPEED, HDEGREES_PER_TICK),
        Err(e) => halt(e),
    };
    let mut tracker = match Tracker::new(config) {
        Ok(tracker) => tracker,
        Err(e) => halt(e),
    };
    log::info!("skytrack up, machine {:?}", config.machine);

    // Encoders
    let mut azimuth = EncoderSampler::new(pins.azimuth.a, pins.azimuth.b);
    let mut altitude = EncoderSampler::new(pins.altitude.a, pins.altitude.b);
    tracker.seed(levels(azimuth.read()), levels(altitude.read()));

    let mut parser = Parser::new();
    let _ = console::with(|w| {
        w.reply(Reply::Offline);
        Ok(())
    });

    let mut last_tick = DWT::cycle_count();
    loop {
        tracker.sample(levels(azimuth.read()), levels(altitude.read()));

        while let Some(byte) = rx.read_byte() {
            let Some(command) = parser.push(byte) else {
                continue;
            };
            if let Some(reply) = tracker.handle(command) {
                let _ = console::with(|w| {
                    w.reply(reply);
                    Ok(())
                });
            }
        }

        // 32-bit counter, wraps every few seconds
        let now = DWT::cycle_count();
        let elapsed = now.wrapping_sub(last_tick);
        if elapsed >= control_period_cycles {
            last_tick = now;

            let dt = elapsed as f32 / sysclk_hz as f32;
            let speeds = tracker.tick(dt);
            log::trace!("dt {} s, speeds {:?}", dt, speeds);

            let _ = console::with(|w| tracker.report_due(elapsed / cycles_per_ms, w));
        }

        delay.delay_us(SAMPLE_PERIOD_US);
    }
}

/// Pin reads on this board cannot fail.
fn levels(sample: Result<(bool, bool), SampleError<Infallible, Infallible>>) -> (bool, bool) {
    match sample {
        Ok(levels) => levels,
        Err(SampleError::ChannelA(e) | SampleError::ChannelB(e)) => match e {},
    }
}

fn halt(e: skytrack::Error) -> ! {
    log::error!("bad configuration: {}", e);
    loop {
        cortex_m::asm::nop();
    }
}
