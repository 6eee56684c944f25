// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side session tests: serial bytes in, speed commands and reports out.

use std::f32::consts::{PI, TAU};

use approx::assert_relative_eq;
use skytrack::control::speed_controller::TRACKING_THRESHOLD;
use skytrack::control::Mode;
use skytrack::encoder::DecoderConfig;
use skytrack::machine::Machine;
use skytrack::protocol::{Parser, Reply};
use skytrack::tracker::{hdeg_to_rad, Tracker, TrackerConfig};

const DT: f32 = 0.01;

fn tracker(machine: Machine) -> Tracker {
    let config = TrackerConfig::new(machine, 0.2, 25)
        .with_decoders(DecoderConfig::corrected(25), DecoderConfig::corrected(25));
    Tracker::new(config).unwrap()
}

/// Push `input` through the parser into the tracker and collect the replies.
fn send(parser: &mut Parser, tracker: &mut Tracker, input: &str) -> Vec<Reply> {
    input
        .bytes()
        .filter_map(|b| parser.push(b))
        .filter_map(|command| tracker.handle(command))
        .collect()
}

#[test]
fn session_slews_to_a_fixed_target_and_settles() {
    let mut parser = Parser::new();
    let mut t = tracker(Machine::Massive);

    assert!(send(&mut parser, &mut t, "AZ9000\r\nAL4500\r\n").is_empty());
    assert_eq!(send(&mut parser, &mut t, "ENGAGE\r\n"), [Reply::Online]);

    let first = t.tick(DT);
    assert_eq!(first.azimuth, -0.2);
    assert_eq!(first.altitude, -0.2);

    for _ in 0..2000 {
        t.tick(DT);
    }

    for axis in [t.azimuth(), t.altitude()] {
        let c = &axis.controller;
        assert_eq!(c.mode(), Mode::Tracking);
        assert!(c.fractional_error() <= TRACKING_THRESHOLD + 1e-3);
        // Approached from below without overshooting
        assert!(c.estimated_position() < axis.target_angle());
    }

    assert_eq!(send(&mut parser, &mut t, "RELEASE\n"), [Reply::Offline]);
    let idle = t.tick(DT);
    assert_eq!((idle.azimuth, idle.altitude), (0.0, 0.0));
}

#[test]
fn session_follows_a_moving_target() {
    let mut parser = Parser::new();
    let mut t = tracker(Machine::Massive);
    send(&mut parser, &mut t, "ENGAGE\n");

    // 0.5 deg/s in the direction of decreasing angle, as positive speed
    let speed_units = 50_000;
    let rate = -hdeg_to_rad(50);
    send(&mut parser, &mut t, &format!("AZS{}\n", speed_units));

    let mut target = 2.0_f32;
    for i in 0..6000 {
        target = (target + rate * DT).rem_euclid(TAU);
        let hdeg = (target * 18_000.0 / PI).round() as i32;
        send(&mut parser, &mut t, &format!("AZ{}\n", hdeg));

        let speeds = t.tick(DT);
        assert!(speeds.azimuth.abs() <= 0.2 + 1e-6);
        if i > 3000 {
            assert!(
                t.azimuth().controller.fractional_error() < 0.06,
                "tick {}: {}",
                i,
                t.azimuth().controller.fractional_error()
            );
        }
    }
}

#[test]
fn prototype_remaps_back_half_requests() {
    let mut parser = Parser::new();
    let mut t = tracker(Machine::OriginalPrototype);

    // Combined line is in tenths of a degree: 270.0° azimuth, 15.0° altitude
    send(&mut parser, &mut t, "AZ2700AL0150\n");
    assert_eq!(t.request().azimuth, 27000);
    assert_eq!(t.azimuth().decoder.target(), 9000);
    assert_eq!(t.altitude().decoder.target(), 7500);
    assert_relative_eq!(t.azimuth().target_angle(), PI / 2.0, max_relative = 1e-6);
}

#[test]
fn homing_and_encoder_steps_feed_the_waypoints() {
    let mut parser = Parser::new();
    let mut t = tracker(Machine::Massive);
    send(&mut parser, &mut t, "ALP1000\n");
    t.seed((false, false), (false, false));

    let backward = [(true, false), (true, true), (false, true), (false, false)];
    for &levels in backward.iter().cycle().take(20) {
        t.sample((false, false), levels);
    }

    assert_eq!(t.altitude().decoder.position(), 950);
    assert_relative_eq!(
        t.altitude().controller.next_position(),
        hdeg_to_rad(950) + PI / 90.0,
        max_relative = 1e-6
    );
}

#[test]
fn debug_reports_follow_the_serial_toggles() {
    let mut parser = Parser::new();
    let mut t = tracker(Machine::Massive);
    send(&mut parser, &mut t, "AZP1234\nDBG01\nDBG31\n");

    let mut out = String::new();
    t.report_due(1000, &mut out).unwrap();
    assert!(out.starts_with("Azimuth:\r\n\tPosition: 1234\r\n"));
    assert!(out.contains("Altitude speed:\r\n\tSpeed: "));

    send(&mut parser, &mut t, "DBG00\nDBG30\n");
    let mut out = String::new();
    t.report_due(5000, &mut out).unwrap();
    assert!(out.is_empty());
}
