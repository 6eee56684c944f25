// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line parser for the tracker command protocol.
//!
//! Bytes are pushed one at a time as they arrive from the USART. A command is produced when the
//! line terminator is seen.

use crate::diagnostics::DebugModule;
use crate::protocol::messages::*;

enum State {
    /// Collecting a line
    Line,
    /// Line overflowed the buffer; skip to the next terminator
    Discard,
}

pub struct Parser {
    state: State,
    buf: [u8; MAX_LINE_LEN],
    len: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            state: State::Line,
            buf: [0; MAX_LINE_LEN],
            len: 0,
        }
    }

    /// Process a single incoming byte. Returns `Some(Command)` when a complete valid line ends.
    pub fn push(&mut self, byte: u8) -> Option<Command> {
        match self.state {
            State::Line => match byte {
                LINE_END => {
                    let len = self.len;
                    self.len = 0;
                    if len == 0 {
                        return None;
                    }

                    let line = &self.buf[..len];
                    let command = parse_line(line);
                    if command.is_none() {
                        log::warn!("dropping malformed line {:?}", Ascii(line));
                    }
                    return command;
                }
                b'\r' => {}
                _ if self.len == MAX_LINE_LEN => {
                    log::warn!("line longer than {} bytes, discarding", MAX_LINE_LEN);
                    self.len = 0;
                    self.state = State::Discard;
                }
                _ => {
                    self.buf[self.len] = byte;
                    self.len += 1;
                }
            },
            State::Discard => {
                if byte == LINE_END {
                    self.state = State::Line;
                }
            }
        }
        None
    }
}

/// Parse one line without its terminator.
pub fn parse_line(line: &[u8]) -> Option<Command> {
    if line == KW_ENGAGE {
        return Some(Command::Engage);
    }
    if line == KW_RELEASE {
        return Some(Command::Release);
    }
    if let Some(rest) = line.strip_prefix(KW_DEBUG) {
        return parse_debug(rest);
    }
    if let Some(rest) = line.strip_prefix(KW_AZIMUTH) {
        if let Some(at) = rest.windows(KW_ALTITUDE.len()).position(|w| w == KW_ALTITUDE) {
            let azimuth = parse_tdeg(&rest[..at])?;
            let altitude = parse_tdeg(&rest[at + KW_ALTITUDE.len()..])?;
            return Some(Command::Target { azimuth, altitude });
        }
        return parse_axis(rest, Command::TargetAzimuth, Command::AzimuthSpeed, Command::SetAzimuth);
    }
    if let Some(rest) = line.strip_prefix(KW_ALTITUDE) {
        return parse_axis(
            rest,
            Command::TargetAltitude,
            Command::AltitudeSpeed,
            Command::SetAltitude,
        );
    }
    None
}

fn parse_axis(
    rest: &[u8],
    target: fn(i32) -> Command,
    speed: fn(i32) -> Command,
    position: fn(i32) -> Command,
) -> Option<Command> {
    match rest.split_first() {
        Some((&SUFFIX_SPEED, value)) => parse_int(value).map(speed),
        Some((&SUFFIX_POSITION, value)) => parse_int(value).map(position),
        _ => parse_int(rest).map(target),
    }
}

/// Tenths of a degree in, hdegrees out.
fn parse_tdeg(digits: &[u8]) -> Option<i32> {
    parse_int(digits)?.checked_mul(HDEG_PER_TDEG)
}

fn parse_debug(rest: &[u8]) -> Option<Command> {
    let [module, on] = rest else {
        return None;
    };

    let module = DebugModule::from_index((*module).checked_sub(b'0')?).ok()?;
    let on = match *on {
        b'0' => false,
        b'1' => true,
        _ => return None,
    };
    Some(Command::Debug { module, on })
}

/// Optional sign followed by at least one decimal digit. Overflow is rejected.
fn parse_int(digits: &[u8]) -> Option<i32> {
    let (negative, digits) = match digits.split_first() {
        Some((&b'-', rest)) => (true, rest),
        Some((&b'+', rest)) => (false, rest),
        _ => (false, digits),
    };
    if digits.is_empty() {
        return None;
    }

    let mut value: i32 = 0;
    for &d in digits {
        if !d.is_ascii_digit() {
            return None;
        }
        let digit = (d - b'0') as i32;
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
    }
    Some(value)
}

/// Lossy view of a byte line for log output.
struct Ascii<'a>(&'a [u8]);

impl core::fmt::Debug for Ascii<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.0) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "{:02x?}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut Parser, bytes: &[u8]) -> Option<Command> {
        let mut last = None;
        for &b in bytes {
            if let Some(cmd) = parser.push(b) {
                last = Some(cmd);
            }
        }
        last
    }

    #[test]
    fn targets_speeds_and_positions() {
        let mut p = Parser::new();
        assert_eq!(feed(&mut p, b"AZ4500\n"), Some(Command::TargetAzimuth(4500)));
        assert_eq!(feed(&mut p, b"AL-1200\n"), Some(Command::TargetAltitude(-1200)));
        assert_eq!(feed(&mut p, b"AZS-417\n"), Some(Command::AzimuthSpeed(-417)));
        assert_eq!(feed(&mut p, b"ALS+20\n"), Some(Command::AltitudeSpeed(20)));
        assert_eq!(feed(&mut p, b"AZP0\n"), Some(Command::SetAzimuth(0)));
        assert_eq!(feed(&mut p, b"ALP9000\n"), Some(Command::SetAltitude(9000)));
    }

    #[test]
    fn keywords_and_debug_toggles() {
        let mut p = Parser::new();
        assert_eq!(feed(&mut p, b"ENGAGE\n"), Some(Command::Engage));
        assert_eq!(feed(&mut p, b"RELEASE\n"), Some(Command::Release));
        assert_eq!(
            feed(&mut p, b"DBG21\n"),
            Some(Command::Debug {
                module: DebugModule::AzSpeed,
                on: true
            })
        );
        assert_eq!(
            feed(&mut p, b"DBG00\n"),
            Some(Command::Debug {
                module: DebugModule::AzPosition,
                on: false
            })
        );
    }

    #[test]
    fn carriage_returns_are_ignored() {
        let mut p = Parser::new();
        assert_eq!(feed(&mut p, b"AZ100\r\n"), Some(Command::TargetAzimuth(100)));
        assert_eq!(feed(&mut p, b"\r\n"), None);
    }

    #[test]
    fn combined_position_line_sets_both_axes() {
        let mut p = Parser::new();
        assert_eq!(
            feed(&mut p, b"AZ1800AL0450\n"),
            Some(Command::Target {
                azimuth: 18000,
                altitude: 4500
            })
        );
        assert_eq!(
            feed(&mut p, b"AZ0100AL-0200\n"),
            Some(Command::Target {
                azimuth: 1000,
                altitude: -2000
            })
        );
        // Scaling out of range
        assert_eq!(feed(&mut p, b"AZ300000000AL0\n"), None);
        assert_eq!(feed(&mut p, b"AZ0100AL\n"), None);
        assert_eq!(feed(&mut p, b"AZAL5\n"), None);
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let mut p = Parser::new();
        let lines: [&[u8]; 11] = [
            b"AZ\n",
            b"AZ-\n",
            b"AZ12x\n",
            b"AZS\n",
            b"XY100\n",
            b"DBG4 1\n",
            b"DBG41\n",
            b"DBG12\n",
            b"DBG1\n",
            b"engage\n",
            b"AZ99999999999\n",
        ];
        for line in lines {
            assert_eq!(feed(&mut p, line), None, "{:?}", core::str::from_utf8(line));
        }

        // Still in sync afterwards
        assert_eq!(feed(&mut p, b"AL5\n"), Some(Command::TargetAltitude(5)));
    }

    #[test]
    fn overlong_lines_are_discarded_until_the_next_terminator() {
        let mut p = Parser::new();
        let mut long = [b'7'; 40];
        long[..2].copy_from_slice(b"AZ");
        assert_eq!(feed(&mut p, &long), None);
        assert_eq!(feed(&mut p, b"\n"), None);
        assert_eq!(feed(&mut p, b"AZ1\n"), Some(Command::TargetAzimuth(1)));
    }

    #[test]
    fn a_line_exactly_filling_the_buffer_is_accepted() {
        let mut p = Parser::new();
        let mut line = [b'0'; MAX_LINE_LEN];
        line[..2].copy_from_slice(b"AZ");
        line[MAX_LINE_LEN - 1] = b'9';
        assert_eq!(feed(&mut p, &line), None);
        assert_eq!(p.push(b'\n'), Some(Command::TargetAzimuth(9)));
    }

    #[test]
    fn int_limits() {
        assert_eq!(parse_int(b"2147483647"), Some(i32::MAX));
        assert_eq!(parse_int(b"-2147483648"), Some(i32::MIN));
        assert_eq!(parse_int(b"2147483648"), None);
        assert_eq!(parse_int(b"+"), None);
    }

    #[test]
    fn replies() {
        assert_eq!(Reply::Online.as_str(), "ONLINE");
        assert_eq!(Reply::Offline.as_str(), "OFFLINE");
    }
}
