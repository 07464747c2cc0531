//! Delay query parameter (`d`)
//!
//! Parsing is lenient in the way browser-style integer parsing is: leading
//! whitespace is skipped, an optional sign is accepted and the longest run of
//! leading decimal digits is used, so `"2abc"` and `"2.9"` both mean 2.
//! Values that yield no digits, are negative, or overflow are ignored and the
//! request is handled as if no delay had been asked for.

use std::time::Duration;

/// Outcome of reading the `d` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayParam {
    /// Parameter missing or empty
    Absent,
    /// Non-negative number of seconds to wait
    Seconds(u64),
    /// Parameter present but not usable as a delay
    Ignored,
}

impl DelayParam {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|s| !s.is_empty()) else {
            return Self::Absent;
        };

        let trimmed = raw.trim_start();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits_len = unsigned
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits_len == 0 {
            return Self::Ignored;
        }

        match unsigned[..digits_len].parse::<u64>() {
            Ok(0) => Self::Seconds(0),
            Ok(_) if negative => Self::Ignored,
            Ok(n) => Self::Seconds(n),
            Err(_) => Self::Ignored,
        }
    }

    /// Seconds actually applied (0 unless a positive delay was given)
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Seconds(n) => n,
            Self::Absent | Self::Ignored => 0,
        }
    }

    pub const fn duration(self) -> Duration {
        Duration::from_secs(self.seconds())
    }

    pub const fn is_active(self) -> bool {
        self.seconds() > 0
    }
}
