//! Severity bitmask definitions
//!
//! A [`Severity`] is both the level of a single record and the filter of a
//! sink. Elementary levels each own one bit; the composite groups are unions
//! of those bits. A record is delivered to a sink when every bit of the
//! record's severity is also present in the sink's filter.

use super::error::{LogrError, Result};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Severity: u8 {
        const PANIC = 1 << 1;
        const ERROR = 1 << 2;
        const WARNING = 1 << 3;
        const INFO = 1 << 4;
        const DEBUG = 1 << 5;
        const SUCCESS = 1 << 6;

        const CRITICAL = Self::PANIC.bits() | Self::ERROR.bits();
        const MONITOR = Self::CRITICAL.bits() | Self::WARNING.bits();
        const VERBOSE = Self::MONITOR.bits() | Self::INFO.bits() | Self::SUCCESS.bits();
        const ALL = Self::VERBOSE.bits() | Self::DEBUG.bits();
    }
}

/// ANSI reset sequence appended after coloured output
pub const COLOUR_RESET: &str = "\x1B[0m";

/// Short codes, in bit order starting at [`Severity::PANIC`]
const CODES: &str = "PEWIDS";

/// Label vocabulary accepted by [`Severity::from_label`]
///
/// An elementary label selects that level and everything more severe.
const LABELS: [(&str, Severity); 11] = [
    ("none", Severity::NONE),
    ("panic", Severity::PANIC),
    ("error", Severity::CRITICAL),
    ("warning", Severity::MONITOR),
    ("info", Severity::MONITOR.union(Severity::INFO)),
    ("success", Severity::VERBOSE),
    ("debug", Severity::ALL),
    ("critical", Severity::CRITICAL),
    ("monitor", Severity::MONITOR),
    ("verbose", Severity::VERBOSE),
    ("all", Severity::ALL),
];

impl Severity {
    /// No bits set; matches every filter
    pub const NONE: Severity = Severity::empty();

    /// True iff every bit of `self` is also set in `filter`
    #[inline]
    pub fn matches(self, filter: Severity) -> bool {
        filter.contains(self)
    }

    /// Map a case-insensitive, whitespace-trimmed label to its bitmask
    pub fn from_label(label: &str) -> Result<Severity> {
        let wanted = label.trim().to_lowercase();
        LABELS
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, severity)| *severity)
            .ok_or_else(|| LogrError::unsupported_label(label))
    }

    /// Union of the bits named by each short code in `codes`
    ///
    /// Characters outside `PEWIDS` contribute nothing.
    pub fn from_codes(codes: &str) -> Severity {
        codes
            .chars()
            .fold(Severity::NONE, |acc, c| acc | Severity::from_code(c))
    }

    /// The single bit named by a short code, or [`Severity::NONE`]
    pub fn from_code(code: char) -> Severity {
        match CODES.chars().position(|c| c == code) {
            Some(ordinal) => Severity::from_bits_truncate(1 << (ordinal + 1)),
            None => Severity::NONE,
        }
    }

    /// True for `NONE` and the six single-bit levels
    pub fn is_elementary(self) -> bool {
        self.bits().count_ones() <= 1
    }

    /// Lowercase word, `"unknown"` for composite values
    pub fn word(self) -> &'static str {
        match self {
            Severity::NONE => "none",
            Severity::PANIC => "panic",
            Severity::ERROR => "error",
            Severity::WARNING => "warning",
            Severity::INFO => "info",
            Severity::DEBUG => "debug",
            Severity::SUCCESS => "success",
            _ => "unknown",
        }
    }

    /// Single-character glyph, numeric fallback for composite values
    pub fn glyph(self) -> String {
        match self {
            Severity::NONE => "-".to_string(),
            Severity::PANIC => "P".to_string(),
            Severity::ERROR => "E".to_string(),
            Severity::WARNING => "W".to_string(),
            Severity::INFO => "I".to_string(),
            Severity::DEBUG => "D".to_string(),
            Severity::SUCCESS => "S".to_string(),
            other => format!("Severity({})", other.bits()),
        }
    }

    /// ANSI 256-colour escape for the level
    pub fn colour(self) -> &'static str {
        match self {
            Severity::PANIC | Severity::ERROR => "\x1B[38;5;124m",
            Severity::WARNING => "\x1B[38;5;208m",
            Severity::INFO => "\x1B[38;5;33m",
            Severity::DEBUG => "\x1B[38;5;153m",
            Severity::SUCCESS => "\x1B[38;5;34m",
            _ => COLOUR_RESET,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::NONE
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

impl FromStr for Severity {
    type Err = LogrError;

    fn from_str(s: &str) -> Result<Self> {
        Severity::from_label(s)
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.word())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Severity::from_label(&label).map_err(serde::de::Error::custom)
    }
}
