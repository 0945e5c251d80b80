//! Parameter normalization
//!
//! Turns raw text (CLI flag or prompt answer) into a typed value:
//! - empty or whitespace-only input → the default, silently
//! - unparsable input → the default plus one [`ParamWarning`]
//! - `max colors` is clamped into `[1, 256]` after parsing
//!
//! Nothing here fails a job. Warnings are collected and reported by the
//! caller once, before the job is built.

use shared_utils::report_recoverable;
use std::fmt;
use std::num::{IntErrorKind, NonZeroU32};

/// A raw value that could not be used, and what replaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamWarning {
    pub parameter: &'static str,
    pub raw: String,
    pub fallback: String,
}

impl fmt::Display for ParamWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid value '{}' for {}", self.raw, self.parameter)
    }
}

/// A normalized value together with the warnings produced while getting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub warnings: Vec<ParamWarning>,
}

impl<T> Normalized<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Move the warnings into `sink` and return the value.
    pub fn collect_into(self, sink: &mut Vec<ParamWarning>) -> T {
        sink.extend(self.warnings);
        self.value
    }

    /// Report every warning (stderr + log) and return the value.
    pub fn emit(self) -> T {
        for warning in &self.warnings {
            report_recoverable(&warning.to_string(), &warning.fallback);
        }
        self.value
    }
}

/// A parameter type that can be read from user text.
pub trait ParamValue: Copy + fmt::Display {
    fn parse_param(raw: &str) -> Option<Self>;
}

impl ParamValue for NonZeroU32 {
    fn parse_param(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

/// Playback-duration multiplier applied to presentation timestamps.
/// Below 1.0 plays faster, above 1.0 slower.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    pub const NORMAL: SpeedFactor = SpeedFactor(1.0);

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Display for SpeedFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ParamValue for SpeedFactor {
    fn parse_param(raw: &str) -> Option<Self> {
        raw.parse().ok().and_then(SpeedFactor::new)
    }
}

/// Palette size bound; always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxColors(u16);

impl MaxColors {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 256;

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u16)
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for MaxColors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalize one raw parameter.
pub fn normalize<T: ParamValue>(parameter: &'static str, raw: &str, default: T) -> Normalized<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Normalized::clean(default);
    }

    match T::parse_param(trimmed) {
        Some(value) => Normalized::clean(value),
        None => fallback(parameter, trimmed, default),
    }
}

/// Normalize the palette size. Any integer is accepted and clamped, including
/// values too large for a machine integer.
pub fn normalize_max_colors(raw: &str, default: MaxColors) -> Normalized<MaxColors> {
    const PARAMETER: &str = "max colors";

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Normalized::clean(default);
    }

    let value = match trimmed.parse::<i64>() {
        Ok(n) => MaxColors::clamped(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => MaxColors(MaxColors::MAX),
            IntErrorKind::NegOverflow => MaxColors(MaxColors::MIN),
            _ => return fallback(PARAMETER, trimmed, default),
        },
    };

    if value.to_string() != trimmed {
        tracing::info!(raw = trimmed, used = value.get(), "max colors clamped");
    }
    Normalized::clean(value)
}

fn fallback<T: fmt::Display>(parameter: &'static str, raw: &str, default: T) -> Normalized<T> {
    let warning = ParamWarning {
        parameter,
        raw: raw.to_string(),
        fallback: default.to_string(),
    };
    Normalized {
        value: default,
        warnings: vec![warning],
    }
}
