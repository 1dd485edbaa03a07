//! Parsing and rendering of constraint value literals.
//!
//! The model grammar for a bound value is:
//! - a leading `?` marks the value as adaptive (to be inferred), optionally
//!   followed by a unit that fixes the display scale (`?ms`);
//! - `12.5%` is a percentage, kept at its face magnitude;
//! - `<number><unit>` with unit in ns/us/ms/s/m/h is a time literal,
//!   normalized to an f64 nanosecond count (no unit means nanoseconds).

use crate::operator::Operator;

/// Whether a configured value is adaptive (to be inferred from observation).
pub fn is_adaptive(value: &str) -> bool {
    value.starts_with('?')
}

/// Time unit suffixes accepted by the value grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
}

/// Suffixes ordered so that the two-letter units are tried before the
/// one-letter ones (`ms` must not be read as `m` followed by junk).
const SUFFIXES: [(&str, TimeUnit); 6] = [
    ("ns", TimeUnit::Nanos),
    ("us", TimeUnit::Micros),
    ("ms", TimeUnit::Millis),
    ("s", TimeUnit::Seconds),
    ("m", TimeUnit::Minutes),
    ("h", TimeUnit::Hours),
];

impl TimeUnit {
    /// Nanoseconds in one unit.
    pub fn nanos(&self) -> f64 {
        match self {
            Self::Nanos => 1.0,
            Self::Micros => 1e3,
            Self::Millis => 1e6,
            Self::Seconds => 1e9,
            Self::Minutes => 60.0 * 1e9,
            Self::Hours => 3600.0 * 1e9,
        }
    }

    /// Display symbol and divisor from nanoseconds. Minutes and hours
    /// collapse to seconds for display.
    pub fn render_scale(&self) -> (&'static str, f64) {
        match self {
            Self::Nanos => ("ns", 1.0),
            Self::Micros => ("us", 1e3),
            Self::Millis => ("ms", 1e6),
            Self::Seconds | Self::Minutes | Self::Hours => ("s", 1e9),
        }
    }
}

/// Split a literal into its numeric text and unit. An absent suffix means
/// nanoseconds.
fn split_unit(value: &str) -> (&str, TimeUnit) {
    for (suffix, unit) in SUFFIXES {
        if let Some(rest) = value.strip_suffix(suffix) {
            return (rest, unit);
        }
    }
    (value, TimeUnit::Nanos)
}

/// Parse a time literal to a nanosecond count. Returns `None` for adaptive
/// markers and anything outside the grammar.
pub fn parse_time(value: &str) -> Option<f64> {
    let (text, unit) = split_unit(value.trim());
    let magnitude: f64 = text.parse().ok()?;
    Some(magnitude * unit.nanos())
}

/// Parse a literal (non-adaptive) value to its numeric form: percentages
/// keep their face magnitude, time literals normalize to nanoseconds.
pub fn parse_numeric(value: &str) -> Option<f64> {
    if let Some(stripped) = value.strip_suffix('%') {
        return stripped.trim().parse().ok();
    }
    parse_time(value)
}

/// The display unit a configured value pins, if the value fits the time
/// grammar. An adaptive `?` prefix is ignored; a bare number or bare `?`
/// defaults to nanoseconds.
pub fn time_unit_of(value: &str) -> Option<TimeUnit> {
    let body = value.trim().trim_start_matches('?');
    let (text, unit) = split_unit(body);
    if text.is_empty() || text.parse::<f64>().is_ok() {
        Some(unit)
    } else {
        None
    }
}

/// Render an inferred duration/percentage value in the unit family of the
/// configured literal, 4-decimal precision.
pub fn render_scaled(raw: &str, value: f64) -> String {
    if raw.ends_with('%') {
        return format!("{value:.4}%");
    }
    match time_unit_of(raw) {
        Some(unit) => {
            let (symbol, divisor) = unit.render_scale();
            format!("{:.4}{}", value / divisor, symbol)
        }
        None => format!("{value:.4}"),
    }
}

/// Render an inferred counter value. The boundary is rounded toward the
/// valid side of the inferred operator; integral results drop the decimals.
pub fn render_counter(value: f64, operator: Operator) -> String {
    let adjusted = match operator {
        Operator::Geq | Operator::Lt => value.ceil(),
        Operator::Gt | Operator::Leq => value.floor(),
        _ => value,
    };
    if adjusted.fract() == 0.0 {
        format!("{adjusted:.0}")
    } else {
        format!("{adjusted:.4}")
    }
}
