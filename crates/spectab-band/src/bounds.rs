//! # Frequency Bounds
//!
//! A [`Bounds`] is the half-open span `[start, stop)` a band occupies on the
//! hertz axis. Construction enforces `start < stop`.
//!
//! ## Text Forms
//!
//! Regulatory tables write ranges as:
//!
//! ```text
//! 4825-4835 MHz
//! 13 360-13 410 kHz           digit groups separated by spaces
//! 9-14 kHz (Not allocated)
//! Below 8.3 kHz               meaning [0, 8.3 kHz)
//! 4825-4835                   units supplied by the table page
//! ```
//!
//! Units come either from the text or from the caller, never ambiguously
//! from both.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

use spectab_core::{BandError, BoundsError, Frequency, FrequencyUnit, Tolerance};

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<lo>[0-9][0-9_ ]*(?:\.[0-9_ ]+)?)-(?P<hi>[0-9][0-9_ ]*(?:\.[0-9_ ]+)?)\s*(?P<unit>[kMGT]?Hz)?\s*(?P<na>\(Not allocated\))?",
        )
        .expect("range regex must compile")
    })
}

fn below_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^Below\s+(?P<hi>[0-9][0-9_ ]*(?:\.[0-9_ ]+)?)\s*(?P<unit>[kMGT]?Hz)?\s*(?P<na>\(Not allocated\))?",
        )
        .expect("below regex must compile")
    })
}

/// Parse a complete frequency range.
///
/// Returns `(start, stop)`. Trailing text other than whitespace is a
/// [`BoundsError::NotBounds`].
pub fn parse_bounds(
    text: &str,
    units: Option<FrequencyUnit>,
) -> Result<(Frequency, Frequency), BoundsError> {
    let (start, stop, rest) = parse_bounds_prefix(text, units)?;
    if !rest.trim().is_empty() {
        return Err(BoundsError::NotBounds(text.to_string()));
    }
    Ok((start, stop))
}

/// Parse a frequency range at the start of `text`.
///
/// Returns `(start, stop, rest)` where `rest` is whatever follows the
/// range, e.g. `"in Regions 1 and 3"` for `"73-74.6 MHz in Regions 1 and 3"`.
pub fn parse_bounds_prefix(
    text: &str,
    units: Option<FrequencyUnit>,
) -> Result<(Frequency, Frequency, &str), BoundsError> {
    let text = text.trim_start();
    if let Some(caps) = range_re().captures(text) {
        let unit = resolve_units(&caps, units, text)?;
        let start = parse_number(&caps["lo"], text)?;
        let stop = parse_number(&caps["hi"], text)?;
        let end = caps.get(0).map_or(0, |m| m.end());
        return Ok((
            Frequency::new(start, unit),
            Frequency::new(stop, unit),
            &text[end..],
        ));
    }
    if let Some(caps) = below_re().captures(text) {
        let unit = resolve_units(&caps, units, text)?;
        let stop = parse_number(&caps["hi"], text)?;
        let end = caps.get(0).map_or(0, |m| m.end());
        return Ok((Frequency::ZERO, Frequency::new(stop, unit), &text[end..]));
    }
    Err(BoundsError::NotBounds(text.to_string()))
}

fn resolve_units(
    caps: &Captures<'_>,
    supplied: Option<FrequencyUnit>,
    text: &str,
) -> Result<FrequencyUnit, BoundsError> {
    match (caps.name("unit"), supplied) {
        (Some(found), supplied) => {
            let in_text: FrequencyUnit = found
                .as_str()
                .parse()
                .map_err(|_| BoundsError::NotBounds(text.to_string()))?;
            match supplied {
                Some(supplied) if supplied != in_text => Err(BoundsError::UnitMismatch {
                    in_text: in_text.to_string(),
                    supplied: supplied.to_string(),
                }),
                _ => Ok(in_text),
            }
        }
        (None, Some(supplied)) => Ok(supplied),
        (None, None) => Err(BoundsError::MissingUnits(text.to_string())),
    }
}

fn parse_number(digits: &str, text: &str) -> Result<f64, BoundsError> {
    let cleaned: String = digits
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    cleaned
        .parse()
        .map_err(|_| BoundsError::InvalidNumber(text.to_string()))
}

// ─── Bounds ──────────────────────────────────────────────────────────

/// A half-open frequency span `[start, stop)` with `start < stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bounds {
    start: Frequency,
    stop: Frequency,
}

impl Bounds {
    /// Create bounds, rejecting empty or inverted spans.
    pub fn new(start: Frequency, stop: Frequency) -> Result<Self, BandError> {
        // Written so that NaN fails too.
        if !(start.as_hz() < stop.as_hz()) {
            return Err(BandError::InvertedBounds {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }
        Ok(Self { start, stop })
    }

    /// Parse bounds text; see [`parse_bounds`].
    pub fn parse(text: &str, units: Option<FrequencyUnit>) -> Result<Self, BandError> {
        let (start, stop) = parse_bounds(text, units)?;
        Self::new(start, stop)
    }

    /// Lower edge (inclusive).
    pub fn start(&self) -> Frequency {
        self.start
    }

    /// Upper edge (exclusive).
    pub fn stop(&self) -> Frequency {
        self.stop
    }

    /// Width of the span.
    pub fn bandwidth(&self) -> Frequency {
        self.stop - self.start
    }

    /// Midpoint of the span.
    pub fn center(&self) -> Frequency {
        self.start.midpoint(self.stop)
    }

    /// True if `frequency` lies in `[start, stop)`.
    pub fn covers(&self, frequency: Frequency) -> bool {
        self.start <= frequency && frequency < self.stop
    }

    /// True if the two spans share a region of positive width.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.start.max(other.start) < self.stop.min(other.stop)
    }

    /// True if one span ends where the other begins, within `tolerance`.
    pub fn is_adjacent(&self, other: &Bounds, tolerance: &Tolerance) -> bool {
        tolerance.is_close(other.stop, self.start) || tolerance.is_close(other.start, self.stop)
    }

    /// True if both edges agree within `tolerance`.
    pub fn same_as(&self, other: &Bounds, tolerance: &Tolerance) -> bool {
        tolerance.is_close(self.start, other.start) && tolerance.is_close(self.stop, other.stop)
    }

    /// Smallest span containing both.
    pub fn enclosing(&self, other: &Bounds) -> Bounds {
        Bounds {
            start: self.start.min(other.start),
            stop: self.stop.max(other.stop),
        }
    }
}

impl fmt::Display for Bounds {
    /// Both edges in the unit that suits the upper edge, e.g. `4.825-4.835 GHz`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = FrequencyUnit::best_for(self.stop);
        write!(
            f,
            "{}-{} {unit}",
            self.start.format_value_in(unit),
            self.stop.format_value_in(unit)
        )
    }
}
