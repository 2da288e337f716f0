//! # Frequency Quantities and Tolerance Policy
//!
//! Every bound in spectab lives on one canonical axis: hertz, stored as
//! `f64`. Values arriving in kHz/MHz/GHz are normalized at construction so
//! that comparisons never mix units.
//!
//! Because upstream tables are transcribed in several units, bounds that
//! denote the same physical edge can differ by conversion rounding. All
//! "same edge" questions (bounds equality, adjacency, boundary
//! deduplication during flatten) go through one [`Tolerance`] so they can
//! never disagree with each other.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoundsError, SpectabError};

/// Smallest span flatten accepts between consecutive boundaries.
pub const MIN_BAND_WIDTH: Frequency = Frequency(10.0);

/// Relative widening applied by adjacency-expanding queries.
pub const ADJACENCY_EPSILON: f64 = 1e-5;

/// Default tolerance: 10 Hz absolute plus one part per million.
pub const DEFAULT_TOLERANCE: Tolerance = Tolerance {
    atol_hz: 10.0,
    rtol: 1e-6,
};

// ─── Units ───────────────────────────────────────────────────────────

/// Frequency units found in regulatory tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrequencyUnit {
    /// Hertz.
    #[serde(rename = "Hz")]
    Hz,
    /// Kilohertz.
    #[serde(rename = "kHz")]
    KHz,
    /// Megahertz.
    #[serde(rename = "MHz")]
    MHz,
    /// Gigahertz.
    #[serde(rename = "GHz")]
    GHz,
    /// Terahertz.
    #[serde(rename = "THz")]
    THz,
}

impl FrequencyUnit {
    /// Number of hertz in one of this unit.
    pub fn factor(&self) -> f64 {
        match self {
            Self::Hz => 1.0,
            Self::KHz => 1e3,
            Self::MHz => 1e6,
            Self::GHz => 1e9,
            Self::THz => 1e12,
        }
    }

    /// Conventional symbol, e.g. `"MHz"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hz => "Hz",
            Self::KHz => "kHz",
            Self::MHz => "MHz",
            Self::GHz => "GHz",
            Self::THz => "THz",
        }
    }

    /// Largest unit in which `frequency` is at least one.
    pub fn best_for(frequency: Frequency) -> Self {
        let magnitude = frequency.as_hz().abs();
        if magnitude >= 1e12 {
            Self::THz
        } else if magnitude >= 1e9 {
            Self::GHz
        } else if magnitude >= 1e6 {
            Self::MHz
        } else if magnitude >= 1e3 {
            Self::KHz
        } else {
            Self::Hz
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyUnit {
    type Err = SpectabError;

    /// Parse a unit symbol. Matching is case-insensitive; there is no
    /// millihertz in spectrum tables, so `"mhz"` is megahertz.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hz" => Ok(Self::Hz),
            "khz" => Ok(Self::KHz),
            "mhz" => Ok(Self::MHz),
            "ghz" => Ok(Self::GHz),
            "thz" => Ok(Self::THz),
            _ => Err(SpectabError::UnknownUnit(s.to_string())),
        }
    }
}

// ─── Frequency ───────────────────────────────────────────────────────

/// A frequency in hertz.
///
/// Totally ordered via [`f64::total_cmp`] so it can key sorted indexes.
/// Negative zero is folded into zero at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(f64);

impl Frequency {
    /// Zero hertz, the bottom of every table.
    pub const ZERO: Frequency = Frequency(0.0);

    /// A frequency from a value in hertz.
    pub fn hz(value: f64) -> Self {
        Self(value + 0.0)
    }

    /// A frequency from a value in kilohertz.
    pub fn khz(value: f64) -> Self {
        Self::new(value, FrequencyUnit::KHz)
    }

    /// A frequency from a value in megahertz.
    pub fn mhz(value: f64) -> Self {
        Self::new(value, FrequencyUnit::MHz)
    }

    /// A frequency from a value in gigahertz.
    pub fn ghz(value: f64) -> Self {
        Self::new(value, FrequencyUnit::GHz)
    }

    /// A frequency from a value in the given unit.
    pub fn new(value: f64, unit: FrequencyUnit) -> Self {
        Self::hz(value * unit.factor())
    }

    /// Value in hertz.
    pub fn as_hz(&self) -> f64 {
        self.0
    }

    /// Value expressed in `unit`.
    pub fn in_unit(&self, unit: FrequencyUnit) -> f64 {
        self.0 / unit.factor()
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Frequency) -> Frequency {
        Frequency::hz(0.5 * (self.0 + other.0))
    }

    /// Absolute difference.
    pub fn abs_diff(self, other: Frequency) -> Frequency {
        Frequency::hz((self.0 - other.0).abs())
    }

    /// Smaller of two frequencies.
    pub fn min(self, other: Frequency) -> Frequency {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Larger of two frequencies.
    pub fn max(self, other: Frequency) -> Frequency {
        if self >= other {
            self
        } else {
            other
        }
    }

    /// Render with an explicit unit, rounded to five decimals.
    pub fn format_in(&self, unit: FrequencyUnit) -> String {
        format!("{} {unit}", self.format_value_in(unit))
    }

    /// Numeric part of [`Frequency::format_in`], without the unit symbol.
    pub fn format_value_in(&self, unit: FrequencyUnit) -> String {
        let value = format!("{:.5}", self.in_unit(unit));
        let trimmed = value.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

impl PartialEq for Frequency {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frequency {}

impl PartialOrd for Frequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frequency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Frequency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Add for Frequency {
    type Output = Frequency;
    fn add(self, rhs: Frequency) -> Frequency {
        Frequency::hz(self.0 + rhs.0)
    }
}

impl Sub for Frequency {
    type Output = Frequency;
    fn sub(self, rhs: Frequency) -> Frequency {
        Frequency::hz(self.0 - rhs.0)
    }
}

impl Mul<f64> for Frequency {
    type Output = Frequency;
    fn mul(self, rhs: f64) -> Frequency {
        Frequency::hz(self.0 * rhs)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_in(FrequencyUnit::best_for(*self)))
    }
}

impl FromStr for Frequency {
    type Err = SpectabError;

    /// Parse `"4825MHz"`, `"4.825 GHz"` or `"13 360 kHz"`. A unit is required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| SpectabError::UnknownUnit(String::new()))?;
        let (number, unit) = trimmed.split_at(split);
        let unit: FrequencyUnit = unit.parse()?;
        let digits: String = number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect();
        let value = digits
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| BoundsError::InvalidNumber(s.to_string()))?;
        Ok(Frequency::new(value, unit))
    }
}

// ─── Tolerance ───────────────────────────────────────────────────────

/// Absolute plus relative closeness test for frequencies.
///
/// `is_close(a, b)` holds when `|a - b| <= atol + rtol * |b|`, the same
/// rule as numpy's `isclose`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Absolute tolerance in hertz.
    pub atol_hz: f64,
    /// Relative tolerance (dimensionless).
    pub rtol: f64,
}

impl Tolerance {
    /// Whether `a` and `b` denote the same edge.
    pub fn is_close(&self, a: Frequency, b: Frequency) -> bool {
        (a.0 - b.0).abs() <= self.atol_hz + self.rtol * b.0.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        DEFAULT_TOLERANCE
    }
}
