//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout spectab. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Taxonomy
//!
//! - **Parse rejection**: input text is not a recognizable bounds,
//!   allocation, or band. Recoverable: a table scraper treats it as "keep
//!   accumulating cell text".
//! - **Invariant violation**: degenerate intervals, inconsistent
//!   post-flatten overlaps, merges of disjoint bands without `force`.
//!   These abort the affected jurisdiction's processing.
//! - **Argument contract**: conflicting units, invalid search direction.
//!
//! Nothing is retried. Every error surfaces to the orchestrating pipeline.

use thiserror::Error;

/// Top-level error type for spectab.
#[derive(Error, Debug)]
pub enum SpectabError {
    /// Frequency range text could not be parsed.
    #[error("bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// Allocation line could not be parsed or is malformed.
    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Band construction or combination failed.
    #[error("band error: {0}")]
    Band(#[from] BandError),

    /// Collection-level operation failed.
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),

    /// Unknown jurisdiction name.
    #[error("unknown jurisdiction: {0:?}")]
    UnknownJurisdiction(String),

    /// Unknown frequency unit.
    #[error("unknown frequency unit: {0:?}")]
    UnknownUnit(String),
}

impl SpectabError {
    /// True when the error only says "this text is not what you hoped".
    ///
    /// Scrapers use this to decide whether to keep accumulating text
    /// rather than failing the run.
    pub fn is_parse_rejection(&self) -> bool {
        match self {
            Self::Bounds(e) => e.is_parse_rejection(),
            Self::Allocation(e) => e.is_parse_rejection(),
            Self::Band(e) => e.is_parse_rejection(),
            Self::Collection(_) | Self::UnknownJurisdiction(_) | Self::UnknownUnit(_) => false,
        }
    }
}

/// Error while parsing a frequency range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    /// The text is not a frequency range at all.
    #[error("not a valid range: {0:?}")]
    NotBounds(String),

    /// Units given both in the text and by the caller, and they disagree.
    #[error("units mismatch: text says {in_text}, caller says {supplied}")]
    UnitMismatch {
        /// Unit found in the text.
        in_text: String,
        /// Unit supplied by the caller.
        supplied: String,
    },

    /// Neither the text nor the caller supplied units.
    #[error("no units given in {0:?} or separately")]
    MissingUnits(String),

    /// A numeric field could not be converted.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

impl BoundsError {
    /// See [`SpectabError::is_parse_rejection`].
    pub fn is_parse_rejection(&self) -> bool {
        matches!(self, Self::NotBounds(_))
    }
}

/// Error while parsing or constructing an allocation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// No known service starts this line.
    #[error("unable to identify allocation: {0:?}")]
    NotAllocation(String),

    /// Parenthesised modifier never closed.
    #[error("corrupted allocation: {0:?}")]
    Corrupted(String),

    /// An unranked allocation must come from a footnote mention.
    #[error("allocation for {service} is neither primary nor secondary and not a footnote mention")]
    ConflictingPriority {
        /// Service name of the offending allocation.
        service: String,
    },
}

impl AllocationError {
    /// See [`SpectabError::is_parse_rejection`].
    pub fn is_parse_rejection(&self) -> bool {
        matches!(self, Self::NotAllocation(_))
    }
}

/// Error in band construction, parsing or combination.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandError {
    /// Cell text does not describe a band.
    #[error("not a band: {0}")]
    NotBand(String),

    /// Bounds parse failure while building a band from non-cell input.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// Allocation parse failure while building a band.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// Start is not strictly below stop.
    #[error("inverted or empty bounds: {start} to {stop}")]
    InvertedBounds {
        /// Rendered start frequency.
        start: String,
        /// Rendered stop frequency.
        stop: String,
    },

    /// An allocation was placed in the wrong priority list.
    #[error("allocation {allocation:?} does not belong in the {list} list")]
    MisfiledAllocation {
        /// Rendered allocation.
        allocation: String,
        /// Name of the list it was found in.
        list: &'static str,
    },

    /// Attempted to combine bands that neither overlap nor touch.
    #[error("bands <{left}> and <{right}> are not overlapping/adjacent, set force to combine them")]
    NotOverlappingOrAdjacent {
        /// Compact rendering of the receiver.
        left: String,
        /// Compact rendering of the argument.
        right: String,
    },

    /// Footnote rule entry has an unexpected shape.
    #[error("malformed footnote rule entry: {0:?}")]
    MalformedFootnoteRule(String),

    /// Jurisdiction could not be identified.
    #[error("unknown jurisdiction: {0:?}")]
    UnknownJurisdiction(String),
}

impl BandError {
    /// See [`SpectabError::is_parse_rejection`].
    pub fn is_parse_rejection(&self) -> bool {
        match self {
            Self::NotBand(_) => true,
            Self::Bounds(e) => e.is_parse_rejection(),
            Self::Allocation(e) => e.is_parse_rejection(),
            _ => false,
        }
    }
}

/// Error in a collection-level operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    /// Two consecutive boundaries closer than the minimum band width.
    #[error("tiny or negative band: {lo} to {hi} ({width})")]
    DegenerateInterval {
        /// Lower boundary.
        lo: String,
        /// Upper boundary.
        hi: String,
        /// Rendered width.
        width: String,
    },

    /// After slicing, two entries share a panel but not bounds.
    #[error("inappropriate overlap <{left}> vs. <{right}>")]
    InconsistentOverlap {
        /// Compact rendering of the first entry.
        left: String,
        /// Compact rendering of the second entry.
        right: String,
    },

    /// Stitching met a band that does not touch the accumulator.
    #[error("stitch accumulator <{accumulator}> does not touch <{band}>")]
    StitchDiscontinuity {
        /// Compact rendering of the accumulator.
        accumulator: String,
        /// Compact rendering of the offending band.
        band: String,
    },

    /// Search direction other than +1 / -1.
    #[error("invalid value for direction, must be -1 or +1, got {0}")]
    InvalidDirection(i32),

    /// A band with an empty jurisdiction set cannot be filed anywhere.
    #[error("band <{0}> applies in no jurisdiction")]
    UnassignedBand(String),

    /// Underlying band operation failed.
    #[error(transparent)]
    Band(#[from] BandError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejections_are_recoverable() {
        let e = SpectabError::from(BandError::NotBand("no bounds".into()));
        assert!(e.is_parse_rejection());
        let e = SpectabError::from(BoundsError::NotBounds("hello".into()));
        assert!(e.is_parse_rejection());
        let e = SpectabError::from(BandError::Bounds(BoundsError::NotBounds("x".into())));
        assert!(e.is_parse_rejection());
    }

    #[test]
    fn invariant_violations_are_not_recoverable() {
        let e = SpectabError::from(CollectionError::InvalidDirection(2));
        assert!(!e.is_parse_rejection());
        let e = SpectabError::from(BoundsError::MissingUnits("1-2".into()));
        assert!(!e.is_parse_rejection());
        let e = SpectabError::from(BandError::InvertedBounds {
            start: "2 MHz".into(),
            stop: "1 MHz".into(),
        });
        assert!(!e.is_parse_rejection());
    }

    #[test]
    fn direction_message_names_value() {
        let e = CollectionError::InvalidDirection(0);
        assert!(e.to_string().contains("got 0"));
    }
}
