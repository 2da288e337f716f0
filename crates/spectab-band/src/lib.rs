//! # spectab-band: Allocations and Bands
//!
//! The value layer of spectab. A [`Band`] is a frequency span together with
//! the allocations, footnotes and jurisdictions a table cell assigns to it;
//! an [`Allocation`] is one service's claim on that span.
//!
//! ## Modules
//!
//! - [`bounds`]: the `[start, stop)` span type and the range-text parser.
//! - [`allocation`]: allocation parsing, rendering and glob matching.
//! - [`band`]: the band itself, its builder, equality and combination.
//! - [`filter`]: [`AllocationFilter`], the predicate behind allocation queries.
//! - [`parse`]: table-cell records and [`Band::parse`].
//! - [`footnote_band`]: bands injected from footnote rules.
//!
//! ## Crate Policy
//!
//! - Bands are values. Combination returns a new band; nothing here mutates
//!   a band another owner can see.
//! - All tolerance-sensitive comparisons go through [`spectab_core::Tolerance`].

pub mod allocation;
pub mod band;
pub mod bounds;
pub mod filter;
pub mod footnote_band;
pub mod parse;

pub use allocation::{Allocation, Priority};
pub use band::{Band, BandBuilder, BandComparison, CombineOptions, Metadata};
pub use bounds::{parse_bounds, parse_bounds_prefix, Bounds};
pub use filter::AllocationFilter;
pub use footnote_band::{create_band_from_footnote, parse_footnote_rule_entry, FootnoteBandRecord};
pub use parse::CellRecord;
