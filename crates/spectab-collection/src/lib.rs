//! # spectab-collection: Band Collections and the Allocation Database
//!
//! Interval-indexed sets of [`spectab_band::Band`]s and the operators that
//! turn raw per-jurisdiction tables into an exact, queryable picture of the
//! spectrum.
//!
//! ## Modules
//!
//! - [`index`]: sorted-array interval index with a prefix-max of stops.
//! - [`collection`]: [`BandCollection`] and its query and combination
//!   operators.
//! - [`database`]: [`DatabaseBuilder`], the phased batch pipeline, and the
//!   read-only [`AllocationDatabase`] it produces.
//!
//! ## Crate Policy
//!
//! - Operators return new collections; inputs are never modified.
//! - Query results are deterministic: sorted by start, jurisdiction set,
//!   stop, then insertion order.

pub mod collection;
pub mod database;
pub mod index;

pub use collection::{Adjacency, BandCollection, Direction};
pub use database::{AllocationDatabase, DatabaseBuilder, ViewDefinition};
pub use index::{Entry, IntervalIndex};
