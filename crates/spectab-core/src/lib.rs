//! # spectab-core: Foundational Types for spectab
//!
//! The leaf crate of the workspace. It defines the primitives every other
//! crate builds on: the frequency axis, the jurisdiction set, the service
//! registry, and the error taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **One frequency axis.** [`Frequency`] is always hertz. Units exist only
//!    at the text boundary ([`FrequencyUnit`]).
//!
//! 2. **One tolerance policy.** [`Tolerance`] answers every "same edge?"
//!    question. Bounds equality, adjacency, and boundary deduplication all
//!    take it from the same place.
//!
//! 3. **Closed jurisdiction enum.** [`Jurisdiction`] declaration order is the
//!    rank used for deterministic tie-breaking.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `spectab-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod footnote;
pub mod frequency;
pub mod jurisdiction;
pub mod pattern;
pub mod service;

// Re-export primary types for ergonomic imports.
pub use error::{AllocationError, BandError, BoundsError, CollectionError, SpectabError};
pub use footnote::{is_national_footnote, sanitize_footnote_name};
pub use frequency::{
    Frequency, FrequencyUnit, Tolerance, ADJACENCY_EPSILON, DEFAULT_TOLERANCE, MIN_BAND_WIDTH,
};
pub use jurisdiction::Jurisdiction;
pub use pattern::glob_match;
pub use service::{all_services, identify_service, identify_service_prefix, Service, ServiceRef};
