//! # Nearest Subcommand
//!
//! Walks the panels of a view from a frequency, up or down, and reports the
//! first band accepted by the selection flags.

use std::path::Path;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};

use spectab_collection::Direction;
use spectab_core::Frequency;

use crate::{output, SelectionArgs};

/// Search direction on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Up,
    Down,
}

impl From<SearchDirection> for Direction {
    fn from(value: SearchDirection) -> Self {
        match value {
            SearchDirection::Up => Direction::Up,
            SearchDirection::Down => Direction::Down,
        }
    }
}

/// Arguments for the `spectab nearest` subcommand.
#[derive(Args, Debug)]
pub struct NearestArgs {
    /// View or jurisdiction to search.
    #[arg(long, default_value = "all")]
    pub view: String,

    /// Frequency to start from (e.g. 1.4GHz).
    #[arg(long)]
    pub frequency: Frequency,

    /// Which way to walk.
    #[arg(long, value_enum)]
    pub direction: SearchDirection,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Also consider the bands at the starting frequency.
    #[arg(long)]
    pub include_current: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the nearest subcommand.
///
/// Returns exit code: 0 when a band was found, 1 when the walk ran off the
/// end of the table.
pub fn run_nearest(args: &NearestArgs, config: &Path) -> Result<u8> {
    if args.selection.allocation.is_none() && args.selection.footnote.is_none() {
        bail!("nearest needs --allocation or --footnote to decide what matches");
    }
    let db = crate::open_database(config)?;
    let collection = crate::select_view(&db, &args.view)?;
    let found = collection.find_closest_matching_band(
        args.frequency,
        args.direction.into(),
        args.selection.condition(),
        args.include_current,
    );
    tracing::info!(
        view = %args.view,
        frequency = %args.frequency,
        found = found.is_some(),
        "nearest-match search complete"
    );
    let bands: Vec<_> = found.into_iter().collect();
    output::print_bands(&bands, args.json)?;
    Ok(if bands.is_empty() { 1 } else { 0 })
}
