//! # Query Subcommand
//!
//! Bands at a frequency (`--from` alone) or overlapping a range
//! (`--from` and `--to`), filtered by the selection flags and optionally
//! widened to take in contiguous matching neighbours.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;

use spectab_collection::Adjacency;
use spectab_core::Frequency;

use crate::{output, SelectionArgs};

/// Arguments for the `spectab query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// View or jurisdiction to query (ITU, USA, all, R1, F, ...).
    #[arg(long, default_value = "all")]
    pub view: String,

    /// Frequency to query, or the lower edge of the range (e.g. 4800MHz).
    #[arg(long)]
    pub from: Frequency,

    /// Upper edge of the range.
    #[arg(long)]
    pub to: Option<Frequency>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Widen the result once to take in touching matching bands.
    #[arg(long, conflicts_with = "recursive")]
    pub adjacent: bool,

    /// Widen repeatedly until no more touching matching bands are found.
    #[arg(long)]
    pub recursive: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    /// Widening mode selected by the flags.
    pub fn adjacency(&self) -> Adjacency {
        if self.recursive {
            Adjacency::Recursive
        } else if self.adjacent {
            Adjacency::Once
        } else {
            Adjacency::None
        }
    }
}

/// Execute the query subcommand.
///
/// Returns exit code: 0 when bands were found, 1 when none matched.
pub fn run_query(args: &QueryArgs, config: &Path) -> Result<u8> {
    if let Some(to) = args.to {
        if to <= args.from {
            bail!("--to ({to}) must be above --from ({})", args.from);
        }
    }
    let db = crate::open_database(config)?;
    let collection = crate::select_view(&db, &args.view)?;
    let bands = collection.get_bands(
        args.from,
        args.to,
        args.selection.condition(),
        args.adjacency(),
    );
    tracing::info!(view = %args.view, found = bands.len(), "query complete");
    output::print_bands(&bands, args.json)?;
    Ok(if bands.is_empty() { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        query: QueryArgs,
    }

    fn parse(argv: &[&str]) -> Result<QueryArgs, clap::Error> {
        Harness::try_parse_from(std::iter::once("query").chain(argv.iter().copied()))
            .map(|h| h.query)
    }

    #[test]
    fn frequencies_parse_with_units() {
        let args = parse(&["--from", "4.8GHz", "--to", "5000 MHz"]).unwrap();
        assert_eq!(args.from, Frequency::ghz(4.8));
        assert_eq!(args.to, Some(Frequency::mhz(5000.0)));
        assert_eq!(args.view, "all");
        assert_eq!(args.adjacency(), Adjacency::None);
    }

    #[test]
    fn adjacency_flags() {
        let args = parse(&["--from", "1MHz", "--adjacent"]).unwrap();
        assert_eq!(args.adjacency(), Adjacency::Once);
        let args = parse(&["--from", "1MHz", "--recursive"]).unwrap();
        assert_eq!(args.adjacency(), Adjacency::Recursive);
        assert!(parse(&["--from", "1MHz", "--adjacent", "--recursive"]).is_err());
    }

    #[test]
    fn bare_number_is_rejected() {
        assert!(parse(&["--from", "4800"]).is_err());
    }

    #[test]
    fn primary_requires_allocation() {
        assert!(parse(&["--from", "1MHz", "--primary"]).is_err());
        let args = parse(&["--from", "1MHz", "--allocation", "fixed*", "--primary"]).unwrap();
        assert!(args.selection.primary);
    }
}
