//! # Build Subcommand
//!
//! Runs the full pipeline and prints one summary line per view and per
//! jurisdiction. Exit code 0 means every phase succeeded.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use spectab_collection::{AllocationDatabase, BandCollection};

use crate::output;

/// Arguments for the `spectab build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Emit the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Size and extent of one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub bands: usize,
    pub lowest: Option<String>,
    pub highest: Option<String>,
}

impl CollectionSummary {
    fn of(name: impl Into<String>, collection: &BandCollection) -> Self {
        Self {
            name: name.into(),
            bands: collection.len(),
            lowest: collection.begin().map(|f| f.to_string()),
            highest: collection.end().map(|f| f.to_string()),
        }
    }
}

/// Summaries of every jurisdiction table followed by every view.
pub fn summarize(db: &AllocationDatabase) -> Vec<CollectionSummary> {
    db.jurisdictions()
        .map(|(j, c)| CollectionSummary::of(j.as_str(), c))
        .chain(db.views().map(|(name, c)| CollectionSummary::of(name, c)))
        .collect()
}

/// Execute the build subcommand.
pub fn run_build(args: &BuildArgs, config: &Path) -> Result<u8> {
    let db = crate::open_database(config)?;
    let summary = summarize(&db);
    if args.json {
        println!("{}", output::json(&summary)?);
    } else {
        for s in &summary {
            match (&s.lowest, &s.highest) {
                (Some(lo), Some(hi)) => println!("{:<8} {:>6} bands  {lo} .. {hi}", s.name, s.bands),
                _ => println!("{:<8} {:>6} bands", s.name, s.bands),
            }
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectab_band::{Allocation, Band, Bounds};
    use spectab_collection::DatabaseBuilder;
    use spectab_core::Jurisdiction;

    #[test]
    fn summary_covers_tables_then_views() {
        let mut builder = DatabaseBuilder::new();
        builder
            .add_band(
                Band::builder(Bounds::parse("4800-4990 MHz", None).unwrap())
                    .jurisdiction(Jurisdiction::UsFederal)
                    .primary(Allocation::parse("FIXED").unwrap())
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let summary = summarize(&builder.build().unwrap());
        let names: Vec<&str> = summary.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["F", "ITU", "USA", "all"]);
        assert_eq!(summary[0].bands, 1);
        assert_eq!(summary[0].lowest.as_deref(), Some("4.8 GHz"));
        assert_eq!(summary[1].bands, 0);
        assert!(summary[1].lowest.is_none());
    }
}
