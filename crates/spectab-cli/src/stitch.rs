//! # Stitch Subcommand
//!
//! Coalesces contiguous runs of matching bands in a view and prints the
//! combined runs.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::{output, SelectionArgs};

/// Arguments for the `spectab stitch` subcommand.
#[derive(Args, Debug)]
pub struct StitchArgs {
    /// View or jurisdiction to stitch.
    #[arg(long, default_value = "all")]
    pub view: String,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the stitch subcommand.
pub fn run_stitch(args: &StitchArgs, config: &Path) -> Result<u8> {
    let db = crate::open_database(config)?;
    let collection = crate::select_view(&db, &args.view)?;
    let stitched = collection
        .stitch(args.selection.condition())
        .with_context(|| format!("failed to stitch view {:?}", args.view))?;
    let bands: Vec<_> = stitched.iter().collect();
    output::print_bands(&bands, args.json)?;
    Ok(0)
}
