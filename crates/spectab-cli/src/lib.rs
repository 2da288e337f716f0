//! # spectab-cli: CLI Tool for spectab
//!
//! Provides the `spectab` command-line interface over the allocation
//! database.
//!
//! ## Subcommands
//!
//! - `spectab build`: Run the pipeline and summarise every view.
//! - `spectab query`: Bands at a frequency or in a range, optionally
//!   widened to contiguous matches.
//! - `spectab nearest`: Closest matching band above or below a frequency.
//! - `spectab stitch`: Contiguous runs of matching bands, combined.
//!
//! Exit codes: 0 on success, 1 when a query matched nothing, 2 on error.
//!
//! ```bash
//! spectab build --config spectab.yaml
//! spectab query --view ITU --from 4800MHz --to 5GHz --allocation 'radio astronomy*'
//! spectab nearest --view USA --frequency 1.4GHz --direction down --allocation 'fixed*'
//! spectab stitch --view R1 --allocation 'radio astronomy*' --json
//! ```

pub mod build;
pub mod config;
pub mod nearest;
pub mod output;
pub mod query;
pub mod stitch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use spectab_band::{AllocationFilter, Band};
use spectab_collection::{AllocationDatabase, BandCollection};

use crate::config::PipelineConfig;

/// Resolve a path that may be relative to a base directory.
///
/// Absolute paths are returned as-is; relative ones are joined to `base`.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load the configuration at `config` and build its database.
pub fn open_database(config: &Path) -> Result<AllocationDatabase> {
    PipelineConfig::load(config)?.build_database()
}

/// Look up `name` in `db`, failing with the list of known views.
pub fn select_view<'a>(db: &'a AllocationDatabase, name: &str) -> Result<&'a BandCollection> {
    db.view(name).with_context(|| {
        let known: Vec<&str> = db.views().map(|(n, _)| n).collect();
        format!("unknown view {name:?} (known views: {})", known.join(", "))
    })
}

/// Band selection flags shared by the query subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Glob the band must have an allocation matching (e.g. 'radio astronomy*').
    #[arg(long)]
    pub allocation: Option<String>,

    /// Only count primary allocations towards --allocation.
    #[arg(long, requires = "allocation")]
    pub primary: bool,

    /// Glob the band must have a footnote matching (e.g. '5.149').
    #[arg(long)]
    pub footnote: Option<String>,

    /// Match --footnote against band-level footnotes only.
    #[arg(long, requires = "footnote")]
    pub band_level_only: bool,
}

impl SelectionArgs {
    /// The allocation filter these flags describe, if any.
    pub fn allocation_filter(&self) -> Option<AllocationFilter> {
        self.allocation.as_ref().map(|pattern| {
            let filter = AllocationFilter::new(pattern.clone());
            if self.primary {
                filter.primary(true)
            } else {
                filter
            }
        })
    }

    /// Predicate over bands combining every given flag.
    pub fn condition(&self) -> impl Fn(&Band) -> bool + '_ {
        let filter = self.allocation_filter();
        move |band: &Band| {
            filter.as_ref().map_or(true, |f| band.has_allocation(f))
                && self
                    .footnote
                    .as_deref()
                    .map_or(true, |p| band.has_footnote(p, self.band_level_only))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectab_band::{Allocation, Bounds};

    fn band() -> Band {
        Band::builder(Bounds::parse("1400-1427 MHz", None).unwrap())
            .primary(Allocation::parse("RADIO ASTRONOMY 5.341").unwrap())
            .secondary(Allocation::parse("Fixed").unwrap())
            .footnotes(["5.340"])
            .build()
            .unwrap()
    }

    #[test]
    fn resolve_path_joins_relative() {
        let base = Path::new("/data/spectab");
        assert_eq!(
            resolve_path(Path::new("tables/r1.json"), base),
            PathBuf::from("/data/spectab/tables/r1.json")
        );
        assert_eq!(
            resolve_path(Path::new("/abs/t.json"), base),
            PathBuf::from("/abs/t.json")
        );
    }

    #[test]
    fn empty_selection_accepts_everything() {
        let args = SelectionArgs::default();
        assert!(args.allocation_filter().is_none());
        assert!((args.condition())(&band()));
    }

    #[test]
    fn selection_combines_flags() {
        let b = band();
        let args = SelectionArgs {
            allocation: Some("fixed".into()),
            ..SelectionArgs::default()
        };
        assert!((args.condition())(&b));

        let args = SelectionArgs {
            allocation: Some("fixed".into()),
            primary: true,
            ..SelectionArgs::default()
        };
        assert!(!(args.condition())(&b));

        let args = SelectionArgs {
            allocation: Some("radio astronomy".into()),
            footnote: Some("5.341".into()),
            band_level_only: true,
            ..SelectionArgs::default()
        };
        assert!(!(args.condition())(&b));

        let args = SelectionArgs {
            footnote: Some("5.341".into()),
            ..SelectionArgs::default()
        };
        assert!((args.condition())(&b));
    }
}
