//! # Table Cell Parsing
//!
//! Scrapers hand over the text of one allocation-table cell as a
//! [`CellRecord`]. [`Band::parse`] turns it into a validated [`Band`] or
//! rejects it with [`BandError::NotBand`], which the scraper reads as "this
//! is not a complete cell yet, keep accumulating text".
//!
//! ## Cell Layout
//!
//! ```text
//! 4800-4990 MHz               bounds (required, first line)
//! FIXED                       allocation lines
//! MOBILE 5.442
//! Radio astronomy
//!                             blank lines are skipped
//! 5.149 5.339 5.443           footnote tokens (no allocations after these)
//! ```

use serde::{Deserialize, Serialize};

use spectab_core::{AllocationError, BandError, BoundsError, FrequencyUnit, Jurisdiction};

use crate::allocation::Allocation;
use crate::band::{Band, Metadata};
use crate::bounds::{parse_bounds, Bounds};

const NOT_ALLOCATED: &str = "(Not allocated)";

/// Raw text of one table cell plus its page context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Cell text, one entry per line.
    pub lines: Vec<String>,
    /// Units in force on the table page, if the bounds line omits them.
    #[serde(default)]
    pub units: Option<FrequencyUnit>,
    /// Jurisdictions the table column covers.
    #[serde(default)]
    pub jurisdictions: Vec<Jurisdiction>,
    /// FCC rule-part lines from the neighbouring column.
    #[serde(default)]
    pub fcc_rules: Vec<String>,
    /// Table annotations.
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Provenance (page, row, column).
    #[serde(default)]
    pub metadata: Metadata,
}

impl Band {
    /// Parse a table cell into a band.
    pub fn parse(cell: &CellRecord) -> Result<Band, BandError> {
        let first = cell
            .lines
            .first()
            .ok_or_else(|| BandError::NotBand("cell has no text".to_string()))?;
        let (start, stop) = match parse_bounds(first.trim(), cell.units) {
            Ok(pair) => pair,
            Err(BoundsError::NotBounds(_)) => {
                return Err(BandError::NotBand(format!(
                    "text doesn't start with bounds: {first:?}"
                )))
            }
            Err(e) => return Err(e.into()),
        };
        let mut builder = Band::builder(Bounds::new(start, stop)?);

        let mut footnotes: Vec<String> = Vec::new();
        for line in cell.lines[1..].iter().map(|l| l.trim()) {
            if line.is_empty() || line.eq_ignore_ascii_case(NOT_ALLOCATED) {
                continue;
            }
            match Allocation::parse(line) {
                Ok(allocation) => {
                    if !footnotes.is_empty() {
                        return Err(BandError::NotBand(format!(
                            "allocation {line:?} after footnotes"
                        )));
                    }
                    builder = builder.allocation(allocation);
                }
                Err(AllocationError::NotAllocation(_)) => {
                    footnotes.extend(line.split_whitespace().map(str::to_string));
                }
                Err(e) => return Err(e.into()),
            }
        }

        builder
            .footnotes(footnotes)
            .fcc_rules(cell.fcc_rules.iter().cloned())
            .jurisdictions(cell.jurisdictions.iter().copied())
            .annotations(cell.annotations.iter().cloned())
            .metadata(cell.metadata.clone())
            .build()
    }
}
