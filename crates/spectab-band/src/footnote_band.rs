//! # Footnote-Derived Bands
//!
//! Some footnotes add allocation-like facts the table itself never shows.
//! Footnote 5.149, for example, asks administrations to protect radio
//! astronomy in a long list of ranges, some only in certain regions:
//!
//! ```text
//! 13 360-13 410 kHz
//! 73-74.6 MHz in Regions 1 and 3
//! 150.05-153 MHz in Region 1
//! ```
//!
//! Each entry becomes a band whose allocations are all footnote mentions.
//! By convention the allocation cites the footnote with a trailing `#`
//! (`radio astronomy 5.149#`) so renderers can tell injected bands apart
//! from table bands.

use serde::{Deserialize, Serialize};

use spectab_core::{BandError, Jurisdiction};

use crate::allocation::Allocation;
use crate::band::Band;
use crate::bounds::{parse_bounds_prefix, Bounds};

/// Build a band from a footnote rule.
///
/// `allocations` are parsed as footnote mentions. Without explicit
/// `jurisdictions` the band applies in all three ITU regions.
pub fn create_band_from_footnote<A, N>(
    bounds: Bounds,
    allocations: A,
    jurisdictions: Option<&[Jurisdiction]>,
    annotations: N,
) -> Result<Band, BandError>
where
    A: IntoIterator,
    A::Item: AsRef<str>,
    N: IntoIterator,
    N::Item: Into<String>,
{
    let jurisdictions = jurisdictions.unwrap_or(Jurisdiction::itu_regions());
    let mut builder = Band::builder(bounds)
        .jurisdictions(jurisdictions.iter().copied())
        .annotations(annotations);
    for line in allocations {
        builder = builder.footnote_mention(Allocation::parse_footnote_mention(line.as_ref())?);
    }
    builder.build()
}

/// Parse one footnote rule entry such as `"73-74.6 MHz in Regions 1 and 3"`.
///
/// Returns the bounds and, when the entry names regions, the ITU regions it
/// is limited to.
pub fn parse_footnote_rule_entry(
    entry: &str,
) -> Result<(Bounds, Option<Vec<Jurisdiction>>), BandError> {
    let (start, stop, rest) = parse_bounds_prefix(entry, None)?;
    let bounds = Bounds::new(start, stop)?;
    let words: Vec<&str> = rest.split_whitespace().collect();
    let malformed = || BandError::MalformedFootnoteRule(entry.to_string());
    match words.as_slice() {
        [] => Ok((bounds, None)),
        ["in", kind, regions @ ..] if matches!(*kind, "Region" | "Regions") => {
            let mut jurisdictions = Vec::new();
            for word in regions {
                let word = word.trim_end_matches(',');
                if word == "and" {
                    continue;
                }
                let region: Jurisdiction = format!("ITU-R{word}")
                    .parse()
                    .map_err(|_| BandError::UnknownJurisdiction(word.to_string()))?;
                jurisdictions.push(region);
            }
            if jurisdictions.is_empty() {
                return Err(malformed());
            }
            Ok((bounds, Some(jurisdictions)))
        }
        _ => Err(malformed()),
    }
}

/// A footnote rule as stored in a footnote-band file.
///
/// ```json
/// {
///   "footnote": "5.149",
///   "allocations": ["radio astronomy 5.149#"],
///   "entries": ["4825-4835 MHz", "73-74.6 MHz in Regions 1 and 3"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootnoteBandRecord {
    /// Footnote the rule comes from, e.g. `5.149`.
    pub footnote: String,
    /// Allocation lines, parsed as footnote mentions.
    #[serde(default)]
    pub allocations: Vec<String>,
    /// Range entries, each optionally limited to named regions.
    pub entries: Vec<String>,
    /// Default jurisdictions for entries that name none.
    #[serde(default)]
    pub jurisdictions: Option<Vec<Jurisdiction>>,
    /// Annotations for every generated band.
    #[serde(default)]
    pub annotations: Vec<String>,
}

impl FootnoteBandRecord {
    /// One band per entry.
    pub fn bands(&self) -> Result<Vec<Band>, BandError> {
        self.entries
            .iter()
            .map(|entry| {
                let (bounds, limited) = parse_footnote_rule_entry(entry)?;
                let jurisdictions = limited.or_else(|| self.jurisdictions.clone());
                create_band_from_footnote(
                    bounds,
                    &self.allocations,
                    jurisdictions.as_deref(),
                    self.annotations.iter().cloned(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectab_core::Frequency;

    #[test]
    fn default_jurisdictions_are_itu_regions() {
        let bounds = Bounds::parse("4825-4835 MHz", None).unwrap();
        let band =
            create_band_from_footnote(bounds, ["radio astronomy 5.149#"], None, Vec::<String>::new())
                .unwrap();
        assert_eq!(band.jurisdictions().len(), 3);
        assert!(!band.applies_in(Jurisdiction::UsFederal));
        assert_eq!(band.footnote_mentions().len(), 1);
        assert!(band.allocations().all(Allocation::is_footnote_mention));
        assert!(band.has_footnote("5.149#", false));
    }

    #[test]
    fn explicit_jurisdictions_and_annotations() {
        let bounds = Bounds::parse("150.05-153 MHz", None).unwrap();
        let band = create_band_from_footnote(
            bounds,
            ["RADIO ASTRONOMY 5.225# (Australia and India only)"],
            Some(&[Jurisdiction::ItuRegion3][..]),
            ["national"],
        )
        .unwrap();
        assert_eq!(
            band.jurisdictions().iter().copied().collect::<Vec<_>>(),
            [Jurisdiction::ItuRegion3]
        );
        assert!(band.footnote_mentions()[0].is_primary());
        assert!(band.annotations().contains("national"));
    }

    #[test]
    fn rule_entry_without_regions() {
        let (bounds, regions) = parse_footnote_rule_entry("13 360-13 410 kHz").unwrap();
        assert_eq!(bounds.start(), Frequency::khz(13360.0));
        assert!(regions.is_none());
    }

    #[test]
    fn rule_entry_with_regions() {
        let (_, regions) = parse_footnote_rule_entry("73-74.6 MHz in Regions 1 and 3").unwrap();
        assert_eq!(
            regions.unwrap(),
            [Jurisdiction::ItuRegion1, Jurisdiction::ItuRegion3]
        );
        let (_, regions) = parse_footnote_rule_entry("150.05-153 MHz in Region 1").unwrap();
        assert_eq!(regions.unwrap(), [Jurisdiction::ItuRegion1]);
    }

    #[test]
    fn malformed_rule_entries() {
        assert!(matches!(
            parse_footnote_rule_entry("73-74.6 MHz near Region 1"),
            Err(BandError::MalformedFootnoteRule(_))
        ));
        assert!(matches!(
            parse_footnote_rule_entry("73-74.6 MHz in Region 7"),
            Err(BandError::UnknownJurisdiction(_))
        ));
        assert!(parse_footnote_rule_entry("around 73 MHz").is_err());
    }

    #[test]
    fn record_expands_entries() {
        let record: FootnoteBandRecord = serde_json::from_str(
            r#"{
                "footnote": "5.149",
                "allocations": ["radio astronomy 5.149#"],
                "entries": ["4825-4835 MHz", "73-74.6 MHz in Regions 1 and 3"]
            }"#,
        )
        .unwrap();
        let bands = record.bands().unwrap();
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].jurisdictions().len(), 3);
        assert_eq!(bands[1].jurisdictions().len(), 2);
    }

    #[test]
    fn record_default_jurisdictions() {
        let record = FootnoteBandRecord {
            footnote: "5.250".into(),
            allocations: vec!["Radio astronomy 5.250# (China only)".into()],
            entries: vec!["225-235 MHz".into()],
            jurisdictions: Some(vec![Jurisdiction::ItuRegion3]),
            annotations: vec![],
        };
        let bands = record.bands().unwrap();
        assert!(bands[0].applies_in(Jurisdiction::ItuRegion3));
        assert!(bands[0].footnote_mentions()[0].is_secondary());
    }
}
