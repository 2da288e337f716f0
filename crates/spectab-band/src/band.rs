//! # Bands
//!
//! A [`Band`] is a frequency span plus everything a table cell says about
//! it: allocations in three lists (primary, secondary, footnote mentions),
//! band-level footnotes, FCC rule parts, annotations, and the set of
//! jurisdictions it applies in.
//!
//! ## Lifecycle
//!
//! Bands are built through [`BandBuilder`] (or [`Band::parse`] for table
//! cells), combined with [`Band::combine_with`], and otherwise treated as
//! values. Every path that changes an allocation list ends in
//! [`Band::finalize`], so the derived per-allocation flags never go stale.
//!
//! ## Equality
//!
//! [`Band::equal`] compares with selectively ignorable fields
//! ([`BandComparison`]). This is what lets collection merges tell "same band,
//! different jurisdiction" apart from "different content". `PartialEq` is
//! `equal` with default options.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use spectab_core::{
    glob_match, is_national_footnote, sanitize_footnote_name, BandError, Frequency, Jurisdiction,
    Tolerance, DEFAULT_TOLERANCE,
};

use crate::allocation::{Allocation, Priority};
use crate::bounds::Bounds;
use crate::filter::AllocationFilter;

/// Opaque key/value data carried alongside bands and allocations.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A frequency span and the allocations that apply to it.
#[derive(Debug, Clone, Serialize)]
pub struct Band {
    bounds: Bounds,
    jurisdictions: BTreeSet<Jurisdiction>,
    primary_allocations: Vec<Allocation>,
    secondary_allocations: Vec<Allocation>,
    footnote_mentions: Vec<Allocation>,
    footnotes: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fcc_rules: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    annotations: BTreeSet<String>,
    #[serde(skip)]
    footnote_definitions: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    user_annotations: Metadata,
}

/// Which fields [`Band::equal`] ignores, and how close bounds must be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandComparison {
    /// Ignore the jurisdiction sets.
    pub ignore_jurisdictions: bool,
    /// Ignore annotations.
    pub ignore_annotations: bool,
    /// Ignore FCC rule parts.
    pub ignore_fcc_rules: bool,
    /// Ignore user annotations. Ignored unless explicitly requested.
    pub ignore_user_annotations: bool,
    /// Tolerance for comparing bounds.
    pub tolerance: Tolerance,
}

impl BandComparison {
    /// Default comparison but blind to jurisdictions.
    pub fn ignoring_jurisdictions() -> Self {
        Self {
            ignore_jurisdictions: true,
            ..Self::default()
        }
    }

    /// Same comparison with bounds compared under `tolerance`.
    pub fn within(self, tolerance: Tolerance) -> Self {
        Self { tolerance, ..self }
    }
}

impl Default for BandComparison {
    fn default() -> Self {
        Self {
            ignore_jurisdictions: false,
            ignore_annotations: false,
            ignore_fcc_rules: false,
            ignore_user_annotations: true,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Options for [`Band::combine_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombineOptions {
    /// Combine even if the bands neither overlap nor touch.
    pub force: bool,
    /// Keep the receiver's bounds instead of the enclosing span.
    pub skip_bounds: bool,
    /// Tolerance for deciding that the bands touch.
    pub tolerance: Tolerance,
}

impl CombineOptions {
    /// Content-only merge of bands already known to share bounds.
    pub fn content_only() -> Self {
        Self {
            force: true,
            skip_bounds: true,
            ..Self::default()
        }
    }

    /// Combine even disjoint bands, spanning both.
    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    /// Same options with adjacency judged under `tolerance`.
    pub fn within(self, tolerance: Tolerance) -> Self {
        Self { tolerance, ..self }
    }
}

impl Band {
    /// Start building a band over `bounds`.
    pub fn builder(bounds: Bounds) -> BandBuilder {
        BandBuilder::new(bounds)
    }

    /// Recompute the derived `co_primary` and `exclusive` flags.
    ///
    /// `exclusive` holds iff the band has exactly one ranked allocation;
    /// footnote mentions never count and are never exclusive.
    pub fn finalize(&mut self) {
        let single = self.primary_allocations.len() + self.secondary_allocations.len() == 1;
        let co_primary = self.primary_allocations.len() > 1;
        for a in &mut self.primary_allocations {
            a.set_derived(co_primary, single);
        }
        for a in &mut self.secondary_allocations {
            a.set_derived(false, single);
        }
        for a in &mut self.footnote_mentions {
            a.set_derived(false, false);
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────

    /// Span of the band.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Lower edge.
    pub fn start(&self) -> Frequency {
        self.bounds.start()
    }

    /// Upper edge.
    pub fn stop(&self) -> Frequency {
        self.bounds.stop()
    }

    /// Width of the band.
    pub fn bandwidth(&self) -> Frequency {
        self.bounds.bandwidth()
    }

    /// Center frequency.
    pub fn center(&self) -> Frequency {
        self.bounds.center()
    }

    /// Jurisdictions the band applies in.
    pub fn jurisdictions(&self) -> &BTreeSet<Jurisdiction> {
        &self.jurisdictions
    }

    /// Primary allocations.
    pub fn primary_allocations(&self) -> &[Allocation] {
        &self.primary_allocations
    }

    /// Secondary allocations.
    pub fn secondary_allocations(&self) -> &[Allocation] {
        &self.secondary_allocations
    }

    /// Allocations introduced by footnotes.
    pub fn footnote_mentions(&self) -> &[Allocation] {
        &self.footnote_mentions
    }

    /// All allocations: primary, then secondary, then footnote mentions.
    pub fn allocations(&self) -> impl Iterator<Item = &Allocation> + '_ {
        self.primary_allocations
            .iter()
            .chain(&self.secondary_allocations)
            .chain(&self.footnote_mentions)
    }

    /// Band-level footnotes.
    pub fn footnotes(&self) -> &BTreeSet<String> {
        &self.footnotes
    }

    /// FCC rule parts, if the table gave any.
    pub fn fcc_rules(&self) -> Option<&BTreeSet<String>> {
        self.fcc_rules.as_ref()
    }

    /// Table annotations.
    pub fn annotations(&self) -> &BTreeSet<String> {
        &self.annotations
    }

    /// Footnote texts attached for rendering.
    pub fn footnote_definitions(&self) -> &BTreeMap<String, String> {
        &self.footnote_definitions
    }

    /// Provenance data from the scraper.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// User-supplied annotations.
    pub fn user_annotations(&self) -> &Metadata {
        &self.user_annotations
    }

    // ─── Predicates ──────────────────────────────────────────────────

    /// True if `frequency` lies in `[start, stop)`.
    pub fn covers(&self, frequency: Frequency) -> bool {
        self.bounds.covers(frequency)
    }

    /// True if the two bands share a span of positive width.
    pub fn overlaps(&self, other: &Band) -> bool {
        self.bounds.overlaps(&other.bounds)
    }

    /// True if one band ends where the other starts, within the default tolerance.
    pub fn is_adjacent(&self, other: &Band) -> bool {
        self.is_adjacent_within(other, &DEFAULT_TOLERANCE)
    }

    /// [`Band::is_adjacent`] with an explicit tolerance.
    pub fn is_adjacent_within(&self, other: &Band, tolerance: &Tolerance) -> bool {
        self.bounds.is_adjacent(&other.bounds, tolerance)
    }

    /// True if both edges agree within the default tolerance.
    pub fn has_same_bounds_as(&self, other: &Band) -> bool {
        self.has_same_bounds_within(other, &DEFAULT_TOLERANCE)
    }

    /// [`Band::has_same_bounds_as`] with an explicit tolerance.
    pub fn has_same_bounds_within(&self, other: &Band, tolerance: &Tolerance) -> bool {
        self.bounds.same_as(&other.bounds, tolerance)
    }

    /// True if the band applies in `jurisdiction`.
    pub fn applies_in(&self, jurisdiction: Jurisdiction) -> bool {
        self.jurisdictions.contains(&jurisdiction)
    }

    /// Every footnote in the band, band-level and per-allocation.
    pub fn all_footnotes(&self) -> BTreeSet<&str> {
        self.footnotes
            .iter()
            .map(String::as_str)
            .chain(
                self.allocations()
                    .flat_map(|a| a.footnotes().iter().map(String::as_str)),
            )
            .collect()
    }

    /// True if any footnote glob-matches `pattern`, case-insensitively.
    pub fn has_footnote(&self, pattern: &str, band_level_only: bool) -> bool {
        let pattern = pattern.trim();
        if band_level_only {
            self.footnotes.iter().any(|f| glob_match(pattern, f, false))
        } else {
            self.all_footnotes()
                .into_iter()
                .any(|f| glob_match(pattern, f, false))
        }
    }

    /// True if the band cites a national footnote, i.e. the band can only
    /// have come from a US table.
    pub fn definitely_usa(&self) -> bool {
        self.all_footnotes().into_iter().any(is_national_footnote)
    }

    /// First allocation accepted by `filter`, in [`Band::allocations`] order.
    pub fn find_allocation(&self, filter: &AllocationFilter) -> Option<&Allocation> {
        self.allocations().find(|a| filter.accepts(a))
    }

    /// True if some allocation is accepted by `filter`.
    pub fn has_allocation(&self, filter: &AllocationFilter) -> bool {
        self.find_allocation(filter).is_some()
    }

    /// Text of a footnote, ignoring a trailing `#` marker.
    pub fn footnote_definition(&self, footnote: &str) -> Option<&str> {
        self.footnote_definitions
            .get(sanitize_footnote_name(footnote))
            .map(String::as_str)
    }

    // ─── Comparison ──────────────────────────────────────────────────

    /// Structural comparison honouring `options`.
    ///
    /// Allocations are compared in list order, so callers wanting
    /// order-insensitivity should compare combined (sorted) bands.
    pub fn equal(&self, other: &Band, options: BandComparison) -> bool {
        if !self.has_same_bounds_within(other, &options.tolerance) {
            return false;
        }
        if !self.allocations().eq(other.allocations()) {
            return false;
        }
        if !options.ignore_fcc_rules && self.fcc_rules != other.fcc_rules {
            return false;
        }
        if self.footnotes != other.footnotes {
            return false;
        }
        if !options.ignore_jurisdictions && self.jurisdictions != other.jurisdictions {
            return false;
        }
        if !options.ignore_annotations && self.annotations != other.annotations {
            return false;
        }
        if !options.ignore_user_annotations && self.user_annotations != other.user_annotations {
            return false;
        }
        true
    }

    /// Ordering used by collections: start, then jurisdictions, then stop.
    pub fn position_cmp(&self, other: &Band) -> Ordering {
        self.start()
            .cmp(&other.start())
            .then_with(|| self.jurisdictions.cmp(&other.jurisdictions))
            .then_with(|| self.stop().cmp(&other.stop()))
    }

    // ─── Combination ─────────────────────────────────────────────────

    /// Combine with `other` using default options.
    pub fn combine(&self, other: &Band) -> Result<Band, BandError> {
        self.combine_with(other, CombineOptions::default())
    }

    /// Merge two bands element-wise into a new band.
    ///
    /// Allocation lists are set-unioned and sorted; footnotes, FCC rules,
    /// annotations and jurisdictions are set-unioned; footnote definitions
    /// and user annotations are merged with `other` winning on key
    /// collisions. Metadata describes where a single band came from, so the
    /// combination carries none.
    pub fn combine_with(&self, other: &Band, options: CombineOptions) -> Result<Band, BandError> {
        if !self.overlaps(other) && !self.is_adjacent_within(other, &options.tolerance) {
            if !options.force {
                return Err(BandError::NotOverlappingOrAdjacent {
                    left: self.compact_str(),
                    right: other.compact_str(),
                });
            }
            tracing::debug!(
                left = %self.range_str(),
                right = %other.range_str(),
                "forcing combination of disjoint bands"
            );
        }
        let bounds = if options.skip_bounds {
            self.bounds
        } else {
            self.bounds.enclosing(&other.bounds)
        };
        let fcc_rules = match (&self.fcc_rules, &other.fcc_rules) {
            (None, None) => None,
            (a, b) => Some(
                a.iter()
                    .chain(b.iter())
                    .flat_map(|rules| rules.iter().cloned())
                    .collect(),
            ),
        };
        let mut footnote_definitions = self.footnote_definitions.clone();
        footnote_definitions.extend(other.footnote_definitions.clone());
        let mut user_annotations = self.user_annotations.clone();
        user_annotations.extend(other.user_annotations.clone());

        let mut band = Band {
            bounds,
            jurisdictions: union(&self.jurisdictions, &other.jurisdictions),
            primary_allocations: sorted_union(&self.primary_allocations, &other.primary_allocations),
            secondary_allocations: sorted_union(
                &self.secondary_allocations,
                &other.secondary_allocations,
            ),
            footnote_mentions: sorted_union(&self.footnote_mentions, &other.footnote_mentions),
            footnotes: union(&self.footnotes, &other.footnotes),
            fcc_rules,
            annotations: union(&self.annotations, &other.annotations),
            footnote_definitions,
            metadata: Metadata::new(),
            user_annotations,
        };
        band.finalize();
        Ok(band)
    }

    /// Copy of this band over different bounds.
    pub fn clipped_to(&self, bounds: Bounds) -> Band {
        Band {
            bounds,
            ..self.clone()
        }
    }

    /// Copy of this band applying in exactly `jurisdictions`.
    pub fn with_jurisdictions<I>(&self, jurisdictions: I) -> Band
    where
        I: IntoIterator<Item = Jurisdiction>,
    {
        Band {
            jurisdictions: jurisdictions.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Add jurisdictions in place.
    pub fn add_jurisdictions<I>(&mut self, jurisdictions: I)
    where
        I: IntoIterator<Item = Jurisdiction>,
    {
        self.jurisdictions.extend(jurisdictions);
    }

    /// Replace the footnote definitions.
    pub fn set_footnote_definitions(&mut self, definitions: BTreeMap<String, String>) {
        self.footnote_definitions = definitions;
    }

    // ─── Rendering ───────────────────────────────────────────────────

    /// Range with a shared unit, e.g. `4.825-4.835 GHz`.
    pub fn range_str(&self) -> String {
        self.bounds.to_string()
    }

    /// Jurisdictions in brackets, e.g. `[ITU Region 1, ITU Region 3]`.
    pub fn jurisdictions_str(&self) -> String {
        let names: Vec<String> = self.jurisdictions.iter().map(ToString::to_string).collect();
        format!("[{}]", names.join(", "))
    }

    /// Annotations in angle brackets, or empty.
    pub fn annotations_str(&self) -> String {
        if self.annotations.is_empty() {
            return String::new();
        }
        let items: Vec<&str> = self.annotations.iter().map(String::as_str).collect();
        format!("<{}>", items.join(","))
    }

    /// FCC rule parts in braces, or empty.
    pub fn fcc_rules_str(&self) -> String {
        match &self.fcc_rules {
            Some(rules) if !rules.is_empty() => {
                let items: Vec<&str> = rules.iter().map(String::as_str).collect();
                format!("{{{}}}", items.join("; "))
            }
            _ => String::new(),
        }
    }

    /// Full rendering with clauses joined by `separator`.
    pub fn to_text(&self, separator: &str) -> String {
        let mut result = format!("{} {}", self.range_str(), self.jurisdictions_str());
        let annotations = self.annotations_str();
        if !annotations.is_empty() {
            result.push(' ');
            result.push_str(&annotations);
        }
        for allocation in self.allocations() {
            result.push_str(separator);
            result.push_str(&allocation.to_string());
        }
        if !self.footnotes.is_empty() {
            let footnotes: Vec<&str> = self.footnotes.iter().map(String::as_str).collect();
            result.push_str(separator);
            result.push_str(separator);
            result.push_str(&footnotes.join(" "));
        }
        let rules = self.fcc_rules_str();
        if !rules.is_empty() {
            result.push_str(separator);
            result.push_str(&rules);
        }
        result
    }

    /// Single-line rendering with `/` between clauses.
    pub fn compact_str(&self) -> String {
        self.to_text("/")
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text("\n"))
    }
}

impl PartialEq for Band {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other, BandComparison::default())
    }
}

fn union<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.union(b).cloned().collect()
}

fn sorted_union(a: &[Allocation], b: &[Allocation]) -> Vec<Allocation> {
    let set: BTreeSet<&Allocation> = a.iter().chain(b).collect();
    set.into_iter().cloned().collect()
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Incremental constructor for [`Band`].
#[derive(Debug, Clone)]
pub struct BandBuilder {
    band: Band,
}

impl BandBuilder {
    fn new(bounds: Bounds) -> Self {
        Self {
            band: Band {
                bounds,
                jurisdictions: BTreeSet::new(),
                primary_allocations: Vec::new(),
                secondary_allocations: Vec::new(),
                footnote_mentions: Vec::new(),
                footnotes: BTreeSet::new(),
                fcc_rules: None,
                annotations: BTreeSet::new(),
                footnote_definitions: BTreeMap::new(),
                metadata: Metadata::new(),
                user_annotations: Metadata::new(),
            },
        }
    }

    /// Add a jurisdiction.
    pub fn jurisdiction(mut self, jurisdiction: Jurisdiction) -> Self {
        self.band.jurisdictions.insert(jurisdiction);
        self
    }

    /// Add jurisdictions.
    pub fn jurisdictions<I>(mut self, jurisdictions: I) -> Self
    where
        I: IntoIterator<Item = Jurisdiction>,
    {
        self.band.jurisdictions.extend(jurisdictions);
        self
    }

    /// Add a primary allocation.
    pub fn primary(mut self, allocation: Allocation) -> Self {
        self.band.primary_allocations.push(allocation);
        self
    }

    /// Add a secondary allocation.
    pub fn secondary(mut self, allocation: Allocation) -> Self {
        self.band.secondary_allocations.push(allocation);
        self
    }

    /// Add a footnote mention.
    pub fn footnote_mention(mut self, allocation: Allocation) -> Self {
        self.band.footnote_mentions.push(allocation);
        self
    }

    /// Add an allocation to the list its priority selects.
    pub fn allocation(self, allocation: Allocation) -> Self {
        if allocation.is_footnote_mention() {
            self.footnote_mention(allocation)
        } else if allocation.is_primary() {
            self.primary(allocation)
        } else {
            self.secondary(allocation)
        }
    }

    /// Add band-level footnotes.
    pub fn footnotes<I, S>(mut self, footnotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.band.footnotes.extend(footnotes.into_iter().map(Into::into));
        self
    }

    /// Add FCC rule parts. Blank entries are dropped.
    pub fn fcc_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(Into::into)
            .filter(|r: &String| !r.trim().is_empty());
        self.band.fcc_rules.get_or_insert_with(BTreeSet::new).extend(rules);
        self
    }

    /// Add annotations.
    pub fn annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.band.annotations.extend(annotations.into_iter().map(Into::into));
        self
    }

    /// Set footnote definitions.
    pub fn footnote_definitions(mut self, definitions: BTreeMap<String, String>) -> Self {
        self.band.footnote_definitions = definitions;
        self
    }

    /// Set provenance metadata.
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.band.metadata = metadata;
        self
    }

    /// Set user annotations.
    pub fn user_annotations(mut self, user_annotations: Metadata) -> Self {
        self.band.user_annotations = user_annotations;
        self
    }

    /// Validate list placement and finalize.
    pub fn build(self) -> Result<Band, BandError> {
        let mut band = self.band;
        check_list(&band.primary_allocations, "primary", |a| {
            a.priority() == Priority::Primary
        })?;
        check_list(&band.secondary_allocations, "secondary", |a| {
            a.priority() == Priority::Secondary
        })?;
        check_list(&band.footnote_mentions, "footnote mention", Allocation::is_footnote_mention)?;
        if band.fcc_rules.as_ref().is_some_and(BTreeSet::is_empty) {
            band.fcc_rules = None;
        }
        band.finalize();
        Ok(band)
    }
}

fn check_list(
    list: &[Allocation],
    name: &'static str,
    belongs: impl Fn(&Allocation) -> bool,
) -> Result<(), BandError> {
    match list.iter().find(|&a| !belongs(a)) {
        Some(misfiled) => Err(BandError::MisfiledAllocation {
            allocation: misfiled.to_string(),
            list: name,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(text: &str) -> Bounds {
        Bounds::parse(text, None).unwrap()
    }

    fn band(range: &str, lines: &[&str], j: Jurisdiction) -> Band {
        let mut builder = Band::builder(bounds(range)).jurisdiction(j);
        for line in lines {
            builder = builder.allocation(Allocation::parse(line).unwrap());
        }
        builder.build().unwrap()
    }

    #[test]
    fn finalize_sets_co_primary_and_exclusive() {
        let b = band("100-200 MHz", &["FIXED", "MOBILE", "Amateur"], Jurisdiction::ItuRegion1);
        assert!(b.primary_allocations().iter().all(Allocation::is_co_primary));
        assert!(b.allocations().all(|a| !a.is_exclusive()));
        assert!(!b.secondary_allocations()[0].is_co_primary());

        let b = band("100-200 MHz", &["RADIO ASTRONOMY"], Jurisdiction::ItuRegion1);
        let a = &b.primary_allocations()[0];
        assert!(a.is_exclusive());
        assert!(!a.is_co_primary());
    }

    #[test]
    fn footnote_mentions_are_never_exclusive() {
        let mention = Allocation::parse_footnote_mention("radio astronomy 5.149#").unwrap();
        let b = Band::builder(bounds("4825-4835 MHz"))
            .primary(Allocation::parse("FIXED").unwrap())
            .footnote_mention(mention)
            .build()
            .unwrap();
        assert!(b.primary_allocations()[0].is_exclusive());
        assert!(!b.footnote_mentions()[0].is_exclusive());
        assert_eq!(b.allocations().count(), 2);
    }

    #[test]
    fn builder_rejects_misfiled_allocation() {
        let err = Band::builder(bounds("1-2 MHz"))
            .primary(Allocation::parse("Fixed").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, BandError::MisfiledAllocation { list: "primary", .. }));
        let err = Band::builder(bounds("1-2 MHz"))
            .footnote_mention(Allocation::parse("Fixed").unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, BandError::MisfiledAllocation { .. }));
    }

    #[test]
    fn empty_fcc_rules_become_none() {
        let b = Band::builder(bounds("1-2 MHz"))
            .fcc_rules(["", "  "])
            .build()
            .unwrap();
        assert!(b.fcc_rules().is_none());
        let b = Band::builder(bounds("1-2 MHz"))
            .fcc_rules(["Part 97"])
            .build()
            .unwrap();
        assert_eq!(b.fcc_rules_str(), "{Part 97}");
    }

    #[test]
    fn combine_unions_content_and_bounds() {
        let a = band("100-200 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        let b = band("150-250 MHz", &["Mobile"], Jurisdiction::ItuRegion2);
        let c = a.combine(&b).unwrap();
        assert_eq!(c.start(), Frequency::mhz(100.0));
        assert_eq!(c.stop(), Frequency::mhz(250.0));
        assert_eq!(c.primary_allocations().len(), 1);
        assert_eq!(c.secondary_allocations().len(), 1);
        assert_eq!(c.jurisdictions().len(), 2);
        assert!(!c.primary_allocations()[0].is_exclusive());
    }

    #[test]
    fn combine_deduplicates_allocations() {
        let a = band("100-200 MHz", &["FIXED", "MOBILE"], Jurisdiction::ItuRegion1);
        let b = band("100-200 MHz", &["MOBILE", "FIXED"], Jurisdiction::ItuRegion1);
        let c = a.combine(&b).unwrap();
        let names: Vec<String> = c.allocations().map(ToString::to_string).collect();
        assert_eq!(names, ["FIXED", "MOBILE"]);
    }

    #[test]
    fn combine_rejects_disjoint_unless_forced() {
        let a = band("100-200 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        let b = band("300-400 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        assert!(matches!(
            a.combine(&b),
            Err(BandError::NotOverlappingOrAdjacent { .. })
        ));
        let forced = a
            .combine_with(&b, CombineOptions::forced())
            .unwrap();
        assert_eq!(forced.stop(), Frequency::mhz(400.0));
    }

    #[test]
    fn combine_adjacent_is_allowed() {
        let a = band("100-200 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        let b = band("200-300 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        assert!(a.is_adjacent(&b));
        assert_eq!(a.combine(&b).unwrap().bandwidth(), Frequency::mhz(200.0));
    }

    #[test]
    fn combine_skip_bounds_keeps_receiver_span() {
        let a = band("100-200 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        let b = band("150-250 MHz", &["Mobile"], Jurisdiction::ItuRegion1);
        let c = a.combine_with(&b, CombineOptions::content_only()).unwrap();
        assert_eq!(c.bounds(), a.bounds());
        assert_eq!(c.allocations().count(), 2);
    }

    #[test]
    fn combine_merges_maps_right_biased_and_drops_metadata() {
        let mut defs_a = BTreeMap::new();
        defs_a.insert("5.149".to_string(), "old".to_string());
        let mut defs_b = BTreeMap::new();
        defs_b.insert("5.149".to_string(), "new".to_string());
        let mut meta = Metadata::new();
        meta.insert("page".into(), serde_json::json!(3));
        let a = Band::builder(bounds("1-2 MHz"))
            .footnote_definitions(defs_a)
            .metadata(meta)
            .build()
            .unwrap();
        let b = Band::builder(bounds("1-2 MHz"))
            .footnote_definitions(defs_b)
            .build()
            .unwrap();
        let c = a.combine(&b).unwrap();
        assert_eq!(c.footnote_definition("5.149#"), Some("new"));
        assert!(c.metadata().is_empty());
    }

    #[test]
    fn equal_honours_ignore_options() {
        let a = band("100-200 MHz", &["FIXED"], Jurisdiction::UsFederal);
        let b = band("100-200 MHz", &["FIXED"], Jurisdiction::UsNonFederal);
        assert_ne!(a, b);
        assert!(a.equal(&b, BandComparison::ignoring_jurisdictions()));
        let c = band("100-200 MHz", &["Fixed"], Jurisdiction::UsFederal);
        assert!(!a.equal(&c, BandComparison::ignoring_jurisdictions()));
    }

    #[test]
    fn equal_tolerates_unit_rounding() {
        let a = band("0.1-0.2 GHz", &["FIXED"], Jurisdiction::ItuRegion1);
        let b = band("100-200 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        assert_eq!(a, b);
        assert!(a.has_same_bounds_as(&b));
    }

    #[test]
    fn equality_and_adjacency_follow_given_tolerance() {
        let hz = |lo: f64, hi: f64| {
            Band::builder(Bounds::new(Frequency::hz(lo), Frequency::hz(hi)).unwrap())
                .jurisdiction(Jurisdiction::ItuRegion1)
                .primary(Allocation::parse("FIXED").unwrap())
                .build()
                .unwrap()
        };
        let a = hz(100e6, 200e6);
        let b = hz(100e6 + 50.0, 200e6);
        // 50 Hz at 100 MHz is inside the default 110 Hz allowance.
        assert_eq!(a, b);
        assert!(a.has_same_bounds_as(&b));

        let tight = Tolerance { atol_hz: 1.0, rtol: 0.0 };
        assert!(!a.equal(&b, BandComparison::default().within(tight)));
        assert!(!a.has_same_bounds_within(&b, &tight));

        let gap = hz(200e6 + 50.0, 300e6);
        assert!(a.combine(&gap).is_ok());
        assert!(matches!(
            a.combine_with(&gap, CombineOptions::default().within(tight)),
            Err(BandError::NotOverlappingOrAdjacent { .. })
        ));
    }

    #[test]
    fn user_annotations_only_compared_on_request() {
        let mut notes = Metadata::new();
        notes.insert("flag".into(), serde_json::json!(true));
        let a = Band::builder(bounds("1-2 MHz")).build().unwrap();
        let b = Band::builder(bounds("1-2 MHz"))
            .user_annotations(notes)
            .build()
            .unwrap();
        assert_eq!(a, b);
        let strict = BandComparison {
            ignore_user_annotations: false,
            ..BandComparison::default()
        };
        assert!(!a.equal(&b, strict));
    }

    #[test]
    fn footnote_queries() {
        let b = Band::builder(bounds("4825-4835 MHz"))
            .primary(Allocation::parse("RADIO ASTRONOMY 5.149").unwrap())
            .footnotes(["US203", "5.340"])
            .build()
            .unwrap();
        assert!(b.has_footnote("5.149", false));
        assert!(!b.has_footnote("5.149", true));
        assert!(b.has_footnote("us2*", true));
        assert_eq!(b.all_footnotes().len(), 3);
        assert!(b.definitely_usa());
    }

    #[test]
    fn itu_only_footnotes_are_not_definitely_usa() {
        let b = Band::builder(bounds("4825-4835 MHz"))
            .footnotes(["5.149", "(Not allocated)"])
            .build()
            .unwrap();
        assert!(!b.definitely_usa());
    }

    #[test]
    fn allocation_lookup() {
        let b = band("100-200 MHz", &["FIXED", "Radio astronomy"], Jurisdiction::ItuRegion1);
        let found = b
            .find_allocation(&AllocationFilter::new("radio astronomy*").secondary(true))
            .unwrap();
        assert_eq!(found.to_string(), "Radio astronomy");
        assert!(!b.has_allocation(&AllocationFilter::new("radio astronomy").primary(true)));
    }

    #[test]
    fn rendering() {
        let b = Band::builder(bounds("4825-4835 MHz"))
            .jurisdictions([Jurisdiction::UsFederal])
            .primary(Allocation::parse("RADIO ASTRONOMY").unwrap())
            .footnotes(["US203"])
            .annotations(["x"])
            .build()
            .unwrap();
        assert_eq!(
            b.compact_str(),
            "4.825-4.835 GHz [USA Federal] <x>/RADIO ASTRONOMY//US203"
        );
        assert_eq!(b.to_string().lines().count(), 4);
    }

    #[test]
    fn position_orders_by_start_then_jurisdiction() {
        let a = band("100-200 MHz", &[], Jurisdiction::ItuRegion2);
        let b = band("100-150 MHz", &[], Jurisdiction::ItuRegion1);
        let c = band("50-150 MHz", &[], Jurisdiction::ItuRegion3);
        assert_eq!(a.position_cmp(&b), Ordering::Greater);
        assert_eq!(c.position_cmp(&b), Ordering::Less);
    }

    #[test]
    fn relabelling_and_clipping_copy() {
        let a = band("100-200 MHz", &["FIXED"], Jurisdiction::ItuRegion1);
        let r = a.with_jurisdictions([Jurisdiction::ItuRegion3]);
        assert!(r.applies_in(Jurisdiction::ItuRegion3));
        assert!(!r.applies_in(Jurisdiction::ItuRegion1));
        let c = a.clipped_to(bounds("120-130 MHz"));
        assert_eq!(c.bandwidth(), Frequency::mhz(10.0));
        assert_eq!(c.allocations().count(), 1);
        assert!(a.applies_in(Jurisdiction::ItuRegion1));
    }
}
