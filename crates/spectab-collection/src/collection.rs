//! # Band Collections
//!
//! A [`BandCollection`] owns a set of [`Band`]s indexed by `[start, stop)`.
//!
//! ## Operators
//!
//! | Operator | Result |
//! |----------|--------|
//! | [`BandCollection::union`] | bag union, no interpretation |
//! | [`BandCollection::merge`] | bands identical apart from jurisdiction fold into one entry |
//! | [`BandCollection::flatten`] | exact partition: no overlaps, no duplicate spans |
//! | [`BandCollection::stitch`] | maximal contiguous runs of matching bands, combined |
//! | [`BandCollection::restrict_to`] | the bands of one jurisdiction, relabelled |
//!
//! Every operator returns a new collection. Inputs are never modified, so a
//! per-jurisdiction collection can feed several composite views.
//!
//! ## Ordering
//!
//! Query results are sorted by start frequency, then jurisdiction set, then
//! stop, then insertion order. Every algorithm here relies on that order
//! being stable.
//!
//! ## Panels
//!
//! The sorted, tolerance-deduplicated list of all band edges cuts the axis
//! into panels. Flatten, stitch and the nearest-match search all walk
//! panels and look at the bands covering each panel's midpoint.

use std::collections::{BTreeMap, HashSet};

use spectab_band::{Band, BandComparison, Bounds, CombineOptions, Metadata};
use spectab_core::{
    CollectionError, Frequency, Jurisdiction, Tolerance, ADJACENCY_EPSILON, MIN_BAND_WIDTH,
};

use crate::index::{Entry, IntervalIndex};

/// How far [`BandCollection::get_bands`] widens its result to take in
/// touching neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Adjacency {
    /// Only bands in the queried point or range.
    #[default]
    None,
    /// One widening pass.
    Once,
    /// Widen until the result stops growing.
    Recursive,
}

/// Search direction along the frequency axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher frequencies.
    Up,
    /// Towards lower frequencies.
    Down,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = CollectionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(CollectionError::InvalidDirection(other)),
        }
    }
}

/// An interval-indexed set of bands.
#[derive(Debug, Clone, Default)]
pub struct BandCollection {
    index: IntervalIndex<Band>,
    tolerance: Tolerance,
    metadata: Metadata,
}

impl BandCollection {
    /// Empty collection using the default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collection using `tolerance` for all edge comparisons.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Tolerance in force.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Collection-level metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable collection-level metadata.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Number of stored bands.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if no bands are stored.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Store a band.
    pub fn append(&mut self, band: Band) {
        self.index.insert(band.start(), band.stop(), band);
    }

    /// Remove one stored band equal to `band`, returning it.
    pub fn remove(&mut self, band: &Band) -> Option<Band> {
        self.index.remove_first(|e| e.value() == band)
    }

    /// All bands in query order.
    pub fn iter(&self) -> std::vec::IntoIter<&Band> {
        sorted(self.index.entries()).into_iter()
    }

    /// Lowest band edge.
    pub fn begin(&self) -> Option<Frequency> {
        self.index.begin()
    }

    /// Highest band edge.
    pub fn end(&self) -> Option<Frequency> {
        self.index.end()
    }

    // ─── Queries ─────────────────────────────────────────────────────

    /// Bands covering `frequency`.
    pub fn at(&self, frequency: Frequency) -> Vec<&Band> {
        sorted(self.index.containing(frequency))
    }

    /// Bands overlapping `[lo, hi)`.
    pub fn in_range(&self, lo: Frequency, hi: Frequency) -> Vec<&Band> {
        sorted(self.index.overlapping(lo, hi))
    }

    /// Bands at `f0` (or overlapping `[f0, f1)`) accepted by `condition`,
    /// optionally widened to take in touching neighbours.
    ///
    /// Widening re-derives the query range from the current result's extreme
    /// edges, stretches it by [`ADJACENCY_EPSILON`] either way, re-queries,
    /// and filters again.
    pub fn get_bands<F>(
        &self,
        f0: Frequency,
        f1: Option<Frequency>,
        condition: F,
        adjacency: Adjacency,
    ) -> Vec<&Band>
    where
        F: Fn(&Band) -> bool,
    {
        let initial = match f1 {
            Some(f1) => self.index.overlapping(f0, f1).collect::<Vec<_>>(),
            None => self.index.containing(f0).collect(),
        };
        let mut result: Vec<&Entry<Band>> =
            initial.into_iter().filter(|e| condition(e.value())).collect();
        if adjacency == Adjacency::None {
            return sorted(result);
        }
        let f1 = f1.unwrap_or(f0);
        loop {
            let previous = result.len();
            let (lo, hi) = match extent(&result) {
                Some(edges) => edges,
                None => (f0, f1),
            };
            result = self
                .index
                .overlapping(lo * (1.0 - ADJACENCY_EPSILON), hi * (1.0 + ADJACENCY_EPSILON))
                .filter(|e| condition(e.value()))
                .collect();
            if adjacency == Adjacency::Once || result.len() == previous {
                break;
            }
        }
        sorted(result)
    }

    /// All distinct band edges in ascending order.
    ///
    /// Edges within tolerance of the previous kept edge are dropped, so
    /// unit-conversion noise never produces sliver panels.
    pub fn boundaries(&self) -> Vec<Frequency> {
        let mut edges: Vec<Frequency> = self
            .index
            .entries()
            .flat_map(|e| [e.start(), e.stop()])
            .collect();
        edges.sort();
        let mut kept: Vec<Frequency> = Vec::with_capacity(edges.len());
        for edge in edges {
            match kept.last() {
                Some(last) if *last == edge => {}
                Some(last) if self.tolerance.is_close(edge, *last) => {
                    tracing::warn!(
                        kept = %last,
                        dropped = %edge,
                        "snapping band edge within tolerance"
                    );
                }
                _ => kept.push(edge),
            }
        }
        kept
    }

    // ─── Combinators ─────────────────────────────────────────────────

    /// Bag union of both collections.
    ///
    /// Nothing is deduplicated or interpreted. Collection metadata is
    /// dropped; the receiver's tolerance is kept.
    pub fn union(&self, other: &BandCollection) -> BandCollection {
        let mut result = BandCollection::with_tolerance(self.tolerance);
        for entry in self.index.entries().chain(other.index.entries()) {
            result.append(entry.value().clone());
        }
        result
    }

    /// Union, then fold bands that are identical apart from jurisdiction into
    /// a single multi-jurisdiction entry.
    ///
    /// Bands that differ in content stay distinct even at identical spans.
    /// Spans are compared under the receiver's tolerance.
    pub fn merge(&self, other: &BandCollection) -> BandCollection {
        let interim = self.union(other);
        let mut result = BandCollection::with_tolerance(self.tolerance);
        let comparison = BandComparison::ignoring_jurisdictions().within(self.tolerance);
        let mut folded = 0usize;
        for band in interim.iter() {
            let recorded = result
                .index
                .overlapping(band.start(), band.stop())
                .find(|e| e.value().equal(band, comparison))
                .map(Entry::seq);
            match recorded.and_then(|seq| result.index.value_mut(seq)) {
                Some(existing) => {
                    existing.add_jurisdictions(band.jurisdictions().iter().copied());
                    folded += 1;
                }
                None => result.append(band.clone()),
            }
        }
        tracing::debug!(
            inputs = interim.len(),
            folded,
            distinct = result.len(),
            "merged band collections"
        );
        result
    }

    /// Partition overlapping bands into an exact, non-overlapping set.
    ///
    /// Each pair of consecutive edges is a panel. Every band covering a
    /// panel's midpoint is clipped to the panel; clipped copies sharing a
    /// panel are then combined into one band.
    ///
    /// A band narrower than the tolerance at its frequency loses an edge to
    /// snapping and covers no panel; that is reported as
    /// [`CollectionError::DegenerateInterval`] rather than dropped.
    pub fn flatten(&self) -> Result<BandCollection, CollectionError> {
        let edges = self.boundaries();
        let mut interim = BandCollection::with_tolerance(self.tolerance);
        let mut placed: HashSet<u64> = HashSet::new();
        for pair in edges.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let width = hi - lo;
            if width < MIN_BAND_WIDTH {
                return Err(CollectionError::DegenerateInterval {
                    lo: lo.to_string(),
                    hi: hi.to_string(),
                    width: width.to_string(),
                });
            }
            let panel = Bounds::new(lo, hi)?;
            for entry in sorted_entries(self.index.containing(lo.midpoint(hi))) {
                placed.insert(entry.seq());
                interim.append(entry.value().clipped_to(panel));
            }
        }
        if let Some(lost) = self.index.entries().find(|e| !placed.contains(&e.seq())) {
            return Err(CollectionError::DegenerateInterval {
                lo: lost.start().to_string(),
                hi: lost.stop().to_string(),
                width: (lost.stop() - lost.start()).to_string(),
            });
        }

        let mut result = BandCollection::with_tolerance(self.tolerance);
        let mut claimed: HashSet<u64> = HashSet::new();
        for entry in interim.index.entries() {
            if !claimed.insert(entry.seq()) {
                continue;
            }
            let band = entry.value();
            let mut merged = band.clone();
            for other in sorted_entries(interim.index.containing(band.center())) {
                if other.seq() == entry.seq() {
                    continue;
                }
                if !other.value().has_same_bounds_within(&merged, &self.tolerance) {
                    return Err(CollectionError::InconsistentOverlap {
                        left: merged.compact_str(),
                        right: other.value().compact_str(),
                    });
                }
                claimed.insert(other.seq());
                merged = merged.combine_with(other.value(), CombineOptions::content_only())?;
            }
            result.append(merged);
        }
        tracing::debug!(
            inputs = self.len(),
            panels = edges.len().saturating_sub(1),
            outputs = result.len(),
            "flattened band collection"
        );
        Ok(result)
    }

    /// Coalesce maximal runs of touching or overlapping bands accepted by
    /// `condition` into single combined bands.
    ///
    /// Panels are scanned upwards. A matching band not yet claimed either
    /// starts an accumulator or is combined into the open one. The
    /// accumulator is closed once a panel neither grows it nor lies inside it.
    pub fn stitch<F>(&self, condition: F) -> Result<BandCollection, CollectionError>
    where
        F: Fn(&Band) -> bool,
    {
        let edges = self.boundaries();
        let mut result = BandCollection::with_tolerance(self.tolerance);
        let mut claimed: HashSet<u64> = HashSet::new();
        let mut accumulator: Option<Band> = None;
        for pair in edges.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let mut grew = false;
            for entry in sorted_entries(self.index.containing(lo.midpoint(hi))) {
                if claimed.contains(&entry.seq()) || !condition(entry.value()) {
                    continue;
                }
                claimed.insert(entry.seq());
                let band = entry.value();
                accumulator = Some(match accumulator.take() {
                    Some(acc) => {
                        if !acc.overlaps(band) && !acc.is_adjacent_within(band, &self.tolerance) {
                            return Err(CollectionError::StitchDiscontinuity {
                                accumulator: acc.compact_str(),
                                band: band.compact_str(),
                            });
                        }
                        acc.combine_with(band, CombineOptions::forced())?
                    }
                    None => band.clone(),
                });
                grew = true;
            }
            if grew {
                continue;
            }
            let spans_panel = accumulator.as_ref().map(|acc| {
                acc.stop() >= hi || self.tolerance.is_close(acc.stop(), hi)
            });
            if spans_panel == Some(false) {
                if let Some(acc) = accumulator.take() {
                    result.append(acc);
                }
            }
        }
        if let Some(acc) = accumulator {
            result.append(acc);
        }
        tracing::debug!(inputs = self.len(), groups = result.len(), "stitched band collection");
        Ok(result)
    }

    /// Nearest band beyond `frequency` in `direction` accepted by `condition`.
    ///
    /// The panel containing `frequency` is skipped unless `include_current`.
    /// Returns `None` when the walk runs off the end of the axis.
    pub fn find_closest_matching_band<F>(
        &self,
        frequency: Frequency,
        direction: Direction,
        condition: F,
        include_current: bool,
    ) -> Option<&Band>
    where
        F: Fn(&Band) -> bool,
    {
        let edges = self.boundaries();
        let panels = edges.len().saturating_sub(1) as isize;
        // Panel i spans edges[i]..edges[i + 1]; -1 is below the first edge.
        let starting = edges.partition_point(|e| *e <= frequency) as isize - 1;
        let step = direction.step();
        let mut i = starting;
        loop {
            if (0..panels).contains(&i) && (i != starting || include_current) {
                let (lo, hi) = (edges[i as usize], edges[i as usize + 1]);
                if let Some(band) = self
                    .at(lo.midpoint(hi))
                    .into_iter()
                    .find(|band| condition(*band))
                {
                    return Some(band);
                }
            }
            i += step;
            if i < -1 || i > panels {
                return None;
            }
        }
    }

    /// [`BandCollection::find_closest_matching_band`] with a numeric
    /// direction, `+1` or `-1`.
    pub fn find_closest_matching_band_signed<F>(
        &self,
        frequency: Frequency,
        direction: i32,
        condition: F,
        include_current: bool,
    ) -> Result<Option<&Band>, CollectionError>
    where
        F: Fn(&Band) -> bool,
    {
        let direction = Direction::try_from(direction)?;
        Ok(self.find_closest_matching_band(frequency, direction, condition, include_current))
    }

    /// Bands applying in `jurisdiction`, each relabelled to it alone.
    pub fn restrict_to(&self, jurisdiction: Jurisdiction) -> BandCollection {
        let mut result = BandCollection::with_tolerance(self.tolerance);
        for entry in self.index.entries() {
            if entry.value().applies_in(jurisdiction) {
                result.append(entry.value().with_jurisdictions([jurisdiction]));
            }
        }
        result
    }

    /// Copy of the collection with `definitions` attached to every band.
    pub fn decorate_footnote_definitions(
        &self,
        definitions: &BTreeMap<String, String>,
    ) -> BandCollection {
        let mut result = BandCollection::with_tolerance(self.tolerance);
        result.metadata = self.metadata.clone();
        for entry in self.index.entries() {
            let mut band = entry.value().clone();
            band.set_footnote_definitions(definitions.clone());
            result.append(band);
        }
        result
    }
}

impl FromIterator<Band> for BandCollection {
    fn from_iter<I: IntoIterator<Item = Band>>(iter: I) -> Self {
        let mut collection = BandCollection::new();
        collection.extend(iter);
        collection
    }
}

impl Extend<Band> for BandCollection {
    fn extend<I: IntoIterator<Item = Band>>(&mut self, iter: I) {
        for band in iter {
            self.append(band);
        }
    }
}

impl<'a> IntoIterator for &'a BandCollection {
    type Item = &'a Band;
    type IntoIter = std::vec::IntoIter<&'a Band>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn sorted_entries<'a, I>(entries: I) -> Vec<&'a Entry<Band>>
where
    I: IntoIterator<Item = &'a Entry<Band>>,
{
    let mut entries: Vec<&Entry<Band>> = entries.into_iter().collect();
    entries.sort_by(|a, b| {
        a.value()
            .position_cmp(b.value())
            .then_with(|| a.seq().cmp(&b.seq()))
    });
    entries
}

fn sorted<'a, I>(entries: I) -> Vec<&'a Band>
where
    I: IntoIterator<Item = &'a Entry<Band>>,
{
    sorted_entries(entries).into_iter().map(Entry::value).collect()
}

fn extent(entries: &[&Entry<Band>]) -> Option<(Frequency, Frequency)> {
    let lo = entries.iter().map(|e| e.start()).min()?;
    let hi = entries.iter().map(|e| e.stop()).max()?;
    Some((lo, hi))
}
