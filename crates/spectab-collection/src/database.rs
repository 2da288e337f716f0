//! # Allocation Database
//!
//! The batch pipeline that turns parsed bands into queryable collections.
//!
//! ## Phases
//!
//! 1. Bands are filed per jurisdiction as they are added, each relabelled to
//!    the single jurisdiction it was filed under.
//! 2. Footnote-derived bands are injected into each jurisdiction they apply
//!    in that has table data.
//! 3. Every jurisdiction collection is flattened.
//! 4. Composite views fold [`BandCollection::merge`] over their members.
//! 5. Every band is decorated with the footnote definitions.
//!
//! Any failure aborts [`DatabaseBuilder::build`]; there is no partial
//! database. The built [`AllocationDatabase`] is read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spectab_band::Band;
use spectab_core::{CollectionError, Jurisdiction, Tolerance};

use crate::collection::BandCollection;

/// A named composite of jurisdiction collections.
///
/// An empty member list stands for every jurisdiction with data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// Name the view is looked up by.
    pub name: String,
    /// Member jurisdictions, in merge order.
    #[serde(default)]
    pub jurisdictions: Vec<Jurisdiction>,
}

impl ViewDefinition {
    /// View over the given jurisdictions.
    pub fn new<I>(name: impl Into<String>, jurisdictions: I) -> Self
    where
        I: IntoIterator<Item = Jurisdiction>,
    {
        Self {
            name: name.into(),
            jurisdictions: jurisdictions.into_iter().collect(),
        }
    }

    /// The views every database gets unless overridden:
    /// `ITU` (the three regions), `USA` (Federal and Non-Federal) and `all`.
    pub fn defaults() -> Vec<ViewDefinition> {
        vec![
            Self::new("ITU", Jurisdiction::itu_regions().iter().copied()),
            Self::new("USA", Jurisdiction::usa().iter().copied()),
            Self::new("all", []),
        ]
    }
}

/// Accumulates pipeline inputs.
#[derive(Debug, Clone)]
pub struct DatabaseBuilder {
    tolerance: Tolerance,
    tables: BTreeMap<Jurisdiction, BandCollection>,
    footnote_bands: Vec<Band>,
    footnote_definitions: BTreeMap<String, String>,
    views: Vec<ViewDefinition>,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseBuilder {
    /// Builder with the default tolerance and default views.
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default())
    }

    /// Builder using `tolerance` for every collection it creates.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            tables: BTreeMap::new(),
            footnote_bands: Vec::new(),
            footnote_definitions: BTreeMap::new(),
            views: ViewDefinition::defaults(),
        }
    }

    /// File a table band under each jurisdiction it applies in.
    pub fn add_band(&mut self, band: Band) -> Result<(), CollectionError> {
        if band.jurisdictions().is_empty() {
            return Err(CollectionError::UnassignedBand(band.compact_str()));
        }
        for &jurisdiction in band.jurisdictions() {
            self.table_mut(jurisdiction)
                .append(band.with_jurisdictions([jurisdiction]));
        }
        Ok(())
    }

    /// [`DatabaseBuilder::add_band`] for every band in `bands`.
    pub fn add_bands<I>(&mut self, bands: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = Band>,
    {
        bands.into_iter().try_for_each(|band| self.add_band(band))
    }

    /// Queue a footnote-derived band for injection at build time.
    pub fn add_footnote_band(&mut self, band: Band) -> Result<(), CollectionError> {
        if band.jurisdictions().is_empty() {
            return Err(CollectionError::UnassignedBand(band.compact_str()));
        }
        self.footnote_bands.push(band);
        Ok(())
    }

    /// Add footnote definitions; later entries replace earlier ones.
    pub fn footnote_definitions<I>(&mut self, definitions: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.footnote_definitions.extend(definitions);
        self
    }

    /// Define or replace a composite view.
    pub fn define_view(&mut self, view: ViewDefinition) -> &mut Self {
        match self.views.iter_mut().find(|v| v.name == view.name) {
            Some(existing) => *existing = view,
            None => self.views.push(view),
        }
        self
    }

    /// Run the pipeline.
    pub fn build(self) -> Result<AllocationDatabase, CollectionError> {
        let Self {
            tolerance,
            mut tables,
            footnote_bands,
            footnote_definitions,
            views,
        } = self;

        for band in &footnote_bands {
            for &jurisdiction in band.jurisdictions() {
                match tables.get_mut(&jurisdiction) {
                    Some(table) => table.append(band.with_jurisdictions([jurisdiction])),
                    None => tracing::debug!(
                        jurisdiction = %jurisdiction,
                        band = %band.range_str(),
                        "no table for footnote band jurisdiction, skipping"
                    ),
                }
            }
        }

        let mut flattened = BTreeMap::new();
        for (jurisdiction, table) in &tables {
            let flat = table.flatten()?;
            tracing::debug!(
                jurisdiction = %jurisdiction,
                raw = table.len(),
                flattened = flat.len(),
                "flattened jurisdiction table"
            );
            flattened.insert(*jurisdiction, flat);
        }

        let mut merged = BTreeMap::new();
        for view in &views {
            let members: Vec<Jurisdiction> = if view.jurisdictions.is_empty() {
                flattened.keys().copied().collect()
            } else {
                view.jurisdictions.clone()
            };
            let mut collection = BandCollection::with_tolerance(tolerance);
            for jurisdiction in &members {
                match flattened.get(jurisdiction) {
                    Some(table) => collection = collection.merge(table),
                    None => tracing::warn!(
                        view = %view.name,
                        jurisdiction = %jurisdiction,
                        "view member has no table"
                    ),
                }
            }
            merged.insert(
                view.name.clone(),
                collection.decorate_footnote_definitions(&footnote_definitions),
            );
        }

        let jurisdictions: BTreeMap<Jurisdiction, BandCollection> = flattened
            .into_iter()
            .map(|(j, c)| (j, c.decorate_footnote_definitions(&footnote_definitions)))
            .collect();

        tracing::info!(
            jurisdictions = jurisdictions.len(),
            views = merged.len(),
            footnote_bands = footnote_bands.len(),
            definitions = footnote_definitions.len(),
            "allocation database built"
        );

        Ok(AllocationDatabase {
            jurisdictions,
            views: merged,
            footnote_definitions,
        })
    }

    fn table_mut(&mut self, jurisdiction: Jurisdiction) -> &mut BandCollection {
        let tolerance = self.tolerance;
        self.tables
            .entry(jurisdiction)
            .or_insert_with(|| BandCollection::with_tolerance(tolerance))
    }
}

/// The built, read-only set of collections.
#[derive(Debug, Clone)]
pub struct AllocationDatabase {
    jurisdictions: BTreeMap<Jurisdiction, BandCollection>,
    views: BTreeMap<String, BandCollection>,
    footnote_definitions: BTreeMap<String, String>,
}

impl AllocationDatabase {
    /// Flattened table of one jurisdiction.
    pub fn jurisdiction(&self, jurisdiction: Jurisdiction) -> Option<&BandCollection> {
        self.jurisdictions.get(&jurisdiction)
    }

    /// Collection by view name (case-insensitive) or jurisdiction name.
    pub fn view(&self, name: &str) -> Option<&BandCollection> {
        if let Some(view) = self.views.get(name) {
            return Some(view);
        }
        if let Some((_, view)) = self
            .views
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            return Some(view);
        }
        name.parse::<Jurisdiction>()
            .ok()
            .and_then(|j| self.jurisdiction(j))
    }

    /// Jurisdictions with data.
    pub fn jurisdictions(&self) -> impl Iterator<Item = (Jurisdiction, &BandCollection)> + '_ {
        self.jurisdictions.iter().map(|(j, c)| (*j, c))
    }

    /// Composite views by name.
    pub fn views(&self) -> impl Iterator<Item = (&str, &BandCollection)> + '_ {
        self.views.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Footnote definitions attached to every band.
    pub fn footnote_definitions(&self) -> &BTreeMap<String, String> {
        &self.footnote_definitions
    }
}
