//! # Pipeline Configuration
//!
//! The YAML file that tells `spectab` where its inputs live.
//!
//! ```yaml
//! tables:
//!   - path: tables/itu-r1.json       # JSON array of cell records
//!     jurisdictions: [R1]            # default for records that name none
//!     units: MHz                     # default for records that name none
//!   - path: tables/usa.json
//! footnote_bands: [footnotes/rules.json]
//! footnote_definitions: [footnotes/text.json]
//! views:
//!   - name: federal
//!     jurisdictions: [F]
//! tolerance:
//!   atol_hz: 10.0
//!   rtol: 1.0e-6
//! ```
//!
//! Relative paths resolve against the directory holding the configuration
//! file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use spectab_band::{Band, CellRecord, FootnoteBandRecord};
use spectab_collection::{AllocationDatabase, DatabaseBuilder, ViewDefinition};
use spectab_core::{FrequencyUnit, Jurisdiction, Tolerance};

/// File name looked for when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "spectab.yaml";

/// One file of scraped table cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSource {
    /// JSON array of [`CellRecord`]s.
    pub path: PathBuf,
    /// Jurisdictions for records that carry none.
    #[serde(default)]
    pub jurisdictions: Vec<Jurisdiction>,
    /// Units for records that carry none.
    #[serde(default)]
    pub units: Option<FrequencyUnit>,
}

/// Parsed pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub tables: Vec<TableSource>,
    /// JSON arrays of [`FootnoteBandRecord`]s.
    #[serde(default)]
    pub footnote_bands: Vec<PathBuf>,
    /// JSON objects mapping footnote name to text.
    #[serde(default)]
    pub footnote_definitions: Vec<PathBuf>,
    /// Extra or replacement composite views.
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
    #[serde(default)]
    pub tolerance: Option<Tolerance>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl PipelineConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: PipelineConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config YAML: {}", path.display()))?;
        config.base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        tracing::debug!(
            config = %path.display(),
            tables = config.tables.len(),
            footnote_bands = config.footnote_bands.len(),
            "loaded pipeline configuration"
        );
        Ok(config)
    }

    /// Load every input and run the database pipeline.
    pub fn build_database(&self) -> Result<AllocationDatabase> {
        let mut builder = match self.tolerance {
            Some(tolerance) => DatabaseBuilder::with_tolerance(tolerance),
            None => DatabaseBuilder::new(),
        };

        for source in &self.tables {
            self.load_table(source, &mut builder)?;
        }

        for path in &self.footnote_bands {
            let path = crate::resolve_path(path, &self.base_dir);
            let records: Vec<FootnoteBandRecord> = read_json(&path)?;
            for record in &records {
                let bands = record.bands().with_context(|| {
                    format!("{}: footnote {}", path.display(), record.footnote)
                })?;
                for band in bands {
                    builder.add_footnote_band(band)?;
                }
            }
        }

        for path in &self.footnote_definitions {
            let path = crate::resolve_path(path, &self.base_dir);
            let definitions: BTreeMap<String, String> = read_json(&path)?;
            builder.footnote_definitions(definitions);
        }

        for view in &self.views {
            builder.define_view(view.clone());
        }

        builder
            .build()
            .context("failed to build allocation database")
    }

    fn load_table(&self, source: &TableSource, builder: &mut DatabaseBuilder) -> Result<()> {
        let path = crate::resolve_path(&source.path, &self.base_dir);
        let records: Vec<CellRecord> = read_json(&path)?;
        let total = records.len();
        let mut skipped = 0usize;
        for (row, mut record) in records.into_iter().enumerate() {
            if record.jurisdictions.is_empty() {
                record.jurisdictions = source.jurisdictions.clone();
            }
            if record.units.is_none() {
                record.units = source.units;
            }
            let band = match Band::parse(&record) {
                Ok(band) => band,
                Err(e) if e.is_parse_rejection() => {
                    tracing::warn!(
                        file = %path.display(),
                        row,
                        error = %e,
                        "skipping cell that is not a band"
                    );
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("{}: row {row}", path.display()));
                }
            };
            builder
                .add_band(band)
                .with_context(|| format!("{}: row {row}", path.display()))?;
        }
        tracing::info!(file = %path.display(), total, skipped, "loaded table");
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}
