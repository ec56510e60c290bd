//! Questionnaire group loader
//!
//! One CSV per experimental group; each requested dimension is a numeric
//! column in that file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::StatsError;

/// Group name for a questionnaire file: the file name minus `.csv`.
pub fn group_name(file_name: &str) -> &str {
    file_name.strip_suffix(".csv").unwrap_or(file_name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupData {
    pub name: String,
    /// Dimension -> per-participant scores, in file order
    pub columns: BTreeMap<String, Vec<f64>>,
}

impl GroupData {
    pub fn values(&self, dimension: &str) -> Option<&[f64]> {
        self.columns.get(dimension).map(Vec::as_slice)
    }

    /// Parse one group's CSV, keeping only `dimensions`.
    pub fn from_reader<R: Read>(
        name: &str,
        reader: R,
        dimensions: &[String],
    ) -> Result<Self, StatsError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut indices = Vec::with_capacity(dimensions.len());
        for dim in dimensions {
            let idx = headers
                .iter()
                .position(|h| h == dim)
                .ok_or_else(|| StatsError::MissingColumn {
                    group: name.to_string(),
                    column: dim.clone(),
                })?;
            indices.push((dim, idx));
        }

        let mut columns: BTreeMap<String, Vec<f64>> =
            dimensions.iter().map(|d| (d.clone(), Vec::new())).collect();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            for &(dim, idx) in &indices {
                let raw = record.get(idx).unwrap_or("");
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| StatsError::InvalidNumber {
                        group: name.to_string(),
                        row: i + 1,
                        column: dim.clone(),
                        value: raw.to_string(),
                    })?;
                if let Some(col) = columns.get_mut(dim) {
                    col.push(value);
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            columns,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDataset {
    pub groups: Vec<GroupData>,
}

impl GroupDataset {
    /// Load every group file from `dir`, in the order given.
    pub fn load(dir: &Path, files: &[String], dimensions: &[String]) -> Result<Self, StatsError> {
        let mut groups = Vec::with_capacity(files.len());
        for file_name in files {
            let path = dir.join(file_name);
            let file = File::open(&path).map_err(|source| StatsError::FileAccess {
                path: path.clone(),
                source,
            })?;
            let group = GroupData::from_reader(group_name(file_name), file, dimensions)?;
            debug!(
                group = %group.name,
                participants = group.columns.values().next().map_or(0, Vec::len),
                "Loaded questionnaire group"
            );
            groups.push(group);
        }
        info!(dir = %dir.display(), groups = groups.len(), "Questionnaire data loaded");
        Ok(Self { groups })
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Scores for one dimension, one slice per group in load order.
    pub fn dimension(&self, dimension: &str) -> Result<Vec<&[f64]>, StatsError> {
        self.groups
            .iter()
            .map(|g| {
                g.values(dimension)
                    .ok_or_else(|| StatsError::UnknownDimension(dimension.to_string()))
            })
            .collect()
    }
}
