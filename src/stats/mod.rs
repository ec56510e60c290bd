//! Questionnaire group statistics
//!
//! For each dimension: Shapiro-Wilk per group decides between one-way ANOVA
//! (all groups normal) and Kruskal-Wallis, then every pair of groups is
//! compared with Mann-Whitney U under a Bonferroni adjustment.

pub mod dataset;
pub mod normality;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use dataset::{group_name, GroupData, GroupDataset};
pub use group_tests::{
    average_ranks, bonferroni, kruskal_wallis, mann_whitney_u, one_way_anova, significance_stars,
    TestOutcome,
};
pub use normality::{shapiro_wilk, ShapiroWilk};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Cannot open questionnaire file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Group '{group}' has no column '{column}'")]
    MissingColumn { group: String, column: String },

    #[error("Group '{group}' row {row}: column '{column}' is not a number: '{value}'")]
    InvalidNumber {
        group: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Dimension '{0}' was not loaded")]
    UnknownDimension(String),

    #[error("{test} needs at least {min} samples, got {got}")]
    SampleSize {
        test: &'static str,
        got: usize,
        min: usize,
        max: Option<usize>,
    },

    #[error("{test} needs at least 2 groups, got {got}")]
    TooFewGroups { test: &'static str, got: usize },

    #[error("{test}: group {index} is empty")]
    EmptyGroup { test: &'static str, index: usize },

    #[error("Sample contains NaN or infinite values")]
    NonFinite,

    #[error("All values are identical")]
    ZeroVariance,

    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Significance levels for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Shapiro-Wilk p above this counts as normal
    pub normality_alpha: f64,
    /// Omnibus p above this means no significant difference
    pub group_alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNormality {
    pub group: String,
    pub result: ShapiroWilk,
    pub normal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OmnibusTest {
    Anova,
    KruskalWallis,
}

impl std::fmt::Display for OmnibusTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anova => write!(f, "one-way ANOVA"),
            Self::KruskalWallis => write!(f, "Kruskal-Wallis"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub group_a: String,
    pub group_b: String,
    pub u_statistic: f64,
    pub p_value: f64,
    pub p_adjusted: f64,
    pub stars: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionReport {
    pub dimension: String,
    pub normality: Vec<GroupNormality>,
    pub all_normal: bool,
    pub test: OmnibusTest,
    pub omnibus: TestOutcome,
    /// p <= group_alpha
    pub significant: bool,
    pub pairwise: Vec<PairwiseComparison>,
}

/// Full comparison of the groups on one dimension.
pub fn compare_dimension(
    dataset: &GroupDataset,
    dimension: &str,
    thresholds: Thresholds,
) -> Result<DimensionReport, StatsError> {
    let samples = dataset.dimension(dimension)?;
    let names = dataset.group_names();

    let mut normality = Vec::with_capacity(samples.len());
    for (name, sample) in names.iter().zip(&samples) {
        let result = shapiro_wilk(sample)?;
        let normal = result.is_normal(thresholds.normality_alpha);
        info!(
            group = %name,
            dimension,
            w = %format!("{:.3}", result.w),
            p = %format!("{:.3}", result.p_value),
            normal,
            "Shapiro-Wilk"
        );
        normality.push(GroupNormality {
            group: (*name).to_string(),
            result,
            normal,
        });
    }
    let all_normal = normality.iter().all(|n| n.normal);

    let (test, omnibus) = if all_normal {
        (OmnibusTest::Anova, one_way_anova(&samples)?)
    } else {
        (OmnibusTest::KruskalWallis, kruskal_wallis(&samples)?)
    };
    let significant = omnibus.p_value <= thresholds.group_alpha;
    info!(
        dimension,
        test = %test,
        statistic = %format!("{:.3}", omnibus.statistic),
        p = %format!("{:.4}", omnibus.p_value),
        significant,
        "Group comparison"
    );

    let pairs: Vec<(usize, usize)> = (0..samples.len())
        .flat_map(|i| (i + 1..samples.len()).map(move |j| (i, j)))
        .collect();
    let mut pairwise = Vec::with_capacity(pairs.len());
    for &(i, j) in &pairs {
        let outcome = mann_whitney_u(samples[i], samples[j])?;
        let p_adjusted = bonferroni(outcome.p_value, pairs.len());
        pairwise.push(PairwiseComparison {
            group_a: names[i].to_string(),
            group_b: names[j].to_string(),
            u_statistic: outcome.statistic,
            p_value: outcome.p_value,
            p_adjusted,
            stars: significance_stars(p_adjusted).to_string(),
        });
    }

    Ok(DimensionReport {
        dimension: dimension.to_string(),
        normality,
        all_normal,
        test,
        omnibus,
        significant,
        pairwise,
    })
}

/// Run `compare_dimension` for every dimension, in order.
pub fn compare_all(
    dataset: &GroupDataset,
    dimensions: &[String],
    thresholds: Thresholds,
) -> Result<Vec<DimensionReport>, StatsError> {
    dimensions
        .iter()
        .map(|d| compare_dimension(dataset, d, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    const THRESHOLDS: Thresholds = Thresholds {
        normality_alpha: 0.005,
        group_alpha: 0.05,
    };

    fn group(name: &str, values: &[f64]) -> GroupData {
        GroupData {
            name: name.to_string(),
            columns: BTreeMap::from([("Presence".to_string(), values.to_vec())]),
        }
    }

    #[test]
    fn test_normal_groups_use_anova() {
        let ds = GroupDataset {
            groups: vec![
                group("A", &[1.0, 2.0, 3.0, 4.0, 5.0]),
                group("B", &[2.0, 3.0, 4.0, 5.0, 6.0]),
                group("C", &[8.0, 9.0, 10.0, 11.0, 12.0]),
            ],
        };
        let report = compare_dimension(&ds, "Presence", THRESHOLDS).unwrap();
        assert!(report.all_normal);
        assert_eq!(report.test, OmnibusTest::Anova);
        assert!(report.significant);
        assert_eq!(report.pairwise.len(), 3);
        assert_eq!(
            (report.pairwise[2].group_a.as_str(), report.pairwise[2].group_b.as_str()),
            ("B", "C")
        );
        for pair in &report.pairwise {
            assert!(pair.p_adjusted >= pair.p_value);
            assert!(pair.p_adjusted <= 1.0);
        }
    }

    #[test]
    fn test_non_normal_group_switches_to_kruskal_wallis() {
        let skewed: Vec<f64> = (0..12).map(|i| f64::from(i).exp2()).collect();
        let ds = GroupDataset {
            groups: vec![
                group("A", &skewed),
                group("B", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            ],
        };
        let report = compare_dimension(&ds, "Presence", THRESHOLDS).unwrap();
        assert!(!report.all_normal);
        assert!(!report.normality[0].normal);
        assert_eq!(report.test, OmnibusTest::KruskalWallis);
        assert_eq!(report.pairwise.len(), 1);
    }

    #[test]
    fn test_compare_all_reports_unknown_dimension() {
        let ds = GroupDataset {
            groups: vec![group("A", &[1.0, 2.0, 3.0]), group("B", &[2.0, 3.0, 5.0])],
        };
        let err = compare_all(&ds, &["Realness".to_string()], THRESHOLDS).unwrap_err();
        assert!(matches!(err, StatsError::UnknownDimension(_)));
    }
}
