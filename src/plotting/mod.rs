//! SVG chart rendering
//!
//! Every chart is written as a standalone SVG file. Empty inputs still
//! produce a chart (axes and caption, no data) rather than an error.

mod boxplot;
mod charts;

use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use thiserror::Error;

pub use boxplot::{plot_group_boxplot, BoxStats};
pub use charts::{plot_attitude_series, plot_gps_track, plot_position_track};

pub(crate) const FONT_FAMILY: &str = "sans-serif";
pub(crate) const FONT_SIZE_CAPTION: u32 = 24;
pub(crate) const FONT_SIZE_LABEL: u32 = 16;

pub(crate) const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(148, 103, 189),
];

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Cannot create plot directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render {path}: {message}")]
    Render { path: PathBuf, message: String },
}

/// Pixel size of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Largest square that fits, for equal-axis charts.
    pub fn square(self) -> Self {
        let side = self.width.min(self.height);
        Self::new(side, side)
    }

    pub(crate) const fn dims(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Axis range with 15% padding, or a fixed half-unit for flat data.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Padded range over all values, `(0, 1)` when there are none.
pub(crate) fn range_of(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        (0.0, 1.0)
    } else {
        calculate_range(min, max)
    }
}

/// Create the parent directory of `path` if needed.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), PlotError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|source| PlotError::OutputDir {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

pub(crate) fn render_error(path: &Path, e: &dyn std::error::Error) -> PlotError {
    PlotError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_padding() {
        assert_eq!(calculate_range(0.0, 100.0), (-15.0, 115.0));
        assert_eq!(calculate_range(100.0, 0.0), (-15.0, 115.0));
        assert_eq!(calculate_range(3.0, 3.0), (2.5, 3.5));
    }

    #[test]
    fn test_range_of_empty_and_non_finite() {
        assert_eq!(range_of(std::iter::empty()), (0.0, 1.0));
        assert_eq!(range_of([f64::NAN, 2.0, 2.0].into_iter()), (1.5, 2.5));
    }

    #[test]
    fn test_square() {
        assert_eq!(ChartSize::new(1200, 800).square(), ChartSize::new(800, 800));
    }

    #[test]
    fn test_ensure_parent_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/chart.svg");
        ensure_parent(&path).unwrap();
        assert!(dir.path().join("a/b").is_dir());
        ensure_parent(Path::new("chart.svg")).unwrap();
    }
}
