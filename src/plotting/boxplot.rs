//! Group box plots with pairwise significance brackets

use std::error::Error;
use std::path::Path;

use plotters::backend::SVGBackend;
use plotters::chart::ChartBuilder;
use plotters::drawing::IntoDrawingArea;
use plotters::element::{Circle, PathElement, Rectangle, Text};
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color, IntoFont, TextStyle};
use serde::Serialize;
use tracing::info;

use super::{
    ensure_parent, range_of, render_error, ChartSize, PlotError, FONT_FAMILY, FONT_SIZE_CAPTION,
    FONT_SIZE_LABEL, SERIES_COLORS,
};
use crate::stats::{DimensionReport, GroupDataset, StatsError};

const BOX_HALF_WIDTH: f64 = 0.3;
const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within 1.5 IQR below q1
    pub whisker_low: f64,
    /// Highest value within 1.5 IQR above q3
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Linearly interpolated quantile of sorted data.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

impl BoxStats {
    /// `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let inside = || sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
        let whisker_low = inside().fold(q1, f64::min);
        let whisker_high = inside().fold(q3, f64::max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Box plot of one dimension across all groups, with a bracket and stars
/// for each pairwise comparison in `report`.
pub fn plot_group_boxplot(
    dataset: &GroupDataset,
    report: &DimensionReport,
    path: &Path,
    size: ChartSize,
) -> Result<(), PlotError> {
    ensure_parent(path)?;
    let samples = dataset
        .dimension(&report.dimension)
        .map_err(|e: StatsError| render_error(path, &e))?;
    let names = dataset.group_names();

    draw_boxplot(&names, &samples, report, path, size).map_err(|e| render_error(path, e.as_ref()))?;
    info!(path = %path.display(), dimension = %report.dimension, "Box plot written");
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn draw_boxplot(
    names: &[&str],
    samples: &[&[f64]],
    report: &DimensionReport,
    path: &Path,
    size: ChartSize,
) -> Result<(), Box<dyn Error>> {
    let (data_min, data_max) = range_of(samples.iter().flat_map(|s| s.iter().copied()));
    let bracket_step = (data_max - data_min) * 0.08;
    let top = data_max + bracket_step * (report.pairwise.len() as f64 + 1.0);
    let k = samples.len().max(1) as f64;

    let root = SVGBackend::new(path, size.dims()).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = format!(
        "{}: {} (p = {:.4})",
        report.dimension, report.test, report.omnibus.p_value
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT_FAMILY, FONT_SIZE_CAPTION))
        .margin(10)
        .x_label_area_size(20)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..k - 0.5, data_min..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .y_desc(report.dimension.as_str())
        .draw()?;

    let name_style = TextStyle::from((FONT_FAMILY, FONT_SIZE_LABEL).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (i, (name, sample)) in names.iter().zip(samples).enumerate() {
        let x = i as f64;
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        chart.draw_series(std::iter::once(Text::new(
            (*name).to_string(),
            (x, data_min),
            name_style.clone(),
        )))?;

        let Some(stats) = BoxStats::from_values(sample) else {
            continue;
        };
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);

        chart.draw_series([
            Rectangle::new([(left, stats.q1), (right, stats.q3)], color.mix(0.4).filled()),
            Rectangle::new([(left, stats.q1), (right, stats.q3)], BLACK.stroke_width(1)),
        ])?;
        chart.draw_series([
            PathElement::new(vec![(left, stats.median), (right, stats.median)], BLACK.stroke_width(2)),
            PathElement::new(vec![(x, stats.q3), (x, stats.whisker_high)], BLACK.stroke_width(1)),
            PathElement::new(vec![(x, stats.q1), (x, stats.whisker_low)], BLACK.stroke_width(1)),
            PathElement::new(
                vec![(x - 0.1, stats.whisker_high), (x + 0.1, stats.whisker_high)],
                BLACK.stroke_width(1),
            ),
            PathElement::new(
                vec![(x - 0.1, stats.whisker_low), (x + 0.1, stats.whisker_low)],
                BLACK.stroke_width(1),
            ),
        ])?;
        chart.draw_series(
            stats
                .outliers
                .iter()
                .map(|&v| Circle::new((x, v), 3, BLACK.stroke_width(1))),
        )?;
        // individual observations
        chart.draw_series(
            sample
                .iter()
                .map(|&v| Circle::new((x, v), 2, BLACK.mix(0.6).filled())),
        )?;
    }

    let star_style = TextStyle::from((FONT_FAMILY, FONT_SIZE_LABEL).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for (level, pair) in report.pairwise.iter().enumerate() {
        let (Some(a), Some(b)) = (
            names.iter().position(|n| *n == pair.group_a),
            names.iter().position(|n| *n == pair.group_b),
        ) else {
            continue;
        };
        let (x1, x2) = (a as f64, b as f64);
        let y = data_max + bracket_step * (level as f64 + 0.5);
        let tick = bracket_step * 0.2;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x1, y), (x1, y + tick), (x2, y + tick), (x2, y)],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            pair.stars.clone(),
            ((x1 + x2) / 2.0, y + tick),
            star_style.clone(),
        )))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{compare_dimension, GroupData, Thresholds};
    use std::collections::BTreeMap;

    #[test]
    fn test_box_stats_quartiles() {
        let stats = BoxStats::from_values(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!((stats.whisker_low, stats.whisker_high), (1.0, 5.0));
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_interpolates_and_flags_outliers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        // fences at 2 - 3 and 4 + 3
        assert_eq!(stats.whisker_high, 4.0);
        assert_eq!(stats.outliers, vec![100.0]);

        let even = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.q1, 1.75);
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_boxplot_written_with_brackets() {
        let group = |name: &str, values: &[f64]| GroupData {
            name: name.to_string(),
            columns: BTreeMap::from([("Realness".to_string(), values.to_vec())]),
        };
        let dataset = GroupDataset {
            groups: vec![
                group("Monitor", &[1.0, 2.0, 3.0, 4.0]),
                group("HMD", &[3.0, 4.0, 5.0, 6.5]),
                group("Headset", &[6.0, 7.0, 8.0, 9.0]),
            ],
        };
        let thresholds = Thresholds {
            normality_alpha: 0.005,
            group_alpha: 0.05,
        };
        let report = compare_dimension(&dataset, "Realness", thresholds).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("realness.svg");
        plot_group_boxplot(&dataset, &report, &path, ChartSize::new(600, 500)).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Headset"));
        for pair in &report.pairwise {
            assert!(svg.contains(&pair.stars));
        }
    }
}
