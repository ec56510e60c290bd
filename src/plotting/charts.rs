//! Attitude, position and GPS charts

use std::error::Error;
use std::path::Path;

use chrono::DateTime;
use plotters::backend::SVGBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::drawing::IntoDrawingArea;
use plotters::element::{Circle, PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, BLUE, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};
use tracing::info;

use super::{
    ensure_parent, range_of, render_error, ChartSize, PlotError, FONT_FAMILY, FONT_SIZE_CAPTION,
    FONT_SIZE_LABEL, SERIES_COLORS,
};
use crate::gps::GpsTrack;
use crate::reconcile::SeriesCollection;
use crate::types::{EventKind, PlanarPoint};

#[allow(clippy::cast_possible_truncation)]
fn clock_label(epoch_ms: f64) -> String {
    DateTime::from_timestamp_millis(epoch_ms as i64)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

// ============================================================================
// Attitude
// ============================================================================

/// One line per attitude kind: absolute degrees against wall-clock time.
pub fn plot_attitude_series(
    series: &SeriesCollection,
    title: &str,
    path: &Path,
    size: ChartSize,
) -> Result<(), PlotError> {
    ensure_parent(path)?;
    let lines: Vec<(EventKind, RGBColor, Vec<(f64, f64)>)> = EventKind::ATTITUDE
        .iter()
        .zip(SERIES_COLORS)
        .map(|(&kind, color)| {
            #[allow(clippy::cast_precision_loss)]
            let points = series
                .timestamps(kind)
                .into_iter()
                .zip(series.magnitudes(kind))
                .map(|(t, m)| (t as f64, f64::from(m)))
                .collect();
            (kind, color, points)
        })
        .collect();

    draw_attitude(&lines, title, path, size).map_err(|e| render_error(path, e.as_ref()))?;
    info!(path = %path.display(), "Attitude chart written");
    Ok(())
}

fn draw_attitude(
    lines: &[(EventKind, RGBColor, Vec<(f64, f64)>)],
    title: &str,
    path: &Path,
    size: ChartSize,
) -> Result<(), Box<dyn Error>> {
    let all = || lines.iter().flat_map(|(_, _, pts)| pts.iter());
    let (x_min, x_max) = range_of(all().map(|p| p.0));
    let (_, y_max) = range_of(all().map(|p| p.1));

    let root = SVGBackend::new(path, size.dims()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, FONT_SIZE_CAPTION))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc("|Yaw| (deg)")
        .x_label_formatter(&|x| clock_label(*x))
        .draw()?;

    for (kind, color, points) in lines {
        let color = *color;
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(kind.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

// ============================================================================
// Position track
// ============================================================================

/// Chained position-delta track in the horizontal plane.
pub fn plot_position_track(
    track: &[PlanarPoint],
    path: &Path,
    size: ChartSize,
) -> Result<(), PlotError> {
    ensure_parent(path)?;
    draw_position(track, path, size).map_err(|e| render_error(path, e.as_ref()))?;
    info!(path = %path.display(), points = track.len(), "Position chart written");
    Ok(())
}

fn draw_position(track: &[PlanarPoint], path: &Path, size: ChartSize) -> Result<(), Box<dyn Error>> {
    let (x_min, x_max) = range_of(track.iter().map(|p| p.x));
    let (y_min, y_max) = range_of(track.iter().map(|p| p.y));

    let root = SVGBackend::new(path, size.dims()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Drone position track", (FONT_FAMILY, FONT_SIZE_CAPTION))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_desc("X").y_desc("Y").draw()?;

    chart.draw_series(LineSeries::new(
        track.iter().map(|p| (p.x, p.y)),
        SERIES_COLORS[0].stroke_width(2),
    ))?;
    chart.draw_series(
        track
            .iter()
            .map(|p| Circle::new((p.x, p.y), 3, SERIES_COLORS[0].filled())),
    )?;

    root.present()?;
    Ok(())
}

// ============================================================================
// GPS radial map
// ============================================================================

/// Projected GPS fixes around the origin, with equal axes.
pub fn plot_gps_track(track: &GpsTrack, path: &Path, size: ChartSize) -> Result<(), PlotError> {
    ensure_parent(path)?;
    draw_gps(track, path, size.square()).map_err(|e| render_error(path, e.as_ref()))?;
    info!(path = %path.display(), points = track.points.len(), "GPS radial map written");
    Ok(())
}

fn draw_gps(track: &GpsTrack, path: &Path, size: ChartSize) -> Result<(), Box<dyn Error>> {
    let extent = track
        .points
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0, f64::max)
        * 1.15;

    let root = SVGBackend::new(path, size.dims()).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Relative Positions from Origin (Radial Map)",
            (FONT_FAMILY, FONT_SIZE_CAPTION),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart
        .configure_mesh()
        .x_desc("East-West (m)")
        .y_desc("North-South (m)")
        .draw()?;

    let axis_style = RGBColor(128, 128, 128).stroke_width(1);
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(-extent, 0.0), (extent, 0.0)],
        axis_style,
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, -extent), (0.0, extent)],
        axis_style,
    )))?;

    chart
        .draw_series(
            track
                .points
                .iter()
                .map(|p| Circle::new((p.x, p.y), 3, BLUE.filled())),
        )?
        .label("Drone")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLUE.filled()));

    chart
        .draw_series(std::iter::once(Circle::new((0.0, 0.0), 5, RED.filled())))?
        .label("Origin")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));
    chart.draw_series(std::iter::once(Text::new(
        "Origin",
        (0.0, 0.0),
        (FONT_FAMILY, FONT_SIZE_LABEL).into_font(),
    )))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::TrackPoint;
    use crate::types::GeoPoint;

    fn svg_in(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        dir.path().join("charts").join(name)
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(0.0), "00:00:00");
        assert_eq!(clock_label(3_723_000.0), "01:02:03");
    }

    #[test]
    fn test_empty_attitude_chart_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = svg_in(&dir, "attitude.svg");
        plot_attitude_series(&SeriesCollection::new(), "empty", &path, ChartSize::new(400, 300))
            .unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_position_chart_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = svg_in(&dir, "position.svg");
        let track = [PlanarPoint::ORIGIN, PlanarPoint::new(1.0, 2.0), PlanarPoint::new(-3.0, 0.5)];
        plot_position_track(&track, &path, ChartSize::new(400, 300)).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_gps_chart_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = svg_in(&dir, "gps.svg");
        let track = GpsTrack {
            fix_count: 2,
            start_ms: 0.0,
            end_ms: 1000.0,
            tracking_time_secs: 1.0,
            sampling_hz: 2.0,
            origin: GeoPoint::new(0.0, 0.0),
            points: vec![TrackPoint {
                position: GeoPoint::new(0.0, 0.001),
                distance_m: 111.3,
                bearing_deg: 90.0,
                x: 0.0,
                y: 111.3,
            }],
        };
        plot_gps_track(&track, &path, ChartSize::new(600, 400)).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("Origin"));
    }
}
