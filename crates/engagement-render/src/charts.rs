//! PNG charts embedded in the report.

use std::path::Path;

use engagement_core::formatting::format_number;
use engagement_core::models::{CommenterTotal, HourlyEngagement};
use engagement_core::{ReportError, Result};
use plotters::prelude::*;
use tracing::debug;

/// Size and labels for one chart image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

/// Bar chart of comment totals for the most active users.
pub const TOP_COMMENTERS_CHART: ChartLayout = ChartLayout {
    width: 600,
    height: 450,
    title: "Top Commenters",
    x_label: "Users",
    y_label: "Number of Comments",
};

/// Line chart of mean comments by hour of day.
pub const HOURLY_CHART: ChartLayout = ChartLayout {
    width: 600,
    height: 400,
    title: "Average Number of Comments per Hour",
    x_label: "Hour of the Day",
    y_label: "Average Number of Comments",
};

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const Y_HEADROOM: f64 = 1.1;

/// Render the top-commenters bar chart to `path`.
///
/// Bars keep the order of `totals`. An empty slice still produces a chart
/// with titled axes and no bars.
pub fn render_top_commenters(path: &Path, totals: &[CommenterTotal]) -> Result<()> {
    let layout = TOP_COMMENTERS_CHART;
    let root = BitMapBackend::new(path, (layout.width, layout.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let labels: Vec<String> = totals.iter().map(|t| t.username.clone()).collect();
    let slots = labels.len().max(1) as u32;
    let y_max = count_axis_max(totals.iter().map(|t| t.total_comments));

    let mut chart = ChartBuilder::on(&root)
        .caption(layout.title, (FONT, 22))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0u64..y_max)
        .map_err(render_err)?;

    let x_formatter = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_formatter = |value: &u64| format_number(*value as f64, 0);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots as usize)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_label_style((FONT, 11))
        .x_desc(layout.x_label)
        .y_desc(layout.y_label)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BAR_COLOR.filled())
                .margin(8)
                .data(
                    totals
                        .iter()
                        .enumerate()
                        .map(|(i, t)| (i as u32, t.total_comments)),
                ),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    debug!("Wrote {} bars to {}", totals.len(), path.display());
    Ok(())
}

/// Render the hourly engagement line chart to `path`.
///
/// Only hours present in `hourly` are plotted, so the line joins the
/// neighbouring hours that had posts.
pub fn render_hourly_engagement(path: &Path, hourly: &[HourlyEngagement]) -> Result<()> {
    let layout = HOURLY_CHART;
    let root = BitMapBackend::new(path, (layout.width, layout.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let points: Vec<(f64, f64)> = hourly
        .iter()
        .map(|h| (f64::from(h.hour), h.mean_comments))
        .collect();
    let (x_min, x_max) = hour_axis_range(hourly);
    let y_max = mean_axis_max(hourly.iter().map(|h| h.mean_comments));

    let mut chart = ChartBuilder::on(&root)
        .caption(layout.title, (FONT, 22))
        .margin(12)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(render_err)?;

    let x_formatter = |value: &f64| format!("{:.0}", value);
    let y_formatter = |value: &f64| format_number(*value, 1);

    chart
        .configure_mesh()
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_desc(layout.x_label)
        .y_desc(layout.y_label)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))
        .map_err(render_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 4, LINE_COLOR.filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    debug!("Wrote {} hourly points to {}", points.len(), path.display());
    Ok(())
}

// ── Axis helpers ──────────────────────────────────────────────────────────────

/// Upper bound of the count axis, with headroom above the tallest bar.
pub fn count_axis_max(values: impl Iterator<Item = u64>) -> u64 {
    let max = values.max().unwrap_or(0);
    max + (max / 10).max(1)
}

/// Upper bound of the mean axis, with headroom above the highest point.
pub fn mean_axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * Y_HEADROOM
    } else {
        1.0
    }
}

/// Hour axis bounds padded half an hour either side of the plotted hours.
///
/// Falls back to the whole day when there is nothing to plot.
pub fn hour_axis_range(hourly: &[HourlyEngagement]) -> (f64, f64) {
    let lo = hourly.iter().map(|h| h.hour).min();
    let hi = hourly.iter().map(|h| h.hour).max();
    match (lo, hi) {
        (Some(lo), Some(hi)) => (f64::from(lo) - 0.5, f64::from(hi) + 0.5),
        _ => (-0.5, 23.5),
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Render(err.to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
