//! Line charts over the regression sample.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

/// One named line.
#[derive(Debug, Clone)]
pub(crate) struct Trace<'a> {
    pub(crate) name: String,
    pub(crate) color: Color,
    pub(crate) points: &'a [(f64, f64)],
}

/// `[min, max]` of the y values with 5% padding. Flat or empty input gets a
/// unit-width range so the axis stays drawable.
pub(crate) fn value_bounds<'a>(series: impl IntoIterator<Item = &'a [(f64, f64)]>) -> [f64; 2] {
    let (min, max) = series
        .into_iter()
        .flatten()
        .map(|&(_, y)| y)
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    if (max - min).abs() < f64::EPSILON {
        return [min - 0.5, max + 0.5];
    }

    let pad = (max - min) * 0.05;
    [min - pad, max + pad]
}

/// Render a decimal return as a percentage axis label.
pub(crate) fn percent_label(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Build a line chart with percentage y labels and dated x labels.
pub(crate) fn line_chart<'a>(
    title: &str,
    traces: &[Trace<'a>],
    x_labels: Vec<String>,
) -> Chart<'a> {
    let points = traces.iter().map(|t| t.points);
    let [y_min, y_max] = value_bounds(points.clone());
    let x_max = points
        .map(|p| p.len())
        .max()
        .unwrap_or(0)
        .saturating_sub(1)
        .max(1) as f64;

    let datasets = traces
        .iter()
        .map(|trace| {
            Dataset::default()
                .name(trace.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(trace.color))
                .data(trace.points)
        })
        .collect::<Vec<_>>();

    Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    percent_label(y_min),
                    percent_label((y_min + y_max) / 2.0),
                    percent_label(y_max),
                ]),
        )
}
