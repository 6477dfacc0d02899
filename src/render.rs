//! Bar chart rendering with plotters.
//!
//! One PNG per metric: a segmented x-axis with one slot per experiment, bar
//! height equal to the metric value, chart title `<metric> across
//! experiments`. Files land in the output directory as `<metric>.png`.

use crate::aggregate::MetricTable;
use crate::config::{ConfigError, PlotConfig};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Appearance knobs for rendering, resolved from `PlotConfig`.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub bar_color: (u8, u8, u8),
    pub title_size: u32,
    pub tick_size: u32,
    pub rotate_x_labels: bool,
}

impl RenderOptions {
    pub fn from_config(config: &PlotConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            width: config.chart.width,
            height: config.chart.height,
            bar_color: config.chart.bar_rgb()?,
            title_size: config.labels.title_size,
            tick_size: config.labels.tick_size,
            rotate_x_labels: config.labels.rotate_x_labels,
        })
    }
}

/// One rendered chart, as reported in the run manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFile {
    pub metric: String,
    pub file: String,
    pub bars: usize,
}

#[derive(Debug)]
pub enum RenderError {
    Draw {
        metric: String,
        path: PathBuf,
        message: String,
    },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Draw {
                metric,
                path,
                message,
            } => write!(
                f,
                "failed to render chart for {metric:?} to {}: {message}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for RenderError {}

/// Render one bar chart per metric into `output_dir`.
///
/// Charts come out in the table's metric order; each saved path is confirmed
/// with an info event. Returns one `ChartFile` per chart for the run
/// manifest.
pub fn render_charts(
    table: &MetricTable,
    output_dir: &Path,
    options: &RenderOptions,
) -> Result<Vec<ChartFile>, RenderError> {
    let mut charts = Vec::new();
    for metric in table.metrics() {
        let series = table.series_for(metric);
        let file = format!("{metric}.png");
        let path = output_dir.join(&file);
        draw_bar_chart(&path, metric, &series, options).map_err(|e| RenderError::Draw {
            metric: metric.clone(),
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), bars = series.len(), "saved plot");
        charts.push(ChartFile {
            metric: metric.clone(),
            file,
            bars: series.len(),
        });
    }
    Ok(charts)
}

fn draw_bar_chart(
    path: &Path,
    metric: &str,
    series: &[(&str, f64)],
    options: &RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let names: Vec<&str> = series.iter().map(|(name, _)| *name).collect();
    let values: Vec<f64> = series.iter().map(|(_, value)| *value).collect();
    let (y_lo, y_hi) = y_axis_bounds(&values);
    let title = format!("{metric} across experiments");
    let (r, g, b) = options.bar_color;

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", options.title_size as f64))
        .margin(12)
        .x_label_area_size(x_label_area(&names, options))
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..names.len() as u32).into_segmented(), y_lo..y_hi)?;

    let tick_font = FontDesc::new(
        FontFamily::SansSerif,
        options.tick_size as f64,
        FontStyle::Normal,
    );
    let x_tick_font = if options.rotate_x_labels {
        tick_font.clone().transform(FontTransform::Rotate90)
    } else {
        tick_font.clone()
    };
    let x_formatter = |seg: &SegmentValue<u32>| -> String {
        let idx = match seg {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => *i as usize,
            SegmentValue::Last => return String::new(),
        };
        names.get(idx).map(|n| n.to_string()).unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&x_formatter)
        .x_label_style(x_tick_font)
        .y_label_style(tick_font)
        .y_desc(metric)
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(RGBColor(r, g, b).filled())
            .margin(8)
            .data(values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
    )?;

    root.present()?;
    Ok(())
}

/// Pixels reserved below the plot for x labels. Vertical labels need room
/// for the longest experiment name.
fn x_label_area(names: &[&str], options: &RenderOptions) -> u32 {
    if !options.rotate_x_labels {
        return options.tick_size * 2 + 10;
    }
    let longest = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) as u32;
    (24 + longest * options.tick_size * 3 / 5).min(options.height / 2)
}

/// Y-axis range for a bar series: always includes zero, with 10% of the
/// value span as headroom. An all-zero series gets a 0..1 axis.
fn y_axis_bounds(values: &[f64]) -> (f64, f64) {
    let mut lo = 0.0f64;
    let mut hi = 0.0f64;
    for v in values {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    let span = hi - lo;
    if span == 0.0 {
        return (0.0, 1.0);
    }
    let pad = span * 0.1;
    let bottom = if lo < 0.0 { lo - pad } else { 0.0 };
    let top = if hi > 0.0 { hi + pad } else { pad };
    (bottom, top)
}
