use super::overlay::{StatLine, StatsBox};
use super::PlotObject;
use crate::binning::{BinSpec, BinningPolicy};
use crate::labels::{entries_title, format_label, format_significant, AxisLabel};
use crate::style::{Palette, RenderStyle, StatField};
use crate::table::NumericColumn;
use colplot_common::Margins;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMoments {
    pub mean: f64,
    pub std_dev: f64, // population
}

impl AxisMoments {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { mean: 0.0, std_dev: 0.0 };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self { mean, std_dev: var.sqrt() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    pub name: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bins: BinSpec,
    pub counts: Vec<u64>,
    pub entries: u64,
    pub moments: AxisMoments,
    pub stats_box: StatsBox,
}

impl Histogram1D {
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram2D {
    pub name: String,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub x_bins: BinSpec,
    pub y_bins: BinSpec,
    pub counts: Vec<u64>, // row-major: counts[iy * nx + ix]
    pub entries: u64,
    pub x_moments: AxisMoments,
    pub y_moments: AxisMoments,
    pub palette: Palette,
    pub stats_box: StatsBox,
}

impl Histogram2D {
    pub fn count(&self, ix: usize, iy: usize) -> u64 {
        if ix >= self.x_bins.count || iy >= self.y_bins.count {
            return 0;
        }
        self.counts[iy * self.x_bins.count + ix]
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

fn stat_value(v: f64) -> String {
    format_significant(v, 4)
}

pub fn build_histogram_1d(
    x: &NumericColumn,
    policy: &BinningPolicy,
    style: &RenderStyle,
    margins: &Margins,
) -> Histogram1D {
    let label = AxisLabel::from_column(&x.name);
    let bins = BinSpec::for_sample(&x.values, policy);
    let mut counts = vec![0u64; bins.count];
    for &v in &x.values {
        if let Some(idx) = bins.index_of(v) {
            counts[idx] += 1;
        }
    }
    let entries = x.values.len() as u64;
    let moments = AxisMoments::of(&x.values);
    let mut lines = Vec::new();
    for field in &style.stat_fields {
        match field {
            StatField::Name => lines.push(StatLine { label: "Name".into(), value: x.name.clone() }),
            StatField::Entries => lines.push(StatLine { label: "Entries".into(), value: entries.to_string() }),
            StatField::Mean => lines.push(StatLine { label: "Mean".into(), value: stat_value(moments.mean) }),
            StatField::StdDev => lines.push(StatLine { label: "Std Dev".into(), value: stat_value(moments.std_dev) }),
        }
    }
    tracing::debug!(column = %x.name, width = bins.width, bins = bins.count, entries, "built 1D histogram");
    Histogram1D {
        name: x.name.clone(),
        title: label.display_name.clone(),
        x_title: label.display_name,
        y_title: entries_title(&label.unit, bins.width),
        bins,
        counts,
        entries,
        moments,
        stats_box: StatsBox::placed(margins, lines),
    }
}

/// 2D frequency grid when `y` is present and length-matched with `x`; otherwise the 1D histogram of `x`.
pub fn build_histogram_2d(
    x: &NumericColumn,
    y: Option<&NumericColumn>,
    policy: &BinningPolicy,
    style: &RenderStyle,
    margins: &Margins,
) -> PlotObject {
    let y = match y {
        Some(y) if y.len() == x.len() => y,
        other => {
            tracing::debug!(
                x = x.len(),
                y = other.map(|c| c.len()),
                "y column unusable, falling back to 1D histogram"
            );
            return PlotObject::Histogram1D(build_histogram_1d(x, policy, style, margins));
        }
    };
    let x_label = format_label(&x.name);
    let y_label = format_label(&y.name);
    let (x_bins, y_bins) = BinSpec::for_grid(&x.values, &y.values, policy);
    let mut counts = vec![0u64; x_bins.count * y_bins.count];
    for (&xv, &yv) in x.values.iter().zip(&y.values) {
        if let (Some(ix), Some(iy)) = (x_bins.index_of(xv), y_bins.index_of(yv)) {
            counts[iy * x_bins.count + ix] += 1;
        }
    }
    let entries = x.values.len() as u64;
    let x_moments = AxisMoments::of(&x.values);
    let y_moments = AxisMoments::of(&y.values);
    let mut lines = Vec::new();
    for field in &style.stat_fields {
        match field {
            StatField::Name => lines.push(StatLine { label: "Name".into(), value: format!("{} vs {}", x.name, y.name) }),
            StatField::Entries => lines.push(StatLine { label: "Entries".into(), value: entries.to_string() }),
            StatField::Mean => {
                lines.push(StatLine { label: "Mean x".into(), value: stat_value(x_moments.mean) });
                lines.push(StatLine { label: "Mean y".into(), value: stat_value(y_moments.mean) });
            }
            StatField::StdDev => {
                lines.push(StatLine { label: "Std Dev x".into(), value: stat_value(x_moments.std_dev) });
                lines.push(StatLine { label: "Std Dev y".into(), value: stat_value(y_moments.std_dev) });
            }
        }
    }
    tracing::debug!(nx = x_bins.count, ny = y_bins.count, entries, "built 2D histogram");
    PlotObject::Histogram2D(Histogram2D {
        name: format!("{}:{}", x.name, y.name),
        title: format!("2D Histogram of {x_label} vs {y_label}"),
        x_title: x_label,
        y_title: y_label,
        x_bins,
        y_bins,
        counts,
        entries,
        x_moments,
        y_moments,
        palette: style.palette,
        stats_box: StatsBox::placed(margins, lines),
    })
}
