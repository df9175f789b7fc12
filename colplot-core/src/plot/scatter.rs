use crate::style::{MarkerStyle, RenderStyle};
use crate::table::NumericColumn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatterMode {
    /// `(row index, x)` points; used when no usable Y column was given.
    Index,
    /// `(x, y)` pairs.
    Paired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scatter {
    pub title: String,
    pub series_name: String,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<(f64, f64)>,
    pub mode: ScatterMode,
    pub marker: MarkerStyle,
}

pub fn build_scatter(x: &NumericColumn, y: Option<&NumericColumn>, style: &RenderStyle) -> Scatter {
    let scatter = match y {
        Some(y) if y.len() == x.len() => Scatter {
            title: "2D Scatter Plot".into(),
            series_name: format!("{} vs {}", x.name, y.name),
            x_title: x.name.clone(),
            y_title: y.name.clone(),
            points: x.values.iter().copied().zip(y.values.iter().copied()).collect(),
            mode: ScatterMode::Paired,
            marker: style.paired_marker_style(),
        },
        _ => Scatter {
            title: x.name.clone(),
            series_name: x.name.clone(),
            x_title: "Index".into(),
            y_title: x.name.clone(),
            points: x.values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect(),
            mode: ScatterMode::Index,
            marker: style.index_marker_style(),
        },
    };
    tracing::debug!(points = scatter.points.len(), mode = ?scatter.mode, "built scatter");
    scatter
}
