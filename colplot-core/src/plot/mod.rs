pub mod histogram;
pub mod overlay;
pub mod scatter;

pub use histogram::{build_histogram_1d, build_histogram_2d, AxisMoments, Histogram1D, Histogram2D};
pub use overlay::{StatLine, StatsBox};
pub use scatter::{build_scatter, Scatter, ScatterMode};

use serde::{Deserialize, Serialize};

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotKind {
    Histogram,
    Scatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    One,
    Two,
}

/// What was actually built; a 2D request may come back as its 1D variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotObjectKind {
    Histogram1D,
    Histogram2D,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotObject {
    Histogram1D(Histogram1D),
    Histogram2D(Histogram2D),
    Scatter(Scatter),
}

impl PlotObject {
    pub fn kind(&self) -> PlotObjectKind {
        match self {
            Self::Histogram1D(_) => PlotObjectKind::Histogram1D,
            Self::Histogram2D(_) => PlotObjectKind::Histogram2D,
            Self::Scatter(_) => PlotObjectKind::Scatter,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Histogram1D(h) => &h.title,
            Self::Histogram2D(h) => &h.title,
            Self::Scatter(s) => &s.title,
        }
    }

    pub fn stats_box(&self) -> Option<&StatsBox> {
        match self {
            Self::Histogram1D(h) => Some(&h.stats_box),
            Self::Histogram2D(h) => Some(&h.stats_box),
            Self::Scatter(_) => None,
        }
    }
}
