use colplot_common::Margins;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub label: String,
    pub value: String,
}

/// Statistics box in normalized pad coordinates (0..1, origin bottom-left).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub transparent: bool,
    pub border: bool,
    pub text_size: f64,
    pub lines: Vec<StatLine>,
}

impl StatsBox {
    /// Upper-right corner of the frame, a quarter of the frame wide and tall.
    pub fn placed(margins: &Margins, lines: Vec<StatLine>) -> Self {
        let right = 1.0 - margins.right;
        let top = 1.0 - margins.top;
        let width = 0.25 * (1.0 - margins.left - margins.right);
        let height = 0.25 * (1.0 - margins.top - margins.bottom);
        Self {
            x1: right - width,
            y1: top - height,
            x2: right,
            y2: top,
            transparent: true,
            border: true,
            text_size: 0.03,
            lines,
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}
