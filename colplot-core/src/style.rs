use colplot_common::StyleConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);

    /// Accepts "#rrggbb" or "rrggbb".
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let c = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(c(0)?, c(2)?, c(4)?))
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    Rainbow,
    Viridis,
    Grayscale,
}

const RAINBOW: [Rgb; 6] = [
    Rgb(64, 0, 128),
    Rgb(0, 0, 255),
    Rgb(0, 200, 255),
    Rgb(0, 220, 0),
    Rgb(255, 220, 0),
    Rgb(255, 0, 0),
];

const VIRIDIS: [Rgb; 5] = [
    Rgb(68, 1, 84),
    Rgb(59, 82, 139),
    Rgb(33, 145, 140),
    Rgb(94, 201, 98),
    Rgb(253, 231, 37),
];

impl Palette {
    pub fn from_name(name: &str) -> Self {
        match name {
            "viridis" => Self::Viridis,
            "grayscale" | "gray" => Self::Grayscale,
            _ => Self::Rainbow,
        }
    }

    /// Colour for `t` in [0, 1]; out-of-range input is clamped.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Rainbow => sample_stops(&RAINBOW, t),
            Self::Viridis => sample_stops(&VIRIDIS, t),
            Self::Grayscale => {
                let v = (t * 255.0).round() as u8;
                Rgb(v, v, v)
            }
        }
    }
}

fn sample_stops(stops: &[Rgb], t: f64) -> Rgb {
    let pos = t * (stops.len() - 1) as f64;
    let i = (pos.floor() as usize).min(stops.len() - 2);
    Rgb::lerp(stops[i], stops[i + 1], pos - i as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatField {
    Name,
    Entries,
    Mean,
    StdDev,
}

impl StatField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "entries" => Some(Self::Entries),
            "mean" => Some(Self::Mean),
            "std_dev" | "stddev" | "rms" => Some(Self::StdDev),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    FilledCircle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub color: Rgb,
}

/// Rendering defaults handed to every builder call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub stat_fields: Vec<StatField>,
    pub palette: Palette,
    pub index_marker: Rgb,
    pub paired_marker: Rgb,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            stat_fields: vec![StatField::Entries, StatField::Mean, StatField::StdDev],
            palette: Palette::Rainbow,
            index_marker: Rgb::BLUE,
            paired_marker: Rgb::RED,
        }
    }
}

impl RenderStyle {
    pub fn from_config(cfg: &StyleConfig) -> Self {
        let defaults = Self::default();
        let stat_fields = cfg
            .stat_fields
            .iter()
            .filter_map(|f| {
                let parsed = StatField::parse(f);
                if parsed.is_none() {
                    tracing::warn!(field = %f, "unknown statistics field ignored");
                }
                parsed
            })
            .collect();
        Self {
            stat_fields,
            palette: Palette::from_name(&cfg.palette),
            index_marker: Rgb::parse_hex(&cfg.index_marker_color).unwrap_or(defaults.index_marker),
            paired_marker: Rgb::parse_hex(&cfg.paired_marker_color).unwrap_or(defaults.paired_marker),
        }
    }

    pub fn index_marker_style(&self) -> MarkerStyle {
        MarkerStyle { shape: MarkerShape::FilledCircle, color: self.index_marker }
    }

    pub fn paired_marker_style(&self) -> MarkerStyle {
        MarkerStyle { shape: MarkerShape::FilledCircle, color: self.paired_marker }
    }
}
