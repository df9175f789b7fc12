use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_max_rows")]
    pub max_rows_preview: usize,
    #[serde(default)]
    pub sidebar_width: Option<u16>, // falls back to 30 when None
}

fn default_theme() -> String {
    "dark".into()
}
fn default_max_rows() -> usize {
    100
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            max_rows_preview: default_max_rows(),
            sidebar_width: None,
        }
    }
}

/// Pad margins as fractions of the surface, matching the usual 10% frame inset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default = "default_margin")]
    pub left: f64,
    #[serde(default = "default_margin")]
    pub right: f64,
    #[serde(default = "default_margin")]
    pub top: f64,
    #[serde(default = "default_margin")]
    pub bottom: f64,
}

fn default_margin() -> f64 {
    0.1
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: default_margin(),
            right: default_margin(),
            top: default_margin(),
            bottom: default_margin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_max_canvases")]
    pub max_canvases: usize,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default = "default_bin_width")]
    pub default_bin_width: f64,
    #[serde(default = "default_bin_count")]
    pub default_bin_count: usize,
    #[serde(default = "default_max_bin_count")]
    pub max_bin_count: usize,
    /// Upper bound on `nx * ny` for 2D histograms.
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
    #[serde(default)]
    pub margins: Margins,
}

fn default_max_canvases() -> usize {
    3
}
fn default_canvas_width() -> u32 {
    800
}
fn default_canvas_height() -> u32 {
    600
}
fn default_bin_width() -> f64 {
    1.0
}
fn default_bin_count() -> usize {
    10
}
fn default_max_bin_count() -> usize {
    100_000
}
fn default_max_cells() -> usize {
    1_000_000
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            max_canvases: default_max_canvases(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            default_bin_width: default_bin_width(),
            default_bin_count: default_bin_count(),
            max_bin_count: default_max_bin_count(),
            max_cells: default_max_cells(),
            margins: Margins::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_palette")]
    pub palette: String,
    #[serde(default = "default_stat_fields")]
    pub stat_fields: Vec<String>,
    #[serde(default = "default_index_color")]
    pub index_marker_color: String,
    #[serde(default = "default_paired_color")]
    pub paired_marker_color: String,
}

fn default_palette() -> String {
    "rainbow".into()
}
fn default_stat_fields() -> Vec<String> {
    vec!["entries".into(), "mean".into(), "std_dev".into()]
}
fn default_index_color() -> String {
    "#0000ff".into()
}
fn default_paired_color() -> String {
    "#ff0000".into()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            stat_fields: default_stat_fields(),
            index_marker_color: default_index_color(),
            paired_marker_color: default_paired_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: char,
    #[serde(default = "default_true")]
    pub csv_has_header: bool,
    #[serde(default = "default_infer_rows")]
    pub infer_rows: usize,
    #[serde(default)]
    pub max_rows: Option<usize>, // None loads everything
}

fn default_delimiter() -> char {
    ','
}
fn default_true() -> bool {
    true
}
fn default_infer_rows() -> usize {
    1000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_delimiter: default_delimiter(),
            csv_has_header: true,
            infer_rows: default_infer_rows(),
            max_rows: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("colplot")
            .join("config.toml")
    }

    pub fn load() -> crate::Result<Self> {
        let path = if let Ok(env_path) = std::env::var("COLPLOT_CONFIG") {
            PathBuf::from(env_path) // $COLPLOT_CONFIG overrides default config path
        } else {
            Self::config_path()
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let cfg: Self =
            toml::from_str(content).map_err(|e| crate::ColplotError::Config(e.to_string()))?;
        if cfg.plot.default_bin_width <= 0.0 || !cfg.plot.default_bin_width.is_finite() {
            return Err(crate::ColplotError::Config(format!(
                "plot.default_bin_width must be positive, got {}",
                cfg.plot.default_bin_width
            )));
        }
        Ok(cfg)
    }

    pub fn save(&self) -> crate::Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::ColplotError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}
