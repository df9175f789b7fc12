pub mod binning;
pub mod canvas;
pub mod labels;
pub mod orchestrator;
pub mod plot;
pub mod quantile;
pub mod scanner;
pub mod source;
pub mod style;
pub mod table;

pub use binning::{bin_width, freedman_diaconis, nice_ceil, nice_round, BinSpec, BinningPolicy};
pub use canvas::{Acquisition, CanvasPool, Surface, SurfaceGeometry, SurfaceId};
pub use colplot_common::{ColplotError, Result};
pub use labels::{extract_unit, format_label, AxisLabel};
pub use orchestrator::{PlotOrchestrator, PlotRequest, RetainedPlot};
pub use plot::{Dimension, PlotKind, PlotObject, PlotObjectKind};
pub use quantile::{interquartile_range, quantile};
pub use scanner::{resolve_paths, SourceFormat, SourcePath};
pub use source::{load_path, load_table};
pub use style::{Palette, RenderStyle, Rgb, StatField};
pub use table::{parse_numeric, NumericColumn, Table};
