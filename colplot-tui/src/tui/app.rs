use crate::tui::session::Session;
use crate::tui::theme::Theme;
use colplot_common::Config;
use colplot_core::{
    AxisLabel, BinningPolicy, Dimension, NumericColumn, PlotKind, PlotOrchestrator, PlotRequest, RenderStyle,
    RetainedPlot, SurfaceId, Table,
};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Plot,
    DataPreview,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    XList,
    YList,
}

/// Per-column facts shown in the sidebar lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub label: AxisLabel,
    pub numeric: usize,
}

pub struct App {
    pub input_path: String,
    pub table: Table,
    pub summaries: Vec<ColumnSummary>,
    pub orchestrator: PlotOrchestrator,
    pub x_selected: usize,
    pub y_selected: usize,
    pub kind: PlotKind,
    pub dimension: Dimension,
    pub view: View,
    pub focus: Focus,
    pub canvas_tab: usize, // index into the pool's surfaces, oldest first
    pub preview_scroll_x: usize,
    pub preview_scroll_y: usize,
    pub help_scroll: usize,
    pub status_msg: String,
    pub should_quit: bool,
    pub sidebar_width: u16, // clamped 15..=60
    pub theme: Theme,
    pub config: Config,
}

impl App {
    pub fn new(input_path: String, table: Table, config: Config) -> Self {
        let summaries = summarize_columns(&table);
        Self {
            input_path,
            table,
            summaries,
            orchestrator: PlotOrchestrator::from_config(&config),
            x_selected: 0,
            y_selected: 0,
            kind: PlotKind::Histogram,
            dimension: Dimension::One,
            view: View::Plot,
            focus: Focus::XList,
            canvas_tab: 0,
            preview_scroll_x: 0,
            preview_scroll_y: 0,
            help_scroll: 0,
            status_msg: String::from("Ready — Enter:plot ?:help q:quit"),
            should_quit: false,
            sidebar_width: config.display.sidebar_width.unwrap_or(30).clamp(15, 60),
            theme: Theme::from_name(&config.display.theme),
            config,
        }
    }

    pub fn column_count(&self) -> usize {
        self.table.column_count()
    }

    /// The Y list only takes part in 2D requests.
    pub fn y_enabled(&self) -> bool {
        self.dimension == Dimension::Two
    }

    pub fn selection_down(&mut self) {
        let max = self.column_count().saturating_sub(1);
        let sel = match self.focus {
            Focus::XList => &mut self.x_selected,
            Focus::YList => &mut self.y_selected,
        };
        if *sel < max {
            *sel += 1;
        }
    }

    pub fn selection_up(&mut self) {
        let sel = match self.focus {
            Focus::XList => &mut self.x_selected,
            Focus::YList => &mut self.y_selected,
        };
        *sel = sel.saturating_sub(1);
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::XList if self.y_enabled() => Focus::YList,
            _ => Focus::XList,
        };
    }

    pub fn toggle_kind(&mut self) {
        self.kind = match self.kind {
            PlotKind::Histogram => PlotKind::Scatter,
            PlotKind::Scatter => PlotKind::Histogram,
        };
    }

    pub fn toggle_dimension(&mut self) {
        self.dimension = match self.dimension {
            Dimension::One => Dimension::Two,
            Dimension::Two => Dimension::One,
        };
        if !self.y_enabled() {
            self.focus = Focus::XList;
        }
    }

    pub fn request(&self) -> PlotRequest {
        PlotRequest {
            x_index: self.x_selected,
            y_index: self.y_enabled().then_some(self.y_selected),
            kind: self.kind,
            dimension: self.dimension,
        }
    }

    pub fn draw_plot(&mut self) {
        let request = self.request();
        match self.orchestrator.plot(&self.table, &request) {
            Ok(retained) => {
                let dropped = match retained.y_dropped {
                    Some(y) => format!("{} / {} rows skipped", retained.x_dropped, y),
                    None => format!("{} rows skipped", retained.x_dropped),
                };
                self.status_msg = format!("{} {} — {}", retained.surface, retained.plot.title(), dropped);
                self.canvas_tab = self.orchestrator.pool().len().saturating_sub(1);
            }
            Err(e) => {
                tracing::warn!(error = %e, "plot rejected");
                self.status_msg = format!("Error: {e}");
            }
        }
    }

    /// Apply the style and binning sections of a freshly read config. Surfaces are kept.
    pub fn reload_config(&mut self, config: Config) {
        self.orchestrator.set_style(RenderStyle::from_config(&config.style));
        self.orchestrator.set_policy(BinningPolicy::from_config(&config.plot));
        self.theme = Theme::from_name(&config.display.theme);
        self.config = config;
        let style = self.orchestrator.style();
        let policy = self.orchestrator.policy();
        self.status_msg = format!(
            "Config reloaded: {:?} palette, {} stat fields, default width {}, max {} bins",
            style.palette,
            style.stat_fields.len(),
            policy.default_width,
            policy.max_count
        );
    }

    pub fn canvas_ids(&self) -> Vec<SurfaceId> {
        self.orchestrator.pool().ids()
    }

    pub fn next_canvas(&mut self) {
        let n = self.orchestrator.pool().len();
        if n > 0 {
            self.canvas_tab = (self.canvas_tab + 1) % n;
        }
    }

    pub fn prev_canvas(&mut self) {
        let n = self.orchestrator.pool().len();
        if n > 0 {
            self.canvas_tab = (self.canvas_tab + n - 1) % n;
        }
    }

    pub fn selected_canvas(&self) -> Option<SurfaceId> {
        self.canvas_ids().get(self.canvas_tab).copied()
    }

    /// The retained plot, if it lives on the selected tab. Older surfaces have nothing to show.
    pub fn displayed_plot(&self) -> Option<&RetainedPlot> {
        let selected = self.selected_canvas()?;
        self.orchestrator.current().filter(|r| r.surface == selected)
    }

    pub fn to_session(&self) -> Session {
        Session {
            input_path: self.input_path.clone(),
            x_selected: self.x_selected,
            y_selected: self.y_selected,
            kind: self.kind,
            dimension: self.dimension,
            sidebar_width: Some(self.sidebar_width),
        }
    }

    pub fn restore_from_session(&mut self, s: &Session) {
        if s.input_path != self.input_path {
            return;
        }
        let max = self.column_count().saturating_sub(1);
        self.x_selected = s.x_selected.min(max);
        self.y_selected = s.y_selected.min(max);
        self.kind = s.kind;
        self.dimension = s.dimension;
        if let Some(w) = s.sidebar_width {
            self.sidebar_width = w.clamp(15, 60);
        }
    }
}

pub fn summarize_columns(table: &Table) -> Vec<ColumnSummary> {
    (0..table.column_count())
        .map(|i| {
            let name = table.header[i].clone();
            ColumnSummary {
                label: AxisLabel::from_column(&name),
                numeric: NumericColumn::extract(table, i).len(),
                name,
            }
        })
        .collect()
}
