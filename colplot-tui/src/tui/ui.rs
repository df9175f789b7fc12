use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};
use crate::tui::app::{App, Focus, View};
use crate::tui::theme::{rgb, Theme};
use colplot_core::labels::format_general;
use colplot_core::plot::{Histogram1D, Histogram2D, Scatter, StatsBox};
use colplot_core::{Dimension, PlotKind, PlotObject};

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    render_topbar(frame, app, chunks[0], theme);
    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(app.sidebar_width), Constraint::Min(0)])
        .split(chunks[1]);
    render_sidebar(frame, app, mid[0], theme);
    match app.view {
        View::DataPreview => render_data_preview(frame, app, mid[1]),
        View::Plot | View::Help => render_canvas(frame, app, mid[1], theme),
    }
    render_bottombar(frame, app, chunks[2], theme);
    if app.view == View::Help { render_help(frame, app, area); }
}

fn render_topbar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let kind = match app.kind {
        PlotKind::Histogram => "[HIST]",
        PlotKind::Scatter => "[SCAT]",
    };
    let dim = match app.dimension {
        Dimension::One => "[1D]",
        Dimension::Two => "[2D]",
    };
    let line = Line::from(vec![
        Span::styled(kind, Style::default().fg(theme.success)),
        Span::styled(dim, Style::default().fg(theme.highlight)),
        Span::raw(format!(" {} | {} rows | {} columns", app.input_path, app.table.row_count(), app.column_count())),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    render_column_list(frame, app, lists[0], "X column", app.x_selected, app.focus == Focus::XList, true, theme);
    render_column_list(frame, app, lists[1], "Y column", app.y_selected, app.focus == Focus::YList, app.y_enabled(), theme);
}

#[allow(clippy::too_many_arguments)]
fn render_column_list(frame: &mut Frame, app: &App, area: Rect, title: &str, selected: usize, focused: bool, enabled: bool, theme: &Theme) {
    let title = if enabled { title.to_owned() } else { format!("{title} (1D)") };
    let border = if !enabled { Style::default().fg(theme.dim) } else if focused { Style::default().fg(theme.highlight) } else { Style::default() };
    let block = Block::default().borders(Borders::ALL).title(title).border_style(border);
    let name_width = (area.width as usize).saturating_sub(10).max(4);
    let items: Vec<ListItem> = app.summaries.iter().map(|s| {
        let count_color = if s.numeric == 0 { theme.error } else { theme.dim };
        ListItem::new(Line::from(vec![
            Span::raw(format!("{:<name_width$}", truncate(&s.label.display_name, name_width))),
            Span::styled(format!("{:>6}", s.numeric), Style::default().fg(count_color)),
        ]))
    }).collect();
    let mut state = ListState::default();
    if enabled && !items.is_empty() { state.select(Some(selected.min(items.len() - 1))); }
    let mut list = List::new(items).block(block).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    if !enabled { list = list.style(Style::default().fg(theme.dim)); }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_canvas(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let pool = app.orchestrator.pool();
    let titles: Vec<Line> = pool.iter().map(|s| Line::from(s.name().to_owned())).collect();
    let tabs = Tabs::new(titles)
        .select(app.canvas_tab)
        .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(format!("Canvases {}/{}", pool.len(), pool.capacity())));
    frame.render_widget(tabs, chunks[0]);

    let surface_title = app
        .selected_canvas()
        .and_then(|id| pool.get(id))
        .map(|s| format!("{} — {}", s.title, s.name()))
        .unwrap_or_else(|| "Plot".to_owned());
    let block = Block::default().borders(Borders::ALL).title(surface_title);
    let Some(retained) = app.displayed_plot() else {
        let msg = if pool.is_empty() { "Nothing plotted yet. Pick columns and press Enter." } else { "Blank surface." };
        frame.render_widget(Paragraph::new(msg).style(Style::default().fg(theme.dim)).block(block), chunks[1]);
        return;
    };
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);
    match &retained.plot {
        PlotObject::Histogram1D(h) => render_histogram_1d(frame, h, inner, theme),
        PlotObject::Histogram2D(h) => render_histogram_2d(frame, h, inner, theme),
        PlotObject::Scatter(s) => render_scatter(frame, s, inner, theme),
    }
    if let Some(stats) = retained.plot.stats_box() {
        render_stats_box(frame, stats, inner, theme);
    }
}

fn bounds(lo: f64, hi: f64) -> [f64; 2] {
    if hi > lo { [lo, hi] } else { [lo, lo + 1.0] }
}

fn axis_labels(b: [f64; 2], theme: &Theme) -> Vec<Span<'static>> {
    let style = Style::default().fg(theme.axis);
    [b[0], (b[0] + b[1]) / 2.0, b[1]].into_iter().map(|v| Span::styled(format_general(v), style)).collect()
}

fn render_histogram_1d(frame: &mut Frame, h: &Histogram1D, area: Rect, theme: &Theme) {
    let points: Vec<(f64, f64)> = h.counts.iter().enumerate().map(|(i, &c)| (h.bins.center(i), c as f64)).collect();
    let xb = bounds(h.bins.lower, h.bins.upper);
    let yb = bounds(0.0, h.max_count() as f64);
    let dataset = Dataset::default()
        .name(h.title.clone())
        .marker(symbols::Marker::HalfBlock)
        .graph_type(GraphType::Bar)
        .style(Style::default().fg(theme.bars))
        .data(&points);
    let chart = Chart::new(vec![dataset])
        .x_axis(Axis::default().title(h.x_title.clone()).bounds(xb).style(Style::default().fg(theme.axis)).labels(axis_labels(xb, theme)))
        .y_axis(Axis::default().title(h.y_title.clone()).bounds(yb).style(Style::default().fg(theme.axis)).labels(axis_labels(yb, theme)))
        .hidden_legend_constraints((Constraint::Ratio(0, 1), Constraint::Ratio(0, 1)));
    frame.render_widget(chart, area);
}

fn render_scatter(frame: &mut Frame, s: &Scatter, area: Rect, theme: &Theme) {
    let (xs, ys): (Vec<f64>, Vec<f64>) = s.points.iter().copied().unzip();
    let range = |v: &[f64]| v.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let (x_lo, x_hi) = if xs.is_empty() { (0.0, 1.0) } else { range(&xs) };
    let (y_lo, y_hi) = if ys.is_empty() { (0.0, 1.0) } else { range(&ys) };
    let xb = bounds(x_lo, x_hi);
    let yb = bounds(y_lo, y_hi);
    let dataset = Dataset::default()
        .name(s.series_name.clone())
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(rgb(s.marker.color)))
        .data(&s.points);
    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(Line::from(s.title.clone()).centered()))
        .x_axis(Axis::default().title(s.x_title.clone()).bounds(xb).style(Style::default().fg(theme.axis)).labels(axis_labels(xb, theme)))
        .y_axis(Axis::default().title(s.y_title.clone()).bounds(yb).style(Style::default().fg(theme.axis)).labels(axis_labels(yb, theme)));
    frame.render_widget(chart, area);
}

fn render_histogram_2d(frame: &mut Frame, h: &Histogram2D, area: Rect, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(2)])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(h.title.clone()).centered()), layout[0]);
    let grid = layout[1];
    let max = h.max_count().max(1) as f64;
    let lines: Vec<Line> = (0..grid.height).map(|row| {
        let cells: Vec<Span> = (0..grid.width).map(|col| {
            let (ix, iy) = grid_cell(col, row, grid, h.x_bins.count, h.y_bins.count);
            let count = h.count(ix, iy);
            let bg = if count == 0 { theme.bg } else { rgb(h.palette.color_at(count as f64 / max)) };
            Span::styled(" ", Style::default().bg(bg))
        }).collect();
        Line::from(cells)
    }).collect();
    frame.render_widget(Paragraph::new(lines), grid);
    let axis = vec![
        Line::from(Span::styled(
            format!("X: {} [{}, {}]", h.x_title, format_general(h.x_bins.lower), format_general(h.x_bins.upper)),
            Style::default().fg(theme.axis),
        )),
        Line::from(Span::styled(
            format!("Y: {} [{}, {}]", h.y_title, format_general(h.y_bins.lower), format_general(h.y_bins.upper)),
            Style::default().fg(theme.axis),
        )),
    ];
    frame.render_widget(Paragraph::new(axis), layout[2]);
}

/// Map a terminal cell of `grid` to `(ix, iy)` bins; row 0 is the top, i.e. the highest Y bin.
pub fn grid_cell(col: u16, row: u16, grid: Rect, nx: usize, ny: usize) -> (usize, usize) {
    let fx = col as f64 / grid.width.max(1) as f64;
    let fy = row as f64 / grid.height.max(1) as f64;
    let ix = ((fx * nx as f64) as usize).min(nx.saturating_sub(1));
    let from_top = ((fy * ny as f64) as usize).min(ny.saturating_sub(1));
    (ix, ny.saturating_sub(1) - from_top)
}

/// Terminal rectangle for a box given in normalized pad coordinates (origin bottom-left).
pub fn ndc_rect(area: Rect, stats: &StatsBox) -> Rect {
    let w = area.width as f64;
    let h = area.height as f64;
    let left = area.x + (stats.x1.clamp(0.0, 1.0) * w).round() as u16;
    let right = area.x + (stats.x2.clamp(0.0, 1.0) * w).round() as u16;
    let top = area.y + ((1.0 - stats.y2.clamp(0.0, 1.0)) * h).round() as u16;
    let bottom = area.y + ((1.0 - stats.y1.clamp(0.0, 1.0)) * h).round() as u16;
    Rect::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
}

/// Grow `rect` leftwards and downwards from its top-right corner until `lines` fit, staying inside `area`.
fn fit_text(rect: Rect, area: Rect, lines: &[String], border: bool) -> Rect {
    let pad = if border { 2 } else { 0 };
    let need_w = lines.iter().map(|l| l.chars().count() as u16).max().unwrap_or(0) + pad;
    let need_h = lines.len() as u16 + pad;
    let width = rect.width.max(need_w).min(area.width);
    let height = rect.height.max(need_h).min(area.height);
    let right = rect.x + rect.width;
    let x = right.saturating_sub(width).max(area.x);
    let y = rect.y.min((area.y + area.height).saturating_sub(height)).max(area.y);
    Rect::new(x, y, width, height)
}

fn render_stats_box(frame: &mut Frame, stats: &StatsBox, area: Rect, theme: &Theme) {
    let text: Vec<String> = stats.lines.iter().map(|l| format!("{:<8}{:>10}", l.label, l.value)).collect();
    if text.is_empty() { return; }
    let rect = fit_text(ndc_rect(area, stats), area, &text, stats.border);
    if !stats.transparent { frame.render_widget(Clear, rect); }
    let mut block = Block::default();
    if stats.border { block = block.borders(Borders::ALL).border_style(Style::default().fg(theme.axis)); }
    let lines: Vec<Line> = text.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines).style(Style::default().fg(theme.fg)).block(block), rect);
}

fn render_data_preview(frame: &mut Frame, app: &App, area: Rect) {
    if app.table.header.is_empty() {
        frame.render_widget(Paragraph::new("No data loaded.").block(Block::default().borders(Borders::ALL).title("Data Preview (D)")), area);
        return;
    }
    let vis_cols: Vec<&str> = app.table.header.iter().skip(app.preview_scroll_x).take(8).map(|h| h.as_str()).collect();
    let header = Row::new(vis_cols.iter().map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))));
    let rows: Vec<Row> = app.table.rows.iter()
        .take(app.config.display.max_rows_preview)
        .skip(app.preview_scroll_y)
        .take(area.height.saturating_sub(4) as usize)
        .map(|row| Row::new(row.iter().skip(app.preview_scroll_x).take(8).map(|v| Cell::from(truncate(v.as_deref().unwrap_or("∅"), 15)))))
        .collect();
    let widths: Vec<Constraint> = vis_cols.iter().map(|_| Constraint::Min(16)).collect();
    frame.render_widget(Table::new(rows, widths).header(header).block(Block::default().borders(Borders::ALL).title("Data Preview (D) — arrows scroll")), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Keybindings", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  q          Quit"),
        Line::from("  ?          Toggle help"),
        Line::from("  Tab        Switch X/Y list (2D only)"),
        Line::from("  j/k        Move selection"),
        Line::from("  t          Toggle histogram/scatter"),
        Line::from("  d          Toggle 1D/2D"),
        Line::from("  Enter      Draw plot on a new canvas"),
        Line::from("  h/l        Previous/next canvas"),
        Line::from("  c          Clear plot"),
        Line::from("  r          Reload style and binning from config"),
        Line::from("  [ ]        Sidebar width"),
        Line::from("  D          Data preview"),
        Line::from("  Esc        Back to plot"),
    ];
    let popup = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).scroll((app.help_scroll as u16, 0)).wrap(Wrap { trim: false }).block(Block::default().borders(Borders::ALL).title("Help (?)")),
        popup,
    );
}

fn render_bottombar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let color = if app.status_msg.starts_with("Error") { theme.error } else { theme.fg };
    let bar_text = format!(" {} | q:quit ?:help Enter:plot t d Tab h l D", app.status_msg);
    frame.render_widget(Paragraph::new(bar_text).style(Style::default().bg(theme.bg).fg(color)), area);
}

fn centered_rect(px: u16, py: u16, r: Rect) -> Rect {
    let v = Layout::default().direction(Direction::Vertical).constraints([Constraint::Percentage((100-py)/2), Constraint::Percentage(py), Constraint::Percentage((100-py)/2)]).split(r);
    Layout::default().direction(Direction::Horizontal).constraints([Constraint::Percentage((100-px)/2), Constraint::Percentage(px), Constraint::Percentage((100-px)/2)]).split(v[1])[1]
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_owned() } else { format!("{}\u{2026}", s.chars().take(max.saturating_sub(1)).collect::<String>()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colplot_common::Margins;

    #[test]
    fn stats_box_maps_to_top_right() {
        let sb = StatsBox::placed(&Margins::default(), Vec::new());
        assert_eq!(ndc_rect(Rect::new(0, 0, 100, 40), &sb), Rect::new(70, 4, 20, 8));
        assert_eq!(ndc_rect(Rect::new(10, 5, 100, 40), &sb), Rect::new(80, 9, 20, 8));
    }

    #[test]
    fn fit_text_keeps_top_right_anchor() {
        let area = Rect::new(0, 0, 100, 40);
        let lines = vec!["x".repeat(30)];
        let r = fit_text(Rect::new(70, 4, 20, 8), area, &lines, true);
        assert_eq!((r.x + r.width, r.y), (90, 4));
        assert_eq!(r.width, 32);
    }

    #[test]
    fn grid_top_row_is_highest_y_bin() {
        let grid = Rect::new(0, 0, 10, 5);
        assert_eq!(grid_cell(0, 0, grid, 10, 5), (0, 4));
        assert_eq!(grid_cell(9, 4, grid, 10, 5), (9, 0));
        assert_eq!(grid_cell(5, 2, grid, 2, 1), (1, 0));
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate("ab", 4), "ab");
    }
}
