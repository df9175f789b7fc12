use crate::tui::app::{App, View};
use colplot_common::Config;
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            if app.view == View::Help {
                app.view = View::Plot;
                app.help_scroll = 0;
            } else {
                app.view = View::Help;
            }
            return;
        }
        KeyCode::Char('j') if app.view == View::Help => {
            app.help_scroll += 1;
            return;
        }
        KeyCode::Char('k') if app.view == View::Help => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
            return;
        }
        KeyCode::Esc => {
            app.view = View::Plot;
            return;
        }
        _ => {}
    }
    match app.view {
        View::DataPreview => handle_preview(app, key),
        _ => handle_plot(app, key),
    }
}

fn handle_plot(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.selection_down(),
        KeyCode::Char('k') | KeyCode::Up => app.selection_up(),
        KeyCode::PageDown => {
            for _ in 0..10 {
                app.selection_down();
            }
        }
        KeyCode::PageUp => {
            for _ in 0..10 {
                app.selection_up();
            }
        }
        KeyCode::Char('t') => app.toggle_kind(),
        KeyCode::Char('d') => app.toggle_dimension(),
        KeyCode::Enter | KeyCode::Char(' ') => app.draw_plot(),
        KeyCode::Char('l') | KeyCode::Right => app.next_canvas(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_canvas(),
        KeyCode::Char('r') => match Config::load() {
            Ok(config) => app.reload_config(config),
            Err(e) => {
                tracing::warn!(error = %e, "config reload failed");
                app.status_msg = format!("Error: {e}");
            }
        },
        KeyCode::Char('c') => {
            app.orchestrator.clear();
            app.status_msg = "Plot cleared".into();
        }
        KeyCode::Char('[') => {
            app.sidebar_width = app.sidebar_width.saturating_sub(1).max(15);
        }
        KeyCode::Char(']') => {
            app.sidebar_width = (app.sidebar_width + 1).min(60);
        }
        KeyCode::Char('D') => {
            app.view = View::DataPreview;
            app.preview_scroll_x = 0;
            app.preview_scroll_y = 0;
        }
        _ => {}
    }
}

fn handle_preview(app: &mut App, key: KeyEvent) {
    let max_rows = app.table.row_count().min(app.config.display.max_rows_preview);
    match key.code {
        KeyCode::Char('D') => app.view = View::Plot,
        KeyCode::Char('j') | KeyCode::Down => {
            if app.preview_scroll_y + 1 < max_rows {
                app.preview_scroll_y += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.preview_scroll_y = app.preview_scroll_y.saturating_sub(1);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.preview_scroll_x + 1 < app.column_count() {
                app.preview_scroll_x += 1;
            }
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.preview_scroll_x = app.preview_scroll_x.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Focus;
    use colplot_core::{Dimension, PlotKind, Table};
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        let table = Table::from_strings(&["a", "b"], &[vec!["1", "2"], vec!["3", "4"]]);
        App::new("t.csv".into(), table, Config::default())
    }

    #[test]
    fn toggles_and_draws() {
        let mut a = app();
        press(&mut a, KeyCode::Char('t'));
        press(&mut a, KeyCode::Char('d'));
        assert_eq!((a.kind, a.dimension), (PlotKind::Scatter, Dimension::Two));
        press(&mut a, KeyCode::Tab);
        press(&mut a, KeyCode::Down);
        assert_eq!((a.focus, a.y_selected), (Focus::YList, 1));
        press(&mut a, KeyCode::Enter);
        assert!(a.orchestrator.current().is_some());
        press(&mut a, KeyCode::Char('c'));
        assert!(a.orchestrator.current().is_none());
    }

    #[test]
    fn preview_scroll_is_bounded() {
        let mut a = app();
        press(&mut a, KeyCode::Char('D'));
        assert_eq!(a.view, View::DataPreview);
        for _ in 0..5 { press(&mut a, KeyCode::Down); press(&mut a, KeyCode::Right); }
        assert_eq!((a.preview_scroll_y, a.preview_scroll_x), (1, 1));
        press(&mut a, KeyCode::Esc);
        assert_eq!(a.view, View::Plot);
    }

    #[test]
    fn quit_and_help() {
        let mut a = app();
        press(&mut a, KeyCode::Char('?'));
        assert_eq!(a.view, View::Help);
        press(&mut a, KeyCode::Char('?'));
        assert_eq!(a.view, View::Plot);
        press(&mut a, KeyCode::Char('q'));
        assert!(a.should_quit);
    }
}
