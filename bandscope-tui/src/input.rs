//! Key dispatch: overlays first, then global keys, then the active panel.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};

const PAGE: u16 = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays capture all input.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            app.welcome_dismissed = true;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::OpenFile => {
            handle_open_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(panel) = c.to_digit(10).and_then(|d| Panel::from_index(d as usize - 1)) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            app.active_panel = app.active_panel.next();
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('?') => {
            app.active_panel = Panel::Help;
            return;
        }
        KeyCode::Char('o') => {
            app.begin_open();
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('j') => {
            app.cycle_symbol(true);
            return;
        }
        KeyCode::Char('k') => {
            app.cycle_symbol(false);
            return;
        }
        KeyCode::Char('l') => {
            app.cycle_category(true);
            return;
        }
        KeyCode::Char('h') => {
            app.cycle_category(false);
            return;
        }
        KeyCode::Char(']') => {
            app.cycle_year(true);
            return;
        }
        KeyCode::Char('[') => {
            app.cycle_year(false);
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    if app.active_panel == Panel::Data {
        handle_data_key(app, key);
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_open_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.path_input.clear();
        }
        KeyCode::Enter => app.submit_path(),
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.path_input.clear();
        }
        KeyCode::Char(c) => {
            app.path_input.push(c);
        }
        _ => {}
    }
}

/// Arrow and page keys scroll the validation report.
fn handle_data_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Down => app.report_scroll = app.report_scroll.saturating_add(1),
        KeyCode::Up => app.report_scroll = app.report_scroll.saturating_sub(1),
        KeyCode::PageDown => app.report_scroll = app.report_scroll.saturating_add(PAGE),
        KeyCode::PageUp => app.report_scroll = app.report_scroll.saturating_sub(PAGE),
        KeyCode::Home => app.report_scroll = 0,
        _ => {}
    }
}
