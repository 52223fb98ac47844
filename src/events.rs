use crate::app::{App, InputMode};
use crate::import::DialogField;
use crate::table::PAGE_SIZE_OPTIONS;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

/// How the loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Redirect(String),
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<Exit> {
    // Access is decided once, before anything is drawn
    if !app.check_access() {
        let route = app.redirect.clone().unwrap_or_default();
        return Ok(Exit::Redirect(route));
    }

    app.mount();
    app.refresh_requirements(app.session.user_id.clone(), app.session.org_id.clone());

    let mut last_spinner_tick = Instant::now();
    let spinner_interval = Duration::from_millis(80);

    loop {
        // Tick spinner while something is in flight
        if app.is_busy() && last_spinner_tick.elapsed() >= spinner_interval {
            app.tick_spinner();
            last_spinner_tick = Instant::now();
        }

        // Apply finished background requests (non-blocking)
        app.poll_backend();

        // Clear notifications after the configured timeout
        app.clear_expired_status();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with short timeout for responsive UI
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) {
                    return Ok(Exit::Quit);
                }
            }
        }
    }
}

/// Apply one key press. Returns true when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),

        InputMode::Help => {
            if matches!(key.code, KeyCode::Esc) || key.code == KeyCode::Char(app.config.keybindings.help) {
                app.input_mode = InputMode::Normal;
            }
        }

        InputMode::PageSizeSelect => {
            let (down, up) = (app.config.keybindings.down, app.config.keybindings.up);
            match key.code {
                KeyCode::Esc => app.input_mode = InputMode::Normal,
                KeyCode::Down => app.dropdown_next(PAGE_SIZE_OPTIONS.len()),
                KeyCode::Up => app.dropdown_prev(PAGE_SIZE_OPTIONS.len()),
                KeyCode::Char(c) if c == down => app.dropdown_next(PAGE_SIZE_OPTIONS.len()),
                KeyCode::Char(c) if c == up => app.dropdown_prev(PAGE_SIZE_OPTIONS.len()),
                KeyCode::Enter => app.confirm_page_size(),
                _ => {}
            }
        }

        InputMode::ImportDialog => handle_dialog_key(app, key),

        InputMode::ProjectSelect => {
            let len = app.filtered_projects().len();
            match key.code {
                KeyCode::Enter => app.confirm_project(),
                _ => handle_dropdown_filter_key(app, key, len),
            }
        }

        InputMode::RequirementSelect => {
            let len = app.filtered_requirements().len();
            match key.code {
                KeyCode::Enter => app.confirm_requirement(),
                _ => handle_dropdown_filter_key(app, key, len),
            }
        }
    }

    false
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Clear status on any keypress
    app.clear_status();

    let keys = app.config.keybindings.clone();
    match key.code {
        KeyCode::Down => app.table.cursor_down(),
        KeyCode::Up => app.table.cursor_up(),
        KeyCode::Left => app.table.prev_page(),
        KeyCode::Right => app.table.next_page(),
        KeyCode::Enter => app.table.toggle_cursor_row(),
        KeyCode::Char(c) => {
            if c == keys.quit {
                return true;
            } else if c == keys.down {
                app.table.cursor_down();
            } else if c == keys.up {
                app.table.cursor_up();
            } else if c == keys.prev_page {
                app.table.prev_page();
            } else if c == keys.next_page {
                app.table.next_page();
            } else if c == keys.toggle_row {
                app.table.toggle_cursor_row();
            } else if c == keys.toggle_all {
                app.table.toggle_all();
            } else if c == keys.sort {
                app.toggle_sort();
            } else if c == keys.page_size {
                app.open_page_size_select();
            } else if c == keys.import {
                app.open_import();
            } else if c == keys.reload {
                if !app.table.is_loading() {
                    app.mount();
                }
            } else if c == keys.help {
                app.input_mode = InputMode::Help;
            }
        }
        _ => {}
    }
    false
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    let Some(dialog) = app.dialog.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
        }
        KeyCode::Tab | KeyCode::Down => dialog.focus = dialog.focus.next(),
        KeyCode::BackTab | KeyCode::Up => dialog.focus = dialog.focus.prev(),
        KeyCode::Enter => {
            let focus = dialog.focus;
            match focus {
                DialogField::Project => app.open_project_select(),
                DialogField::Requirement => app.open_requirement_select(),
                DialogField::Save => app.save_dialog(),
            }
        }
        _ => {}
    }
}

/// Shared keys for type-to-filter dropdowns
fn handle_dropdown_filter_key(app: &mut App, key: KeyEvent, len: usize) {
    match key.code {
        KeyCode::Esc => app.back_to_dialog(),
        KeyCode::Down => app.dropdown_next(len),
        KeyCode::Up => app.dropdown_prev(len),
        KeyCode::Backspace => {
            app.filter_input.pop();
            app.dropdown_list_state.select(Some(0));
        }
        KeyCode::Char(c) => {
            app.filter_input.push(c);
            app.dropdown_list_state.select(Some(0));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{make_app, make_item, MockBackend};
    use crate::app::NotificationLevel;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_keyboard_import_flow() {
        let (mut app, backend) = make_app(MockBackend {
            items: vec![make_item(1), make_item(2), make_item(3)],
            save_status: 200,
            ..MockBackend::default()
        });
        app.mount();
        app.next_backend_event().await;

        // Import is inert with nothing selected
        press(&mut app, KeyCode::Char('i'));
        assert!(app.dialog.is_none());

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.input_mode, InputMode::ImportDialog);

        // Pick "Gemini" by typing into the project filter
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::ProjectSelect);
        for c in "gem".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::ImportDialog);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::RequirementSelect);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.dialog.as_ref().unwrap().saving);

        // Esc is refused mid-save
        press(&mut app, KeyCode::Esc);
        assert!(app.dialog.is_some());

        app.next_backend_event().await;
        assert!(app.dialog.is_none());
        assert_eq!(app.status_level, NotificationLevel::Success);

        let saved = backend.saved.lock().unwrap().clone();
        assert_eq!(saved[0].project_name, "Gemini");
        assert_eq!(saved[0].requirement_name, "Docking");
        assert_eq!(saved[0].selected_work_item_ids, vec![crate::azure::WorkItemId::Number(2)]);
    }

    #[tokio::test]
    async fn test_pickers_locked_while_saving() {
        let (mut app, backend) = make_app(MockBackend {
            items: vec![make_item(1)],
            save_status: 200,
            ..MockBackend::default()
        });
        app.mount();
        app.next_backend_event().await;

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('i'));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.dialog.as_ref().unwrap().saving);

        // Back on the project field, Enter does not open the picker
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.dialog.as_ref().unwrap().focus, DialogField::Project);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::ImportDialog);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::ImportDialog);

        app.next_backend_event().await;
        let saved = backend.saved.lock().unwrap().clone();
        assert_eq!(saved[0].project_name, "Apollo");
        assert_eq!(saved[0].requirement_name, "Login");
    }

    #[test]
    fn test_help_and_quit() {
        let (mut app, _) = make_app(MockBackend::default());
        assert!(!press(&mut app, KeyCode::Char('?')));
        assert_eq!(app.input_mode, InputMode::Help);
        assert!(!press(&mut app, KeyCode::Char('q')), "q inside help does not quit");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_select_all_key_and_sort_key() {
        let (mut app, _) = make_app(MockBackend::default());
        app.table.set_items((1..=25).map(make_item).collect());
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.table.page, 1);

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.table.selection.len(), 25);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.table.page, 0);
        assert!(app.table.sort_by.is_some());

        press(&mut app, KeyCode::Char('a'));
        assert!(app.table.selection.is_empty());
    }
}
