use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Default path used by the `e` key.
pub const EXPORT_PATH: &str = "audit_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.current_view == View::Access && handle_access_key(app, key) {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Chart),
        KeyCode::Char('2') => app.set_view(View::Table),
        KeyCode::Char('3') => app.set_view(View::Access),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Table navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Char('r') => {
            if !app.reload_data() {
                app.set_status_message("No new data".to_string());
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('b') => app.cycle_baseline(),
        KeyCode::Char('d') => app.cycle_dim(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Keys of the access view. Returns true when the key was consumed.
fn handle_access_key(app: &mut App, key: KeyEvent) -> bool {
    if app.filter_active {
        handle_filter_input(app, key);
        return true;
    }

    // Delete confirmation swallows every key
    if app.access.pending_delete.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let action = app.access.confirm_delete();
                app.run_access(action);
            }
            KeyCode::Char('n') | KeyCode::Esc => app.access.cancel_delete(),
            _ => {}
        }
        return true;
    }

    if app.access.log_modal.visible {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('o')
        ) {
            app.access.log_modal.close();
        }
        return true;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.access.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.access.select_next(),
        KeyCode::Home => app.access.select_first(),
        KeyCode::End => app.access.select_last(),
        KeyCode::Char(']') | KeyCode::PageDown => {
            let action = app.access.next_page();
            app.run_access(action);
        }
        KeyCode::Char('[') | KeyCode::PageUp => {
            let action = app.access.prev_page();
            app.run_access(action);
        }
        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('s') => {
            let action = app.access.cycle_status();
            app.run_access_action(action);
        }
        KeyCode::Char('c') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let action = app.access.clear_filter();
            app.run_access_action(action);
        }
        KeyCode::Char('o') | KeyCode::Enter => app.open_execution_log(),
        KeyCode::Char('x') | KeyCode::Delete => {
            if !app.access.request_delete() {
                app.set_status_message("Nothing selected".to_string());
            }
        }
        KeyCode::Char('n') => {
            let action = app.access.create();
            app.run_access_action(action);
        }
        KeyCode::Char('r') => {
            let action = app.access.refresh();
            app.run_access_action(action);
        }
        _ => return false,
    }
    true
}

/// Handle key input while the keyword filter is being typed
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_filter(),
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Backspace => app.filter_pop(),
        KeyCode::Char(c) => app.filter_push(c),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp if app.current_view == View::Access => app.access.select_prev(),
        MouseEventKind::ScrollDown if app.current_view == View::Access => {
            app.access.select_next()
        }
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Tab bar sits on row 1, right below the header.
        MouseEventKind::Down(MouseButton::Left) if mouse.row == 1 => {
            // " 1:Chart " spans columns 0-8, then the divider.
            if mouse.column < 10 {
                app.set_view(View::Chart);
            } else if mouse.column < 20 {
                app.set_view(View::Table);
            } else if mouse.column < 31 {
                app.set_view(View::Access);
            }
        }

        _ => {}
    }
}
