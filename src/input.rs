//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in the status bar (`ui.rs`).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::filter::FilterSelection;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // The detail pane swallows everything except "back" and quit.
    if app.detail.is_some() {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                app.close_detail()
            }
            KeyCode::Char('q') => app.quit = true,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_filter(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_filter(),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.set_filter(FilterSelection::ALL[index]);
        }
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('r') => app.refresh(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{loaded_app, sample_records};
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_pick_filter() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(&rt, sample_records());

        handle_key_event(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.sync.filter(), FilterSelection::Image);
        handle_key_event(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.sync.filter(), FilterSelection::All);
    }

    #[test]
    fn enter_opens_and_esc_closes_detail() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(&rt, sample_records());

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(app.detail.is_some());

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.detail.is_none());
        assert!(!app.quit, "esc in detail view goes back, not out");

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[test]
    fn navigation_is_ignored_while_detail_open() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(&rt, sample_records());
        handle_key_event(&mut app, press(KeyCode::Enter));

        handle_key_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn release_events_are_ignored() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = loaded_app(&rt, sample_records());
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;

        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }
}
