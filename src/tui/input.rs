// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Typing stays live while the worker is busy; Enter then queues a single line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::state::{ChatMessageKind, TuiState};

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// User submitted a line while the worker was idle.
    Send(String),
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    match key.code {
        KeyCode::PageUp | KeyCode::Up => {
            let step = if key.code == KeyCode::PageUp { 10 } else { 1 };
            state.scroll_offset = state.scroll_offset.saturating_add(step);
            InputResult::None
        }
        KeyCode::PageDown | KeyCode::Down => {
            let step = if key.code == KeyCode::PageDown { 10 } else { 1 };
            state.scroll_offset = state.scroll_offset.saturating_sub(step);
            InputResult::None
        }
        KeyCode::Enter => {
            let Some(text) = state.submit_input() else {
                return InputResult::None;
            };
            if !state.busy {
                return InputResult::Send(text);
            }
            if state.queued.is_some() {
                state.push_message(
                    ChatMessageKind::Error,
                    "A line is already queued; wait for the panel to finish".to_string(),
                );
            } else {
                state.queued = Some(text);
            }
            InputResult::None
        }
        KeyCode::Char(c) => {
            state.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            InputResult::None
        }
        KeyCode::Esc => InputResult::Quit,
        _ => InputResult::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::state::test_status;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(state: &mut TuiState, text: &str) {
        for c in text.chars() {
            handle_key(state, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_sends_when_idle() {
        let mut state = TuiState::new(test_status());
        type_text(&mut state, "hello");
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Enter)),
            InputResult::Send("hello".to_string())
        );
        assert_eq!(state.input, "");
    }

    #[test]
    fn enter_on_blank_input_does_nothing() {
        let mut state = TuiState::new(test_status());
        type_text(&mut state, "   ");
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
    }

    #[test]
    fn enter_while_busy_queues_one_line() {
        let mut state = TuiState::new(test_status());
        state.busy = true;
        type_text(&mut state, "first");
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
        assert_eq!(state.queued.as_deref(), Some("first"));

        type_text(&mut state, "second");
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.queued.as_deref(), Some("first"));
        assert_eq!(state.messages.last().map(|m| &m.kind), Some(&ChatMessageKind::Error));
    }

    #[test]
    fn ctrl_c_and_esc_quit() {
        let mut state = TuiState::new(test_status());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut state, ctrl_c), InputResult::Quit);
        assert_eq!(handle_key(&mut state, key(KeyCode::Esc)), InputResult::Quit);
    }

    #[test]
    fn arrows_scroll_chat() {
        let mut state = TuiState::new(test_status());
        handle_key(&mut state, key(KeyCode::PageUp));
        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.scroll_offset, 11);
        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.scroll_offset, 1);
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn cursor_editing_keys() {
        let mut state = TuiState::new(test_status());
        type_text(&mut state, "abc");
        handle_key(&mut state, key(KeyCode::Home));
        handle_key(&mut state, key(KeyCode::Delete));
        handle_key(&mut state, key(KeyCode::End));
        handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(state.input, "b");
    }
}
