//! Key resolution for the dashboard.
//!
//! `resolve_key` only decides; the App executes the returned [`KeyAction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::form::FormField;

/// Text editing operation on the focused field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Action to execute for a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    Quit,
    /// Submit the form as a chat request
    Submit,
    /// Refresh the usage summary
    Refresh,
    ToggleHelp,
    FocusNext,
    FocusPrevious,
    NextModel,
    PreviousModel,
    Edit(EditOp),
}

/// Decide what a key press does given the focused field
pub fn resolve_key(key: KeyEvent, focus: FormField, show_help: bool) -> KeyAction {
    // Any key closes the help popup
    if show_help {
        return KeyAction::ToggleHelp;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('r') if ctrl => KeyAction::Refresh,
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::F(1) => KeyAction::ToggleHelp,
        KeyCode::F(5) => KeyAction::Refresh,
        KeyCode::Tab => KeyAction::FocusNext,
        KeyCode::BackTab | KeyCode::Up => KeyAction::FocusPrevious,
        KeyCode::Down => KeyAction::FocusNext,

        KeyCode::Enter if alt && focus == FormField::Prompt => KeyAction::Edit(EditOp::Newline),
        KeyCode::Enter => KeyAction::Submit,

        // Model selector
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('k') if !focus.is_text() => {
            KeyAction::PreviousModel
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('j') | KeyCode::Char(' ')
            if !focus.is_text() =>
        {
            KeyAction::NextModel
        }
        KeyCode::Char('?') if !focus.is_text() => KeyAction::ToggleHelp,
        _ if !focus.is_text() => KeyAction::None,

        // Text fields
        KeyCode::Char(_) if ctrl => KeyAction::None,
        KeyCode::Char(c) => KeyAction::Edit(EditOp::Insert(c)),
        KeyCode::Backspace => KeyAction::Edit(EditOp::Backspace),
        KeyCode::Delete => KeyAction::Edit(EditOp::Delete),
        KeyCode::Left => KeyAction::Edit(EditOp::Left),
        KeyCode::Right => KeyAction::Edit(EditOp::Right),
        KeyCode::Home => KeyAction::Edit(EditOp::Home),
        KeyCode::End => KeyAction::Edit(EditOp::End),
        _ => KeyAction::None,
    }
}
