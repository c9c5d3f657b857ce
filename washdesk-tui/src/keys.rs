//! Keybinding definitions for browse mode.
//!
//! Forms, search and the notes editor read raw key events instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    NewItem,
    EditItem,
    DeleteItem,
    AcceptBooking,
    AssignWorker,
    TogglePresent,
    EditNotes,
    UndoDelete,
    Export,
    OpenSearch,
    CycleStatus,
    CycleLocation,
    CycleBuilding,
    CycleWorker,
    CycleDates,
    ClearFilters,
    ToggleCurrency,
    Refresh,
    OpenHelp,
    Confirm,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('a') => Some(Action::AcceptBooking),
        KeyCode::Char('w') => Some(Action::AssignWorker),
        KeyCode::Char(' ') => Some(Action::TogglePresent),
        KeyCode::Char('t') => Some(Action::EditNotes),
        KeyCode::Char('u') => Some(Action::UndoDelete),
        KeyCode::Char('x') => Some(Action::Export),
        KeyCode::Char('f') => Some(Action::CycleStatus),
        KeyCode::Char('L') => Some(Action::CycleLocation),
        KeyCode::Char('B') => Some(Action::CycleBuilding),
        KeyCode::Char('W') => Some(Action::CycleWorker),
        KeyCode::Char('D') => Some(Action::CycleDates),
        KeyCode::Char('C') => Some(Action::ClearFilters),
        KeyCode::Char('c') => Some(Action::ToggleCurrency),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char(c @ '1'..='5') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}
