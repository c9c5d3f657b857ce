//! Multi-line editor for attendance notes.

use super::FormStep;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;
use washdesk_core::{AttendanceRecord, RecordId};

pub struct NotesEditor {
    pub record: RecordId,
    pub textarea: TextArea<'static>,
}

impl NotesEditor {
    pub fn new(record: &AttendanceRecord) -> Self {
        let lines: Vec<String> = if record.notes.is_empty() {
            vec![String::new()]
        } else {
            record.notes.lines().map(str::to_string).collect()
        };
        let mut textarea = TextArea::new(lines);
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Notes: {} (Ctrl+S save, Esc cancel)", record.subject.person().label())),
        );
        Self {
            record: record.id.clone(),
            textarea,
        }
    }

    /// Enter inserts a newline; Ctrl+S saves.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormStep {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return FormStep::Submit;
        }
        if key.code == KeyCode::Esc {
            return FormStep::Cancel;
        }
        self.textarea.input(key);
        FormStep::Continue
    }

    pub fn value(&self) -> String {
        self.textarea.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_keys::{ctrl, key, type_text};
    use super::*;
    use washdesk_test_utils::fixtures;

    #[test]
    fn test_typed_notes_are_appended_to_existing() {
        let mut record = fixtures::worker_attendance("A1", true);
        record.notes = "late".to_string();
        let mut editor = NotesEditor::new(&record);
        editor.textarea.move_cursor(tui_textarea::CursorMove::End);
        type_text(" bus", |k| {
            editor.handle_key(k);
        });
        assert_eq!(editor.value(), "late bus");
        assert_eq!(editor.handle_key(ctrl('s')), FormStep::Submit);
    }

    #[test]
    fn test_escape_cancels() {
        let record = fixtures::worker_attendance("A1", true);
        let mut editor = NotesEditor::new(&record);
        assert_eq!(editor.handle_key(key(KeyCode::Esc)), FormStep::Cancel);
        assert_eq!(editor.value(), "");
    }
}
