//! Worker picker for assigning a booking.

use super::{Choice, ChoiceOption, FormStep};
use crossterm::event::{KeyCode, KeyEvent};
use washdesk_core::{Booking, Person, RecordId, ValidationError};

#[derive(Debug, Clone)]
pub struct WorkerPicker {
    pub booking: RecordId,
    pub choice: Choice,
}

impl WorkerPicker {
    pub fn new(booking: &Booking, workers: &[&Person]) -> Self {
        let options = workers
            .iter()
            .map(|p| ChoiceOption::new(p.id.clone(), p.name.clone()))
            .collect();
        let current = booking.worker.as_ref();
        let choice = Choice::new(options).with_selected(
            current.map(|w| w.id.clone()),
            current.and_then(|w| w.name.clone()),
        );
        Self {
            booking: booking.id.clone(),
            choice,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormStep {
        match key.code {
            KeyCode::Enter => FormStep::Submit,
            KeyCode::Esc => FormStep::Cancel,
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                self.choice.cycle(true);
                FormStep::Continue
            }
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                self.choice.cycle(false);
                FormStep::Continue
            }
            _ => FormStep::Continue,
        }
    }

    pub fn selected(&self) -> Result<RecordId, ValidationError> {
        self.choice
            .selected
            .clone()
            .ok_or_else(|| ValidationError::required("Worker"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_keys::key;
    use super::*;
    use washdesk_core::PersonKind;
    use washdesk_test_utils::fixtures;

    #[test]
    fn test_pick_requires_a_worker() {
        let booking = fixtures::pending_booking("b-1");
        let ravi = fixtures::person("w-1", PersonKind::Worker, &[]);
        let mut picker = WorkerPicker::new(&booking, &[&ravi]);
        assert_eq!(picker.selected().unwrap_err().to_string(), "Worker is required");

        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.selected().unwrap(), RecordId::new("w-1"));
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), FormStep::Submit);
    }
}
