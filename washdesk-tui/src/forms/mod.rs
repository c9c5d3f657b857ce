//! Edit/create forms.
//!
//! A form is an ordered [`FieldSet`] plus the logic to prefill it from a
//! record and turn it back into a payload. Validation runs before any
//! network call and stops at the first failing field in form order.

pub mod building;
pub mod enquiry;
pub mod location;
pub mod notes;
pub mod picker;

pub use building::BuildingForm;
pub use enquiry::EnquiryForm;
pub use location::LocationForm;
pub use notes::NotesEditor;
pub use picker::WorkerPicker;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use washdesk_core::{retain_if_available, Identified, RecordId, ScheduleDays, ValidationError, Weekday};

/// One selectable option in a [`Choice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: RecordId,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(id: impl Into<RecordId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

impl Identified for ChoiceOption {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Single select over a recomputable option list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choice {
    pub options: Vec<ChoiceOption>,
    pub selected: Option<RecordId>,
    /// Label for a prefilled selection that is not among the options.
    fallback_label: Option<String>,
}

impl Choice {
    pub fn new(options: Vec<ChoiceOption>) -> Self {
        Self {
            options,
            selected: None,
            fallback_label: None,
        }
    }

    /// Prefill from a record. The selection is kept even when the reference
    /// list did not load it, so an untouched edit submits it unchanged.
    pub fn with_selected(mut self, selected: Option<RecordId>, label: Option<String>) -> Self {
        self.selected = selected;
        self.fallback_label = label;
        self
    }

    pub fn label(&self) -> String {
        match &self.selected {
            Some(id) => self
                .options
                .iter()
                .find(|o| &o.id == id)
                .map(|o| o.label.clone())
                .or_else(|| self.fallback_label.clone())
                .unwrap_or_else(|| id.to_string()),
            None => String::new(),
        }
    }

    /// Replace the options after a parent field changed. A selection that
    /// is no longer offered is cleared.
    pub fn refilter(&mut self, options: Vec<ChoiceOption>) {
        let refs: Vec<&ChoiceOption> = options.iter().collect();
        self.selected = retain_if_available(self.selected.take(), &refs);
        self.fallback_label = None;
        self.options = options;
    }

    fn position(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.options.iter().position(|o| &o.id == selected)
    }

    /// Step through the options. Stepping past either end clears the
    /// selection.
    pub fn cycle(&mut self, forward: bool) {
        if self.options.is_empty() {
            self.selected = None;
            return;
        }
        let len = self.options.len();
        let next = match (self.position(), forward) {
            (None, true) => Some(0),
            (None, false) => Some(len - 1),
            (Some(i), true) if i + 1 < len => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            _ => None,
        };
        self.selected = next.map(|i| self.options[i].id.clone());
        self.fallback_label = None;
    }
}

/// Weekday multi-select with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaysInput {
    pub days: ScheduleDays,
    pub cursor: usize,
}

impl DaysInput {
    pub fn new(days: ScheduleDays) -> Self {
        Self { days, cursor: 0 }
    }

    pub fn cursor_day(&self) -> Weekday {
        let all = Weekday::all();
        all[self.cursor.min(all.len() - 1)]
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = Weekday::all().len();
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    pub fn render(&self) -> String {
        Weekday::all()
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let mark = if self.days.contains(*day) { "x" } else { " " };
                let cursor = if i == self.cursor { ">" } else { "" };
                format!("{}[{}]{}", cursor, mark, day.short())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Choice(Choice),
    Toggle(bool),
    Days(DaysInput),
}

impl Input {
    pub fn display(&self) -> String {
        match self {
            Input::Text(value) => value.clone(),
            Input::Choice(choice) => format!("< {} >", choice.label()),
            Input::Toggle(on) => if *on { "[x]" } else { "[ ]" }.to_string(),
            Input::Days(days) => days.render(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub required: bool,
    pub input: Input,
    /// Prefilled from an explicit empty string, so a blank value is sent
    /// back as `Some("")` rather than dropped.
    blank_is_some: bool,
}

impl FormField {
    pub fn text(label: impl Into<String>, required: bool, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required,
            input: Input::Text(value.into()),
            blank_is_some: false,
        }
    }

    /// Optional text prefilled from `value`. An absent value and an empty
    /// one both start blank, but only the latter submits as `Some("")`.
    pub fn optional(label: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            blank_is_some: value == Some(""),
            ..Self::text(label, false, value.unwrap_or_default())
        }
    }

    pub fn choice(label: impl Into<String>, required: bool, choice: Choice) -> Self {
        Self {
            label: label.into(),
            required,
            input: Input::Choice(choice),
            blank_is_some: false,
        }
    }

    pub fn toggle(label: impl Into<String>, on: bool) -> Self {
        Self {
            label: label.into(),
            required: false,
            input: Input::Toggle(on),
            blank_is_some: false,
        }
    }

    pub fn days(label: impl Into<String>, required: bool, days: ScheduleDays) -> Self {
        Self {
            label: label.into(),
            required,
            input: Input::Days(DaysInput::new(days)),
            blank_is_some: false,
        }
    }
}

/// What a key press did to a [`FieldSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Submit,
    Cancel,
    /// The value of field `index` changed.
    Changed(usize),
    Moved,
    /// Focus tried to leave the set past its last field.
    PastEnd,
    /// Focus tried to leave the set before its first field.
    BeforeStart,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl FieldSet {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn text(&self, index: usize) -> &str {
        match self.fields.get(index).map(|f| &f.input) {
            Some(Input::Text(value)) => value,
            _ => "",
        }
    }

    pub fn choice(&self, index: usize) -> Option<&Choice> {
        match self.fields.get(index).map(|f| &f.input) {
            Some(Input::Choice(choice)) => Some(choice),
            _ => None,
        }
    }

    pub fn choice_mut(&mut self, index: usize) -> Option<&mut Choice> {
        match self.fields.get_mut(index).map(|f| &mut f.input) {
            Some(Input::Choice(choice)) => Some(choice),
            _ => None,
        }
    }

    pub fn selected(&self, index: usize) -> Option<&RecordId> {
        self.choice(index).and_then(|c| c.selected.as_ref())
    }

    pub fn toggled(&self, index: usize) -> bool {
        matches!(self.fields.get(index).map(|f| &f.input), Some(Input::Toggle(true)))
    }

    pub fn days(&self, index: usize) -> ScheduleDays {
        match self.fields.get(index).map(|f| &f.input) {
            Some(Input::Days(days)) => days.days.clone(),
            _ => ScheduleDays::new(),
        }
    }

    pub fn set_text(&mut self, index: usize, value: impl Into<String>) {
        if let Some(FormField {
            input: Input::Text(text),
            ..
        }) = self.fields.get_mut(index)
        {
            *text = value.into();
        }
    }

    pub fn label(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.label.as_str())
            .unwrap_or_default()
    }

    pub fn required_text(&self, index: usize) -> Result<&str, ValidationError> {
        let value = self.text(index);
        if value.trim().is_empty() {
            Err(ValidationError::required(self.label(index)))
        } else {
            Ok(value)
        }
    }

    pub fn required_choice(&self, index: usize) -> Result<RecordId, ValidationError> {
        self.selected(index)
            .cloned()
            .ok_or_else(|| ValidationError::required(self.label(index)))
    }

    /// Blank is `None` unless the field was prefilled as an empty string.
    /// Anything else is kept as typed.
    pub fn optional_text(&self, index: usize) -> Option<String> {
        let value = self.text(index);
        let blank_is_some = self.fields.get(index).is_some_and(|f| f.blank_is_some);
        if value.is_empty() && !blank_is_some {
            None
        } else {
            Some(value.to_string())
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FieldKey {
        let KeyEvent {
            code, modifiers, ..
        } = key;
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c') => FieldKey::Cancel,
                KeyCode::Char('s') => FieldKey::Submit,
                _ => FieldKey::Ignored,
            };
        }

        match code {
            KeyCode::Esc => return FieldKey::Cancel,
            KeyCode::Enter => return FieldKey::Submit,
            KeyCode::Tab | KeyCode::Down => return self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => return self.move_focus(false),
            _ => {}
        }

        let index = self.focus;
        let Some(field) = self.fields.get_mut(index) else {
            return FieldKey::Ignored;
        };
        let changed = match (&mut field.input, code) {
            (Input::Text(value), KeyCode::Char(c)) => {
                value.push(c);
                true
            }
            (Input::Text(value), KeyCode::Backspace) => value.pop().is_some(),
            (Input::Choice(choice), KeyCode::Right | KeyCode::Char(' ')) => {
                choice.cycle(true);
                true
            }
            (Input::Choice(choice), KeyCode::Left) => {
                choice.cycle(false);
                true
            }
            (Input::Choice(choice), KeyCode::Backspace | KeyCode::Delete) => {
                choice.selected.take().is_some()
            }
            (Input::Toggle(on), KeyCode::Char(' ')) => {
                *on = !*on;
                true
            }
            (Input::Days(days), KeyCode::Right) => {
                days.move_cursor(true);
                false
            }
            (Input::Days(days), KeyCode::Left) => {
                days.move_cursor(false);
                false
            }
            (Input::Days(days), KeyCode::Char(' ')) => {
                let day = days.cursor_day();
                days.days.toggle(day);
                true
            }
            _ => false,
        };
        if changed {
            FieldKey::Changed(index)
        } else {
            FieldKey::Ignored
        }
    }

    fn move_focus(&mut self, forward: bool) -> FieldKey {
        if forward {
            if self.focus + 1 >= self.fields.len() {
                return FieldKey::PastEnd;
            }
            self.focus += 1;
        } else {
            if self.focus == 0 {
                return FieldKey::BeforeStart;
            }
            self.focus -= 1;
        }
        FieldKey::Moved
    }
}

/// Outcome of a key press for the form as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Continue,
    Submit,
    Cancel,
}

impl From<FieldKey> for FormStep {
    fn from(key: FieldKey) -> Self {
        match key {
            FieldKey::Submit => FormStep::Submit,
            FieldKey::Cancel => FormStep::Cancel,
            _ => FormStep::Continue,
        }
    }
}

/// Rendered row of a form: label, value, focus and required marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    pub label: String,
    pub value: String,
    pub focused: bool,
    pub required: bool,
}

pub fn rows_of(set: &FieldSet, active: bool) -> Vec<FormRow> {
    set.fields
        .iter()
        .enumerate()
        .map(|(i, field)| FormRow {
            label: field.label.clone(),
            value: field.input.display(),
            focused: active && i == set.focus,
            required: field.required,
        })
        .collect()
}

/// Shared surface of the edit/create forms.
pub trait Form {
    type Payload;

    fn title(&self) -> String;

    /// Id of the record being edited; `None` when creating.
    fn editing(&self) -> Option<&RecordId>;

    fn handle_key(&mut self, key: KeyEvent) -> FormStep;

    fn rows(&self) -> Vec<FormRow>;

    fn validate(&self) -> Result<Self::Payload, ValidationError>;

    /// Last validation or server error shown under the form.
    fn error(&self) -> Option<&str>;

    fn set_error(&mut self, message: Option<String>);
}

/// Parse an optional coordinate within `[-bound, bound]`.
pub(crate) fn parse_coordinate(
    label: &str,
    value: &str,
    bound: f64,
) -> Result<Option<f64>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= bound => Ok(Some(v)),
        _ => Err(ValidationError::invalid(
            label,
            format!("must be between -{} and {}", bound, bound),
        )),
    }
}

/// Text for a prefilled optional number.
pub(crate) fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn type_text<F: FnMut(KeyEvent)>(text: &str, mut send: F) {
        for c in text.chars() {
            send(key(KeyCode::Char(c)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_keys::key;
    use super::*;

    fn options() -> Vec<ChoiceOption> {
        vec![ChoiceOption::new("a", "Alpha"), ChoiceOption::new("b", "Beta")]
    }

    #[test]
    fn test_choice_cycle_wraps_through_none() {
        let mut choice = Choice::new(options());
        choice.cycle(true);
        assert_eq!(choice.label(), "Alpha");
        choice.cycle(true);
        choice.cycle(true);
        assert!(choice.selected.is_none());
        choice.cycle(false);
        assert_eq!(choice.label(), "Beta");
    }

    #[test]
    fn test_refilter_clears_orphaned_selection() {
        let mut choice = Choice::new(options());
        choice.selected = Some(RecordId::new("b"));
        choice.refilter(vec![ChoiceOption::new("a", "Alpha")]);
        assert!(choice.selected.is_none());

        choice.selected = Some(RecordId::new("a"));
        choice.refilter(options());
        assert_eq!(choice.selected, Some(RecordId::new("a")));
    }

    #[test]
    fn test_prefilled_selection_survives_missing_option() {
        let choice = Choice::new(Vec::new())
            .with_selected(Some(RecordId::new("loc-9")), Some("Old Town".to_string()));
        assert_eq!(choice.label(), "Old Town");
        assert_eq!(choice.selected, Some(RecordId::new("loc-9")));
    }

    #[test]
    fn test_days_input_toggles_cursor_day() {
        let mut set = FieldSet::new(vec![FormField::days("Days", false, ScheduleDays::new())]);
        set.handle_key(key(KeyCode::Right));
        assert_eq!(set.handle_key(key(KeyCode::Char(' '))), FieldKey::Changed(0));
        assert_eq!(set.days(0).to_joined(), "Tuesday");
    }

    #[test]
    fn test_focus_reports_edges() {
        let mut set = FieldSet::new(vec![
            FormField::text("A", true, ""),
            FormField::text("B", false, ""),
        ]);
        assert_eq!(set.handle_key(key(KeyCode::BackTab)), FieldKey::BeforeStart);
        assert_eq!(set.handle_key(key(KeyCode::Tab)), FieldKey::Moved);
        assert_eq!(set.handle_key(key(KeyCode::Tab)), FieldKey::PastEnd);
        assert_eq!(set.focus, 1);
    }

    #[test]
    fn test_coordinate_bounds() {
        assert_eq!(parse_coordinate("Latitude", "25.2", 90.0).unwrap(), Some(25.2));
        assert!(parse_coordinate("Latitude", "91", 90.0).is_err());
        assert_eq!(parse_coordinate("Latitude", " ", 90.0).unwrap(), None);
    }
}
