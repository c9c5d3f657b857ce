//! Location form.

use super::{number_text, parse_coordinate, rows_of, FieldSet, Form, FormField, FormRow, FormStep};
use crossterm::event::KeyEvent;
use washdesk_core::{Location, LocationPayload, RecordId, ValidationError};

const NAME: usize = 0;
const ADDRESS: usize = 1;
const LATITUDE: usize = 2;
const LONGITUDE: usize = 3;

#[derive(Debug, Clone)]
pub struct LocationForm {
    editing: Option<RecordId>,
    fields: FieldSet,
    error: Option<String>,
}

impl LocationForm {
    pub fn new() -> Self {
        Self::build(None, &LocationPayload::default())
    }

    pub fn from_record(location: &Location) -> Self {
        Self::build(Some(location.id.clone()), &LocationPayload::from(location))
    }

    fn build(editing: Option<RecordId>, payload: &LocationPayload) -> Self {
        let fields = FieldSet::new(vec![
            FormField::text("Name", true, payload.name.clone()),
            FormField::optional("Address", payload.address.as_deref()),
            FormField::text("Latitude", false, number_text(payload.latitude)),
            FormField::text("Longitude", false, number_text(payload.longitude)),
        ]);
        Self {
            editing,
            fields,
            error: None,
        }
    }
}

impl Default for LocationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LocationForm {
    type Payload = LocationPayload;

    fn title(&self) -> String {
        match &self.editing {
            Some(id) => format!("Edit Location {}", id),
            None => "New Location".to_string(),
        }
    }

    fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormStep {
        self.fields.handle_key(key).into()
    }

    fn rows(&self) -> Vec<FormRow> {
        rows_of(&self.fields, true)
    }

    fn validate(&self) -> Result<LocationPayload, ValidationError> {
        let name = self.fields.required_text(NAME)?.to_string();
        let latitude = parse_coordinate("Latitude", self.fields.text(LATITUDE), 90.0)?;
        let longitude = parse_coordinate("Longitude", self.fields.text(LONGITUDE), 180.0)?;
        Ok(LocationPayload {
            name,
            address: self.fields.optional_text(ADDRESS),
            latitude,
            longitude,
        })
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_keys::{key, type_text};
    use super::*;
    use crossterm::event::KeyCode;
    use proptest::prelude::*;
    use washdesk_test_utils::{assertions::assert_invalid_field, fixtures, generators::arb_location};

    #[test]
    fn test_blank_form_names_first_missing_field() {
        let form = LocationForm::new();
        assert_invalid_field(&form.validate(), "Name");
        assert_eq!(form.validate().unwrap_err().to_string(), "Name is required");
    }

    #[test]
    fn test_typed_values_become_payload() {
        let mut form = LocationForm::new();
        type_text("Marina", |k| {
            form.handle_key(k);
        });
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Tab));
        type_text("25.08", |k| {
            form.handle_key(k);
        });
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Marina");
        assert_eq!(payload.address, None);
        assert_eq!(payload.latitude, Some(25.08));
    }

    #[test]
    fn test_empty_address_round_trips_as_empty() {
        let mut location = fixtures::location(1);
        location.address = Some(String::new());
        let form = LocationForm::from_record(&location);
        assert_eq!(form.validate().unwrap().address, Some(String::new()));

        location.address = None;
        let form = LocationForm::from_record(&location);
        assert_eq!(form.validate().unwrap().address, None);
    }

    #[test]
    fn test_latitude_out_of_range_rejected() {
        let mut form = LocationForm::from_record(&fixtures::location(1));
        form.fields.set_text(LATITUDE, "120");
        assert_invalid_field(&form.validate(), "Latitude");
    }

    #[test]
    fn test_enter_submits_and_escape_cancels() {
        let mut form = LocationForm::new();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormStep::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormStep::Cancel);
    }

    proptest! {
        #[test]
        fn prop_untouched_edit_is_idempotent(location in arb_location()) {
            prop_assume!(!location.name.trim().is_empty());
            let form = LocationForm::from_record(&location);
            prop_assert_eq!(form.validate().unwrap(), LocationPayload::from(&location));
        }
    }
}
