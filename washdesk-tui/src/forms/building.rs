//! Building form: location select, pricing and the weekly schedule.

use super::{rows_of, Choice, ChoiceOption, FieldKey, FieldSet, Form, FormField, FormRow, FormStep};
use crossterm::event::KeyEvent;
use washdesk_core::{
    parse_amount, Building, BuildingPayload, Location, RecordId, ScheduleDays, ValidationError,
};

const NAME: usize = 0;
const LOCATION: usize = 1;
const AMOUNT: usize = 2;
const CARD_CHARGES: usize = 3;
const SCHEDULE: usize = 4;
const SCHEDULE_DAYS: usize = 5;

#[derive(Debug, Clone)]
pub struct BuildingForm {
    editing: Option<RecordId>,
    fields: FieldSet,
    error: Option<String>,
    /// Set once the schedule toggle or days change. A saved record that is
    /// scheduled with no days is left as it is until then.
    schedule_touched: bool,
}

pub fn location_options(locations: &[Location]) -> Vec<ChoiceOption> {
    locations
        .iter()
        .map(|l| ChoiceOption::new(l.id.clone(), l.name.clone()))
        .collect()
}

impl BuildingForm {
    pub fn new(locations: &[Location]) -> Self {
        Self::build(
            None,
            String::new(),
            Choice::new(location_options(locations)),
            String::new(),
            String::new(),
            false,
            ScheduleDays::new(),
        )
    }

    /// Prefill from `building`. The comma-joined schedule arrives already
    /// parsed into a day set and stays editable day by day.
    pub fn from_record(building: &Building, locations: &[Location]) -> Self {
        let location = Choice::new(location_options(locations)).with_selected(
            Some(building.location.id.clone()),
            building.location.name.clone(),
        );
        Self::build(
            Some(building.id.clone()),
            building.name.clone(),
            location,
            building.amount.to_string(),
            building.card_charges.to_string(),
            building.schedule,
            building.schedule_days.clone(),
        )
    }

    fn build(
        editing: Option<RecordId>,
        name: String,
        location: Choice,
        amount: String,
        card_charges: String,
        schedule: bool,
        days: ScheduleDays,
    ) -> Self {
        let fields = FieldSet::new(vec![
            FormField::text("Name", true, name),
            FormField::choice("Location", true, location),
            FormField::text("Amount", true, amount),
            FormField::text("Card Charges", false, card_charges),
            FormField::toggle("Scheduled", schedule),
            FormField::days("Schedule Days", schedule, days),
        ]);
        Self {
            editing,
            fields,
            error: None,
            schedule_touched: false,
        }
    }
}

impl Form for BuildingForm {
    type Payload = BuildingPayload;

    fn title(&self) -> String {
        match &self.editing {
            Some(id) => format!("Edit Building {}", id),
            None => "New Building".to_string(),
        }
    }

    fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormStep {
        let step = self.fields.handle_key(key);
        if matches!(step, FieldKey::Changed(SCHEDULE | SCHEDULE_DAYS)) {
            self.schedule_touched = true;
        }
        if step == FieldKey::Changed(SCHEDULE) {
            let on = self.fields.toggled(SCHEDULE);
            if let Some(field) = self.fields.fields.get_mut(SCHEDULE_DAYS) {
                field.required = on;
            }
        }
        step.into()
    }

    fn rows(&self) -> Vec<FormRow> {
        rows_of(&self.fields, true)
    }

    fn validate(&self) -> Result<BuildingPayload, ValidationError> {
        let name = self.fields.required_text(NAME)?.to_string();
        let location_id = self.fields.required_choice(LOCATION)?;
        let amount = parse_amount("Amount", self.fields.text(AMOUNT))?
            .ok_or_else(|| ValidationError::required("Amount"))?;
        let card_charges =
            parse_amount("Card Charges", self.fields.text(CARD_CHARGES))?.unwrap_or(0.0);
        let schedule = self.fields.toggled(SCHEDULE);
        let schedule_days = self.fields.days(SCHEDULE_DAYS);
        let enforce_days = self.editing.is_none() || self.schedule_touched;
        if schedule && schedule_days.is_empty() && enforce_days {
            return Err(ValidationError::required("Schedule Days"));
        }
        Ok(BuildingPayload {
            name,
            location_id,
            amount,
            card_charges,
            schedule,
            schedule_days,
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
    use washdesk_test_utils::{
        assertions::assert_invalid_field, fixtures, generators::arb_building,
    };

    #[test]
    fn test_missing_location_reported_before_amount() {
        let mut form = BuildingForm::new(&fixtures::locations(2));
        type_text("Tower A", |k| {
            form.handle_key(k);
        });
        assert_invalid_field(&form.validate(), "Location");
    }

    #[test]
    fn test_schedule_requires_days() {
        let mut form = BuildingForm::from_record(&fixtures::building("bld-1", "loc-1"), &[]);
        form.fields.focus = SCHEDULE_DAYS;
        // Monday is set by the fixture; clear it and Thursday.
        form.handle_key(key(KeyCode::Char(' ')));
        for _ in 0..3 {
            form.handle_key(key(KeyCode::Right));
        }
        form.handle_key(key(KeyCode::Char(' ')));
        assert_invalid_field(&form.validate(), "Schedule Days");

        form.fields.focus = SCHEDULE;
        form.handle_key(key(KeyCode::Char(' ')));
        let payload = form.validate().unwrap();
        assert!(!payload.schedule);
        assert!(payload.schedule_days.is_empty());
    }

    #[test]
    fn test_saved_schedule_without_days_is_kept_until_changed() {
        let mut building = fixtures::building("bld-1", "loc-1");
        building.schedule = true;
        building.schedule_days = ScheduleDays::new();
        let mut form = BuildingForm::from_record(&building, &[]);
        assert_eq!(form.validate().unwrap(), BuildingPayload::from(&building));

        // Toggling off and on again asks for days.
        form.fields.focus = SCHEDULE;
        form.handle_key(key(KeyCode::Char(' ')));
        form.handle_key(key(KeyCode::Char(' ')));
        assert_invalid_field(&form.validate(), "Schedule Days");
    }

    #[test]
    fn test_prefill_keeps_unloaded_location() {
        let form = BuildingForm::from_record(&fixtures::building("bld-1", "loc-7"), &[]);
        assert_eq!(form.validate().unwrap().location_id, RecordId::new("loc-7"));
        assert!(form.rows()[LOCATION].value.contains("loc-7 name"));
    }

    #[test]
    fn test_bad_amount_rejected() {
        let mut form = BuildingForm::from_record(&fixtures::building("bld-1", "loc-1"), &[]);
        form.fields.set_text(AMOUNT, "12x");
        assert_invalid_field(&form.validate(), "Amount");
    }

    proptest! {
        #[test]
        fn prop_untouched_edit_is_idempotent(building in arb_building()) {
            let form = BuildingForm::from_record(&building, &fixtures::locations(3));
            prop_assert_eq!(form.validate().unwrap(), BuildingPayload::from(&building));
        }
    }
}
