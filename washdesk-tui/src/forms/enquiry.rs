//! Enquiry form: customer section plus an ordered list of vehicles.
//!
//! Each vehicle carries a location -> building -> worker cascade. The
//! location select only narrows the building list and is never submitted.
//! Ctrl+N adds a vehicle, Ctrl+D removes the focused one.

use super::{
    number_text, rows_of, Choice, ChoiceOption, FieldKey, FieldSet, Form, FormField, FormRow,
    FormStep,
};
use crate::reference::ReferenceData;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::str::FromStr;
use washdesk_core::{
    parse_amount, validate_mobile, Enquiry, EnquiryPayload, EnquiryStatus, RecordId,
    ValidationError, Vehicle, VehiclePayload,
};

const NAME: usize = 0;
const MOBILE: usize = 1;
const EMAIL: usize = 2;
const STATUS: usize = 3;

const REGISTRATION: usize = 0;
const PARKING: usize = 1;
const VEHICLE_TYPE: usize = 2;
const LOCATION: usize = 3;
const BUILDING: usize = 4;
const WORKER: usize = 5;
const DAYS: usize = 6;
const AMOUNT: usize = 7;

fn status_choice(status: EnquiryStatus) -> Choice {
    let options = EnquiryStatus::all()
        .iter()
        .map(|s| ChoiceOption::new(s.as_str(), s.as_str()))
        .collect();
    Choice::new(options).with_selected(Some(RecordId::new(status.as_str())), None)
}

fn building_options(reference: &ReferenceData, location: Option<&RecordId>) -> Vec<ChoiceOption> {
    reference
        .buildings_under(location)
        .into_iter()
        .map(|b| ChoiceOption::new(b.id.clone(), b.name.clone()))
        .collect()
}

fn worker_options(reference: &ReferenceData, building: Option<&RecordId>) -> Vec<ChoiceOption> {
    reference
        .workers_on(building)
        .into_iter()
        .map(|p| ChoiceOption::new(p.id.clone(), p.name.clone()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct VehicleForm {
    /// Server id of an existing vehicle; carried through untouched.
    id: Option<RecordId>,
    fields: FieldSet,
}

impl VehicleForm {
    fn blank(reference: &ReferenceData) -> Self {
        Self::build(None, &VehiclePayload::default(), None, None, reference)
    }

    fn from_vehicle(vehicle: &Vehicle, reference: &ReferenceData) -> Self {
        let payload = VehiclePayload::from(vehicle);
        let building_label = vehicle.building.as_ref().and_then(|b| b.name.clone());
        let worker_label = vehicle.worker.as_ref().and_then(|w| w.name.clone());
        Self::build(
            vehicle.id.clone(),
            &payload,
            building_label,
            worker_label,
            reference,
        )
    }

    fn build(
        id: Option<RecordId>,
        payload: &VehiclePayload,
        building_label: Option<String>,
        worker_label: Option<String>,
        reference: &ReferenceData,
    ) -> Self {
        let location = payload.building.as_ref().and_then(|building| {
            reference
                .buildings
                .iter()
                .find(|b| &b.id == building)
                .map(|b| b.location.id.clone())
        });
        let location_options = reference
            .locations
            .iter()
            .map(|l| ChoiceOption::new(l.id.clone(), l.name.clone()))
            .collect();
        let location_choice = Choice::new(location_options).with_selected(location.clone(), None);
        let building_choice = Choice::new(building_options(reference, location.as_ref()))
            .with_selected(payload.building.clone(), building_label);
        let worker_choice = Choice::new(worker_options(reference, payload.building.as_ref()))
            .with_selected(payload.worker.clone(), worker_label);

        let fields = FieldSet::new(vec![
            FormField::text("Registration No", true, payload.registration_no.clone()),
            FormField::optional("Parking No", payload.parking_no.as_deref()),
            FormField::optional("Vehicle Type", payload.vehicle_type.as_deref()),
            FormField::choice("Location", false, location_choice),
            FormField::choice("Building", false, building_choice),
            FormField::choice("Worker", false, worker_choice),
            FormField::days("Schedule Days", false, payload.schedule_days.clone()),
            FormField::text("Amount", false, number_text(payload.amount)),
        ]);
        Self { id, fields }
    }

    /// Recompute dependent options after `changed` moved.
    fn cascade(&mut self, changed: usize, reference: &ReferenceData) {
        if changed == LOCATION {
            let location = self.fields.selected(LOCATION).cloned();
            if let Some(choice) = self.fields.choice_mut(BUILDING) {
                choice.refilter(building_options(reference, location.as_ref()));
            }
        }
        if changed == LOCATION || changed == BUILDING {
            let building = self.fields.selected(BUILDING).cloned();
            if let Some(choice) = self.fields.choice_mut(WORKER) {
                choice.refilter(worker_options(reference, building.as_ref()));
            }
        }
    }

    fn validate(&self, number: usize) -> Result<VehiclePayload, ValidationError> {
        let registration = self.fields.text(REGISTRATION);
        if registration.trim().is_empty() {
            return Err(ValidationError::required(format!(
                "Vehicle {} Registration No",
                number
            )));
        }
        let amount = parse_amount(&format!("Vehicle {} Amount", number), self.fields.text(AMOUNT))?;
        Ok(VehiclePayload {
            id: self.id.clone(),
            registration_no: registration.to_string(),
            parking_no: self.fields.optional_text(PARKING),
            vehicle_type: self.fields.optional_text(VEHICLE_TYPE),
            worker: self.fields.selected(WORKER).cloned(),
            building: self.fields.selected(BUILDING).cloned(),
            schedule_days: self.fields.days(DAYS),
            amount,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Customer,
    Vehicle(usize),
}

#[derive(Debug, Clone)]
pub struct EnquiryForm {
    editing: Option<RecordId>,
    customer: FieldSet,
    vehicles: Vec<VehicleForm>,
    section: Section,
    reference: ReferenceData,
    error: Option<String>,
}

impl EnquiryForm {
    pub fn new(reference: &ReferenceData) -> Self {
        Self::build(None, &EnquiryPayload::default(), Vec::new(), reference)
    }

    pub fn from_record(enquiry: &Enquiry, reference: &ReferenceData) -> Self {
        let vehicles = enquiry
            .vehicles
            .iter()
            .map(|v| VehicleForm::from_vehicle(v, reference))
            .collect();
        Self::build(
            Some(enquiry.id.clone()),
            &EnquiryPayload::from(enquiry),
            vehicles,
            reference,
        )
    }

    fn build(
        editing: Option<RecordId>,
        payload: &EnquiryPayload,
        vehicles: Vec<VehicleForm>,
        reference: &ReferenceData,
    ) -> Self {
        let customer = FieldSet::new(vec![
            FormField::optional("Name", payload.name.as_deref()),
            FormField::text("Mobile", true, payload.mobile.clone()),
            FormField::optional("Email", payload.email.as_deref()),
            FormField::choice("Status", true, status_choice(payload.status)),
        ]);
        Self {
            editing,
            customer,
            vehicles,
            section: Section::Customer,
            reference: reference.clone(),
            error: None,
        }
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn add_vehicle(&mut self) {
        self.vehicles.push(VehicleForm::blank(&self.reference));
        self.section = Section::Vehicle(self.vehicles.len() - 1);
    }

    pub fn remove_vehicle(&mut self) {
        if let Section::Vehicle(index) = self.section {
            if index < self.vehicles.len() {
                self.vehicles.remove(index);
            }
            self.section = match index.checked_sub(1) {
                Some(prev) if prev < self.vehicles.len() => Section::Vehicle(prev),
                _ if !self.vehicles.is_empty() => Section::Vehicle(0),
                _ => Section::Customer,
            };
        }
    }

    fn active_set(&mut self) -> &mut FieldSet {
        match self.section {
            Section::Vehicle(i) if i < self.vehicles.len() => &mut self.vehicles[i].fields,
            _ => &mut self.customer,
        }
    }

    fn step_section(&mut self, forward: bool) {
        let count = self.vehicles.len();
        let next = match (self.section, forward) {
            (Section::Customer, true) if count > 0 => Section::Vehicle(0),
            (Section::Vehicle(i), true) if i + 1 < count => Section::Vehicle(i + 1),
            (Section::Vehicle(0), false) => Section::Customer,
            (Section::Vehicle(i), false) => Section::Vehicle(i - 1),
            (current, _) => current,
        };
        if next == self.section {
            return;
        }
        self.section = next;
        let set = self.active_set();
        set.focus = if forward {
            0
        } else {
            set.fields.len().saturating_sub(1)
        };
    }
}

impl Form for EnquiryForm {
    type Payload = EnquiryPayload;

    fn title(&self) -> String {
        match &self.editing {
            Some(id) => format!("Edit Enquiry {}", id),
            None => "New Enquiry".to_string(),
        }
    }

    fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormStep {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => {
                    self.add_vehicle();
                    return FormStep::Continue;
                }
                KeyCode::Char('d') => {
                    self.remove_vehicle();
                    return FormStep::Continue;
                }
                _ => {}
            }
        }

        let step = self.active_set().handle_key(key);
        match step {
            FieldKey::PastEnd => self.step_section(true),
            FieldKey::BeforeStart => self.step_section(false),
            FieldKey::Changed(index) => {
                if let Section::Vehicle(i) = self.section {
                    if let Some(vehicle) = self.vehicles.get_mut(i) {
                        vehicle.cascade(index, &self.reference);
                    }
                }
            }
            _ => {}
        }
        step.into()
    }

    fn rows(&self) -> Vec<FormRow> {
        let mut rows = rows_of(&self.customer, self.section == Section::Customer);
        for (i, vehicle) in self.vehicles.iter().enumerate() {
            rows.push(FormRow {
                label: format!("-- Vehicle {}", i + 1),
                value: String::new(),
                focused: false,
                required: false,
            });
            rows.extend(rows_of(&vehicle.fields, self.section == Section::Vehicle(i)));
        }
        rows
    }

    fn validate(&self) -> Result<EnquiryPayload, ValidationError> {
        let mobile = self.customer.text(MOBILE);
        validate_mobile("Mobile", mobile)?;
        let email = self.customer.optional_text(EMAIL);
        if let Some(email) = email.as_deref().filter(|e| !e.is_empty()) {
            if !email.contains('@') {
                return Err(ValidationError::invalid("Email", "must be an email address"));
            }
        }
        let status_id = self.customer.required_choice(STATUS)?;
        let status = EnquiryStatus::from_str(status_id.as_str())
            .map_err(|_| ValidationError::invalid("Status", "is not a known status"))?;

        let vehicles = self
            .vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| v.validate(i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EnquiryPayload {
            name: self.customer.optional_text(NAME),
            mobile: mobile.to_string(),
            email,
            status,
            vehicles,
        })
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }
}
