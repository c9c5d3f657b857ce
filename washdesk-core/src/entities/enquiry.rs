use crate::enums::EnquiryStatus;
use crate::filter::TextSearchable;
use crate::identity::{EntityRef, Identified, RecordId};
use crate::schedule::ScheduleDays;
use serde::{Deserialize, Serialize};

/// A customer enquiry with one or more vehicles to be serviced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enquiry {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    pub mobile: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: EnquiryStatus,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub registration_no: String,
    #[serde(default)]
    pub parking_no: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub worker: Option<EntityRef>,
    #[serde(default)]
    pub building: Option<EntityRef>,
    #[serde(default)]
    pub schedule_days: ScheduleDays,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnquiryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: EnquiryStatus,
    pub vehicles: Vec<VehiclePayload>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehiclePayload {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub registration_no: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<RecordId>,
    pub schedule_days: ScheduleDays,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl From<&Vehicle> for VehiclePayload {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            registration_no: vehicle.registration_no.clone(),
            parking_no: vehicle.parking_no.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            worker: vehicle.worker.as_ref().map(|w| w.id.clone()),
            building: vehicle.building.as_ref().map(|b| b.id.clone()),
            schedule_days: vehicle.schedule_days.clone(),
            amount: vehicle.amount,
        }
    }
}

impl From<&Enquiry> for EnquiryPayload {
    fn from(enquiry: &Enquiry) -> Self {
        Self {
            name: enquiry.name.clone(),
            mobile: enquiry.mobile.clone(),
            email: enquiry.email.clone(),
            status: enquiry.status,
            vehicles: enquiry.vehicles.iter().map(VehiclePayload::from).collect(),
        }
    }
}

impl Identified for Enquiry {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl TextSearchable for Enquiry {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.mobile.as_str()];
        if let Some(name) = &self.name {
            fields.push(name);
        }
        for vehicle in &self.vehicles {
            fields.push(&vehicle.registration_no);
            if let Some(parking) = &vehicle.parking_no {
                fields.push(parking);
            }
        }
        fields
    }
}
