use super::wire_date;
use crate::enums::BookingStatus;
use crate::filter::TextSearchable;
use crate::identity::{EntityRef, Identified, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A wash booking placed through the customer app.
///
/// The console never creates bookings; it accepts them, assigns workers and
/// deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub customer: EntityRef,
    #[serde(default)]
    pub worker: Option<EntityRef>,
    #[serde(default, with = "wire_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub service_type: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub mall: Option<EntityRef>,
    #[serde(default)]
    pub building: Option<EntityRef>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub registration_no: Option<String>,
    #[serde(default)]
    pub parking_no: Option<String>,
}

/// Body of `PUT /bookings/{id}/assign-worker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignWorkerRequest {
    pub worker: RecordId,
}

impl Identified for Booking {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl TextSearchable for Booking {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.customer.label()];
        fields.extend(
            [&self.mobile, &self.registration_no, &self.parking_no]
                .into_iter()
                .flatten()
                .map(String::as_str),
        );
        fields
    }
}
