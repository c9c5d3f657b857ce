use crate::filter::TextSearchable;
use crate::identity::{EntityRef, Identified, RecordId};
use crate::schedule::ScheduleDays;
use serde::{Deserialize, Serialize};

/// A building inside a [`Location`](super::Location).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "location_id", alias = "location")]
    pub location: EntityRef,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub card_charges: f64,
    /// Whether washes here follow a fixed weekly schedule.
    #[serde(default)]
    pub schedule: bool,
    #[serde(default)]
    pub schedule_days: ScheduleDays,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingPayload {
    pub name: String,
    pub location_id: RecordId,
    pub amount: f64,
    pub card_charges: f64,
    pub schedule: bool,
    pub schedule_days: ScheduleDays,
}

impl From<&Building> for BuildingPayload {
    fn from(building: &Building) -> Self {
        Self {
            name: building.name.clone(),
            location_id: building.location.id.clone(),
            amount: building.amount,
            card_charges: building.card_charges,
            schedule: building.schedule,
            schedule_days: building.schedule_days.clone(),
        }
    }
}

impl Identified for Building {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl TextSearchable for Building {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.location.label()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_accepts_expanded_location() {
        let json = r#"{
            "_id": "b1",
            "name": "Tower A",
            "location_id": {"_id": "loc-1", "name": "Marina"},
            "amount": 120.0,
            "card_charges": 2.5,
            "schedule": true,
            "schedule_days": [{"day": "Monday"}, {"day": "Thursday"}]
        }"#;
        let building: Building = serde_json::from_str(json).unwrap();
        assert_eq!(building.location.id.as_str(), "loc-1");
        assert_eq!(building.schedule_days.to_joined(), "Monday,Thursday");

        let payload = BuildingPayload::from(&building);
        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["location_id"], "loc-1");
        assert_eq!(wire["schedule_days"], "Monday,Thursday");
    }
}
