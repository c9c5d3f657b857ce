use crate::filter::TextSearchable;
use crate::identity::{Identified, RecordId};
use serde::{Deserialize, Serialize};

/// A service location (typically a mall or residential community).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Editable fields of a [`Location`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl From<&Location> for LocationPayload {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            address: location.address.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

impl Identified for Location {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl TextSearchable for Location {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(address) = &self.address {
            fields.push(address);
        }
        fields
    }
}
