use crate::enums::PersonKind;
use crate::filter::TextSearchable;
use crate::identity::{EntityRef, Identified, RecordId};
use serde::{Deserialize, Serialize};

/// An assignable worker or staff member from `GET /attendance/org/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub kind: PersonKind,
    /// Buildings this person is rostered on.
    #[serde(default)]
    pub buildings: Vec<EntityRef>,
}

impl Person {
    pub fn works_in(&self, building: &RecordId) -> bool {
        self.buildings.iter().any(|b| b.refers_to(building))
    }
}

impl Identified for Person {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl TextSearchable for Person {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(mobile) = &self.mobile {
            fields.push(mobile);
        }
        fields
    }
}
