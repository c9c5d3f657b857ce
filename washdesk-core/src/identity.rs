//! Identity types for washdesk records

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Server-assigned record identifier.
///
/// The console never mints ids of its own; every id arrives from the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Records that carry a server-assigned id.
pub trait Identified {
    fn id(&self) -> &RecordId;
}

/// Reference to a related record.
///
/// The API sends references either as a bare id string or as an expanded
/// object. Both shapes land here so nothing downstream has to care which one
/// the server picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub id: RecordId,
    pub name: Option<String>,
}

impl EntityRef {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn named(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    /// Name when expanded, otherwise the raw id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    pub fn refers_to(&self, id: &RecordId) -> bool {
        &self.id == id
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRef {
    Bare(String),
    Expanded {
        #[serde(rename = "_id", alias = "id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl<'de> Deserialize<'de> for EntityRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match WireRef::deserialize(deserializer)? {
            WireRef::Bare(id) => Ok(EntityRef::new(id)),
            WireRef::Expanded { id, name } => Ok(EntityRef {
                id: RecordId::new(id),
                name,
            }),
        }
    }
}

/// References go back to the server as bare ids.
impl Serialize for EntityRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.id.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_expanded_refs_normalize_to_same_id() {
        let bare: EntityRef = serde_json::from_str("\"loc-1\"").unwrap();
        let expanded: EntityRef =
            serde_json::from_str(r#"{"_id":"loc-1","name":"Marina Mall"}"#).unwrap();
        assert_eq!(bare.id, expanded.id);
        assert_eq!(expanded.label(), "Marina Mall");
        assert_eq!(bare.label(), "loc-1");
    }

    #[test]
    fn test_expanded_ref_accepts_plain_id_key() {
        let r: EntityRef = serde_json::from_str(r#"{"id":"w-9"}"#).unwrap();
        assert_eq!(r.id.as_str(), "w-9");
        assert!(r.name.is_none());
    }

    #[test]
    fn test_ref_serializes_as_bare_id() {
        let r = EntityRef::named("b-2", "Tower B");
        assert_eq!(serde_json::to_string(&r).unwrap(), "\"b-2\"");
    }

    #[test]
    fn test_blank_record_id_is_empty() {
        assert!(RecordId::new("  ").is_empty());
        assert!(!RecordId::new("x").is_empty());
    }
}
