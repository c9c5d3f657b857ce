use super::wire_date;
use crate::error::DecodeError;
use crate::filter::TextSearchable;
use crate::identity::{EntityRef, Identified, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who an attendance record is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttendanceSubject {
    Worker { worker: EntityRef },
    Staff { staff: EntityRef },
}

impl AttendanceSubject {
    pub fn person(&self) -> &EntityRef {
        match self {
            AttendanceSubject::Worker { worker } => worker,
            AttendanceSubject::Staff { staff } => staff,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            AttendanceSubject::Worker { .. } => "Worker",
            AttendanceSubject::Staff { .. } => "Staff",
        }
    }
}

/// One day of attendance for one worker or staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AttendanceWire")]
pub struct AttendanceRecord {
    pub id: RecordId,
    #[serde(with = "wire_date")]
    pub date: Option<NaiveDate>,
    pub subject: AttendanceSubject,
    pub present: bool,
    #[serde(rename = "type")]
    pub type_code: String,
    pub notes: String,
}

/// Attendance as the API sends it: the subject is whichever of `worker` or
/// `staff` is populated. Records serialized by this crate carry `subject`.
#[derive(Deserialize)]
struct AttendanceWire {
    #[serde(rename = "_id", alias = "id")]
    id: RecordId,
    #[serde(default, with = "wire_date")]
    date: Option<NaiveDate>,
    #[serde(default)]
    worker: Option<EntityRef>,
    #[serde(default)]
    staff: Option<EntityRef>,
    #[serde(default)]
    subject: Option<AttendanceSubject>,
    #[serde(default)]
    present: bool,
    #[serde(default, rename = "type")]
    type_code: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<AttendanceWire> for AttendanceRecord {
    type Error = DecodeError;

    fn try_from(wire: AttendanceWire) -> Result<Self, Self::Error> {
        let subject = match (wire.subject, wire.worker, wire.staff) {
            (Some(subject), _, _) => subject,
            (None, Some(worker), _) => AttendanceSubject::Worker { worker },
            (None, None, Some(staff)) => AttendanceSubject::Staff { staff },
            (None, None, None) => {
                return Err(DecodeError::MissingSubject {
                    id: wire.id.to_string(),
                })
            }
        };
        Ok(Self {
            id: wire.id,
            date: wire.date,
            subject,
            present: wire.present,
            type_code: wire.type_code.unwrap_or_default(),
            notes: wire.notes.unwrap_or_default(),
        })
    }
}

/// Body of `PUT /attendance`: a field-level update applied to every id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    pub ids: Vec<RecordId>,
    pub present: bool,
    #[serde(rename = "type")]
    pub type_code: String,
    pub notes: String,
}

impl AttendanceUpdate {
    /// Flip presence. The type code resets because it described the old state;
    /// notes carry over untouched.
    pub fn toggle_present(record: &AttendanceRecord) -> Self {
        Self {
            ids: vec![record.id.clone()],
            present: !record.present,
            type_code: String::new(),
            notes: record.notes.clone(),
        }
    }

    pub fn with_notes(record: &AttendanceRecord, notes: impl Into<String>) -> Self {
        Self {
            ids: vec![record.id.clone()],
            present: record.present,
            type_code: record.type_code.clone(),
            notes: notes.into(),
        }
    }

    /// The record as it should look once this update lands.
    pub fn applied_to(&self, record: &AttendanceRecord) -> AttendanceRecord {
        AttendanceRecord {
            present: self.present,
            type_code: self.type_code.clone(),
            notes: self.notes.clone(),
            ..record.clone()
        }
    }
}

impl Identified for AttendanceRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl TextSearchable for AttendanceRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.subject.person().label(), self.notes.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_record_becomes_worker_subject() {
        let json = r#"{"_id":"A1","date":"2024-05-01","worker":{"_id":"w1","name":"Ravi"},"present":false}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.subject,
            AttendanceSubject::Worker {
                worker: EntityRef::named("w1", "Ravi")
            }
        );
        assert_eq!(record.type_code, "");
        assert_eq!(record.notes, "");
    }

    #[test]
    fn test_staff_record_becomes_staff_subject() {
        let json = r#"{"_id":"A2","staff":"s1","present":true,"type":"HD","notes":"late"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.subject.kind_label(), "Staff");
        assert_eq!(record.subject.person().id.as_str(), "s1");
    }

    #[test]
    fn test_record_without_subject_is_rejected() {
        let json = r#"{"_id":"A3","present":true}"#;
        assert!(serde_json::from_str::<AttendanceRecord>(json).is_err());
    }

    #[test]
    fn test_toggle_present_resets_type_keeps_notes() {
        let record = AttendanceRecord {
            id: RecordId::new("A1"),
            date: None,
            subject: AttendanceSubject::Worker {
                worker: EntityRef::new("w1"),
            },
            present: false,
            type_code: "AB".to_string(),
            notes: "called in sick".to_string(),
        };
        let update = AttendanceUpdate::toggle_present(&record);
        let wire = serde_json::to_value(&update).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"ids": ["A1"], "present": true, "type": "", "notes": "called in sick"})
        );
        assert!(update.applied_to(&record).present);
    }
}
