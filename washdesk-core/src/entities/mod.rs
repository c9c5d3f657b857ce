//! Entity records and their create/update payloads.

mod attendance;
mod booking;
mod building;
mod enquiry;
mod location;
mod person;

pub use attendance::{AttendanceRecord, AttendanceSubject, AttendanceUpdate};
pub use booking::{AssignWorkerRequest, Booking};
pub use building::{Building, BuildingPayload};
pub use enquiry::{Enquiry, EnquiryPayload, Vehicle, VehiclePayload};
pub use location::{Location, LocationPayload};
pub use person::Person;

/// Dates arrive either as `YYYY-MM-DD` or as a full RFC 3339 timestamp.
pub(crate) mod wire_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
        }
    }

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::wire_date;
    use chrono::NaiveDate;

    #[test]
    fn test_wire_date_accepts_both_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(wire_date::parse("2024-03-09"), expected);
        assert_eq!(wire_date::parse("2024-03-09T06:30:00.000Z"), expected);
        assert_eq!(wire_date::parse(""), None);
    }
}
