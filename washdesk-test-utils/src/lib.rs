//! washdesk Test Utilities
//!
//! Shared test infrastructure for the washdesk workspace:
//! - Proptest generators for every record type
//! - Fixtures for common screens
//! - Assertions over client and validation errors

// Re-export the in-memory resource from its source crate
pub use washdesk_client::{MockCall, MockOp, MockRecord, MockResource};

pub use washdesk_client::{ClientError, NotificationLog};
pub use washdesk_core::{
    AttendanceRecord, AttendanceSubject, Booking, BookingStatus, Building, Enquiry,
    EnquiryStatus, EntityRef, Location, Person, PersonKind, RecordId, ScheduleDays, Vehicle,
    ValidationError, Weekday,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    pub fn arb_record_id() -> impl Strategy<Value = RecordId> {
        "[a-f0-9]{24}".prop_map(RecordId::new)
    }

    pub fn arb_weekday() -> impl Strategy<Value = Weekday> {
        prop::sample::select(Weekday::all().to_vec())
    }

    pub fn arb_schedule_days() -> impl Strategy<Value = ScheduleDays> {
        prop::collection::vec(arb_weekday(), 0..7).prop_map(|days| days.into_iter().collect())
    }

    /// Either a bare id or an id with a display name.
    pub fn arb_entity_ref() -> impl Strategy<Value = EntityRef> {
        (arb_record_id(), proptest::option::of("[A-Z][a-z]{2,10}")).prop_map(|(id, name)| {
            match name {
                Some(name) => EntityRef::named(id, name),
                None => EntityRef::new(id),
            }
        })
    }

    pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (2023i32..2027, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
    }

    pub fn arb_mobile() -> impl Strategy<Value = String> {
        "05[0-9]{8}"
    }

    pub fn arb_booking_status() -> impl Strategy<Value = BookingStatus> {
        prop::sample::select(BookingStatus::all().to_vec())
    }

    pub fn arb_enquiry_status() -> impl Strategy<Value = EnquiryStatus> {
        prop::sample::select(EnquiryStatus::all().to_vec())
    }

    /// Optional text that is sometimes present but empty, as the API sends
    /// for fields cleared in another client.
    pub fn arb_optional_text(pattern: &'static str) -> impl Strategy<Value = Option<String>> {
        proptest::option::of(prop_oneof![Just(String::new()), pattern])
    }

    /// Whole-cent amounts so f64 comparisons stay exact.
    pub fn arb_amount() -> impl Strategy<Value = f64> {
        (0u32..100_000).prop_map(|cents| f64::from(cents) / 100.0)
    }

    pub fn arb_location() -> impl Strategy<Value = Location> {
        (
            arb_record_id(),
            "[A-Z][a-z]{3,12}",
            arb_optional_text("[A-Za-z0-9 ]{5,30}"),
        )
            .prop_map(|(id, name, address)| Location {
                id,
                name,
                address,
                latitude: None,
                longitude: None,
            })
    }

    pub fn arb_building() -> impl Strategy<Value = Building> {
        (
            arb_record_id(),
            "[A-Z][a-z]{3,12} Tower",
            arb_entity_ref(),
            arb_amount(),
            arb_amount(),
            any::<bool>(),
            arb_schedule_days(),
        )
            .prop_map(
                |(id, name, location, amount, card_charges, schedule, schedule_days)| Building {
                    id,
                    name,
                    location,
                    amount,
                    card_charges,
                    schedule,
                    schedule_days,
                },
            )
    }

    pub fn arb_booking() -> impl Strategy<Value = Booking> {
        (
            arb_record_id(),
            arb_entity_ref(),
            proptest::option::of(arb_entity_ref()),
            proptest::option::of(arb_date()),
            arb_booking_status(),
            proptest::option::of(arb_mobile()),
            proptest::option::of("[A-Z]{3}-[0-9]{1,5}"),
        )
            .prop_map(
                |(id, customer, worker, date, status, mobile, registration_no)| Booking {
                    id,
                    customer,
                    worker,
                    date,
                    time: None,
                    service_type: "exterior".to_string(),
                    status,
                    mall: None,
                    building: None,
                    mobile,
                    registration_no,
                    parking_no: None,
                },
            )
    }

    pub fn arb_vehicle() -> impl Strategy<Value = Vehicle> {
        (
            proptest::option::of(arb_record_id()),
            "[A-Z]{3}-[0-9]{1,5}",
            arb_optional_text("[A-Z][0-9]{1,3}"),
            arb_optional_text("sedan|suv|van"),
            proptest::option::of(arb_entity_ref()),
            proptest::option::of(arb_entity_ref()),
            arb_schedule_days(),
            proptest::option::of(arb_amount()),
        )
            .prop_map(
                |(
                    id,
                    registration_no,
                    parking_no,
                    vehicle_type,
                    worker,
                    building,
                    schedule_days,
                    amount,
                )| {
                    Vehicle {
                        id,
                        registration_no,
                        parking_no,
                        vehicle_type,
                        worker,
                        building,
                        schedule_days,
                        amount,
                    }
                },
            )
    }

    pub fn arb_enquiry() -> impl Strategy<Value = Enquiry> {
        (
            arb_record_id(),
            arb_optional_text("[A-Z][a-z]{2,10}"),
            arb_mobile(),
            arb_optional_text("[a-z]{3,8}@[a-z]{3,8}\\.com"),
            arb_enquiry_status(),
            prop::collection::vec(arb_vehicle(), 0..4),
        )
            .prop_map(|(id, name, mobile, email, status, vehicles)| Enquiry {
                id,
                name,
                mobile,
                email,
                status,
                vehicles,
            })
    }

    pub fn arb_attendance() -> impl Strategy<Value = AttendanceRecord> {
        (
            arb_record_id(),
            arb_entity_ref(),
            any::<bool>(),
            any::<bool>(),
            "[a-z ]{0,20}",
        )
            .prop_map(|(id, person, staff, present, notes)| AttendanceRecord {
                id,
                date: None,
                subject: if staff {
                    AttendanceSubject::Staff { staff: person }
                } else {
                    AttendanceSubject::Worker { worker: person }
                },
                present,
                type_code: String::new(),
                notes,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;

    pub fn location(n: usize) -> Location {
        Location {
            id: RecordId::new(format!("loc-{}", n)),
            name: format!("Location {}", n),
            address: Some(format!("{} Marina Walk", n)),
            latitude: None,
            longitude: None,
        }
    }

    pub fn locations(count: usize) -> Vec<Location> {
        (1..=count).map(location).collect()
    }

    pub fn building(id: &str, location: &str) -> Building {
        Building {
            id: RecordId::new(id),
            name: format!("{} Tower", id),
            location: EntityRef::named(location, format!("{} name", location)),
            amount: 150.0,
            card_charges: 3.0,
            schedule: true,
            schedule_days: [Weekday::Monday, Weekday::Thursday].into_iter().collect(),
        }
    }

    pub fn person(id: &str, kind: PersonKind, buildings: &[&str]) -> Person {
        Person {
            id: RecordId::new(id),
            name: format!("Person {}", id),
            mobile: Some("0501112233".to_string()),
            kind,
            buildings: buildings.iter().map(|b| EntityRef::new(*b)).collect(),
        }
    }

    pub fn pending_booking(id: &str) -> Booking {
        Booking {
            id: RecordId::new(id),
            customer: EntityRef::named("cust-1", "Amal"),
            worker: None,
            date: None,
            time: Some("08:30".to_string()),
            service_type: "interior".to_string(),
            status: BookingStatus::Pending,
            mall: Some(EntityRef::named("mall-1", "City Centre")),
            building: None,
            mobile: Some("0501234567".to_string()),
            registration_no: Some("DXB-4411".to_string()),
            parking_no: Some("B2-17".to_string()),
        }
    }

    pub fn enquiry(id: &str) -> Enquiry {
        Enquiry {
            id: RecordId::new(id),
            name: Some("Noor".to_string()),
            mobile: "0509876543".to_string(),
            email: None,
            status: EnquiryStatus::Pending,
            vehicles: vec![Vehicle {
                id: Some(RecordId::new(format!("{}-v1", id))),
                registration_no: "SHJ-77".to_string(),
                parking_no: Some("P1".to_string()),
                vehicle_type: Some("sedan".to_string()),
                worker: Some(EntityRef::new("w-1")),
                building: Some(EntityRef::new("bld-1")),
                schedule_days: [Weekday::Saturday].into_iter().collect(),
                amount: Some(200.0),
            }],
        }
    }

    pub fn worker_attendance(id: &str, present: bool) -> AttendanceRecord {
        AttendanceRecord {
            id: RecordId::new(id),
            date: None,
            subject: AttendanceSubject::Worker {
                worker: EntityRef::named("w-1", "Ravi"),
            },
            present,
            type_code: String::new(),
            notes: String::new(),
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    use super::*;

    /// Assert that a result is an API rejection with the given status.
    pub fn assert_api_status<T: std::fmt::Debug>(result: &Result<T, ClientError>, status: u16) {
        match result {
            Err(ClientError::Api { status: got, .. }) => {
                assert_eq!(*got, status, "unexpected API status")
            }
            other => panic!("Expected API error {}, got {:?}", status, other),
        }
    }

    /// Assert that validation failed on `field`.
    pub fn assert_invalid_field<T: std::fmt::Debug>(
        result: &Result<T, ValidationError>,
        field: &str,
    ) {
        match result {
            Err(err) => assert_eq!(err.field(), field, "wrong field in {}", err),
            Ok(value) => panic!("Expected validation error on {}, got {:?}", field, value),
        }
    }

    pub fn assert_last_notification(log: &NotificationLog, message: &str) {
        let latest = log.latest().expect("Expected a notification");
        assert_eq!(latest.message, message);
    }
}
