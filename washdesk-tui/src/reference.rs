//! Reference lists behind the filter and form selects.
//!
//! Locations, buildings and assignable people are loaded once at startup
//! and again on demand. A failed list leaves that list empty and notifies;
//! the console stays usable without it.

use futures_util::future::join3;
use washdesk_client::{
    resilient_list, ListRequest, ListResource, NotificationSink, PeopleResource,
};
use washdesk_core::{
    buildings_for_location, workers_for_building, Building, Location, Person, PersonKind,
    RecordId,
};

/// Page size used when pulling a whole reference list in one request.
pub const REFERENCE_LIMIT: u32 = 500;

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub locations: Vec<Location>,
    pub buildings: Vec<Building>,
    pub people: Vec<Person>,
}

impl ReferenceData {
    pub fn location_name(&self, id: &RecordId) -> Option<&str> {
        self.locations
            .iter()
            .find(|l| &l.id == id)
            .map(|l| l.name.as_str())
    }

    pub fn building_name(&self, id: &RecordId) -> Option<&str> {
        self.buildings
            .iter()
            .find(|b| &b.id == id)
            .map(|b| b.name.as_str())
    }

    pub fn person_name(&self, id: &RecordId) -> Option<&str> {
        self.people
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.name.as_str())
    }

    pub fn buildings_under(&self, location: Option<&RecordId>) -> Vec<&Building> {
        buildings_for_location(&self.buildings, location)
    }

    pub fn workers_on(&self, building: Option<&RecordId>) -> Vec<&Person> {
        workers_for_building(&self.people, building)
            .into_iter()
            .filter(|p| p.kind == PersonKind::Worker)
            .collect()
    }

    pub fn workers(&self) -> Vec<&Person> {
        self.people
            .iter()
            .filter(|p| p.kind == PersonKind::Worker)
            .collect()
    }
}

pub async fn load<L, B, P>(
    locations: &L,
    buildings: &B,
    people: &P,
    sink: &dyn NotificationSink,
) -> ReferenceData
where
    L: ListResource<Record = Location> + ?Sized,
    B: ListResource<Record = Building> + ?Sized,
    P: PeopleResource + ?Sized,
{
    let request = ListRequest::new(1, REFERENCE_LIMIT, Default::default());
    let (locations, buildings, people) = join3(
        resilient_list(locations, &request, sink),
        resilient_list(buildings, &request, sink),
        people.org_list(),
    )
    .await;

    let people = match people {
        Ok(people) => people,
        Err(err) => {
            tracing::warn!(error = %err, "people list failed");
            sink.error(err.user_message("Failed to load workers"));
            Vec::new()
        }
    };

    let data = ReferenceData {
        locations: locations.page.records,
        buildings: buildings.page.records,
        people,
    };
    tracing::info!(
        locations = data.locations.len(),
        buildings = data.buildings.len(),
        people = data.people.len(),
        "reference data loaded"
    );
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use washdesk_client::{ClientError, MockOp, MockResource, NotificationLog};
    use washdesk_test_utils::fixtures;

    #[tokio::test]
    async fn test_load_collects_all_three_lists() {
        let locations = MockResource::new("locations", fixtures::locations(3));
        let buildings = MockResource::new(
            "buildings",
            vec![fixtures::building("bld-1", "loc-1"), fixtures::building("bld-2", "loc-2")],
        );
        let people = MockResource::new(
            "people",
            vec![
                fixtures::person("w-1", PersonKind::Worker, &["bld-1"]),
                fixtures::person("s-1", PersonKind::Staff, &["bld-1"]),
            ],
        );
        let log = NotificationLog::new();

        let data = load(&locations, &buildings, &people, &log).await;
        assert_eq!(data.locations.len(), 3);
        assert_eq!(data.buildings.len(), 2);
        assert!(log.is_empty());

        let loc1 = RecordId::new("loc-1");
        let under: Vec<_> = data.buildings_under(Some(&loc1)).iter().map(|b| b.id.to_string()).collect();
        assert_eq!(under, vec!["bld-1"]);

        let bld1 = RecordId::new("bld-1");
        let workers: Vec<_> = data.workers_on(Some(&bld1)).iter().map(|p| p.id.to_string()).collect();
        assert_eq!(workers, vec!["w-1"]);
    }

    #[tokio::test]
    async fn test_failed_list_is_empty_and_notified() {
        let locations = MockResource::new("locations", fixtures::locations(2));
        let buildings = MockResource::new("buildings", Vec::<Building>::new());
        let people = MockResource::new("people", Vec::<Person>::new());
        people.fail_next(MockOp::OrgList, ClientError::api(503, "roster offline"));
        let log = NotificationLog::new();

        let data = load(&locations, &buildings, &people, &log).await;
        assert_eq!(data.locations.len(), 2);
        assert!(data.people.is_empty());
        assert_eq!(log.latest().unwrap().message, "roster offline");
    }
}
