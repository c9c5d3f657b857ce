//! Cascading reference options.
//!
//! Building options depend on the selected location; worker options depend
//! on the selected building. A dependent selection that drops out of its
//! recomputed option list is cleared so no orphaned reference is submitted.

use crate::entities::{Building, Person};
use crate::identity::{Identified, RecordId};

/// Buildings under `location`. No location selected means no options.
pub fn buildings_for_location<'a>(
    buildings: &'a [Building],
    location: Option<&RecordId>,
) -> Vec<&'a Building> {
    match location {
        Some(location) => buildings
            .iter()
            .filter(|b| b.location.refers_to(location))
            .collect(),
        None => Vec::new(),
    }
}

/// Workers rostered on `building`. No building selected means no options.
pub fn workers_for_building<'a>(
    people: &'a [Person],
    building: Option<&RecordId>,
) -> Vec<&'a Person> {
    match building {
        Some(building) => people.iter().filter(|p| p.works_in(building)).collect(),
        None => Vec::new(),
    }
}

/// Keep `selected` only if it is still one of `options`.
pub fn retain_if_available<T: Identified>(
    selected: Option<RecordId>,
    options: &[&T],
) -> Option<RecordId> {
    selected.filter(|id| options.iter().any(|o| o.id() == id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::EntityRef;
    use crate::schedule::ScheduleDays;

    fn building(id: &str, location: EntityRef) -> Building {
        Building {
            id: RecordId::new(id),
            name: id.to_uppercase(),
            location,
            amount: 0.0,
            card_charges: 0.0,
            schedule: false,
            schedule_days: ScheduleDays::new(),
        }
    }

    #[test]
    fn test_buildings_match_bare_and_expanded_location_refs() {
        let buildings = vec![
            building("b1", EntityRef::new("loc-1")),
            building("b2", EntityRef::named("loc-1", "Marina")),
            building("b3", EntityRef::new("loc-2")),
        ];
        let loc = RecordId::new("loc-1");
        let options = buildings_for_location(&buildings, Some(&loc));
        let ids: Vec<_> = options.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn test_no_location_means_no_buildings() {
        let buildings = vec![building("b1", EntityRef::new("loc-1"))];
        assert!(buildings_for_location(&buildings, None).is_empty());
    }

    #[test]
    fn test_orphaned_selection_is_cleared() {
        let buildings = vec![
            building("b1", EntityRef::new("loc-1")),
            building("b3", EntityRef::new("loc-2")),
        ];
        let loc2 = RecordId::new("loc-2");
        let options = buildings_for_location(&buildings, Some(&loc2));
        assert_eq!(retain_if_available(Some(RecordId::new("b1")), &options), None);
        assert_eq!(
            retain_if_available(Some(RecordId::new("b3")), &options),
            Some(RecordId::new("b3"))
        );
    }
}
