//! Navigation and view switching utilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Locations,
    Buildings,
    Bookings,
    Enquiries,
    Attendance,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Locations => "Locations",
            View::Buildings => "Buildings",
            View::Bookings => "Bookings",
            View::Enquiries => "Enquiries",
            View::Attendance => "Attendance",
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Locations,
            View::Buildings,
            View::Bookings,
            View::Enquiries,
            View::Attendance,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }

    /// Status values the status filter cycles through, if the view has one.
    pub fn statuses(&self) -> &'static [&'static str] {
        match self {
            View::Bookings => &["pending", "accepted", "completed"],
            View::Enquiries => &["pending", "completed", "cancelled"],
            _ => &[],
        }
    }

    pub fn filters_location(&self) -> bool {
        matches!(self, View::Buildings | View::Attendance)
    }

    pub fn filters_building(&self) -> bool {
        matches!(self, View::Attendance)
    }

    pub fn filters_worker(&self) -> bool {
        matches!(self, View::Bookings | View::Enquiries | View::Attendance)
    }

    pub fn filters_dates(&self) -> bool {
        matches!(self, View::Bookings | View::Enquiries | View::Attendance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_previous_wrap() {
        assert_eq!(View::Attendance.next(), View::Locations);
        assert_eq!(View::Locations.previous(), View::Attendance);
        assert_eq!(View::Buildings.next().previous(), View::Buildings);
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(View::from_index(2), Some(View::Bookings));
        assert_eq!(View::from_index(5), None);
    }

    #[test]
    fn test_only_bookings_and_enquiries_have_status_filters() {
        assert!(View::Locations.statuses().is_empty());
        assert_eq!(View::Enquiries.statuses().len(), 3);
    }

    #[test]
    fn test_location_filter_only_where_it_narrows() {
        assert!(View::Buildings.filters_location());
        assert!(!View::Bookings.filters_location());
        assert!(View::Attendance.filters_building());
        assert!(!View::Locations.filters_worker());
    }
}
