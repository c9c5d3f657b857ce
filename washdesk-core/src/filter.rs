//! Filter/search composition.
//!
//! Turns the raw filter state a list view holds into the parameters an
//! endpoint accepts. Empty values never reach the wire. Free text goes to
//! the server only where the endpoint supports it; everywhere else it
//! narrows the fetched page in memory, after the structured fetch.

use crate::identity::RecordId;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Records that expose a fixed allowlist of identifying text for client-side
/// search (mobile, registration number, parking number and similar).
pub trait TextSearchable {
    fn search_fields(&self) -> Vec<&str>;

    fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Where an endpoint's free-text search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSearch {
    /// Endpoint accepts a `search` parameter.
    Server,
    /// Endpoint has no text search; narrow the cached page instead.
    Client,
}

/// Raw filter state as edited in a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<String>,
    location: Option<RecordId>,
    building: Option<RecordId>,
    worker: Option<RecordId>,
    pub premise: Option<RecordId>,
    pub mall: Option<RecordId>,
    pub site: Option<RecordId>,
    pub text: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<&RecordId> {
        self.location.as_ref()
    }

    pub fn building(&self) -> Option<&RecordId> {
        self.building.as_ref()
    }

    pub fn worker(&self) -> Option<&RecordId> {
        self.worker.as_ref()
    }

    /// Changing the location invalidates the building and worker picked
    /// under the old one.
    pub fn set_location(&mut self, location: Option<RecordId>) {
        if self.location != location {
            self.building = None;
            self.worker = None;
        }
        self.location = location;
    }

    /// Changing the building invalidates the worker picked under the old one.
    pub fn set_building(&mut self, building: Option<RecordId>) {
        if self.building != building {
            self.worker = None;
        }
        self.building = building;
    }

    pub fn set_worker(&mut self, worker: Option<RecordId>) {
        self.worker = worker;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Query parameters with empty values already dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` unless it is blank.
    pub fn text(mut self, key: &str, value: &str) -> Self {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.0.insert(key.to_string(), trimmed.to_string());
        }
        self
    }

    pub fn opt_text(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.text(key, value),
            None => self,
        }
    }

    pub fn id(self, key: &str, value: Option<&RecordId>) -> Self {
        self.opt_text(key, value.map(RecordId::as_str))
    }

    pub fn date(self, key: &str, value: Option<NaiveDate>) -> Self {
        match value {
            Some(date) => self.text(key, &date.format("%Y-%m-%d").to_string()),
            None => self,
        }
    }

    /// Keep only the keys an endpoint documents.
    pub fn only(mut self, keys: &[&str]) -> Self {
        self.0.retain(|k, _| keys.contains(&k.as_str()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs ready for `reqwest::RequestBuilder::query`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Output of [`compose`]: what goes to the server, and what stays local.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedQuery {
    pub params: QueryParams,
    pub client_text: Option<String>,
}

/// Compose raw filter state into server parameters.
pub fn compose(filters: &FilterState, search: TextSearch) -> ComposedQuery {
    let params = QueryParams::new()
        .date("startDate", filters.date_from)
        .date("endDate", filters.date_to)
        .opt_text("status", filters.status.as_deref())
        .id("location", filters.location())
        .id("building", filters.building())
        .id("worker", filters.worker())
        .id("premise", filters.premise.as_ref())
        .id("mall", filters.mall.as_ref())
        .id("site", filters.site.as_ref());

    let text = filters.text.trim();
    match (search, text.is_empty()) {
        (_, true) => ComposedQuery {
            params,
            client_text: None,
        },
        (TextSearch::Server, false) => ComposedQuery {
            params: params.text("search", text),
            client_text: None,
        },
        (TextSearch::Client, false) => ComposedQuery {
            params,
            client_text: Some(text.to_string()),
        },
    }
}

/// Narrow already-fetched records by the client-side text, if any.
pub fn narrow<'a, T: TextSearchable>(records: &'a [T], client_text: Option<&str>) -> Vec<&'a T> {
    match client_text {
        Some(text) => records.iter().filter(|r| r.matches_text(text)).collect(),
        None => records.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plate(&'static str, &'static str);

    impl TextSearchable for Plate {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.0, self.1]
        }
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let mut filters = FilterState::new();
        filters.status = Some(String::new());
        filters.text = "   ".to_string();
        let composed = compose(&filters, TextSearch::Server);
        assert!(composed.params.is_empty());
        assert!(!composed.params.contains("status"));
        assert!(composed.client_text.is_none());
    }

    #[test]
    fn test_structured_fields_are_sent() {
        let mut filters = FilterState::new();
        filters.status = Some("pending".to_string());
        filters.date_from = NaiveDate::from_ymd_opt(2024, 1, 1);
        filters.set_location(Some(RecordId::new("loc-1")));
        filters.set_building(Some(RecordId::new("b-1")));
        let composed = compose(&filters, TextSearch::Client);
        assert_eq!(composed.params.get("status"), Some("pending"));
        assert_eq!(composed.params.get("startDate"), Some("2024-01-01"));
        assert_eq!(composed.params.get("building"), Some("b-1"));
        assert!(!composed.params.contains("endDate"));
    }

    #[test]
    fn test_text_routing_follows_endpoint_capability() {
        let mut filters = FilterState::new();
        filters.text = " DXB 123 ".to_string();

        let server = compose(&filters, TextSearch::Server);
        assert_eq!(server.params.get("search"), Some("DXB 123"));
        assert!(server.client_text.is_none());

        let client = compose(&filters, TextSearch::Client);
        assert!(!client.params.contains("search"));
        assert_eq!(client.client_text.as_deref(), Some("DXB 123"));
    }

    #[test]
    fn test_clearing_location_resets_building_and_worker() {
        let mut filters = FilterState::new();
        filters.set_location(Some(RecordId::new("loc-1")));
        filters.set_building(Some(RecordId::new("b-1")));
        filters.set_worker(Some(RecordId::new("w-1")));

        filters.set_location(None);
        assert!(filters.location().is_none());
        assert!(filters.building().is_none());
        assert!(filters.worker().is_none());
    }

    #[test]
    fn test_reselecting_same_location_keeps_building() {
        let mut filters = FilterState::new();
        filters.set_location(Some(RecordId::new("loc-1")));
        filters.set_building(Some(RecordId::new("b-1")));
        filters.set_location(Some(RecordId::new("loc-1")));
        assert_eq!(filters.building(), Some(&RecordId::new("b-1")));
    }

    #[test]
    fn test_changing_building_resets_worker() {
        let mut filters = FilterState::new();
        filters.set_building(Some(RecordId::new("b-1")));
        filters.set_worker(Some(RecordId::new("w-1")));
        filters.set_building(Some(RecordId::new("b-2")));
        assert!(filters.worker().is_none());
    }

    #[test]
    fn test_only_drops_undocumented_keys() {
        let params = QueryParams::new()
            .text("status", "pending")
            .text("mall", "m-1")
            .only(&["status", "worker"]);
        assert_eq!(params.get("status"), Some("pending"));
        assert!(!params.contains("mall"));
    }

    #[test]
    fn test_narrow_is_case_insensitive_substring() {
        let records = vec![Plate("0501234567", "DXB-A-4411"), Plate("0559876543", "SHJ-7")];
        let hits = narrow(&records, Some("dxb"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "0501234567");
        assert_eq!(narrow(&records, None).len(), 2);
    }
}
