use super::RestClient;
use crate::error::ClientError;
use crate::resource::{AttendanceResource, ListRequest, ListResource, PeopleResource};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use washdesk_core::{
    AttendanceRecord, AttendanceUpdate, Envelope, Page, Person, QueryParams, TextSearch,
};

const PATH: &str = "/attendance";
const PARAM_KEYS: &[&str] = &[
    "startDate",
    "endDate",
    "worker",
    "premise",
    "mall",
    "site",
    "building",
    "search",
];

/// `/attendance`: unpaginated server-side, date range required.
#[derive(Clone)]
pub struct AttendanceClient {
    rest: RestClient,
}

impl AttendanceClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

/// Attendance filters with the date range defaulted to `today`.
pub fn attendance_params(params: &QueryParams, today: NaiveDate) -> QueryParams {
    let mut params = params.clone().only(PARAM_KEYS);
    if !params.contains("startDate") {
        params = params.date("startDate", Some(today));
    }
    if !params.contains("endDate") {
        params = params.date("endDate", Some(today));
    }
    params
}

/// Decode attendance rows one by one. A row that does not decode, such as
/// one with neither `worker` nor `staff`, is logged and skipped.
fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<AttendanceRecord> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<AttendanceRecord>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping attendance row");
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PeopleBody {
    Enveloped(Envelope<Person>),
    Bare(Vec<Person>),
}

#[async_trait]
impl ListResource for AttendanceClient {
    type Record = AttendanceRecord;

    fn name(&self) -> &'static str {
        "attendance"
    }

    fn text_search(&self) -> TextSearch {
        TextSearch::Server
    }

    async fn list(&self, request: &ListRequest) -> Result<Page<AttendanceRecord>, ClientError> {
        let params = attendance_params(&request.query.params, Local::now().date_naive());
        let envelope: Envelope<serde_json::Value> =
            self.rest.get_raw(PATH, &params.to_pairs()).await?;
        Ok(Page::slice(decode_rows(envelope.data), request.page, request.limit))
    }
}

#[async_trait]
impl AttendanceResource for AttendanceClient {
    async fn update_fields(&self, update: &AttendanceUpdate) -> Result<(), ClientError> {
        if update.ids.is_empty() {
            return Err(ClientError::InvalidRequest("no attendance ids".to_string()));
        }
        self.rest.put_ack(PATH, update).await
    }

    async fn export(&self, request: &ListRequest) -> Result<Vec<u8>, ClientError> {
        let params = attendance_params(&request.query.params, Local::now().date_naive());
        self.rest
            .get_bytes(&format!("{}/export/list", PATH), &params.to_pairs())
            .await
    }
}

#[async_trait]
impl PeopleResource for AttendanceClient {
    async fn org_list(&self) -> Result<Vec<Person>, ClientError> {
        let body: PeopleBody = self
            .rest
            .get_raw(&format!("{}/org/list", PATH), &[])
            .await?;
        Ok(match body {
            PeopleBody::Enveloped(envelope) => envelope.data,
            PeopleBody::Bare(people) => people,
        })
    }
}
