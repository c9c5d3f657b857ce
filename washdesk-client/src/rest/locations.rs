use super::RestClient;
use crate::error::ClientError;
use crate::resource::{DeleteResource, ListRequest, ListResource, LookupResource, SaveResource};
use async_trait::async_trait;
use washdesk_core::{Location, LocationPayload, Page, PageConvention, RecordId, TextSearch};

const PATH: &str = "/locations";

/// `/locations`: 1-based `page`/`limit`, server-side `search`.
#[derive(Clone)]
pub struct LocationsClient {
    rest: RestClient,
}

impl LocationsClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ListResource for LocationsClient {
    type Record = Location;

    fn name(&self) -> &'static str {
        "locations"
    }

    fn text_search(&self) -> TextSearch {
        TextSearch::Server
    }

    async fn list(&self, request: &ListRequest) -> Result<Page<Location>, ClientError> {
        let params = request.query.params.clone().only(&["search"]);
        self.rest
            .get_page(PATH, PageConvention::PAGE_LIMIT, request.page, request.limit, &params)
            .await
    }
}

#[async_trait]
impl SaveResource for LocationsClient {
    type Payload = LocationPayload;

    async fn create(&self, payload: &LocationPayload) -> Result<Location, ClientError> {
        self.rest.post_json(PATH, payload).await
    }

    async fn update(&self, id: &RecordId, payload: &LocationPayload) -> Result<Location, ClientError> {
        self.rest.put_json(&format!("{}/{}", PATH, id), payload).await
    }
}

#[async_trait]
impl DeleteResource for LocationsClient {
    async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        self.rest.delete(&format!("{}/{}", PATH, id)).await
    }
}

#[async_trait]
impl LookupResource for LocationsClient {
    async fn get(&self, id: &RecordId) -> Result<Location, ClientError> {
        self.rest.get_json(&format!("{}/{}", PATH, id), &[]).await
    }
}
