use super::RestClient;
use crate::error::ClientError;
use crate::resource::{DeleteResource, ListRequest, ListResource, RestoreResource, SaveResource};
use async_trait::async_trait;
use washdesk_core::{Building, BuildingPayload, Page, PageConvention, RecordId, TextSearch};

const PATH: &str = "/buildings";

/// `/buildings`: 1-based `page`/`limit`, soft delete with undo.
#[derive(Clone)]
pub struct BuildingsClient {
    rest: RestClient,
}

impl BuildingsClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ListResource for BuildingsClient {
    type Record = Building;

    fn name(&self) -> &'static str {
        "buildings"
    }

    fn text_search(&self) -> TextSearch {
        TextSearch::Server
    }

    async fn list(&self, request: &ListRequest) -> Result<Page<Building>, ClientError> {
        let params = request.query.params.clone().only(&["search", "location"]);
        self.rest
            .get_page(PATH, PageConvention::PAGE_LIMIT, request.page, request.limit, &params)
            .await
    }
}

#[async_trait]
impl SaveResource for BuildingsClient {
    type Payload = BuildingPayload;

    async fn create(&self, payload: &BuildingPayload) -> Result<Building, ClientError> {
        self.rest.post_json(PATH, payload).await
    }

    async fn update(&self, id: &RecordId, payload: &BuildingPayload) -> Result<Building, ClientError> {
        self.rest.put_json(&format!("{}/{}", PATH, id), payload).await
    }
}

#[async_trait]
impl DeleteResource for BuildingsClient {
    async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        self.rest.delete(&format!("{}/{}", PATH, id)).await
    }
}

#[async_trait]
impl RestoreResource for BuildingsClient {
    async fn undo_delete(&self, id: &RecordId) -> Result<(), ClientError> {
        self.rest.delete(&format!("{}/{}/undo", PATH, id)).await
    }
}
