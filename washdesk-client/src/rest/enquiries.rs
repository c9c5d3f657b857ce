use super::RestClient;
use crate::error::ClientError;
use crate::resource::{DeleteResource, ListRequest, ListResource, LookupResource, SaveResource};
use async_trait::async_trait;
use washdesk_core::{Enquiry, EnquiryPayload, Page, PageConvention, RecordId, TextSearch};

const PATH: &str = "/enquiry";

/// `/enquiry`: 0-based `pageNo`/`pageSize`, no server text search.
#[derive(Clone)]
pub struct EnquiriesClient {
    rest: RestClient,
}

impl EnquiriesClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ListResource for EnquiriesClient {
    type Record = Enquiry;

    fn name(&self) -> &'static str {
        "enquiries"
    }

    fn text_search(&self) -> TextSearch {
        TextSearch::Client
    }

    async fn list(&self, request: &ListRequest) -> Result<Page<Enquiry>, ClientError> {
        let params = request
            .query
            .params
            .clone()
            .only(&["status", "worker", "startDate", "endDate"]);
        self.rest
            .get_page(PATH, PageConvention::PAGE_NO_SIZE, request.page, request.limit, &params)
            .await
    }
}

#[async_trait]
impl SaveResource for EnquiriesClient {
    type Payload = EnquiryPayload;

    async fn create(&self, payload: &EnquiryPayload) -> Result<Enquiry, ClientError> {
        self.rest.post_json(PATH, payload).await
    }

    async fn update(&self, id: &RecordId, payload: &EnquiryPayload) -> Result<Enquiry, ClientError> {
        self.rest.put_json(&format!("{}/{}", PATH, id), payload).await
    }
}

#[async_trait]
impl DeleteResource for EnquiriesClient {
    async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        self.rest.delete(&format!("{}/{}", PATH, id)).await
    }
}

#[async_trait]
impl LookupResource for EnquiriesClient {
    async fn get(&self, id: &RecordId) -> Result<Enquiry, ClientError> {
        self.rest.get_json(&format!("{}/{}", PATH, id), &[]).await
    }
}
