use super::RestClient;
use crate::error::ClientError;
use crate::resource::{BookingResource, DeleteResource, ListRequest, ListResource};
use async_trait::async_trait;
use washdesk_core::{AssignWorkerRequest, Booking, Page, PageConvention, RecordId, TextSearch};

const PATH: &str = "/bookings";

/// `/bookings`: 0-based `pageNo`/`pageSize`, server-side `search`.
#[derive(Clone)]
pub struct BookingsClient {
    rest: RestClient,
}

impl BookingsClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl ListResource for BookingsClient {
    type Record = Booking;

    fn name(&self) -> &'static str {
        "bookings"
    }

    fn text_search(&self) -> TextSearch {
        TextSearch::Server
    }

    async fn list(&self, request: &ListRequest) -> Result<Page<Booking>, ClientError> {
        let params = request
            .query
            .params
            .clone()
            .only(&["search", "status", "startDate", "endDate", "worker"]);
        self.rest
            .get_page(PATH, PageConvention::PAGE_NO_SIZE, request.page, request.limit, &params)
            .await
    }
}

#[async_trait]
impl BookingResource for BookingsClient {
    async fn accept(&self, id: &RecordId) -> Result<Booking, ClientError> {
        self.rest
            .put_json(&format!("{}/{}/accept", PATH, id), &serde_json::json!({}))
            .await
    }

    async fn assign_worker(&self, id: &RecordId, worker: &RecordId) -> Result<Booking, ClientError> {
        if worker.is_empty() {
            return Err(ClientError::InvalidRequest("worker is required".to_string()));
        }
        let body = AssignWorkerRequest {
            worker: worker.clone(),
        };
        self.rest
            .put_json(&format!("{}/{}/assign-worker", PATH, id), &body)
            .await
    }
}

#[async_trait]
impl DeleteResource for BookingsClient {
    async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        self.rest.delete(&format!("{}/{}", PATH, id)).await
    }
}
