//! Resource Client traits.
//!
//! One trait per capability, so a store can only offer the mutations its
//! endpoint family actually has. REST clients and [`crate::mock::MockResource`]
//! both implement them.

use crate::error::ClientError;
use crate::notify::NotificationSink;
use async_trait::async_trait;
use serde::Serialize;
use washdesk_core::{
    AttendanceRecord, AttendanceUpdate, Booking, ComposedQuery, Identified, Page, Person,
    RecordId, TextSearch,
};

/// One page request: 1-based page, page size, and the composed filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub page: u32,
    pub limit: u32,
    pub query: ComposedQuery,
}

impl ListRequest {
    pub fn new(page: u32, limit: u32, query: ComposedQuery) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            query,
        }
    }
}

impl Default for ListRequest {
    fn default() -> Self {
        Self::new(1, 10, ComposedQuery::default())
    }
}

#[async_trait]
pub trait ListResource: Send + Sync {
    type Record: Identified + Clone + Send + Sync + 'static;

    /// Short resource name for logs and notifications.
    fn name(&self) -> &'static str;

    /// Where free-text search runs for this endpoint.
    fn text_search(&self) -> TextSearch;

    async fn list(&self, request: &ListRequest) -> Result<Page<Self::Record>, ClientError>;
}

#[async_trait]
pub trait SaveResource: ListResource {
    type Payload: Serialize + Send + Sync;

    async fn create(&self, payload: &Self::Payload) -> Result<Self::Record, ClientError>;

    async fn update(
        &self,
        id: &RecordId,
        payload: &Self::Payload,
    ) -> Result<Self::Record, ClientError>;
}

#[async_trait]
pub trait DeleteResource: ListResource {
    async fn delete(&self, id: &RecordId) -> Result<(), ClientError>;
}

#[async_trait]
pub trait LookupResource: ListResource {
    async fn get(&self, id: &RecordId) -> Result<Self::Record, ClientError>;
}

/// Soft-delete restore.
#[async_trait]
pub trait RestoreResource: DeleteResource {
    async fn undo_delete(&self, id: &RecordId) -> Result<(), ClientError>;
}

#[async_trait]
pub trait BookingResource: ListResource<Record = Booking> {
    async fn accept(&self, id: &RecordId) -> Result<Booking, ClientError>;

    async fn assign_worker(&self, id: &RecordId, worker: &RecordId)
        -> Result<Booking, ClientError>;
}

#[async_trait]
pub trait AttendanceResource: ListResource<Record = AttendanceRecord> {
    /// Batched field update. The endpoint acknowledges without a body.
    async fn update_fields(&self, update: &AttendanceUpdate) -> Result<(), ClientError>;

    /// Spreadsheet export of the filtered attendance list.
    async fn export(&self, request: &ListRequest) -> Result<Vec<u8>, ClientError>;
}

#[async_trait]
pub trait PeopleResource: Send + Sync {
    /// Everyone attendance can be recorded for.
    async fn org_list(&self) -> Result<Vec<Person>, ClientError>;
}

/// Result of a list read that never fails outright.
#[derive(Debug, Clone)]
pub struct ListOutcome<T> {
    pub page: Page<T>,
    pub error: Option<String>,
}

impl<T> ListOutcome<T> {
    pub fn ok(page: Page<T>) -> Self {
        Self { page, error: None }
    }

    pub fn failed(message: String) -> Self {
        Self {
            page: Page::empty(),
            error: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Read boundary: a failed list becomes an empty page plus a notification,
/// and the message is handed back for the store's `error` field.
pub async fn resilient_list<R>(
    resource: &R,
    request: &ListRequest,
    sink: &dyn NotificationSink,
) -> ListOutcome<R::Record>
where
    R: ListResource + ?Sized,
{
    match resource.list(request).await {
        Ok(page) => ListOutcome::ok(page),
        Err(err) => {
            tracing::warn!(resource = resource.name(), error = %err, "list request failed");
            let message = err.user_message(&format!("Failed to load {}", resource.name()));
            sink.error(message.clone());
            ListOutcome::failed(message)
        }
    }
}
