//! List State Store.
//!
//! [`ListState::reduce`] is the pure transition function; [`ListStore`]
//! pairs it with a resource and drives fetches and mutations through it.
//! The cache is only ever changed by dispatching a [`ListAction`].

use crate::error::ClientError;
use crate::notify::NotificationSink;
use crate::resource::{
    resilient_list, AttendanceResource, BookingResource, DeleteResource, ListOutcome,
    ListRequest, ListResource, RestoreResource, SaveResource,
};
use std::sync::Arc;
use washdesk_core::{
    narrow, AttendanceRecord, AttendanceUpdate, Identified, Pagination, RecordId, TextSearchable,
};

/// Identifies one fetch. Only the most recently issued token may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

impl FetchToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A fetch that has been started but not completed.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub token: FetchToken,
    pub request: ListRequest,
}

/// How the cache follows a confirmed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStrategy {
    /// Apply the confirmed record to the cached page.
    Splice,
    /// Re-run the active fetch.
    Refetch,
}

#[derive(Debug, Clone)]
pub enum ListAction<T> {
    FetchStarted {
        token: FetchToken,
        request: ListRequest,
    },
    FetchCompleted {
        token: FetchToken,
        outcome: ListOutcome<T>,
    },
    /// Prepend a newly created record.
    Created(T),
    /// Replace the cached record with the same id.
    Replaced(T),
    Removed(RecordId),
}

#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub records: Vec<T>,
    pub pagination: Pagination,
    pub loading: bool,
    pub error: Option<String>,
    /// Parameters of the most recent fetch.
    pub request: ListRequest,
    latest: Option<FetchToken>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            pagination: Pagination::default(),
            loading: false,
            error: None,
            request: ListRequest::default(),
            latest: None,
        }
    }
}

impl<T: Identified + Clone> ListState<T> {
    pub fn latest_token(&self) -> Option<FetchToken> {
        self.latest
    }

    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn reduce(mut self, action: ListAction<T>) -> Self {
        match action {
            ListAction::FetchStarted { token, request } => {
                self.latest = Some(token);
                self.loading = true;
                self.request = request;
            }
            ListAction::FetchCompleted { token, outcome } => {
                if self.latest != Some(token) {
                    tracing::debug!(token = token.value(), "discarding stale fetch");
                    return self;
                }
                self.pagination =
                    Pagination::new(self.request.page, self.request.limit, outcome.page.total);
                self.records = outcome.page.records;
                self.error = outcome.error;
                self.loading = false;
            }
            ListAction::Created(record) => {
                self.records.insert(0, record);
                self.records.truncate(self.pagination.limit as usize);
                self.pagination = self.pagination.with_total(self.pagination.total + 1);
            }
            ListAction::Replaced(record) => {
                if let Some(slot) = self.records.iter_mut().find(|r| r.id() == record.id()) {
                    *slot = record;
                }
            }
            ListAction::Removed(id) => {
                let before = self.records.len();
                self.records.retain(|r| r.id() != &id);
                if self.records.len() < before {
                    self.pagination = self
                        .pagination
                        .with_total(self.pagination.total.saturating_sub(1));
                }
            }
        }
        self
    }
}

impl<T: TextSearchable> ListState<T> {
    /// Records after client-side text narrowing.
    pub fn visible(&self) -> Vec<&T> {
        narrow(&self.records, self.request.query.client_text.as_deref())
    }
}

/// One entity's cache plus the resource it syncs with.
pub struct ListStore<R: ListResource> {
    resource: Arc<R>,
    state: ListState<R::Record>,
    strategy: MutationStrategy,
    sink: Arc<dyn NotificationSink>,
    next_token: u64,
}

impl<R: ListResource> ListStore<R> {
    pub fn new(resource: Arc<R>, strategy: MutationStrategy, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            resource,
            state: ListState::default(),
            strategy,
            sink,
            next_token: 0,
        }
    }

    pub fn state(&self) -> &ListState<R::Record> {
        &self.state
    }

    pub fn resource(&self) -> &Arc<R> {
        &self.resource
    }

    pub fn sink(&self) -> Arc<dyn NotificationSink> {
        Arc::clone(&self.sink)
    }

    pub fn strategy(&self) -> MutationStrategy {
        self.strategy
    }

    pub fn dispatch(&mut self, action: ListAction<R::Record>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    /// Issue a new token and mark the store loading. Any fetch still in
    /// flight becomes stale.
    pub fn begin_fetch(&mut self, request: ListRequest) -> FetchTicket {
        self.next_token += 1;
        let token = FetchToken(self.next_token);
        self.dispatch(ListAction::FetchStarted {
            token,
            request: request.clone(),
        });
        FetchTicket { token, request }
    }

    /// Re-issue the active request.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        let request = self.state.request.clone();
        self.begin_fetch(request)
    }

    /// Apply a finished fetch. Returns false when the token was stale.
    pub fn complete_fetch(&mut self, token: FetchToken, outcome: ListOutcome<R::Record>) -> bool {
        let current = self.state.latest == Some(token);
        self.dispatch(ListAction::FetchCompleted { token, outcome });
        current
    }

    pub async fn fetch(&mut self, request: ListRequest) -> bool {
        let ticket = self.begin_fetch(request);
        let outcome = resilient_list(self.resource.as_ref(), &ticket.request, self.sink.as_ref()).await;
        self.complete_fetch(ticket.token, outcome)
    }

    pub async fn refresh(&mut self) -> bool {
        let request = self.state.request.clone();
        self.fetch(request).await
    }

    /// Follow a confirmed write. Under [`MutationStrategy::Splice`] the
    /// action lands now; under [`MutationStrategy::Refetch`] the cache is
    /// untouched and the returned ticket must be fetched by the caller.
    pub fn settle_confirmed(&mut self, action: ListAction<R::Record>) -> Option<FetchTicket> {
        match self.strategy {
            MutationStrategy::Splice => {
                self.dispatch(action);
                None
            }
            MutationStrategy::Refetch => Some(self.begin_refresh()),
        }
    }

    async fn settle(&mut self, action: ListAction<R::Record>) {
        if let Some(ticket) = self.settle_confirmed(action) {
            let outcome =
                resilient_list(self.resource.as_ref(), &ticket.request, self.sink.as_ref()).await;
            self.complete_fetch(ticket.token, outcome);
        }
    }
}

impl<R: SaveResource> ListStore<R> {
    pub async fn create(&mut self, payload: &R::Payload) -> Result<R::Record, ClientError> {
        let record = self.resource.create(payload).await?;
        tracing::info!(resource = self.resource.name(), id = %record.id(), "created");
        self.settle(ListAction::Created(record.clone())).await;
        Ok(record)
    }

    pub async fn update(
        &mut self,
        id: &RecordId,
        payload: &R::Payload,
    ) -> Result<R::Record, ClientError> {
        let record = self.resource.update(id, payload).await?;
        tracing::info!(resource = self.resource.name(), id = %id, "updated");
        self.settle(ListAction::Replaced(record.clone())).await;
        Ok(record)
    }
}

impl<R: DeleteResource> ListStore<R> {
    pub async fn delete(&mut self, id: &RecordId) -> Result<(), ClientError> {
        self.resource.delete(id).await?;
        tracing::info!(resource = self.resource.name(), id = %id, "deleted");
        self.settle(ListAction::Removed(id.clone())).await;
        Ok(())
    }
}

impl<R: RestoreResource> ListStore<R> {
    /// Restore a soft-deleted record. The endpoint returns nothing, so the
    /// page is always re-fetched.
    pub async fn undo_delete(&mut self, id: &RecordId) -> Result<(), ClientError> {
        self.resource.undo_delete(id).await?;
        tracing::info!(resource = self.resource.name(), id = %id, "restored");
        self.refresh().await;
        Ok(())
    }
}

impl<R: BookingResource> ListStore<R> {
    pub async fn accept(&mut self, id: &RecordId) -> Result<(), ClientError> {
        let booking = self.resource.accept(id).await?;
        self.settle(ListAction::Replaced(booking)).await;
        Ok(())
    }

    pub async fn assign_worker(&mut self, id: &RecordId, worker: &RecordId) -> Result<(), ClientError> {
        let booking = self.resource.assign_worker(id, worker).await?;
        self.settle(ListAction::Replaced(booking)).await;
        Ok(())
    }
}

/// An attendance change already shown in the cache, waiting on the server.
#[derive(Debug, Clone)]
pub struct StagedUpdate {
    pub update: AttendanceUpdate,
    /// The row as it was before staging.
    pub original: AttendanceRecord,
}

impl<R: AttendanceResource> ListStore<R> {
    /// Flip `present` locally, then confirm. The row reverts if the server
    /// rejects the update.
    pub async fn toggle_present(&mut self, id: &RecordId) -> Result<(), ClientError> {
        let staged = self.stage_toggle(id)?;
        self.confirm(staged).await
    }

    pub async fn set_notes(&mut self, id: &RecordId, notes: &str) -> Result<(), ClientError> {
        let staged = self.stage_notes(id, notes)?;
        self.confirm(staged).await
    }

    pub async fn export(&self) -> Result<Vec<u8>, ClientError> {
        self.resource.export(&self.state.request).await
    }

    pub fn stage_toggle(&mut self, id: &RecordId) -> Result<StagedUpdate, ClientError> {
        let record = self.attendance_record(id)?;
        Ok(self.stage(AttendanceUpdate::toggle_present(&record), record))
    }

    pub fn stage_notes(&mut self, id: &RecordId, notes: &str) -> Result<StagedUpdate, ClientError> {
        let record = self.attendance_record(id)?;
        Ok(self.stage(AttendanceUpdate::with_notes(&record, notes), record))
    }

    /// Put the staged row back the way it was. Only that row is touched, so
    /// a page that landed meanwhile is kept.
    pub fn revert(&mut self, staged: StagedUpdate) {
        tracing::warn!(id = %staged.original.id, "attendance update rejected, reverting");
        self.dispatch(ListAction::Replaced(staged.original));
    }

    fn stage(&mut self, update: AttendanceUpdate, original: AttendanceRecord) -> StagedUpdate {
        self.dispatch(ListAction::Replaced(update.applied_to(&original)));
        StagedUpdate { update, original }
    }

    fn attendance_record(&self, id: &RecordId) -> Result<AttendanceRecord, ClientError> {
        self.state
            .find(id)
            .cloned()
            .ok_or_else(|| ClientError::InvalidRequest(format!("attendance record {} not loaded", id)))
    }

    async fn confirm(&mut self, staged: StagedUpdate) -> Result<(), ClientError> {
        match self.resource.update_fields(&staged.update).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.revert(staged);
                Err(err)
            }
        }
    }
}
