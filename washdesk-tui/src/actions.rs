//! Row and form actions.
//!
//! A write runs in two halves. The request half owns everything it needs
//! and runs off the event loop, producing a [`Written`]. The landing half
//! applies that answer to the store on the event loop and reports it to
//! the store's notification sink.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use washdesk_client::{
    AttendanceResource, BookingResource, ClientError, DeleteResource, FetchTicket, ListAction,
    ListRequest, ListResource, ListStore, NotificationSink, RestoreResource, SaveResource,
    StagedUpdate,
};
use washdesk_core::{Identified, RecordId};

use crate::error::TuiError;
use crate::events::Written;

/// What is left to do once a write has landed.
#[derive(Debug, Default)]
pub struct Landed {
    /// User-facing message when the write failed.
    pub error: Option<String>,
    /// Fetch to run for stores that follow writes with a reload.
    pub refetch: Option<FetchTicket>,
}

impl Landed {
    fn done(refetch: Option<FetchTicket>) -> Self {
        Self {
            error: None,
            refetch,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            refetch: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn singular(name: &str) -> &str {
    name.strip_suffix('s').unwrap_or(name)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Create when `editing` is `None`, update otherwise.
pub async fn save<R>(resource: Arc<R>, editing: Option<RecordId>, payload: R::Payload) -> Written<R::Record>
where
    R: SaveResource,
{
    let result = match &editing {
        Some(id) => resource.update(id, &payload).await,
        None => resource.create(&payload).await,
    };
    Written::Saved { editing, result }
}

pub async fn delete<R: DeleteResource>(resource: Arc<R>, id: RecordId) -> Written<R::Record> {
    let result = resource.delete(&id).await;
    Written::Deleted { id, result }
}

pub async fn restore<R: RestoreResource>(resource: Arc<R>, id: RecordId) -> Written<R::Record> {
    let result = resource.undo_delete(&id).await;
    Written::Restored { id, result }
}

pub async fn accept<R: BookingResource>(resource: Arc<R>, id: RecordId) -> Written<R::Record> {
    let result = resource.accept(&id).await;
    Written::Accepted { id, result }
}

pub async fn assign<R: BookingResource>(
    resource: Arc<R>,
    id: RecordId,
    worker: RecordId,
) -> Written<R::Record> {
    let result = resource.assign_worker(&id, &worker).await;
    Written::Assigned { id, result }
}

pub async fn confirm_attendance<R: AttendanceResource>(
    resource: Arc<R>,
    staged: &StagedUpdate,
) -> Result<(), ClientError> {
    resource.update_fields(&staged.update).await
}

// ============================================================================
// Landing
// ============================================================================

/// Apply a write's answer to `store` and notify.
pub fn land<R: ListResource>(store: &mut ListStore<R>, written: Written<R::Record>) -> Landed {
    let name = store.resource().name();
    let noun = singular(name).to_string();
    let sink = store.sink();
    let (outcome, fallback) = match written {
        Written::Saved { editing, result } => {
            let fallback = format!("Failed to save {}", noun);
            let outcome = result.map(|record| {
                let verb = if editing.is_some() { "updated" } else { "created" };
                let message = format!("{} {} {}", capitalize(&noun), record.id(), verb);
                tracing::info!(resource = name, id = %record.id(), "{}", verb);
                let action = if editing.is_some() {
                    ListAction::Replaced(record)
                } else {
                    ListAction::Created(record)
                };
                (message, Some(action))
            });
            (outcome, fallback)
        }
        Written::Deleted { id, result } => {
            let outcome = result.map(|()| {
                tracing::info!(resource = name, id = %id, "deleted");
                (
                    format!("{} {} deleted", capitalize(&noun), id),
                    Some(ListAction::Removed(id)),
                )
            });
            (outcome, format!("Failed to delete {}", noun))
        }
        Written::Restored { id, result } => {
            let outcome = result.map(|()| {
                tracing::info!(resource = name, id = %id, "restored");
                (format!("{} {} restored", capitalize(&noun), id), None)
            });
            (outcome, format!("Failed to restore {}", noun))
        }
        Written::Accepted { id, result } => {
            let outcome = result.map(|record| {
                (format!("Booking {} accepted", id), Some(ListAction::Replaced(record)))
            });
            (outcome, "Failed to accept booking".to_string())
        }
        Written::Assigned { id, result } => {
            let outcome = result.map(|record| {
                (
                    format!("Worker assigned to booking {}", id),
                    Some(ListAction::Replaced(record)),
                )
            });
            (outcome, "Failed to assign worker".to_string())
        }
    };

    match outcome {
        Ok((message, action)) => {
            sink.success(message);
            // A restore returns no record, so the page is always reloaded.
            let refetch = match action {
                Some(action) => store.settle_confirmed(action),
                None => Some(store.begin_refresh()),
            };
            Landed::done(refetch)
        }
        Err(err) => {
            tracing::warn!(resource = name, error = %err, "{}", fallback);
            let message = err.user_message(&fallback);
            sink.error(message.clone());
            Landed::failed(message)
        }
    }
}

/// Keep or undo an attendance change that is already on screen.
pub fn land_attendance<R: AttendanceResource>(
    store: &mut ListStore<R>,
    staged: StagedUpdate,
    notes: bool,
    result: Result<(), ClientError>,
) -> Landed {
    let sink = store.sink();
    match result {
        Ok(()) => {
            if notes {
                sink.success("Notes saved".to_string());
            }
            Landed::default()
        }
        Err(err) => {
            let fallback = if notes {
                "Failed to save notes"
            } else {
                "Failed to update attendance"
            };
            tracing::warn!(error = %err, "{}", fallback);
            let message = err.user_message(fallback);
            sink.error(message.clone());
            store.revert(staged);
            Landed::failed(message)
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Download the spreadsheet for `request` into `dir`.
pub async fn export_attendance<R: AttendanceResource>(
    resource: Arc<R>,
    request: ListRequest,
    sink: Arc<dyn NotificationSink>,
    dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, TuiError> {
    let bytes = match resource.export(&request).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "attendance export failed");
            sink.error(err.user_message("Failed to export attendance"));
            return Err(err.into());
        }
    };
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(now));
    std::fs::write(&path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "attendance exported");
    sink.success(format!("Exported attendance to {}", path.display()));
    Ok(path)
}

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("attendance-{}.xlsx", now.format("%Y%m%d-%H%M%S"))
}

/// Id of the record a row action targets.
pub fn target_id<T: Identified>(record: Option<&T>) -> Option<RecordId> {
    record.map(|r| r.id().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use washdesk_client::{
        ListRequest, ListResource, MockCall, MockOp, MockResource, MutationStrategy,
        NotificationLevel, NotificationLog,
    };
    use washdesk_core::{BookingStatus, Location, LocationPayload};
    use washdesk_test_utils::{
        assertions::{assert_api_status, assert_last_notification},
        fixtures,
    };

    fn store<R: ListResource>(resource: R, strategy: MutationStrategy) -> (ListStore<R>, NotificationLog) {
        let log = NotificationLog::new();
        let sink: Arc<dyn NotificationSink> = Arc::new(log.clone());
        (ListStore::new(Arc::new(resource), strategy, sink), log)
    }

    fn list_calls<T: Identified + Clone + Send + Sync + 'static>(resource: &MockResource<T>) -> usize {
        resource
            .calls()
            .into_iter()
            .filter(|c| matches!(c, MockCall::List(_)))
            .count()
    }

    // ========================================================================
    // SAVE
    // ========================================================================

    #[tokio::test]
    async fn test_create_lands_and_notifies_success() {
        let (mut store, log) = store(
            MockResource::new("locations", fixtures::locations(1)),
            MutationStrategy::Splice,
        );
        store.fetch(ListRequest::default()).await;
        let payload = LocationPayload {
            name: "Marina".to_string(),
            ..Default::default()
        };

        let written = save(Arc::clone(store.resource()), None, payload).await;
        let landed = land(&mut store, written);
        assert!(landed.is_ok());
        assert!(landed.refetch.is_none());
        assert_eq!(store.state().records[0].name, "Marina");
        assert_eq!(store.state().records.len(), 2);
        assert_eq!(log.latest().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_failed_update_surfaces_server_message() {
        let resource = MockResource::new("locations", fixtures::locations(1));
        resource.fail_next(MockOp::Update, ClientError::api(422, "Name already taken"));
        let (mut store, log) = store(resource, MutationStrategy::Splice);
        store.fetch(ListRequest::default()).await;

        let original: Location = store.state().records[0].clone();
        let payload = LocationPayload::from(&original);
        let written = save(Arc::clone(store.resource()), Some(original.id.clone()), payload).await;
        if let Written::Saved { result, .. } = &written {
            assert_api_status(result, 422);
        }

        let landed = land(&mut store, written);
        assert_eq!(landed.error.as_deref(), Some("Name already taken"));
        assert_last_notification(&log, "Name already taken");
        assert_eq!(store.state().records[0], original);
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let resource = MockResource::new("locations", fixtures::locations(1));
        resource.fail_next(
            MockOp::Create,
            ClientError::Api {
                status: 500,
                message: None,
            },
        );
        let (mut store, log) = store(resource, MutationStrategy::Splice);
        let payload = LocationPayload {
            name: "Marina".to_string(),
            ..Default::default()
        };
        let written = save(Arc::clone(store.resource()), None, payload).await;
        assert!(!land(&mut store, written).is_ok());
        assert_last_notification(&log, "Failed to save location");
    }

    // ========================================================================
    // ROW ACTIONS
    // ========================================================================

    #[tokio::test]
    async fn test_rejected_delete_keeps_row_and_notifies() {
        let resource = MockResource::new("bookings", vec![fixtures::pending_booking("b-1")]);
        resource.fail_next(MockOp::Delete, ClientError::api(409, "Booking is in progress"));
        let (mut store, log) = store(resource, MutationStrategy::Refetch);
        store.fetch(ListRequest::default()).await;

        let id = RecordId::new("b-1");
        let written = delete(Arc::clone(store.resource()), id.clone()).await;
        let landed = land(&mut store, written);
        assert!(landed.refetch.is_none());
        assert!(store.state().find(&id).is_some());
        let note = log.latest().unwrap();
        assert_eq!(note.level, NotificationLevel::Error);
        assert_eq!(note.message, "Booking is in progress");
    }

    #[tokio::test]
    async fn test_accepted_booking_asks_for_a_refetch() {
        let (mut store, log) = store(
            MockResource::new("bookings", vec![fixtures::pending_booking("b-1")]),
            MutationStrategy::Refetch,
        );
        store.fetch(ListRequest::default()).await;
        let id = RecordId::new("b-1");

        let written = accept(Arc::clone(store.resource()), id.clone()).await;
        let landed = land(&mut store, written);
        assert_last_notification(&log, "Booking b-1 accepted");
        // The cached row waits for the reload.
        assert_eq!(store.state().find(&id).unwrap().status, BookingStatus::Pending);
        assert!(store.state().loading);

        let ticket = landed.refetch.unwrap();
        let resource = Arc::clone(store.resource());
        let page = resource.list(&ticket.request).await.unwrap();
        store.complete_fetch(ticket.token, washdesk_client::ListOutcome::ok(page));
        assert_eq!(store.state().find(&id).unwrap().status, BookingStatus::Accepted);
        assert_eq!(list_calls(&resource), 2);
    }

    #[tokio::test]
    async fn test_assign_worker_reports_booking() {
        let (mut store, log) = store(
            MockResource::new("bookings", vec![fixtures::pending_booking("b-1")]),
            MutationStrategy::Refetch,
        );
        let id = RecordId::new("b-1");
        let written = assign(Arc::clone(store.resource()), id, RecordId::new("w-9")).await;
        assert!(land(&mut store, written).refetch.is_some());
        assert_last_notification(&log, "Worker assigned to booking b-1");
    }

    #[tokio::test]
    async fn test_restore_always_reloads() {
        let (mut store, log) = store(
            MockResource::new("buildings", vec![fixtures::building("bld-1", "loc-1")]),
            MutationStrategy::Splice,
        );
        store.fetch(ListRequest::default()).await;
        let id = RecordId::new("bld-1");

        let written = delete(Arc::clone(store.resource()), id.clone()).await;
        assert!(land(&mut store, written).refetch.is_none());
        assert_last_notification(&log, "Building bld-1 deleted");
        assert!(store.state().records.is_empty());

        let written = restore(Arc::clone(store.resource()), id.clone()).await;
        let landed = land(&mut store, written);
        assert_last_notification(&log, "Building bld-1 restored");
        assert!(landed.refetch.is_some());
    }

    // ========================================================================
    // ATTENDANCE
    // ========================================================================

    #[tokio::test]
    async fn test_toggle_failure_reverts_and_notifies() {
        let resource = MockResource::new("attendance", vec![fixtures::worker_attendance("A1", false)]);
        resource.fail_next(MockOp::UpdateFields, ClientError::InvalidRequest("timeout".to_string()));
        let (mut store, log) = store(resource, MutationStrategy::Splice);
        store.fetch(ListRequest::default()).await;

        let id = RecordId::new("A1");
        let staged = store.stage_toggle(&id).unwrap();
        assert!(store.state().find(&id).unwrap().present);

        let result = confirm_attendance(Arc::clone(store.resource()), &staged).await;
        let landed = land_attendance(&mut store, staged, false, result);
        assert!(!landed.is_ok());
        assert!(!store.state().find(&id).unwrap().present);
        assert_last_notification(&log, "Failed to update attendance");
    }

    #[tokio::test]
    async fn test_saved_notes_are_kept() {
        let (mut store, log) = store(
            MockResource::new("attendance", vec![fixtures::worker_attendance("A1", true)]),
            MutationStrategy::Splice,
        );
        store.fetch(ListRequest::default()).await;

        let id = RecordId::new("A1");
        let staged = store.stage_notes(&id, "left early").unwrap();
        let result = confirm_attendance(Arc::clone(store.resource()), &staged).await;
        assert!(land_attendance(&mut store, staged, true, result).is_ok());
        assert_eq!(store.state().find(&id).unwrap().notes, "left early");
        assert_last_notification(&log, "Notes saved");
    }

    #[tokio::test]
    async fn test_export_writes_timestamped_file() {
        let (mut store, log) = store(
            MockResource::new(
                "attendance",
                vec![
                    fixtures::worker_attendance("A1", true),
                    fixtures::worker_attendance("A2", false),
                ],
            ),
            MutationStrategy::Splice,
        );
        store.fetch(ListRequest::default()).await;
        let dir = tempfile::tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();

        let path = export_attendance(
            Arc::clone(store.resource()),
            store.state().request.clone(),
            store.sink(),
            &dir.path().join("out"),
            now,
        )
        .await
        .unwrap();
        assert!(path.ends_with("attendance-20260314-093000.xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), b"A1\nA2".to_vec());
        assert_eq!(log.latest().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_export_failure_writes_nothing() {
        let resource = MockResource::new("attendance", vec![fixtures::worker_attendance("A1", true)]);
        resource.fail_next(MockOp::Export, ClientError::api(500, "export unavailable"));
        let (store, log) = store(resource, MutationStrategy::Splice);
        let dir = tempfile::tempdir().unwrap();
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();

        let result = export_attendance(
            Arc::clone(store.resource()),
            ListRequest::default(),
            store.sink(),
            dir.path(),
            now,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_last_notification(&log, "export unavailable");
    }
}
