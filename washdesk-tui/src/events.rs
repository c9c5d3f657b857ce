//! Event types for the TUI event loop.

use crate::reference::ReferenceData;
use crossterm::event::KeyEvent;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use washdesk_client::{
    resilient_list, ClientError, FetchTicket, FetchToken, ListOutcome, ListResource,
    NotificationSink, StagedUpdate,
};
use washdesk_core::{AttendanceRecord, Booking, Building, Enquiry, Location, RecordId};

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    Fetched(FetchedPage),
    ReferenceLoaded(ReferenceData),
    Completed(Completion),
}

/// Server answer to one write on a list.
#[derive(Debug)]
pub enum Written<T> {
    /// `editing` is `None` for a create.
    Saved {
        editing: Option<RecordId>,
        result: Result<T, ClientError>,
    },
    Deleted {
        id: RecordId,
        result: Result<(), ClientError>,
    },
    Restored {
        id: RecordId,
        result: Result<(), ClientError>,
    },
    Accepted {
        id: RecordId,
        result: Result<T, ClientError>,
    },
    Assigned {
        id: RecordId,
        result: Result<T, ClientError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Save,
    Delete,
    Restore,
    Accept,
    Assign,
}

impl<T> Written<T> {
    pub fn kind(&self) -> WriteKind {
        match self {
            Written::Saved { .. } => WriteKind::Save,
            Written::Deleted { .. } => WriteKind::Delete,
            Written::Restored { .. } => WriteKind::Restore,
            Written::Accepted { .. } => WriteKind::Accept,
            Written::Assigned { .. } => WriteKind::Assign,
        }
    }

    /// Record the write was aimed at. A create has none.
    pub fn target(&self) -> Option<&RecordId> {
        match self {
            Written::Saved { editing, .. } => editing.as_ref(),
            Written::Deleted { id, .. }
            | Written::Restored { id, .. }
            | Written::Accepted { id, .. }
            | Written::Assigned { id, .. } => Some(id),
        }
    }
}

/// A request that ran off the event loop, ready to be applied.
#[derive(Debug)]
pub enum Completion {
    Locations(Written<Location>),
    Buildings(Written<Building>),
    Bookings(Written<Booking>),
    Enquiries(Written<Enquiry>),
    /// An attendance change already shown in the row.
    Attendance {
        staged: StagedUpdate,
        notes: bool,
        result: Result<(), ClientError>,
    },
    /// Full enquiry for the edit form. `cached` is the list row to fall
    /// back on.
    EnquiryLoaded {
        cached: Enquiry,
        result: Result<Enquiry, ClientError>,
    },
}

/// Run `work` on its own task and route what it returns back as a
/// [`TuiEvent::Completed`].
pub fn spawn_request<F>(sender: mpsc::Sender<TuiEvent>, work: F)
where
    F: Future<Output = Completion> + Send + 'static,
{
    tokio::spawn(async move {
        let completion = work.await;
        if sender.send(TuiEvent::Completed(completion)).await.is_err() {
            tracing::debug!("event loop closed before request landed");
        }
    });
}

/// A finished list fetch, tagged with the token it was issued under.
#[derive(Debug, Clone)]
pub enum FetchedPage {
    Locations(FetchToken, ListOutcome<Location>),
    Buildings(FetchToken, ListOutcome<Building>),
    Bookings(FetchToken, ListOutcome<Booking>),
    Enquiries(FetchToken, ListOutcome<Enquiry>),
    Attendance(FetchToken, ListOutcome<AttendanceRecord>),
}

/// Run a list fetch off the event loop and route the outcome back as a
/// [`TuiEvent::Fetched`]. The store decides on receipt whether it is stale.
pub fn spawn_fetch<R, F>(
    resource: Arc<R>,
    ticket: FetchTicket,
    sink: Arc<dyn NotificationSink>,
    sender: mpsc::Sender<TuiEvent>,
    wrap: F,
) where
    R: ListResource + 'static,
    F: FnOnce(FetchToken, ListOutcome<R::Record>) -> FetchedPage + Send + 'static,
{
    tokio::spawn(async move {
        tracing::debug!(
            resource = resource.name(),
            token = ticket.token.value(),
            page = ticket.request.page,
            "fetch started"
        );
        let outcome = resilient_list(resource.as_ref(), &ticket.request, sink.as_ref()).await;
        let event = TuiEvent::Fetched(wrap(ticket.token, outcome));
        if sender.send(event).await.is_err() {
            tracing::debug!("event loop closed before fetch landed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use washdesk_client::{ListRequest, ListStore, MockResource, MutationStrategy, NotificationLog};
    use washdesk_core::RecordId;

    fn location(n: usize) -> Location {
        Location {
            id: RecordId::new(format!("loc-{}", n)),
            name: format!("Location {}", n),
            address: None,
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn test_spawned_fetch_routes_outcome_with_token() {
        let resource = Arc::new(MockResource::new("locations", (1..=3).map(location).collect()));
        let log = NotificationLog::new();
        let sink: Arc<dyn NotificationSink> = Arc::new(log.clone());
        let mut store = ListStore::new(Arc::clone(&resource), MutationStrategy::Splice, Arc::clone(&sink));
        let ticket = store.begin_fetch(ListRequest::default());
        let token = ticket.token;

        let (tx, mut rx) = mpsc::channel(4);
        spawn_fetch(resource, ticket, sink, tx, FetchedPage::Locations);

        match rx.recv().await {
            Some(TuiEvent::Fetched(FetchedPage::Locations(got, outcome))) => {
                assert_eq!(got, token);
                assert!(store.complete_fetch(got, outcome));
                assert_eq!(store.state().records.len(), 3);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawned_request_routes_completion() {
        let (tx, mut rx) = mpsc::channel(4);
        let id = RecordId::new("loc-1");
        let sent = id.clone();
        spawn_request(tx, async move {
            Completion::Locations(Written::Deleted {
                id: sent,
                result: Ok(()),
            })
        });

        match rx.recv().await {
            Some(TuiEvent::Completed(Completion::Locations(Written::Deleted { id: got, result }))) => {
                assert_eq!(got, id);
                assert!(result.is_ok());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
