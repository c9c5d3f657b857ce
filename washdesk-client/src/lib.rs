//! washdesk client layer.
//!
//! Resource Client traits and their REST implementations, plus the list
//! state reducer and store every management page is built on.

pub mod error;
pub mod mock;
pub mod notify;
pub mod resource;
pub mod rest;
pub mod store;

pub use error::ClientError;
pub use mock::{MockCall, MockOp, MockRecord, MockResource};
pub use notify::{Notification, NotificationLevel, NotificationLog, NotificationSink};
pub use resource::{
    resilient_list, AttendanceResource, BookingResource, DeleteResource, ListOutcome,
    ListRequest, ListResource, LookupResource, PeopleResource, RestoreResource, SaveResource,
};
pub use rest::{
    ApiClient, AttendanceClient, BookingsClient, BuildingsClient, EnquiriesClient,
    LocationsClient, RestClient, RestConfig,
};
pub use store::{
    FetchTicket, FetchToken, ListAction, ListState, ListStore, MutationStrategy, StagedUpdate,
};
