//! washdesk Core - Domain Types
//!
//! Records, reference normalization and the pure transforms shared by the
//! client and the console: pagination math, filter composition, cascading
//! option lists and form validation. Nothing in this crate performs I/O.

pub mod cascade;
pub mod entities;
pub mod enums;
pub mod error;
pub mod filter;
pub mod identity;
pub mod pagination;
pub mod schedule;
pub mod validation;

pub use cascade::{buildings_for_location, retain_if_available, workers_for_building};
pub use entities::*;
pub use enums::{BookingStatus, EnquiryStatus, PersonKind};
pub use error::{DecodeError, ValidationError};
pub use filter::{compose, narrow, ComposedQuery, FilterState, QueryParams, TextSearch, TextSearchable};
pub use identity::{EntityRef, Identified, RecordId};
pub use pagination::{Envelope, Page, PageBase, PageConvention, Pagination};
pub use schedule::{ScheduleDays, Weekday};
pub use validation::{first_missing, parse_amount, validate_mobile};
