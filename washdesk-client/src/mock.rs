//! In-memory resource for tests.
//!
//! Holds records in a `Mutex<Vec<_>>`, logs every call, and fails the next
//! call of a given kind on demand.

use crate::error::ClientError;
use crate::resource::{
    AttendanceResource, BookingResource, DeleteResource, ListRequest, ListResource,
    LookupResource, PeopleResource, RestoreResource, SaveResource,
};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use washdesk_core::{
    AttendanceRecord, AttendanceUpdate, Booking, BookingStatus, Building, BuildingPayload,
    Enquiry, EnquiryPayload, EntityRef, Identified, Location, LocationPayload, Page, Person,
    RecordId, TextSearch, Vehicle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    List,
    Get,
    Create,
    Update,
    Delete,
    UndoDelete,
    Accept,
    AssignWorker,
    UpdateFields,
    Export,
    OrgList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List(ListRequest),
    Get(RecordId),
    Create(serde_json::Value),
    Update(RecordId, serde_json::Value),
    Delete(RecordId),
    UndoDelete(RecordId),
    Accept(RecordId),
    AssignWorker { booking: RecordId, worker: RecordId },
    UpdateFields(AttendanceUpdate),
    Export(ListRequest),
    OrgList,
}

/// Records the mock can build from a save payload.
pub trait MockRecord: Identified + Clone + Send + Sync + 'static {
    type Payload: Serialize + Send + Sync;

    fn from_payload(id: RecordId, payload: &Self::Payload) -> Self;
}

pub struct MockResource<T> {
    name: &'static str,
    text_search: TextSearch,
    records: Mutex<Vec<T>>,
    trash: Mutex<Vec<T>>,
    failures: Mutex<HashMap<MockOp, VecDeque<ClientError>>>,
    calls: Mutex<Vec<MockCall>>,
    next_id: Mutex<u64>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Identified + Clone + Send + Sync + 'static> MockResource<T> {
    pub fn new(name: &'static str, records: Vec<T>) -> Self {
        Self {
            name,
            text_search: TextSearch::Server,
            records: Mutex::new(records),
            trash: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
        }
    }

    pub fn with_text_search(mut self, text_search: TextSearch) -> Self {
        self.text_search = text_search;
        self
    }

    /// Make the next `op` call fail with `error`. Queued failures are used
    /// in order.
    pub fn fail_next(&self, op: MockOp, error: ClientError) {
        lock(&self.failures).entry(op).or_default().push_back(error);
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    pub fn records(&self) -> Vec<T> {
        lock(&self.records).clone()
    }

    pub fn find(&self, id: &RecordId) -> Option<T> {
        lock(&self.records).iter().find(|r| r.id() == id).cloned()
    }

    fn enter(&self, op: MockOp, call: MockCall) -> Result<(), ClientError> {
        lock(&self.calls).push(call);
        match lock(&self.failures).get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found(&self, id: &RecordId) -> ClientError {
        ClientError::api(404, format!("{} {} not found", self.name, id))
    }

    fn replace_with<F>(&self, id: &RecordId, change: F) -> Result<T, ClientError>
    where
        F: FnOnce(&mut T),
    {
        let mut records = lock(&self.records);
        let slot = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        change(slot);
        Ok(slot.clone())
    }

    fn mint_id(&self) -> RecordId {
        let mut next = lock(&self.next_id);
        *next += 1;
        RecordId::new(format!("{}-{}", self.name, next))
    }
}

#[async_trait]
impl<T: Identified + Clone + Send + Sync + 'static> ListResource for MockResource<T> {
    type Record = T;

    fn name(&self) -> &'static str {
        self.name
    }

    fn text_search(&self) -> TextSearch {
        self.text_search
    }

    async fn list(&self, request: &ListRequest) -> Result<Page<T>, ClientError> {
        self.enter(MockOp::List, MockCall::List(request.clone()))?;
        Ok(Page::slice(self.records(), request.page, request.limit))
    }
}

#[async_trait]
impl<T: Identified + Clone + Send + Sync + 'static> LookupResource for MockResource<T> {
    async fn get(&self, id: &RecordId) -> Result<T, ClientError> {
        self.enter(MockOp::Get, MockCall::Get(id.clone()))?;
        self.find(id).ok_or_else(|| self.not_found(id))
    }
}

#[async_trait]
impl<T: MockRecord> SaveResource for MockResource<T> {
    type Payload = T::Payload;

    async fn create(&self, payload: &T::Payload) -> Result<T, ClientError> {
        self.enter(MockOp::Create, MockCall::Create(serde_json::to_value(payload)?))?;
        let record = T::from_payload(self.mint_id(), payload);
        lock(&self.records).insert(0, record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, payload: &T::Payload) -> Result<T, ClientError> {
        self.enter(
            MockOp::Update,
            MockCall::Update(id.clone(), serde_json::to_value(payload)?),
        )?;
        self.replace_with(id, |slot| *slot = T::from_payload(id.clone(), payload))
    }
}

#[async_trait]
impl<T: Identified + Clone + Send + Sync + 'static> DeleteResource for MockResource<T> {
    async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        self.enter(MockOp::Delete, MockCall::Delete(id.clone()))?;
        let mut records = lock(&self.records);
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        let removed = records.remove(index);
        lock(&self.trash).push(removed);
        Ok(())
    }
}

#[async_trait]
impl<T: Identified + Clone + Send + Sync + 'static> RestoreResource for MockResource<T> {
    async fn undo_delete(&self, id: &RecordId) -> Result<(), ClientError> {
        self.enter(MockOp::UndoDelete, MockCall::UndoDelete(id.clone()))?;
        let mut trash = lock(&self.trash);
        let index = trash
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        let restored = trash.remove(index);
        lock(&self.records).push(restored);
        Ok(())
    }
}

#[async_trait]
impl BookingResource for MockResource<Booking> {
    async fn accept(&self, id: &RecordId) -> Result<Booking, ClientError> {
        self.enter(MockOp::Accept, MockCall::Accept(id.clone()))?;
        self.replace_with(id, |booking| booking.status = BookingStatus::Accepted)
    }

    async fn assign_worker(&self, id: &RecordId, worker: &RecordId) -> Result<Booking, ClientError> {
        self.enter(
            MockOp::AssignWorker,
            MockCall::AssignWorker {
                booking: id.clone(),
                worker: worker.clone(),
            },
        )?;
        self.replace_with(id, |booking| booking.worker = Some(EntityRef::new(worker.clone())))
    }
}

#[async_trait]
impl AttendanceResource for MockResource<AttendanceRecord> {
    async fn update_fields(&self, update: &AttendanceUpdate) -> Result<(), ClientError> {
        self.enter(MockOp::UpdateFields, MockCall::UpdateFields(update.clone()))?;
        for id in &update.ids {
            self.replace_with(id, |record| *record = update.applied_to(record))?;
        }
        Ok(())
    }

    async fn export(&self, request: &ListRequest) -> Result<Vec<u8>, ClientError> {
        self.enter(MockOp::Export, MockCall::Export(request.clone()))?;
        let ids: Vec<String> = self.records().iter().map(|r| r.id.to_string()).collect();
        Ok(ids.join("\n").into_bytes())
    }
}

#[async_trait]
impl PeopleResource for MockResource<Person> {
    async fn org_list(&self) -> Result<Vec<Person>, ClientError> {
        self.enter(MockOp::OrgList, MockCall::OrgList)?;
        Ok(self.records())
    }
}

impl MockRecord for Location {
    type Payload = LocationPayload;

    fn from_payload(id: RecordId, payload: &LocationPayload) -> Self {
        Location {
            id,
            name: payload.name.clone(),
            address: payload.address.clone(),
            latitude: payload.latitude,
            longitude: payload.longitude,
        }
    }
}

impl MockRecord for Building {
    type Payload = BuildingPayload;

    fn from_payload(id: RecordId, payload: &BuildingPayload) -> Self {
        Building {
            id,
            name: payload.name.clone(),
            location: EntityRef::new(payload.location_id.clone()),
            amount: payload.amount,
            card_charges: payload.card_charges,
            schedule: payload.schedule,
            schedule_days: payload.schedule_days.clone(),
        }
    }
}

impl MockRecord for Enquiry {
    type Payload = EnquiryPayload;

    fn from_payload(id: RecordId, payload: &EnquiryPayload) -> Self {
        Enquiry {
            id,
            name: payload.name.clone(),
            mobile: payload.mobile.clone(),
            email: payload.email.clone(),
            status: payload.status,
            vehicles: payload
                .vehicles
                .iter()
                .map(|v| Vehicle {
                    id: v.id.clone(),
                    registration_no: v.registration_no.clone(),
                    parking_no: v.parking_no.clone(),
                    vehicle_type: v.vehicle_type.clone(),
                    worker: v.worker.clone().map(EntityRef::new),
                    building: v.building.clone().map(EntityRef::new),
                    schedule_days: v.schedule_days.clone(),
                    amount: v.amount,
                })
                .collect(),
        }
    }
}
