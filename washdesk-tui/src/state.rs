//! Application state and key dispatch.
//!
//! Nothing here waits on the network. Fetches and writes run on spawned
//! tasks and come back through the event channel, so the loop keeps
//! drawing while a request is out.

use crate::actions::{self, confirm_attendance, export_attendance, land, land_attendance, target_id};
use crate::config::TuiConfig;
use crate::events::{spawn_fetch, spawn_request, Completion, FetchedPage, TuiEvent, WriteKind};
use crate::forms::{
    BuildingForm, EnquiryForm, Form, FormStep, LocationForm, NotesEditor, WorkerPicker,
};
use crate::keys::{map_key, Action};
use crate::nav::View;
use crate::page::{next_date_range, next_in, ListPage};
use crate::persistence::PersistedState;
use crate::reference::{self, ReferenceData};
use crate::theme::SynthBruteTheme;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use washdesk_client::{
    ApiClient, AttendanceClient, BookingsClient, BuildingsClient, EnquiriesClient, FetchTicket,
    FetchToken, ListOutcome, ListResource, ListStore, LocationsClient, LookupResource,
    MutationStrategy, Notification, NotificationLevel, NotificationLog, NotificationSink,
    StagedUpdate,
};
use washdesk_core::{FilterState, RecordId, TextSearchable};

/// A destructive action waiting on the confirmation modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete {
        view: View,
        id: RecordId,
        label: String,
    },
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::Delete { view, label, .. } => {
                format!("Delete {} from {}? (Enter/y confirm, Esc/n cancel)", label, view.title())
            }
        }
    }
}

/// What the keyboard is currently driving.
pub enum Mode {
    Browse,
    Search { input: String },
    Help,
    Confirm(PendingAction),
    LocationForm(LocationForm),
    BuildingForm(BuildingForm),
    EnquiryForm(Box<EnquiryForm>),
    AssignWorker(WorkerPicker),
    Notes(NotesEditor),
}

impl Mode {
    pub fn is_browse(&self) -> bool {
        matches!(self, Mode::Browse)
    }

    /// Whether this is the edit form for `view`.
    fn is_form_for(&self, view: View) -> bool {
        matches!(
            (self, view),
            (Mode::LocationForm(_), View::Locations)
                | (Mode::BuildingForm(_), View::Buildings)
                | (Mode::EnquiryForm(_), View::Enquiries)
        )
    }

    fn set_form_error(&mut self, message: String) {
        match self {
            Mode::LocationForm(form) => form.set_error(Some(message)),
            Mode::BuildingForm(form) => form.set_error(Some(message)),
            Mode::EnquiryForm(form) => form.set_error(Some(message)),
            _ => {}
        }
    }
}

/// How a view's next fetch is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fetch {
    Reload,
    First,
    Next,
    Previous,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub api: ApiClient,
    pub active_view: View,

    pub locations: ListPage<LocationsClient>,
    pub buildings: ListPage<BuildingsClient>,
    pub bookings: ListPage<BookingsClient>,
    pub enquiries: ListPage<EnquiriesClient>,
    pub attendance: ListPage<AttendanceClient>,

    pub reference: ReferenceData,
    pub notifications: NotificationLog,
    pub mode: Mode,
    pub show_currency: bool,
    /// A form save is out. Further submits wait for it.
    pub saving: bool,
    /// Most recent building delete, restorable with undo.
    pub last_deleted_building: Option<RecordId>,
    pub should_quit: bool,
    sender: mpsc::Sender<TuiEvent>,
}

impl App {
    pub fn new(config: TuiConfig, api: ApiClient, sender: mpsc::Sender<TuiEvent>) -> Self {
        let theme = SynthBruteTheme::synthbrute();
        let notifications = NotificationLog::new();
        let sink: Arc<dyn NotificationSink> = Arc::new(notifications.clone());
        let limit = config.page_size;
        let locations = ListPage::new(store(&api.locations, MutationStrategy::Splice, &sink), limit);
        let buildings = ListPage::new(store(&api.buildings, MutationStrategy::Splice, &sink), limit);
        let bookings = ListPage::new(store(&api.bookings, MutationStrategy::Refetch, &sink), limit);
        let enquiries = ListPage::new(store(&api.enquiries, MutationStrategy::Splice, &sink), limit);
        let attendance = ListPage::new(store(&api.attendance, MutationStrategy::Splice, &sink), limit);

        Self {
            config,
            theme,
            api,
            active_view: View::Locations,
            locations,
            buildings,
            bookings,
            enquiries,
            attendance,
            reference: ReferenceData::default(),
            notifications,
            mode: Mode::Browse,
            show_currency: false,
            saving: false,
            last_deleted_building: None,
            should_quit: false,
            sender,
        }
    }

    pub fn restore(&mut self, persisted: PersistedState) {
        self.active_view = persisted.active_view;
        self.show_currency = persisted.show_currency;
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            active_view: self.active_view,
            show_currency: self.show_currency,
        }
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.notify(Notification::new(level, message));
    }

    pub fn filters(&self, view: View) -> &FilterState {
        match view {
            View::Locations => &self.locations.filters,
            View::Buildings => &self.buildings.filters,
            View::Bookings => &self.bookings.filters,
            View::Enquiries => &self.enquiries.filters,
            View::Attendance => &self.attendance.filters,
        }
    }

    fn filters_mut(&mut self, view: View) -> &mut FilterState {
        match view {
            View::Locations => &mut self.locations.filters,
            View::Buildings => &mut self.buildings.filters,
            View::Bookings => &mut self.bookings.filters,
            View::Enquiries => &mut self.enquiries.filters,
            View::Attendance => &mut self.attendance.filters,
        }
    }

    pub fn is_loading(&self, view: View) -> bool {
        match view {
            View::Locations => self.locations.store.state().loading,
            View::Buildings => self.buildings.store.state().loading,
            View::Bookings => self.bookings.store.state().loading,
            View::Enquiries => self.enquiries.store.state().loading,
            View::Attendance => self.attendance.store.state().loading,
        }
    }

    // ========================================================================
    // Fetch cycle
    // ========================================================================

    fn fetch(&mut self, view: View, how: Fetch) {
        let sender = self.sender.clone();
        match view {
            View::Locations => launch(&mut self.locations, how, sender, FetchedPage::Locations),
            View::Buildings => launch(&mut self.buildings, how, sender, FetchedPage::Buildings),
            View::Bookings => launch(&mut self.bookings, how, sender, FetchedPage::Bookings),
            View::Enquiries => launch(&mut self.enquiries, how, sender, FetchedPage::Enquiries),
            View::Attendance => launch(&mut self.attendance, how, sender, FetchedPage::Attendance),
        }
    }

    /// Run a ticket some other transition already issued.
    fn run_ticket(&self, view: View, ticket: FetchTicket) {
        let sender = self.sender.clone();
        match view {
            View::Locations => run(&self.locations, ticket, sender, FetchedPage::Locations),
            View::Buildings => run(&self.buildings, ticket, sender, FetchedPage::Buildings),
            View::Bookings => run(&self.bookings, ticket, sender, FetchedPage::Bookings),
            View::Enquiries => run(&self.enquiries, ticket, sender, FetchedPage::Enquiries),
            View::Attendance => run(&self.attendance, ticket, sender, FetchedPage::Attendance),
        }
    }

    /// Initial load of every view.
    pub fn load_all(&mut self) {
        for view in View::all() {
            self.fetch(*view, Fetch::First);
        }
    }

    pub fn reload_active(&mut self) {
        self.fetch(self.active_view, Fetch::Reload);
    }

    /// Reload the reference lists in the background.
    pub fn refresh_reference(&self) {
        let api = self.api.clone();
        let sink: Arc<dyn NotificationSink> = Arc::new(self.notifications.clone());
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let data = reference::load(
                api.locations.as_ref(),
                api.buildings.as_ref(),
                api.attendance.as_ref(),
                sink.as_ref(),
            )
            .await;
            if sender.send(TuiEvent::ReferenceLoaded(data)).await.is_err() {
                tracing::debug!("event loop closed before reference data landed");
            }
        });
    }

    pub fn apply_fetched(&mut self, fetched: FetchedPage) {
        let (view, token, landed) = match fetched {
            FetchedPage::Locations(token, outcome) => {
                (View::Locations, token, self.locations.complete(token, outcome))
            }
            FetchedPage::Buildings(token, outcome) => {
                (View::Buildings, token, self.buildings.complete(token, outcome))
            }
            FetchedPage::Bookings(token, outcome) => {
                (View::Bookings, token, self.bookings.complete(token, outcome))
            }
            FetchedPage::Enquiries(token, outcome) => {
                (View::Enquiries, token, self.enquiries.complete(token, outcome))
            }
            FetchedPage::Attendance(token, outcome) => {
                (View::Attendance, token, self.attendance.complete(token, outcome))
            }
        };
        if !landed {
            tracing::debug!(view = view.title(), token = token.value(), "stale page discarded");
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    fn request<F>(&self, work: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        spawn_request(self.sender.clone(), work);
    }

    pub fn apply_completed(&mut self, completion: Completion) {
        match completion {
            Completion::Locations(written) => {
                let (kind, target) = (written.kind(), written.target().cloned());
                let landed = land(&mut self.locations.store, written);
                self.locations.clamp_selection();
                self.after_write(View::Locations, kind, target, landed);
            }
            Completion::Buildings(written) => {
                let (kind, target) = (written.kind(), written.target().cloned());
                let landed = land(&mut self.buildings.store, written);
                self.buildings.clamp_selection();
                self.after_write(View::Buildings, kind, target, landed);
            }
            Completion::Bookings(written) => {
                let (kind, target) = (written.kind(), written.target().cloned());
                let landed = land(&mut self.bookings.store, written);
                self.bookings.clamp_selection();
                self.after_write(View::Bookings, kind, target, landed);
            }
            Completion::Enquiries(written) => {
                let (kind, target) = (written.kind(), written.target().cloned());
                let landed = land(&mut self.enquiries.store, written);
                self.enquiries.clamp_selection();
                self.after_write(View::Enquiries, kind, target, landed);
            }
            Completion::Attendance {
                staged,
                notes,
                result,
            } => {
                land_attendance(&mut self.attendance.store, staged, notes, result);
            }
            Completion::EnquiryLoaded { cached, result } => {
                let enquiry = match result {
                    Ok(enquiry) => enquiry,
                    Err(err) => {
                        tracing::warn!(error = %err, id = %cached.id, "enquiry lookup failed");
                        cached
                    }
                };
                // The user may have moved on while the lookup ran.
                if self.mode.is_browse() && self.active_view == View::Enquiries {
                    let form = EnquiryForm::from_record(&enquiry, &self.reference);
                    self.mode = Mode::EnquiryForm(Box::new(form));
                }
            }
        }
    }

    fn after_write(
        &mut self,
        view: View,
        kind: WriteKind,
        target: Option<RecordId>,
        landed: actions::Landed,
    ) {
        let ok = landed.is_ok();
        if let Some(ticket) = landed.refetch {
            self.run_ticket(view, ticket);
        }
        match kind {
            WriteKind::Save => {
                self.saving = false;
                if self.mode.is_form_for(view) {
                    match landed.error {
                        None => self.mode = Mode::Browse,
                        Some(message) => self.mode.set_form_error(message),
                    }
                }
                if ok {
                    self.after_save(view);
                }
            }
            WriteKind::Delete => {
                if ok && matches!(view, View::Locations | View::Buildings) {
                    if view == View::Buildings {
                        self.last_deleted_building = target;
                    }
                    self.refresh_reference();
                }
            }
            WriteKind::Restore => {
                if ok {
                    self.refresh_reference();
                } else if self.last_deleted_building.is_none() {
                    self.last_deleted_building = target;
                }
            }
            WriteKind::Accept => {}
            WriteKind::Assign => {
                if ok && matches!(self.mode, Mode::AssignWorker(_)) {
                    self.mode = Mode::Browse;
                }
            }
        }
    }

    /// A form closed on success: re-fetch its page, and the reference lists
    /// when the saved record feeds a select.
    fn after_save(&mut self, view: View) {
        self.fetch(view, Fetch::Reload);
        if matches!(view, View::Locations | View::Buildings) {
            self.refresh_reference();
        }
    }

    /// Validate `form` for sending. On failure the form keeps the message
    /// and nothing is sent. A save already out blocks a second one.
    fn validated<F: Form>(&mut self, form: &mut F) -> Option<(Option<RecordId>, F::Payload)> {
        if self.saving {
            self.notify(NotificationLevel::Info, "Still saving");
            return None;
        }
        match form.validate() {
            Ok(payload) => {
                form.set_error(None);
                self.saving = true;
                Some((form.editing().cloned(), payload))
            }
            Err(err) => {
                let message = err.to_string();
                self.notify(NotificationLevel::Warning, message.clone());
                form.set_error(Some(message));
                None
            }
        }
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn handle_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::Input(key) => self.handle_key(key),
            TuiEvent::Fetched(fetched) => self.apply_fetched(fetched),
            TuiEvent::Completed(completion) => self.apply_completed(completion),
            TuiEvent::ReferenceLoaded(data) => self.reference = data,
            TuiEvent::Resize { .. } | TuiEvent::Tick => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let mode = std::mem::replace(&mut self.mode, Mode::Browse);
        self.mode = match mode {
            Mode::Browse => {
                if let Some(action) = map_key(key) {
                    self.handle_action(action);
                }
                return;
            }
            Mode::Help => Mode::Browse,
            Mode::Search { input } => self.search_key(input, key),
            Mode::Confirm(pending) => self.confirm_key(pending, key),
            Mode::LocationForm(mut form) => match form.handle_key(key) {
                FormStep::Continue => Mode::LocationForm(form),
                FormStep::Cancel => Mode::Browse,
                FormStep::Submit => {
                    if let Some((editing, payload)) = self.validated(&mut form) {
                        let resource = Arc::clone(self.locations.store.resource());
                        self.request(async move {
                            Completion::Locations(actions::save(resource, editing, payload).await)
                        });
                    }
                    Mode::LocationForm(form)
                }
            },
            Mode::BuildingForm(mut form) => match form.handle_key(key) {
                FormStep::Continue => Mode::BuildingForm(form),
                FormStep::Cancel => Mode::Browse,
                FormStep::Submit => {
                    if let Some((editing, payload)) = self.validated(&mut form) {
                        let resource = Arc::clone(self.buildings.store.resource());
                        self.request(async move {
                            Completion::Buildings(actions::save(resource, editing, payload).await)
                        });
                    }
                    Mode::BuildingForm(form)
                }
            },
            Mode::EnquiryForm(mut form) => match form.handle_key(key) {
                FormStep::Continue => Mode::EnquiryForm(form),
                FormStep::Cancel => Mode::Browse,
                FormStep::Submit => {
                    if let Some((editing, payload)) = self.validated(form.as_mut()) {
                        let resource = Arc::clone(self.enquiries.store.resource());
                        self.request(async move {
                            Completion::Enquiries(actions::save(resource, editing, payload).await)
                        });
                    }
                    Mode::EnquiryForm(form)
                }
            },
            Mode::AssignWorker(mut picker) => match picker.handle_key(key) {
                FormStep::Continue => Mode::AssignWorker(picker),
                FormStep::Cancel => Mode::Browse,
                FormStep::Submit => {
                    match picker.selected() {
                        Ok(worker) => {
                            let id = picker.booking.clone();
                            let resource = Arc::clone(self.bookings.store.resource());
                            self.request(async move {
                                Completion::Bookings(actions::assign(resource, id, worker).await)
                            });
                        }
                        Err(err) => self.notify(NotificationLevel::Warning, err.to_string()),
                    }
                    Mode::AssignWorker(picker)
                }
            },
            Mode::Notes(mut editor) => match editor.handle_key(key) {
                FormStep::Continue => Mode::Notes(editor),
                FormStep::Cancel => Mode::Browse,
                FormStep::Submit => {
                    let notes = editor.value();
                    match self.attendance.store.stage_notes(&editor.record, &notes) {
                        Ok(staged) => self.confirm_staged(staged, true),
                        Err(err) => self.notify(NotificationLevel::Warning, err.to_string()),
                    }
                    Mode::Browse
                }
            },
        };
    }

    fn search_key(&mut self, mut input: String, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => Mode::Browse,
            KeyCode::Enter => {
                let view = self.active_view;
                self.filters_mut(view).text = input.trim().to_string();
                self.fetch(view, Fetch::First);
                Mode::Browse
            }
            KeyCode::Backspace => {
                input.pop();
                Mode::Search { input }
            }
            KeyCode::Char(c) => {
                input.push(c);
                Mode::Search { input }
            }
            _ => Mode::Search { input },
        }
    }

    fn confirm_key(&mut self, pending: PendingAction, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                self.run_pending(pending);
                Mode::Browse
            }
            KeyCode::Esc | KeyCode::Char('n') => Mode::Browse,
            _ => Mode::Confirm(pending),
        }
    }

    fn run_pending(&mut self, pending: PendingAction) {
        let PendingAction::Delete { view, id, .. } = pending;
        match view {
            View::Locations => {
                let resource = Arc::clone(self.locations.store.resource());
                self.request(async move { Completion::Locations(actions::delete(resource, id).await) });
            }
            View::Buildings => {
                let resource = Arc::clone(self.buildings.store.resource());
                self.request(async move { Completion::Buildings(actions::delete(resource, id).await) });
            }
            View::Bookings => {
                let resource = Arc::clone(self.bookings.store.resource());
                self.request(async move { Completion::Bookings(actions::delete(resource, id).await) });
            }
            View::Enquiries => {
                let resource = Arc::clone(self.enquiries.store.resource());
                self.request(async move { Completion::Enquiries(actions::delete(resource, id).await) });
            }
            View::Attendance => {}
        }
    }

    /// Send an attendance change that is already on screen.
    fn confirm_staged(&self, staged: StagedUpdate, notes: bool) {
        let resource = Arc::clone(self.attendance.store.resource());
        self.request(async move {
            let result = confirm_attendance(resource, &staged).await;
            Completion::Attendance {
                staged,
                notes,
                result,
            }
        });
    }

    pub fn handle_action(&mut self, action: Action) {
        let view = self.active_view;
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextView => self.active_view = view.next(),
            Action::PrevView => self.active_view = view.previous(),
            Action::SwitchView(index) => {
                if let Some(next) = View::from_index(index) {
                    self.active_view = next;
                }
            }
            Action::MoveDown => self.move_selection(true),
            Action::MoveUp => self.move_selection(false),
            Action::NextPage => self.fetch(view, Fetch::Next),
            Action::PrevPage => self.fetch(view, Fetch::Previous),
            Action::Refresh => {
                self.reload_active();
                self.refresh_reference();
            }
            Action::OpenHelp => self.mode = Mode::Help,
            Action::OpenSearch => {
                let input = self.filters(view).text.clone();
                self.mode = Mode::Search { input };
            }
            Action::CycleStatus => self.cycle_status(view),
            Action::CycleLocation => self.cycle_location(view),
            Action::CycleBuilding => self.cycle_building(view),
            Action::CycleWorker => self.cycle_worker(view),
            Action::CycleDates => self.cycle_dates(view),
            Action::ClearFilters => {
                self.filters_mut(view).clear();
                self.fetch(view, Fetch::First);
            }
            Action::ToggleCurrency => {
                self.show_currency = !self.show_currency;
                let state = if self.show_currency { "on" } else { "off" };
                self.notify(NotificationLevel::Info, format!("Currency display {}", state));
            }
            Action::NewItem => self.open_new(view),
            Action::EditItem => self.open_edit(view),
            Action::DeleteItem => self.open_delete(view),
            Action::AcceptBooking => self.accept_selected(),
            Action::AssignWorker => self.open_assign(),
            Action::TogglePresent => {
                if view == View::Attendance {
                    if let Some(id) = target_id(self.attendance.selected_record()) {
                        match self.attendance.store.stage_toggle(&id) {
                            Ok(staged) => self.confirm_staged(staged, false),
                            Err(err) => self.notify(NotificationLevel::Warning, err.to_string()),
                        }
                    }
                }
            }
            Action::EditNotes => {
                if view == View::Attendance {
                    if let Some(record) = self.attendance.selected_record() {
                        self.mode = Mode::Notes(NotesEditor::new(record));
                    }
                }
            }
            Action::UndoDelete => self.undo_building_delete(),
            Action::Export => {
                if view == View::Attendance {
                    self.export();
                } else {
                    self.notify(NotificationLevel::Info, "Export is available on Attendance");
                }
            }
            Action::Confirm | Action::Cancel => {}
        }
    }

    fn export(&self) {
        let resource = Arc::clone(self.attendance.store.resource());
        let request = self.attendance.store.state().request.clone();
        let sink = self.attendance.store.sink();
        let dir = self.config.export_dir.clone();
        tokio::spawn(async move {
            if let Err(err) = export_attendance(resource, request, sink, &dir, Local::now()).await {
                tracing::warn!(error = %err, "export not written");
            }
        });
    }

    fn move_selection(&mut self, forward: bool) {
        macro_rules! step {
            ($page:expr) => {
                if forward {
                    $page.select_next()
                } else {
                    $page.select_previous()
                }
            };
        }
        match self.active_view {
            View::Locations => step!(self.locations),
            View::Buildings => step!(self.buildings),
            View::Bookings => step!(self.bookings),
            View::Enquiries => step!(self.enquiries),
            View::Attendance => step!(self.attendance),
        }
    }

    // ========================================================================
    // Filters
    // ========================================================================

    fn unsupported(&self, view: View, filter: &str) {
        self.notify(
            NotificationLevel::Info,
            format!("{} has no {} filter", view.title(), filter),
        );
    }

    fn cycle_status(&mut self, view: View) {
        let statuses = view.statuses();
        if statuses.is_empty() {
            return self.unsupported(view, "status");
        }
        let filters = self.filters_mut(view);
        let next = match filters
            .status
            .as_deref()
            .and_then(|s| statuses.iter().position(|x| *x == s))
        {
            Some(i) => statuses.get(i + 1),
            None => statuses.first(),
        };
        filters.status = next.map(|s| s.to_string());
        self.fetch(view, Fetch::First);
    }

    fn cycle_location(&mut self, view: View) {
        if !view.filters_location() {
            return self.unsupported(view, "location");
        }
        let current = self.filters(view).location().cloned();
        let options: Vec<&RecordId> = self.reference.locations.iter().map(|l| &l.id).collect();
        let next = next_in(&options, current.as_ref());
        self.filters_mut(view).set_location(next);
        self.fetch(view, Fetch::First);
    }

    fn cycle_building(&mut self, view: View) {
        if !view.filters_building() {
            return self.unsupported(view, "building");
        }
        let filters = self.filters(view);
        let current = filters.building().cloned();
        let options: Vec<&RecordId> = self
            .reference
            .buildings_under(filters.location())
            .into_iter()
            .map(|b| &b.id)
            .collect();
        let next = next_in(&options, current.as_ref());
        self.filters_mut(view).set_building(next);
        self.fetch(view, Fetch::First);
    }

    fn cycle_worker(&mut self, view: View) {
        if !view.filters_worker() {
            return self.unsupported(view, "worker");
        }
        let filters = self.filters(view);
        let current = filters.worker().cloned();
        let people = match filters.building() {
            Some(building) => self.reference.workers_on(Some(building)),
            None => self.reference.workers(),
        };
        let options: Vec<&RecordId> = people.into_iter().map(|p| &p.id).collect();
        let next = next_in(&options, current.as_ref());
        self.filters_mut(view).set_worker(next);
        self.fetch(view, Fetch::First);
    }

    fn cycle_dates(&mut self, view: View) {
        if !view.filters_dates() {
            return self.unsupported(view, "date");
        }
        let today = Local::now().date_naive();
        let filters = self.filters_mut(view);
        let (from, to) = next_date_range((filters.date_from, filters.date_to), today);
        filters.date_from = from;
        filters.date_to = to;
        self.fetch(view, Fetch::First);
    }

    // ========================================================================
    // Row actions
    // ========================================================================

    fn open_new(&mut self, view: View) {
        self.mode = match view {
            View::Locations => Mode::LocationForm(LocationForm::new()),
            View::Buildings => Mode::BuildingForm(BuildingForm::new(&self.reference.locations)),
            View::Enquiries => Mode::EnquiryForm(Box::new(EnquiryForm::new(&self.reference))),
            View::Bookings | View::Attendance => {
                self.notify(
                    NotificationLevel::Info,
                    format!("{} are not created here", view.title()),
                );
                return;
            }
        };
    }

    fn open_edit(&mut self, view: View) {
        match view {
            View::Locations => {
                if let Some(location) = self.locations.selected_record() {
                    self.mode = Mode::LocationForm(LocationForm::from_record(location));
                }
            }
            View::Buildings => {
                if let Some(building) = self.buildings.selected_record() {
                    let form = BuildingForm::from_record(building, &self.reference.locations);
                    self.mode = Mode::BuildingForm(form);
                }
            }
            View::Enquiries => {
                let Some(cached) = self.enquiries.selected_record().cloned() else {
                    return;
                };
                // List rows may omit vehicles; the form opens once the full
                // record is in.
                let resource = Arc::clone(self.enquiries.store.resource());
                self.request(async move {
                    let result = resource.get(&cached.id).await;
                    Completion::EnquiryLoaded { cached, result }
                });
            }
            View::Bookings | View::Attendance => {}
        }
    }

    fn open_delete(&mut self, view: View) {
        let target = match view {
            View::Locations => self.locations.selected_record().map(|l| (l.id.clone(), l.name.clone())),
            View::Buildings => self.buildings.selected_record().map(|b| (b.id.clone(), b.name.clone())),
            View::Bookings => self
                .bookings
                .selected_record()
                .map(|b| (b.id.clone(), format!("booking for {}", b.customer.label()))),
            View::Enquiries => self
                .enquiries
                .selected_record()
                .map(|e| (e.id.clone(), format!("enquiry {}", e.mobile))),
            View::Attendance => None,
        };
        if let Some((id, label)) = target {
            self.mode = Mode::Confirm(PendingAction::Delete { view, id, label });
        }
    }

    fn accept_selected(&mut self) {
        if self.active_view != View::Bookings {
            return;
        }
        let Some(booking) = self.bookings.selected_record() else {
            return;
        };
        if !booking.status.can_accept() {
            let message = format!("Booking is already {}", booking.status.as_str());
            self.notify(NotificationLevel::Warning, message);
            return;
        }
        let id = booking.id.clone();
        let resource = Arc::clone(self.bookings.store.resource());
        self.request(async move { Completion::Bookings(actions::accept(resource, id).await) });
    }

    fn open_assign(&mut self) {
        if self.active_view != View::Bookings {
            return;
        }
        let Some(booking) = self.bookings.selected_record() else {
            return;
        };
        let building = booking.building.as_ref().map(|b| &b.id);
        let mut workers = self.reference.workers_on(building);
        if workers.is_empty() {
            workers = self.reference.workers();
        }
        self.mode = Mode::AssignWorker(WorkerPicker::new(booking, &workers));
    }

    fn undo_building_delete(&mut self) {
        if self.active_view != View::Buildings {
            return;
        }
        let Some(id) = self.last_deleted_building.take() else {
            self.notify(NotificationLevel::Info, "Nothing to restore");
            return;
        };
        let resource = Arc::clone(self.buildings.store.resource());
        self.request(async move { Completion::Buildings(actions::restore(resource, id).await) });
    }
}

fn store<R: ListResource>(
    resource: &Arc<R>,
    strategy: MutationStrategy,
    sink: &Arc<dyn NotificationSink>,
) -> ListStore<R> {
    ListStore::new(Arc::clone(resource), strategy, Arc::clone(sink))
}

fn begin<R>(page: &mut ListPage<R>, how: Fetch) -> Option<FetchTicket>
where
    R: ListResource,
    R::Record: TextSearchable,
{
    match how {
        Fetch::Reload => Some(page.begin_reload()),
        Fetch::First => Some(page.begin_filtered()),
        Fetch::Next => page.begin_next_page(),
        Fetch::Previous => page.begin_prev_page(),
    }
}

fn launch<R>(
    page: &mut ListPage<R>,
    how: Fetch,
    sender: mpsc::Sender<TuiEvent>,
    wrap: fn(FetchToken, ListOutcome<R::Record>) -> FetchedPage,
) where
    R: ListResource + 'static,
    R::Record: TextSearchable,
{
    if let Some(ticket) = begin(page, how) {
        run(page, ticket, sender, wrap);
    }
}

fn run<R>(
    page: &ListPage<R>,
    ticket: FetchTicket,
    sender: mpsc::Sender<TuiEvent>,
    wrap: fn(FetchToken, ListOutcome<R::Record>) -> FetchedPage,
) where
    R: ListResource + 'static,
    R::Record: TextSearchable,
{
    spawn_fetch(
        Arc::clone(page.store.resource()),
        ticket,
        page.store.sink(),
        sender,
        wrap,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;
    use washdesk_client::RestConfig;
    use washdesk_core::{Page, PersonKind};
    use washdesk_test_utils::fixtures;

    fn config() -> TuiConfig {
        TuiConfig::from_toml(
            r#"
api_base_url = "http://127.0.0.1:9/api"
request_timeout_ms = 200
tick_interval_ms = 250
page_size = 10
persistence_path = "/tmp/washdesk-test/state.json"
log_path = "/tmp/washdesk-test/washdesk.log"
export_dir = "/tmp/washdesk-test/exports"
currency_code = "AED"

[auth]
api_key = "key"

[theme]
name = "synthbrute"
"#,
        )
        .unwrap()
    }

    fn app() -> (App, mpsc::Receiver<TuiEvent>) {
        let config = config();
        let rest: RestConfig = config.rest_config();
        let api = ApiClient::new(&rest).unwrap();
        let (tx, rx) = mpsc::channel(64);
        (App::new(config, api, tx), rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Wait for the next request to come back. Fetch events are skipped.
    async fn next_completion(rx: &mut mpsc::Receiver<TuiEvent>) -> Completion {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("request never landed")
                .expect("event channel closed");
            if let TuiEvent::Completed(completion) = event {
                return completion;
            }
        }
    }

    #[tokio::test]
    async fn test_search_applies_on_enter_only() {
        let (mut app, _rx) = app();
        app.handle_key(key(KeyCode::Char('/')));
        for c in "mar".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(app.filters(View::Locations).text.is_empty());
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.filters(View::Locations).text, "mar");
        assert!(app.mode.is_browse());
    }

    #[tokio::test]
    async fn test_status_filter_cycles_back_to_none() {
        let (mut app, _rx) = app();
        app.active_view = View::Bookings;
        for expected in ["pending", "accepted", "completed"] {
            app.handle_action(Action::CycleStatus);
            assert_eq!(app.filters(View::Bookings).status.as_deref(), Some(expected));
        }
        app.handle_action(Action::CycleStatus);
        assert!(app.filters(View::Bookings).status.is_none());
    }

    #[tokio::test]
    async fn test_location_change_clears_building_filter() {
        let (mut app, _rx) = app();
        app.active_view = View::Attendance;
        app.reference = ReferenceData {
            locations: fixtures::locations(2),
            buildings: vec![fixtures::building("bld-1", "loc-1"), fixtures::building("bld-2", "loc-2")],
            people: vec![fixtures::person("w-1", PersonKind::Worker, &["bld-1"])],
        };
        app.handle_action(Action::CycleLocation);
        app.handle_action(Action::CycleBuilding);
        assert_eq!(app.filters(View::Attendance).building(), Some(&RecordId::new("bld-1")));

        app.handle_action(Action::CycleLocation);
        assert_eq!(app.filters(View::Attendance).location(), Some(&RecordId::new("loc-2")));
        assert!(app.filters(View::Attendance).building().is_none());
    }

    #[tokio::test]
    async fn test_location_filter_refused_on_bookings() {
        let (mut app, _rx) = app();
        app.active_view = View::Bookings;
        app.reference.locations = fixtures::locations(1);
        app.handle_action(Action::CycleLocation);
        assert!(app.filters(View::Bookings).location().is_none());
        assert_eq!(
            app.notifications.latest().unwrap().message,
            "Bookings has no location filter"
        );
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open_with_message() {
        let (mut app, _rx) = app();
        app.handle_action(Action::NewItem);
        assert!(matches!(app.mode, Mode::LocationForm(_)));
        app.handle_key(key(KeyCode::Enter));
        match &app.mode {
            Mode::LocationForm(form) => assert_eq!(form.error(), Some("Name is required")),
            _ => panic!("form closed on validation failure"),
        }
        assert_eq!(
            app.notifications.latest().unwrap().level,
            NotificationLevel::Warning
        );
    }

    #[tokio::test]
    async fn test_quit_and_persisted_state() {
        let (mut app, _rx) = app();
        app.handle_action(Action::SwitchView(4));
        app.handle_action(Action::ToggleCurrency);
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
        let persisted = app.persisted();
        assert_eq!(persisted.active_view, View::Attendance);
        assert!(persisted.show_currency);
    }

    #[tokio::test]
    async fn test_toggle_shows_before_the_server_answers_then_reverts() {
        let (mut app, mut rx) = app();
        app.active_view = View::Attendance;
        let ticket = app.attendance.begin(1);
        app.attendance.complete(
            ticket.token,
            ListOutcome::ok(Page {
                records: vec![fixtures::worker_attendance("a-1", false)],
                total: 1,
            }),
        );

        app.handle_action(Action::TogglePresent);
        // Flipped before anything came back.
        assert!(app.attendance.selected_record().unwrap().present);

        let completion = next_completion(&mut rx).await;
        app.handle_event(TuiEvent::Completed(completion));
        assert!(!app.attendance.selected_record().unwrap().present);
        assert_eq!(
            app.notifications.latest().unwrap().level,
            NotificationLevel::Error
        );
    }

    #[tokio::test]
    async fn test_form_stays_open_while_saving_and_shows_the_failure() {
        let (mut app, mut rx) = app();
        let ticket = app.locations.begin(1);
        app.locations.complete(
            ticket.token,
            ListOutcome::ok(Page {
                records: fixtures::locations(1),
                total: 1,
            }),
        );
        app.handle_action(Action::EditItem);
        assert!(matches!(app.mode, Mode::LocationForm(_)));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.saving);
        assert!(matches!(app.mode, Mode::LocationForm(_)));

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.notifications.latest().unwrap().message, "Still saving");

        let completion = next_completion(&mut rx).await;
        app.handle_event(TuiEvent::Completed(completion));
        assert!(!app.saving);
        match &app.mode {
            Mode::LocationForm(form) => assert!(form.error().is_some()),
            _ => panic!("form closed on a failed save"),
        }
    }
}
