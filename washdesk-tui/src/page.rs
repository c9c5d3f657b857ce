//! Per-view list page: store, raw filters, and selection.
//!
//! Every change of page, limit or filters goes through [`ListPage::begin`],
//! which issues a fresh fetch token. Selection indexes the visible rows,
//! i.e. after client-side text narrowing.

use chrono::{Datelike, Duration, NaiveDate};
use washdesk_client::{
    FetchTicket, FetchToken, ListOutcome, ListRequest, ListResource, ListStore,
};
use washdesk_core::{compose, FilterState, RecordId, TextSearchable};

pub type DateRange = (Option<NaiveDate>, Option<NaiveDate>);

/// Next preset in the cycle: none, today, last 7 days, this month, none.
/// A range that matches no preset restarts the cycle at today.
pub fn next_date_range(current: DateRange, today: NaiveDate) -> DateRange {
    let week = today - Duration::days(6);
    let month = today.with_day(1).unwrap_or(today);
    let presets: [DateRange; 3] = [
        (Some(today), Some(today)),
        (Some(week), Some(today)),
        (Some(month), Some(today)),
    ];
    match current {
        (None, None) => presets[0],
        _ => match presets.iter().position(|p| *p == current) {
            Some(i) if i + 1 < presets.len() => presets[i + 1],
            Some(_) => (None, None),
            None => presets[0],
        },
    }
}

/// Step a reference filter through `options`. Past the last option the
/// filter clears.
pub fn next_in(options: &[&RecordId], current: Option<&RecordId>) -> Option<RecordId> {
    let next = match current.and_then(|c| options.iter().position(|o| *o == c)) {
        Some(i) => options.get(i + 1),
        None => options.first(),
    };
    next.map(|id| (*id).clone())
}

pub struct ListPage<R: ListResource> {
    pub store: ListStore<R>,
    pub filters: FilterState,
    pub selected: usize,
    limit: u32,
}

impl<R: ListResource> ListPage<R>
where
    R::Record: TextSearchable,
{
    pub fn new(store: ListStore<R>, limit: u32) -> Self {
        Self {
            store,
            filters: FilterState::new(),
            selected: 0,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn current_page(&self) -> u32 {
        self.store.state().request.page
    }

    pub fn request_for(&self, page: u32) -> ListRequest {
        let query = compose(&self.filters, self.store.resource().text_search());
        ListRequest::new(page, self.limit, query)
    }

    /// Start a fetch of `page` under the current filters.
    pub fn begin(&mut self, page: u32) -> FetchTicket {
        self.selected = 0;
        let request = self.request_for(page);
        self.store.begin_fetch(request)
    }

    /// Re-fetch the current page with the current filters.
    pub fn begin_reload(&mut self) -> FetchTicket {
        let page = self.current_page();
        self.begin(page)
    }

    /// Filters changed: back to the first page.
    pub fn begin_filtered(&mut self) -> FetchTicket {
        self.begin(1)
    }

    pub fn begin_next_page(&mut self) -> Option<FetchTicket> {
        let pagination = self.store.state().pagination;
        if pagination.has_next() {
            Some(self.begin(pagination.page + 1))
        } else {
            None
        }
    }

    pub fn begin_prev_page(&mut self) -> Option<FetchTicket> {
        let pagination = self.store.state().pagination;
        if pagination.has_previous() {
            Some(self.begin(pagination.page - 1))
        } else {
            None
        }
    }

    /// Land a fetch result. Stale tokens are ignored by the store.
    pub fn complete(&mut self, token: FetchToken, outcome: ListOutcome<R::Record>) -> bool {
        let landed = self.store.complete_fetch(token, outcome);
        self.clamp_selection();
        landed
    }

    pub fn visible(&self) -> Vec<&R::Record> {
        self.store.state().visible()
    }

    pub fn selected_record(&self) -> Option<&R::Record> {
        self.visible().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection on a row after the visible set shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use washdesk_client::{
        ListResource as _, MockCall, MockResource, MutationStrategy, NotificationLog,
        NotificationSink,
    };
    use washdesk_core::{Location, TextSearch};
    use washdesk_test_utils::fixtures;

    fn page_of(count: usize, search: TextSearch) -> ListPage<MockResource<Location>> {
        let resource = MockResource::new("locations", fixtures::locations(count)).with_text_search(search);
        let sink: Arc<dyn NotificationSink> = Arc::new(NotificationLog::new());
        let store = ListStore::new(Arc::new(resource), MutationStrategy::Splice, sink);
        ListPage::new(store, 10)
    }

    async fn run(page: &mut ListPage<MockResource<Location>>, ticket: FetchTicket) -> bool {
        let resource = Arc::clone(page.store.resource());
        let result = resource.list(&ticket.request).await.unwrap();
        page.complete(ticket.token, ListOutcome::ok(result))
    }

    #[test]
    fn test_date_presets_cycle_back_to_none() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let first = next_date_range((None, None), today);
        assert_eq!(first, (Some(today), Some(today)));
        let week = next_date_range(first, today);
        assert_eq!(week.0, NaiveDate::from_ymd_opt(2026, 3, 8));
        let month = next_date_range(week, today);
        assert_eq!(month.0, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(next_date_range(month, today), (None, None));
    }

    #[test]
    fn test_next_in_clears_after_last() {
        let a = RecordId::new("a");
        let b = RecordId::new("b");
        let options = [&a, &b];
        assert_eq!(next_in(&options, None), Some(a.clone()));
        assert_eq!(next_in(&options, Some(&a)), Some(b.clone()));
        assert_eq!(next_in(&options, Some(&b)), None);
        assert_eq!(next_in(&[], Some(&b)), None);
    }

    #[tokio::test]
    async fn test_next_page_stops_at_last() {
        let mut page = page_of(25, TextSearch::Server);
        let ticket = page.begin(1);
        run(&mut page, ticket).await;

        let ticket = page.begin_next_page().unwrap();
        run(&mut page, ticket).await;
        let ticket = page.begin_next_page().unwrap();
        run(&mut page, ticket).await;

        assert_eq!(page.current_page(), 3);
        assert_eq!(page.visible().len(), 5);
        assert!(page.begin_next_page().is_none());
    }

    #[tokio::test]
    async fn test_filter_change_resets_to_first_page() {
        let mut page = page_of(25, TextSearch::Server);
        let ticket = page.begin(2);
        run(&mut page, ticket).await;

        page.filters.text = "Location 2".to_string();
        let ticket = page.begin_filtered();
        assert_eq!(ticket.request.page, 1);
        assert_eq!(ticket.request.query.params.get("search"), Some("Location 2"));
    }

    #[tokio::test]
    async fn test_selection_follows_client_narrowing() {
        let mut page = page_of(12, TextSearch::Client);
        let ticket = page.begin(1);
        run(&mut page, ticket).await;
        page.selected = 7;

        page.filters.text = "location 1".to_string();
        let ticket = page.begin_filtered();
        assert!(ticket.request.query.params.get("search").is_none());
        run(&mut page, ticket).await;

        // Location 1 and Location 10 on the first page.
        assert_eq!(page.visible().len(), 2);
        page.select_next();
        page.select_next();
        assert_eq!(page.selected_record().unwrap().id, RecordId::new("loc-10"));
    }

    #[tokio::test]
    async fn test_stale_page_does_not_land() {
        let mut page = page_of(25, TextSearch::Server);
        let first = page.begin(1);
        let second = page.begin(2);
        assert!(run(&mut page, second).await);
        assert!(!run(&mut page, first).await);
        assert_eq!(page.current_page(), 2);
        let lists = page
            .store
            .resource()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, MockCall::List(_)))
            .count();
        assert_eq!(lists, 2);
    }
}
