//! Layout and formatting shared by the list views.

use crate::nav::View;
use crate::state::App;
use crate::widgets::{FilterBar, FilterChip, PageIndicator};
use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use washdesk_client::ListState as PageState;
use washdesk_core::{EntityRef, RecordId};

/// Areas of a list view: filter bar on top, list and page status on the
/// left, detail on the right.
pub struct ListAreas {
    pub filters: Rect,
    pub list: Rect,
    pub status: Rect,
    pub detail: Rect,
}

pub fn list_areas(area: Rect, left_percent: u16) -> ListAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_percent),
            Constraint::Percentage(100 - left_percent),
        ])
        .split(rows[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(columns[0]);
    ListAreas {
        filters: rows[0],
        list: left[0],
        status: left[1],
        detail: columns[1],
    }
}

/// A rectangle `percent_x` by `percent_y` of `area`, centered.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn render_list(
    f: &mut Frame<'_>,
    app: &App,
    area: Rect,
    title: &str,
    items: Vec<ListItem<'_>>,
    selected: usize,
) {
    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(selected));
    }
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().fg(app.theme.primary))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, &mut state);
}

pub fn render_page_status<T>(f: &mut Frame<'_>, app: &App, area: Rect, state: &PageState<T>, shown: usize) {
    let indicator = PageIndicator {
        pagination: state.pagination,
        shown,
        loading: state.loading,
        error: state.error.as_deref(),
    };
    indicator.render(f, area, &app.theme);
}

/// Filter chips for `view`, labelled with reference names where known.
pub fn filter_chips(app: &App, view: View) -> Vec<FilterChip> {
    let filters = app.filters(view);
    let text = (!filters.text.is_empty()).then(|| filters.text.clone());
    let mut chips = vec![FilterChip::new('/', "Search", text)];
    if !view.statuses().is_empty() {
        chips.push(FilterChip::new('f', "Status", filters.status.clone()));
    }
    if view.filters_location() {
        let name = filters
            .location()
            .map(|id| reference_label(app.reference.location_name(id), id));
        chips.push(FilterChip::new('L', "Location", name));
    }
    if view.filters_building() {
        let name = filters
            .building()
            .map(|id| reference_label(app.reference.building_name(id), id));
        chips.push(FilterChip::new('B', "Building", name));
    }
    if view.filters_worker() {
        let name = filters
            .worker()
            .map(|id| reference_label(app.reference.person_name(id), id));
        chips.push(FilterChip::new('W', "Worker", name));
    }
    if view.filters_dates() {
        let range = match (filters.date_from, filters.date_to) {
            (None, None) => None,
            (from, to) => Some(format!("{} to {}", date_text(from), date_text(to))),
        };
        chips.push(FilterChip::new('D', "Dates", range));
    }
    chips
}

pub fn render_filters(f: &mut Frame<'_>, app: &App, view: View, area: Rect) {
    let chips = filter_chips(app, view);
    let bar = FilterBar {
        title: "Filters ([C] clear)",
        chips: &chips,
        active_style: Style::default().fg(app.theme.tertiary),
        inactive_style: Style::default().fg(app.theme.text_dim),
    };
    bar.render(f, area);
}

fn reference_label(name: Option<&str>, id: &RecordId) -> String {
    name.map(str::to_string).unwrap_or_else(|| id.to_string())
}

pub fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn ref_text(reference: Option<&EntityRef>) -> String {
    reference.map(|r| r.label().to_string()).unwrap_or_default()
}

/// Format a price, prefixed with the currency code when display is on.
pub fn money(app: &App, amount: f64) -> String {
    if app.show_currency {
        format!("{} {:.2}", app.config.currency_code, amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let inner = centered(area, 60, 50);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
    }

    #[test]
    fn test_list_areas_split() {
        let areas = list_areas(Rect::new(0, 0, 100, 30), 60);
        assert_eq!(areas.filters.height, 3);
        assert_eq!(areas.list.width, 60);
        assert_eq!(areas.status.height, 2);
        assert_eq!(areas.detail.x, 60);
    }

    #[test]
    fn test_date_text() {
        assert_eq!(date_text(NaiveDate::from_ymd_opt(2026, 1, 5)), "2026-01-05");
        assert_eq!(date_text(None), "-");
    }
}
