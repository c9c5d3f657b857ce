//! Locations view.

use crate::nav::View;
use crate::state::App;
use crate::views::helpers::{list_areas, render_filters, render_list, render_page_status};
use crate::widgets::DetailPanel;
use ratatui::{layout::Rect, style::Style, widgets::ListItem, Frame};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let areas = list_areas(area, 55);
    render_filters(f, app, View::Locations, areas.filters);

    let rows = app.locations.visible();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|location| match &location.address {
            Some(address) => ListItem::new(format!("{} | {}", location.name, address)),
            None => ListItem::new(location.name.clone()),
        })
        .collect();
    render_list(f, app, areas.list, "Locations", items, app.locations.selected);
    render_page_status(f, app, areas.status, app.locations.store.state(), rows.len());

    let mut fields = Vec::new();
    if let Some(location) = app.locations.selected_record() {
        fields.push(("ID", location.id.to_string()));
        fields.push(("Name", location.name.clone()));
        fields.push(("Address", location.address.clone().unwrap_or_default()));
        fields.push(("Latitude", coordinate(location.latitude)));
        fields.push(("Longitude", coordinate(location.longitude)));
    }

    let detail = DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
        empty_hint: "No location selected. [n] new",
        hint_style: Style::default().fg(app.theme.text_dim),
    };
    detail.render(f, areas.detail);
}

fn coordinate(value: Option<f64>) -> String {
    value.map(|v| format!("{:.6}", v)).unwrap_or_default()
}
