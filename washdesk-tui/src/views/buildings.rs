//! Buildings view.

use crate::nav::View;
use crate::state::App;
use crate::views::helpers::{list_areas, money, render_filters, render_list, render_page_status};
use crate::widgets::DetailPanel;
use ratatui::{layout::Rect, style::Style, widgets::ListItem, Frame};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let areas = list_areas(area, 55);
    render_filters(f, app, View::Buildings, areas.filters);

    let rows = app.buildings.visible();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|building| {
            ListItem::new(format!(
                "{} ({}) {}",
                building.name,
                building.location.label(),
                money(app, building.amount)
            ))
        })
        .collect();
    render_list(f, app, areas.list, "Buildings", items, app.buildings.selected);
    render_page_status(f, app, areas.status, app.buildings.store.state(), rows.len());

    let mut fields = Vec::new();
    if let Some(building) = app.buildings.selected_record() {
        fields.push(("ID", building.id.to_string()));
        fields.push(("Name", building.name.clone()));
        fields.push(("Location", building.location.label().to_string()));
        fields.push(("Amount", money(app, building.amount)));
        fields.push(("Card Charges", money(app, building.card_charges)));
        fields.push(("Scheduled", if building.schedule { "yes" } else { "no" }.to_string()));
        fields.push(("Schedule Days", building.schedule_days.to_joined()));
    }
    if let Some(id) = &app.last_deleted_building {
        fields.push(("Undo", format!("[u] restore {}", id)));
    }

    let detail = DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
        empty_hint: "No building selected. [n] new",
        hint_style: Style::default().fg(app.theme.text_dim),
    };
    detail.render(f, areas.detail);
}
