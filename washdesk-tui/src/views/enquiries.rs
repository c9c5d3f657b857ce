//! Enquiries view: customer rows with their vehicles in the detail panel.

use crate::nav::View;
use crate::state::App;
use crate::theme::enquiry_status_color;
use crate::views::helpers::{list_areas, money, ref_text, render_filters, render_list, render_page_status};
use crate::widgets::DetailPanel;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::ListItem,
    Frame,
};
use washdesk_core::Vehicle;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let areas = list_areas(area, 50);
    render_filters(f, app, View::Enquiries, areas.filters);

    let rows = app.enquiries.visible();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|enquiry| {
            let style = Style::default().fg(enquiry_status_color(enquiry.status, &app.theme));
            let plates: Vec<&str> = enquiry.vehicles.iter().map(|v| v.registration_no.as_str()).collect();
            ListItem::new(Line::from(vec![
                Span::raw(format!(
                    "{} {} {} ",
                    enquiry.mobile,
                    enquiry.name.as_deref().unwrap_or(""),
                    plates.join(",")
                )),
                Span::styled(format!("[{}]", enquiry.status.as_str()), style),
            ]))
        })
        .collect();
    render_list(f, app, areas.list, "Enquiries", items, app.enquiries.selected);
    render_page_status(f, app, areas.status, app.enquiries.store.state(), rows.len());

    let selected = app.enquiries.selected_record();
    let labels: Vec<String> = selected
        .map(|e| (1..=e.vehicles.len()).map(|n| format!("Vehicle {}", n)).collect())
        .unwrap_or_default();
    let mut fields = Vec::new();
    if let Some(enquiry) = selected {
        fields.push(("ID", enquiry.id.to_string()));
        fields.push(("Name", enquiry.name.clone().unwrap_or_default()));
        fields.push(("Mobile", enquiry.mobile.clone()));
        fields.push(("Email", enquiry.email.clone().unwrap_or_default()));
        fields.push(("Status", enquiry.status.as_str().to_string()));
        for (label, vehicle) in labels.iter().zip(&enquiry.vehicles) {
            fields.push((label.as_str(), vehicle_summary(app, vehicle)));
        }
    }

    let detail = DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
        empty_hint: "No enquiry selected. [n] new",
        hint_style: Style::default().fg(app.theme.text_dim),
    };
    detail.render(f, areas.detail);
}

fn vehicle_summary(app: &App, vehicle: &Vehicle) -> String {
    let mut parts = vec![vehicle.registration_no.clone()];
    if let Some(parking) = &vehicle.parking_no {
        parts.push(format!("bay {}", parking));
    }
    if let Some(kind) = &vehicle.vehicle_type {
        parts.push(kind.clone());
    }
    let building = ref_text(vehicle.building.as_ref());
    if !building.is_empty() {
        parts.push(building);
    }
    let worker = ref_text(vehicle.worker.as_ref());
    if !worker.is_empty() {
        parts.push(format!("by {}", worker));
    }
    if !vehicle.schedule_days.is_empty() {
        parts.push(vehicle.schedule_days.to_joined());
    }
    if let Some(amount) = vehicle.amount {
        parts.push(money(app, amount));
    }
    parts.join(" | ")
}
