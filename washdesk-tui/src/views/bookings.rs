//! Bookings view.

use crate::nav::View;
use crate::state::App;
use crate::theme::booking_status_color;
use crate::views::helpers::{
    date_text, list_areas, ref_text, render_filters, render_list, render_page_status,
};
use crate::widgets::DetailPanel;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::ListItem,
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let areas = list_areas(area, 60);
    render_filters(f, app, View::Bookings, areas.filters);

    let rows = app.bookings.visible();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|booking| {
            let style = Style::default().fg(booking_status_color(booking.status, &app.theme));
            ListItem::new(Line::from(vec![
                Span::raw(format!(
                    "{} {} {} ",
                    date_text(booking.date),
                    booking.time.as_deref().unwrap_or(""),
                    booking.customer.label()
                )),
                Span::styled(format!("[{}]", booking.status.as_str()), style),
            ]))
        })
        .collect();
    render_list(f, app, areas.list, "Bookings ([a] accept, [w] assign)", items, app.bookings.selected);
    render_page_status(f, app, areas.status, app.bookings.store.state(), rows.len());

    let mut fields = Vec::new();
    if let Some(booking) = app.bookings.selected_record() {
        fields.push(("ID", booking.id.to_string()));
        fields.push(("Customer", booking.customer.label().to_string()));
        fields.push(("Mobile", booking.mobile.clone().unwrap_or_default()));
        fields.push(("Status", booking.status.as_str().to_string()));
        fields.push(("Worker", ref_text(booking.worker.as_ref())));
        fields.push(("Date", date_text(booking.date)));
        fields.push(("Time", booking.time.clone().unwrap_or_default()));
        fields.push(("Service", booking.service_type.clone()));
        fields.push(("Mall", ref_text(booking.mall.as_ref())));
        fields.push(("Building", ref_text(booking.building.as_ref())));
        fields.push(("Registration", booking.registration_no.clone().unwrap_or_default()));
        fields.push(("Parking", booking.parking_no.clone().unwrap_or_default()));
    }

    let detail = DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
        empty_hint: "No booking selected",
        hint_style: Style::default().fg(app.theme.text_dim),
    };
    detail.render(f, areas.detail);
}
