//! Attendance view.

use crate::nav::View;
use crate::state::App;
use crate::theme::presence_color;
use crate::views::helpers::{date_text, list_areas, render_filters, render_list, render_page_status};
use crate::widgets::DetailPanel;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::ListItem,
    Frame,
};

fn presence(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let areas = list_areas(area, 60);
    render_filters(f, app, View::Attendance, areas.filters);

    let rows = app.attendance.visible();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|record| {
            let style = Style::default().fg(presence_color(record.present, &app.theme));
            ListItem::new(Line::from(vec![
                Span::raw(format!(
                    "{} {} ({}) ",
                    date_text(record.date),
                    record.subject.person().label(),
                    record.subject.kind_label()
                )),
                Span::styled(presence(record.present), style),
            ]))
        })
        .collect();
    let title = "Attendance ([space] toggle, [t] notes, [x] export)";
    render_list(f, app, areas.list, title, items, app.attendance.selected);
    render_page_status(f, app, areas.status, app.attendance.store.state(), rows.len());

    let mut fields = Vec::new();
    if let Some(record) = app.attendance.selected_record() {
        fields.push(("ID", record.id.to_string()));
        fields.push(("Date", date_text(record.date)));
        fields.push(("Name", record.subject.person().label().to_string()));
        fields.push(("Kind", record.subject.kind_label().to_string()));
        fields.push(("Present", presence(record.present).to_string()));
        fields.push(("Type", record.type_code.clone()));
        fields.push(("Notes", record.notes.clone()));
    }

    let detail = DetailPanel {
        title: "Details",
        fields,
        style: Style::default().fg(app.theme.secondary),
        empty_hint: "No attendance for the selected dates",
        hint_style: Style::default().fg(app.theme.text_dim),
    };
    detail.render(f, areas.detail);
}
