//! View rendering dispatch.

pub mod attendance;
pub mod bookings;
pub mod buildings;
pub mod enquiries;
pub mod helpers;
pub mod locations;
pub mod overlay;

use crate::nav::View;
use crate::state::{App, Mode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use washdesk_client::NotificationLevel;

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Locations => locations::render(f, app, layout[1]),
        View::Buildings => buildings::render(f, app, layout[1]),
        View::Bookings => bookings::render(f, app, layout[1]),
        View::Enquiries => enquiries::render(f, app, layout[1]),
        View::Attendance => attendance::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    match &app.mode {
        Mode::Browse => {}
        Mode::Search { input } => overlay::render_search(f, app, input),
        Mode::Help => overlay::render_help(f, app),
        Mode::Confirm(pending) => overlay::render_confirm(f, app, &pending.prompt()),
        Mode::LocationForm(form) => overlay::render_form(f, app, form, None),
        Mode::BuildingForm(form) => overlay::render_form(f, app, form, None),
        Mode::EnquiryForm(form) => {
            overlay::render_form(f, app, form.as_ref(), Some(overlay::ENQUIRY_KEYS))
        }
        Mode::AssignWorker(picker) => overlay::render_picker(f, app, picker),
        Mode::Notes(editor) => overlay::render_notes(f, editor),
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = vec![Span::styled("WASHDESK ", Style::default().fg(app.theme.primary))];
    for (i, view) in View::all().iter().enumerate() {
        let style = if *view == app.active_view {
            Style::default()
                .fg(app.theme.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_dim)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.title()), style));
    }
    if app.is_loading(app.active_view) {
        spans.push(Span::styled(" loading...", Style::default().fg(app.theme.warning)));
    }
    if app.show_currency {
        spans.push(Span::styled(
            format!(" [{}]", app.config.currency_code),
            Style::default().fg(app.theme.tertiary),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = "? help | 1-5 views | j/k move | [ ] page | / search | n new | e edit | d delete | q quit";
    let (text, style) = if let Some(note) = app.notifications.latest() {
        let label = match note.level {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "SUCCESS",
        };
        let color = match note.level {
            NotificationLevel::Info => app.theme.info,
            NotificationLevel::Warning => app.theme.warning,
            NotificationLevel::Error => app.theme.error,
            NotificationLevel::Success => app.theme.success,
        };
        let stamp = note.created_at.with_timezone(&chrono::Local).format("%H:%M:%S");
        (format!("{} {}: {}", stamp, label, note.message), Style::default().fg(color))
    } else {
        (help.to_string(), Style::default().fg(app.theme.text_dim))
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
