//! Modal overlays drawn over the active view: forms, pickers, prompts.

use crate::forms::{Form, FormRow, NotesEditor, WorkerPicker};
use crate::state::App;
use crate::views::helpers::centered;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub const FORM_KEYS: &str =
    "Tab/Down next | Shift+Tab/Up prev | Left/Right/Space choose | Enter or Ctrl+S save | Esc cancel";
pub const ENQUIRY_KEYS: &str = "Ctrl+N add vehicle | Ctrl+D remove vehicle";

pub const HELP: &[(&str, &str)] = &[
    ("1-5, Tab", "switch view"),
    ("j/k, arrows", "move selection"),
    ("[ / ]", "previous / next page"),
    ("/", "search"),
    ("f L B W D", "cycle status, location, building, worker, dates"),
    ("C", "clear filters"),
    ("n / e / d", "new / edit / delete"),
    ("a / w", "accept booking / assign worker"),
    ("space / t", "toggle present / edit notes"),
    ("u", "undo building delete"),
    ("x", "export attendance"),
    ("c", "toggle currency"),
    ("r", "refresh"),
    ("q", "quit"),
];

/// First row to draw so the focused row stays inside `height` rows.
pub fn scroll_offset(rows: &[FormRow], height: u16) -> u16 {
    let focused = rows.iter().position(|r| r.focused).unwrap_or(0) as u16;
    if height == 0 || focused < height {
        0
    } else {
        focused + 1 - height
    }
}

pub fn render_form<F: Form + ?Sized>(f: &mut Frame<'_>, app: &App, form: &F, extra_keys: Option<&str>) {
    let area = centered(f.size(), 70, 80);
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(form.title(), Style::default().fg(app.theme.primary)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(2)])
        .split(inner);

    let rows = form.rows();
    let lines: Vec<Line> = rows
        .iter()
        .map(|row| {
            if row.label.starts_with("--") {
                return Line::from(Span::styled(
                    row.label.clone(),
                    Style::default().fg(app.theme.tertiary),
                ));
            }
            let marker = if row.required { "*" } else { " " };
            let label_style = if row.focused {
                Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.secondary)
            };
            Line::from(vec![
                Span::styled(format!("{}{:<16}", marker, row.label), label_style),
                Span::raw(row.value.clone()),
            ])
        })
        .collect();
    let offset = scroll_offset(&rows, chunks[0].height);
    f.render_widget(Paragraph::new(Text::from(lines)).scroll((offset, 0)), chunks[0]);

    let status = if app.saving {
        Paragraph::new("Saving...").style(Style::default().fg(app.theme.text_dim))
    } else {
        Paragraph::new(form.error().unwrap_or_default()).style(Style::default().fg(app.theme.error))
    };
    f.render_widget(status, chunks[1]);

    let keys = match extra_keys {
        Some(extra) => format!("{} | {}", FORM_KEYS, extra),
        None => FORM_KEYS.to_string(),
    };
    f.render_widget(
        Paragraph::new(keys)
            .style(Style::default().fg(app.theme.text_dim))
            .wrap(Wrap { trim: true }),
        chunks[2],
    );
}

pub fn render_picker(f: &mut Frame<'_>, app: &App, picker: &WorkerPicker) {
    let area = centered(f.size(), 50, 60);
    f.render_widget(Clear, area);
    let lines: Vec<Line> = if picker.choice.options.is_empty() {
        vec![Line::from(Span::styled(
            "No workers loaded",
            Style::default().fg(app.theme.text_dim),
        ))]
    } else {
        picker
            .choice
            .options
            .iter()
            .map(|option| {
                let chosen = picker.choice.selected.as_ref() == Some(&option.id);
                let style = if chosen {
                    Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(app.theme.text)
                };
                let mark = if chosen { "> " } else { "  " };
                Line::from(Span::styled(format!("{}{}", mark, option.label), style))
            })
            .collect()
    };
    let title = format!("Assign worker to {} (Enter assign, Esc cancel)", picker.booking);
    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(widget, area);
}

pub fn render_notes(f: &mut Frame<'_>, editor: &NotesEditor) {
    let area = centered(f.size(), 60, 40);
    f.render_widget(Clear, area);
    f.render_widget(&editor.textarea, area);
}

pub fn render_search(f: &mut Frame<'_>, app: &App, input: &str) {
    let screen = f.size();
    let area = Rect::new(screen.x, screen.height.saturating_sub(5), screen.width, 3);
    f.render_widget(Clear, area);
    let widget = Paragraph::new(format!("/{}", input))
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Search (Enter apply, Esc cancel)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        );
    f.render_widget(widget, area);
}

pub fn render_confirm(f: &mut Frame<'_>, app: &App, prompt: &str) {
    let area = centered(f.size(), 50, 20);
    f.render_widget(Clear, area);
    let widget = Paragraph::new(prompt.to_string())
        .style(Style::default().fg(app.theme.warning))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Confirm").borders(Borders::ALL));
    f.render_widget(widget, area);
}

pub fn render_help(f: &mut Frame<'_>, app: &App) {
    let area = centered(f.size(), 60, 70);
    f.render_widget(Clear, area);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", keys), Style::default().fg(app.theme.primary)),
                Span::raw(*what),
            ])
        })
        .collect();
    let widget = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Keybindings (any key closes)").borders(Borders::ALL));
    f.render_widget(widget, area);
}
