//! Detail panel for the selected row's field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    pub style: Style,
    /// Shown instead of fields when nothing is selected.
    pub empty_hint: &'a str,
    pub hint_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn lines(&self) -> Vec<Line<'_>> {
        if self.fields.is_empty() {
            return vec![Line::from(Span::styled(self.empty_hint, self.hint_style))];
        }
        self.fields
            .iter()
            .map(|(label, value)| {
                let value = if value.is_empty() { "-" } else { value.as_str() };
                Line::from(vec![
                    Span::styled(format!("{}: ", label), self.style),
                    Span::raw(value.to_string()),
                ])
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(Text::from(self.lines()))
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(fields: Vec<(&'static str, String)>) -> DetailPanel<'static> {
        DetailPanel {
            title: "Details",
            fields,
            style: Style::default(),
            empty_hint: "No row selected",
            hint_style: Style::default(),
        }
    }

    #[test]
    fn test_empty_panel_shows_hint() {
        let p = panel(Vec::new());
        let lines = p.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, "No row selected");
    }

    #[test]
    fn test_blank_value_rendered_as_dash() {
        let p = panel(vec![("Address", String::new())]);
        let lines = p.lines();
        assert_eq!(lines[0].spans[1].content, "-");
    }
}
