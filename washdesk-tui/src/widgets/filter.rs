//! Filter bar: one chip per filter the view supports.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    /// Key that cycles the filter, shown in brackets.
    pub key: char,
    pub label: &'static str,
    pub value: Option<String>,
}

impl FilterChip {
    pub fn new(key: char, label: &'static str, value: Option<String>) -> Self {
        Self { key, label, value }
    }

    pub fn is_active(&self) -> bool {
        self.value.is_some()
    }

    pub fn text(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.key,
            self.label,
            self.value.as_deref().unwrap_or("any")
        )
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub chips: &'a [FilterChip],
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let spans: Vec<Span> = self
            .chips
            .iter()
            .map(|chip| {
                let style = if chip.is_active() {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" {} ", chip.text()), style)
            })
            .collect();

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_chip_reads_any() {
        let chip = FilterChip::new('s', "Status", None);
        assert!(!chip.is_active());
        assert_eq!(chip.text(), "[s] Status: any");
        let chip = FilterChip::new('s', "Status", Some("pending".into()));
        assert_eq!(chip.text(), "[s] Status: pending");
    }
}
