//! Page position and load state under a list.

use crate::theme::SynthBruteTheme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use washdesk_core::Pagination;

pub struct PageIndicator<'a> {
    pub pagination: Pagination,
    pub shown: usize,
    pub loading: bool,
    pub error: Option<&'a str>,
}

impl<'a> PageIndicator<'a> {
    pub fn status(&self) -> String {
        let position = format!(
            "Page {}/{} | {} shown | {} total",
            self.pagination.page, self.pagination.total_pages, self.shown, self.pagination.total
        );
        if self.loading {
            format!("{} | loading...", position)
        } else if let Some(error) = self.error {
            format!("{} | {}", position, error)
        } else {
            position
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &SynthBruteTheme) {
        let color = if self.loading {
            theme.warning
        } else if self.error.is_some() {
            theme.error
        } else {
            theme.text_dim
        };
        let paragraph = Paragraph::new(self.status())
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::TOP));
        f.render_widget(paragraph, area);
    }
}
