use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct ErrorList<'a> {
    title: String,
    empty_label: &'a str,
    lines: &'a [String],
    scroll: usize,
    theme: &'a Theme,
}

impl<'a> ErrorList<'a> {
    pub fn new(
        title: String,
        empty_label: &'a str,
        lines: &'a [String],
        scroll: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            empty_label,
            lines,
            scroll,
            theme,
        }
    }
}

impl Widget for ErrorList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        let lines: Vec<Line> = if self.lines.is_empty() {
            vec![Line::from(Span::styled(
                self.empty_label.to_string(),
                Style::default().fg(colors.success()),
            ))]
        } else {
            self.lines
                .iter()
                .skip(self.scroll)
                .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(colors.error()))))
                .collect()
        };

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
