use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::Selection;
use crate::source::SourceFile;
use crate::ui::theme::Theme;

/// Sources reachable with the number keys, plus the merged entry on `a`.
pub struct SourceList<'a> {
    title: &'a str,
    all_label: &'a str,
    empty_label: &'a str,
    sources: &'a [SourceFile],
    selection: Option<Selection>,
    theme: &'a Theme,
}

impl<'a> SourceList<'a> {
    pub fn new(
        sources: &'a [SourceFile],
        selection: Option<Selection>,
        labels: [&'a str; 3],
        theme: &'a Theme,
    ) -> Self {
        let [title, all_label, empty_label] = labels;
        Self {
            title,
            all_label,
            empty_label,
            sources,
            selection,
            theme,
        }
    }

    fn entry(&self, key: &str, name: &str, selected: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let marker = if selected { "▸ " } else { "  " };
        let name_style = if selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(colors.accent())),
            Span::styled(format!("[{key}] "), Style::default().fg(colors.muted())),
            Span::styled(name.to_string(), name_style),
        ])
    }
}

impl Widget for SourceList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let mut lines: Vec<Line> = Vec::new();
        if self.sources.is_empty() {
            lines.push(Line::from(Span::styled(
                self.empty_label.to_string(),
                Style::default().fg(colors.muted()),
            )));
        } else {
            // Only the first nine have a number key.
            for (idx, source) in self.sources.iter().enumerate().take(9) {
                let selected = self.selection == Some(Selection::Single(idx));
                lines.push(self.entry(&(idx + 1).to_string(), &source.name, selected));
            }
            if self.sources.len() > 9 {
                lines.push(Line::from(Span::styled(
                    format!("  … +{}", self.sources.len() - 9),
                    Style::default().fg(colors.muted()),
                )));
            }
            lines.push(Line::from(""));
            let all_selected = self.selection == Some(Selection::All);
            lines.push(self.entry("a", self.all_label, all_selected));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
