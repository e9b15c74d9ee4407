use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;
use crate::ui::view::DeckView;

/// Learned/total gauge for the current card set.
pub struct ProgressBar<'a> {
    title: String,
    learned: usize,
    total: usize,
    ratio: f64,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(title: &str, view: &DeckView, theme: &'a Theme) -> Self {
        Self {
            title: title.to_string(),
            learned: view.learned,
            total: view.total,
            ratio: view.ratio().clamp(0.0, 1.0),
            theme,
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64).round() as u16;
        for x in inner.x..inner.x + inner.width {
            let bg = if x < inner.x + filled_width {
                colors.bar_filled()
            } else {
                colors.bar_empty()
            };
            buf[(x, inner.y)].set_style(Style::default().bg(bg));
        }

        let label = format!(
            "{}/{}  {:.0}%",
            self.learned,
            self.total,
            self.ratio * 100.0
        );
        let label_width = label.chars().count() as u16;
        let label_x = inner.x + inner.width.saturating_sub(label_width) / 2;
        let style = if self.total > 0 && self.learned == self.total {
            Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        buf.set_stringn(label_x, inner.y, &label, inner.width as usize, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Direction;

    #[test]
    fn label_shows_counts_and_percentage() {
        let theme = Theme::default();
        let view = DeckView {
            learned: 1,
            total: 4,
            remaining: 3,
            direction: Direction::FrontToBack,
            card: None,
        };
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("Learned", &view, &theme).render(area, &mut buf);

        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol()).collect();
        assert!(row.contains("1/4  25%"), "{row:?}");
    }
}
