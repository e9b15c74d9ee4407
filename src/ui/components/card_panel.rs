use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;
use crate::ui::view::DeckView;

/// Fixed strings the panel shows, already translated.
pub struct CardPanelLabels<'a> {
    pub title: &'a str,
    pub direction: &'a str,
    pub reveal_hint: &'a str,
    pub exhausted: &'a str,
    pub exhausted_hint: &'a str,
    pub empty: &'a str,
    pub loading: &'a str,
}

pub struct CardPanel<'a> {
    view: &'a DeckView,
    labels: CardPanelLabels<'a>,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> CardPanel<'a> {
    pub fn new(
        view: &'a DeckView,
        labels: CardPanelLabels<'a>,
        loading: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            view,
            labels,
            loading,
            theme,
        }
    }

    fn status_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        if self.view.total == 0 {
            let text = if self.loading {
                self.labels.loading
            } else {
                self.labels.empty
            };
            return vec![Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(colors.muted()),
            ))];
        }
        vec![
            Line::from(Span::styled(
                self.labels.exhausted.to_string(),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.labels.exhausted_hint.to_string(),
                Style::default().fg(colors.muted()),
            )),
        ]
    }
}

impl Widget for CardPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.labels.title))
            .title_bottom(
                Line::from(format!(" {} ", self.labels.direction)).alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(card) = &self.view.card else {
            let lines = self.status_lines();
            let top = inner.y + inner.height.saturating_sub(lines.len() as u16) / 2;
            let rect = Rect::new(inner.x, top, inner.width, inner.height.saturating_sub(top - inner.y));
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(rect, buf);
            return;
        };

        // Prompt in the upper half, answer (or the hint) in the lower half.
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(inner);

        let prompt_area = halves[0];
        let prompt_height = prompt_area.height.min(2);
        let prompt_top = prompt_area.y + prompt_area.height - prompt_height;
        Paragraph::new(Line::from(Span::styled(
            card.prompt.clone(),
            Style::default()
                .fg(colors.prompt())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(
            Rect::new(prompt_area.x, prompt_top, prompt_area.width, prompt_height),
            buf,
        );

        let rule_width = inner.width / 3;
        let rule_x = inner.x + inner.width.saturating_sub(rule_width) / 2;
        buf.set_string(
            rule_x,
            halves[1].y,
            "─".repeat(rule_width as usize),
            Style::default().fg(colors.border()),
        );

        let answer_line = match &card.answer {
            Some(answer) => Line::from(Span::styled(
                answer.clone(),
                Style::default()
                    .fg(colors.answer())
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(Span::styled(
                self.labels.reveal_hint.to_string(),
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )),
        };
        Paragraph::new(answer_line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(halves[2], buf);
    }
}
