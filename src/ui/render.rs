use ratatui::Frame;
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use rust_i18n::t;

use crate::app::{App, AppScreen, ConfirmAction, Notice, Origin, Selection};
use crate::deck::Direction;
use crate::ui::components::card_panel::{CardPanel, CardPanelLabels};
use crate::ui::components::confirm_dialog::ConfirmDialog;
use crate::ui::components::error_list::ErrorList;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::components::source_list::SourceList;
use crate::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use crate::ui::view::DeckView;

const STUDY_HINTS: &[&str] = &[
    "hints.reveal",
    "hints.good",
    "hints.bad",
    "hints.direction",
    "hints.reset",
    "hints.sources",
    "hints.open",
    "hints.errors",
    "hints.quit",
];

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let bg = Block::default().style(Style::default().bg(app.theme.colors.bg()));
    frame.render_widget(bg, area);

    match &app.screen {
        AppScreen::Errors => render_errors(frame, app),
        _ => render_study(frame, app),
    }
    match &app.screen {
        AppScreen::Confirm(action) => render_confirm(frame, app, action),
        AppScreen::PathPrompt => render_path_prompt(frame, app),
        _ => {}
    }
}

fn translated(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| t!(*k).to_string()).collect()
}

fn hint_lines(keys: &[&str], width: u16, app: &App) -> Vec<Line<'static>> {
    let hints = translated(keys);
    let hints: Vec<&str> = hints.iter().map(String::as_str).collect();
    pack_hint_lines(&hints, width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.muted()))))
        .collect()
}

fn direction_label(direction: Direction) -> String {
    match direction {
        Direction::FrontToBack => t!("direction.front_to_back"),
        Direction::BackToFront => t!("direction.back_to_front"),
    }
    .to_string()
}

fn origin_label(origin: &Origin) -> String {
    match origin {
        Origin::Sample => t!("header.origin_sample"),
        Origin::Local => t!("header.origin_local"),
        Origin::Github { repo, branch } => t!("header.origin_github", repo = repo, branch = branch),
    }
    .to_string()
}

fn selection_label(app: &App, selection: Selection) -> String {
    match selection {
        Selection::All => t!("header.all_sources").to_string(),
        Selection::Single(idx) => app
            .sources
            .get(idx)
            .map(|s| s.name.clone())
            .unwrap_or_default(),
    }
}

fn notice_line(app: &App) -> Option<Line<'static>> {
    let colors = &app.theme.colors;
    let (text, color) = match app.notice.as_ref()? {
        Notice::Discovering(repo) => (t!("notice.discovering", repo = repo), colors.muted()),
        Notice::Loading => (t!("notice.loading"), colors.muted()),
        Notice::DiscoveryFallback => (t!("notice.fallback"), colors.warning()),
        Notice::AllSourcesFailed => (t!("notice.all_failed"), colors.error()),
        Notice::SomeSourcesFailed(n) => (t!("notice.some_failed", count = n), colors.warning()),
        Notice::ParseErrors(n) => (t!("notice.parse_errors", count = n), colors.warning()),
    };
    Some(Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(color),
    )))
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let mut info = Vec::new();
    if let Some(origin) = &app.origin {
        info.push(origin_label(origin));
    }
    if let Some(selection) = app.selection {
        info.push(selection_label(app, selection));
    }
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " fiszki ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", info.join(" │ ")),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_study(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let view = DeckView::from_engine(&app.engine);

    let mut footer: Vec<Line> = notice_line(app).into_iter().collect();
    footer.extend(hint_lines(STUDY_HINTS, area.width, app));
    let layout = AppLayout::new(area, footer.len() as u16);

    render_header(frame, app, layout.header);

    let title = t!("card.title");
    let direction = direction_label(view.direction);
    let reveal_hint = t!("card.reveal_hint");
    let exhausted = t!("card.exhausted");
    let exhausted_hint = t!("card.exhausted_hint");
    let empty = t!("card.empty");
    let loading = t!("card.loading");
    let labels = CardPanelLabels {
        title: &title,
        direction: &direction,
        reveal_hint: &reveal_hint,
        exhausted: &exhausted,
        exhausted_hint: &exhausted_hint,
        empty: &empty,
        loading: &loading,
    };
    frame.render_widget(
        CardPanel::new(&view, labels, app.is_loading(), app.theme),
        layout.main,
    );

    if let Some(sidebar) = layout.sidebar {
        let title = t!("sources.title");
        let all = t!("sources.all");
        let none = t!("sources.none");
        frame.render_widget(
            SourceList::new(&app.sources, app.selection, [&title, &all, &none], app.theme),
            sidebar,
        );
    }

    frame.render_widget(
        ProgressBar::new(&t!("progress.title"), &view, app.theme),
        layout.progress,
    );
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_errors(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let footer = hint_lines(&["hints.scroll", "hints.back"], area.width, app);
    let layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(footer.len().max(1) as u16),
        ])
        .split(area);

    render_header(frame, app, layout[0]);

    let lines = app.error_lines();
    let empty = t!("errors.none");
    frame.render_widget(
        ErrorList::new(
            t!("errors.title", count = lines.len()).to_string(),
            &empty,
            &lines,
            app.errors_scroll,
            app.theme,
        ),
        layout[1],
    );
    frame.render_widget(Paragraph::new(footer), layout[2]);
}

fn render_confirm(frame: &mut Frame, app: &App, action: &ConfirmAction) {
    let message = match action {
        ConfirmAction::SwitchSource(selection) => {
            t!("confirm.switch_source", name = selection_label(app, *selection))
        }
        ConfirmAction::OpenFiles(paths) => t!("confirm.open_files", count = paths.len()),
        ConfirmAction::Reset => t!("confirm.reset"),
    };
    let title = t!("confirm.title");
    let hint = t!("confirm.hint");
    frame.render_widget(
        ConfirmDialog::new(&title, message.to_string(), &hint, app.theme),
        frame.area(),
    );
}

fn render_path_prompt(frame: &mut Frame, app: &App) {
    let Some(input) = &app.path_input else {
        return;
    };
    let colors = &app.theme.colors;
    let area = centered_rect(70, 35, frame.area());
    frame.render_widget(Clear, area);

    let (before, after) = input.split_at_cursor();
    let mut rest = after.chars();
    let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let input_line = Line::from(vec![
        Span::styled(before.to_string(), Style::default().fg(colors.fg())),
        Span::styled(
            under_cursor,
            Style::default().fg(colors.bg()).bg(colors.accent()),
        ),
        Span::styled(rest.as_str().to_string(), Style::default().fg(colors.fg())),
    ]);

    let mut lines = vec![
        Line::from(Span::styled(
            t!("prompt.help").to_string(),
            Style::default().fg(colors.muted()),
        )),
        Line::from(""),
        input_line,
    ];
    if input.completion_error {
        lines.push(Line::from(Span::styled(
            t!("prompt.unreadable").to_string(),
            Style::default().fg(colors.error()),
        )));
    }
    lines.push(Line::from(""));
    let width = area.width.saturating_sub(2);
    lines.extend(hint_lines(&["hints.complete", "hints.submit", "hints.back"], width, app));

    let block = Block::bordered()
        .title(format!(" {} ", t!("prompt.title")))
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
