use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use fiszki::app::{App, AppScreen, Selection};
use fiszki::check;
use fiszki::config::Config;
use fiszki::deck::{Verdict, VerdictPolicy};
use fiszki::event::{AppEvent, EventHandler};
use fiszki::source::fetch::default_fetcher;
use fiszki::source::github::GithubContext;
use fiszki::store::kv::{FileStore, KeyValueStore, MemoryStore};
use fiszki::store::progress::ProgressStore;
use fiszki::ui;
use fiszki::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "fiszki", version, about = "Terminal flashcard trainer for bilingual word lists")]
struct Cli {
    #[arg(help = "Deck files (one `front - back` pair per line), merged in order")]
    files: Vec<PathBuf>,

    #[arg(short, long, value_name = "OWNER/REPO", help = "Discover decks in a GitHub repository")]
    github: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (en, pl)")]
    locale: Option<String>,

    #[arg(long, help = "Skip a card on [b] without revealing it first")]
    bad_immediate: bool,

    #[arg(long, help = "Parse the files, print errors and exit")]
    check: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });
    config.validate(&Theme::available_themes());
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if cli.bad_immediate {
        config.verdict_policy = VerdictPolicy::BadImmediate;
    }
    rust_i18n::set_locale(&config.locale);

    if cli.check {
        return run_check(&cli.files);
    }

    let github = match cli.github.as_deref().or(config.github_repo.as_deref()) {
        Some(spec) => Some(
            GithubContext::parse(spec)
                .with_context(|| format!("not a GitHub repository: {spec}"))?,
        ),
        None => None,
    };

    let theme = Theme::load(&config.theme).unwrap_or_default();
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let kv: Box<dyn KeyValueStore> = match FileStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("progress will not be saved: {e}");
            Box::new(MemoryStore::new())
        }
    };
    let progress = ProgressStore::open(kv);

    let events = EventHandler::new(Duration::from_millis(250));
    let fetcher = default_fetcher(config.network_enabled);
    let mut app = App::new(config, theme, progress, fetcher, events.sender());
    app.start(cli.files, github);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:?}");
        eprintln!("Error: {err:?}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("fiszki")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::options()
        .create(true)
        .append(true)
        .open(dir.join("fiszki.log"))
    else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("FISZKI_LOG", "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run_check(files: &[PathBuf]) -> Result<ExitCode> {
    anyhow::ensure!(!files.is_empty(), "--check needs at least one file");
    let report = check::check_files(files);
    report.write_to(&mut io::stdout().lock())?;
    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render::draw(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Loaded(loaded) => app.handle_loaded(loaded),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Study => handle_study_key(app, key),
        AppScreen::Errors => handle_errors_key(app, key),
        AppScreen::PathPrompt => app.handle_path_key(key),
        AppScreen::Confirm(_) => handle_confirm_key(app, key),
    }
}

fn handle_study_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => app.reveal(),
        KeyCode::Char('g') | KeyCode::Right => app.answer(Verdict::Good),
        KeyCode::Char('b') | KeyCode::Left => app.answer(Verdict::Bad),
        KeyCode::Char('d') => app.toggle_direction(),
        KeyCode::Char('r') => app.request_reset(),
        KeyCode::Char('a') => app.select_source(Selection::All),
        KeyCode::Char('o') => app.open_path_prompt(),
        KeyCode::Char('e') => app.show_errors(),
        KeyCode::Char(ch @ '1'..='9') => {
            let idx = ch as usize - '1' as usize;
            app.select_source(Selection::Single(idx));
        }
        _ => {}
    }
}

fn handle_errors_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => app.screen = AppScreen::Study,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_errors(true),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_errors(false),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('t') | KeyCode::Enter => app.confirm(true),
        KeyCode::Char('n') | KeyCode::Esc => app.confirm(false),
        _ => {}
    }
}
