use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crossterm::event::KeyEvent;

use crate::config::Config;
use crate::deck::{DeckEngine, LineParseError, Verdict};
use crate::event::AppEvent;
use crate::source::github::{Discovery, GithubContext};
use crate::source::loader::{LoadOutcome, LoadRequest, Loaded, SourceLoader};
use crate::source::{SourceError, SourceFile, TextFetcher, local, sample};
use crate::store::progress::ProgressStore;
use crate::ui::path_input::{InputResult, PathInput};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Every source of the list, merged by key.
    All,
    Single(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    SwitchSource(Selection),
    OpenFiles(Vec<PathBuf>),
    Reset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Study,
    Errors,
    PathPrompt,
    Confirm(ConfirmAction),
}

/// Where the current source list came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Sample,
    Local,
    Github { repo: String, branch: String },
}

/// One-line status shown above the key hints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Discovering(String),
    Loading,
    DiscoveryFallback,
    AllSourcesFailed,
    SomeSourcesFailed(usize),
    ParseErrors(usize),
}

/// A load that was started but whose result has not been applied yet.
struct PendingLoad {
    /// Replaces the source list when the load succeeds.
    sources: Option<Vec<SourceFile>>,
    origin: Option<Origin>,
    selection: Selection,
}

pub struct App {
    pub screen: AppScreen,
    pub engine: DeckEngine,
    pub config: Config,
    pub theme: &'static Theme,
    pub sources: Vec<SourceFile>,
    pub selection: Option<Selection>,
    pub origin: Option<Origin>,
    pub parse_errors: Vec<LineParseError>,
    pub load_failures: Vec<(String, SourceError)>,
    pub notice: Option<Notice>,
    pub path_input: Option<PathInput>,
    pub errors_scroll: usize,
    pub should_quit: bool,
    loader: SourceLoader,
    pending: Option<PendingLoad>,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        progress: ProgressStore,
        fetcher: Arc<dyn TextFetcher>,
        tx: Sender<AppEvent>,
    ) -> Self {
        let engine = DeckEngine::new(progress, config.verdict_policy);
        Self::with_engine(config, theme, engine, fetcher, tx)
    }

    pub fn with_engine(
        config: Config,
        theme: &'static Theme,
        engine: DeckEngine,
        fetcher: Arc<dyn TextFetcher>,
        tx: Sender<AppEvent>,
    ) -> Self {
        Self {
            screen: AppScreen::Study,
            engine,
            config,
            theme,
            sources: Vec::new(),
            selection: None,
            origin: None,
            parse_errors: Vec::new(),
            load_failures: Vec::new(),
            notice: None,
            path_input: None,
            errors_scroll: 0,
            should_quit: false,
            loader: SourceLoader::new(fetcher, tx),
            pending: None,
        }
    }

    /// Files given on the command line win; otherwise a GitHub repository is
    /// searched, and the bundled sample is the last resort.
    pub fn start(&mut self, paths: Vec<PathBuf>, github: Option<GithubContext>) {
        if !paths.is_empty() {
            self.load_files(paths);
        } else if let Some(ctx) = github {
            let repo = format!("{}/{}", ctx.owner, ctx.repo);
            log::info!("discovering decks in {repo}");
            self.notice = Some(Notice::Discovering(repo));
            self.loader.start(LoadRequest::Discover {
                ctx,
                branches: self.config.branches.clone(),
                data_dir: self.config.data_dir.clone(),
            });
        } else {
            self.use_sample();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some() || matches!(self.notice, Some(Notice::Discovering(_)))
    }

    /// A session counts as started once a card was revealed or judged and
    /// there is still something left to study.
    pub fn mid_session(&self) -> bool {
        self.engine.session_touched() && !self.engine.is_exhausted() && self.engine.total() > 0
    }

    fn use_sample(&mut self) {
        self.request_load(sample::bundled(), Origin::Sample, Selection::Single(0));
    }

    fn load_files(&mut self, paths: Vec<PathBuf>) {
        self.request_load(local::sources_from_paths(&paths), Origin::Local, Selection::All);
    }

    fn request_load(&mut self, sources: Vec<SourceFile>, origin: Origin, selection: Selection) {
        let chosen = chosen_sources(&sources, selection);
        self.start_fetch(
            chosen,
            PendingLoad {
                sources: Some(sources),
                origin: Some(origin),
                selection,
            },
        );
    }

    fn start_fetch(&mut self, sources: Vec<SourceFile>, pending: PendingLoad) {
        if !matches!(self.notice, Some(Notice::DiscoveryFallback)) {
            self.notice = Some(Notice::Loading);
        }
        self.pending = Some(pending);
        self.loader.start(LoadRequest::Fetch { sources });
    }

    /// Sources the number keys refer to: the list of a pending load that
    /// replaces them, otherwise the current list.
    fn listed_sources(&self) -> &[SourceFile] {
        self.pending
            .as_ref()
            .and_then(|p| p.sources.as_deref())
            .unwrap_or(&self.sources)
    }

    pub fn select_source(&mut self, selection: Selection) {
        let listed = self.listed_sources();
        if let Selection::Single(idx) = selection
            && idx >= listed.len()
        {
            return;
        }
        // Compare with the newest request, pending or applied.
        let latest = self.pending.as_ref().map(|p| p.selection).or(self.selection);
        if listed.is_empty() || latest == Some(selection) {
            return;
        }
        if self.mid_session() {
            self.screen = AppScreen::Confirm(ConfirmAction::SwitchSource(selection));
        } else {
            self.switch_source(selection);
        }
    }

    fn switch_source(&mut self, selection: Selection) {
        let (sources, origin) = match self.pending.take() {
            Some(PendingLoad {
                sources: Some(sources),
                origin,
                ..
            }) => (Some(sources), origin),
            _ => (None, None),
        };
        let chosen = chosen_sources(sources.as_deref().unwrap_or(&self.sources), selection);
        self.start_fetch(
            chosen,
            PendingLoad {
                sources,
                origin,
                selection,
            },
        );
    }

    pub fn open_files(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        if self.mid_session() {
            self.screen = AppScreen::Confirm(ConfirmAction::OpenFiles(paths));
        } else {
            self.load_files(paths);
        }
    }

    /// Applies a finished load unless a newer one has been started since.
    pub fn handle_loaded(&mut self, loaded: Loaded) {
        if !self.loader.is_current(loaded.generation) {
            log::debug!("discarding superseded load #{}", loaded.generation);
            return;
        }

        match loaded.outcome {
            LoadOutcome::Discovered(Discovery::Found { branch, files }) => {
                let repo = match self.notice.take() {
                    Some(Notice::Discovering(repo)) => repo,
                    _ => String::new(),
                };
                self.request_load(files, Origin::Github { repo, branch }, Selection::Single(0));
            }
            LoadOutcome::Discovered(Discovery::NotFound) => {
                log::info!("no remote decks found, falling back to the sample");
                self.notice = Some(Notice::DiscoveryFallback);
                self.use_sample();
            }
            LoadOutcome::Fetched(deck) => {
                let pending = self.pending.take();

                if deck.loaded == 0 && !deck.failures.is_empty() {
                    log::warn!("no source could be read, keeping the current card set");
                    self.load_failures = deck.failures;
                    self.notice = Some(Notice::AllSourcesFailed);
                    return;
                }

                if let Some(pending) = pending {
                    if let Some(sources) = pending.sources {
                        self.sources = sources;
                    }
                    if let Some(origin) = pending.origin {
                        self.origin = Some(origin);
                    }
                    self.selection = Some(pending.selection);
                }

                let notice = if !deck.failures.is_empty() {
                    Some(Notice::SomeSourcesFailed(deck.failures.len()))
                } else if !deck.parsed.errors.is_empty() {
                    Some(Notice::ParseErrors(deck.parsed.errors.len()))
                } else {
                    None
                };
                if notice.is_some() || self.notice != Some(Notice::DiscoveryFallback) {
                    self.notice = notice;
                }

                self.engine.load_card_set(deck.parsed.cards);
                self.parse_errors = deck.parsed.errors;
                self.load_failures = deck.failures;
                self.errors_scroll = 0;
            }
        }
    }

    pub fn reveal(&mut self) {
        let _ = self.engine.reveal();
    }

    pub fn answer(&mut self, verdict: Verdict) {
        if let Ok(outcome) = self.engine.answer(verdict) {
            log::debug!("{verdict:?} -> {outcome:?}");
        }
    }

    pub fn toggle_direction(&mut self) {
        self.engine.switch_direction(self.engine.direction().toggled());
    }

    pub fn request_reset(&mut self) {
        self.screen = AppScreen::Confirm(ConfirmAction::Reset);
    }

    /// Resolves the open confirmation dialog.
    pub fn confirm(&mut self, accepted: bool) {
        let screen = std::mem::replace(&mut self.screen, AppScreen::Study);
        let AppScreen::Confirm(action) = screen else {
            self.screen = screen;
            return;
        };
        if !accepted {
            return;
        }
        match action {
            ConfirmAction::SwitchSource(selection) => self.switch_source(selection),
            ConfirmAction::OpenFiles(paths) => self.load_files(paths),
            ConfirmAction::Reset => self.engine.reset_progress(),
        }
    }

    pub fn show_errors(&mut self) {
        self.errors_scroll = 0;
        self.screen = AppScreen::Errors;
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.load_failures
            .iter()
            .map(|(name, e)| format!("{name}: {e}"))
            .chain(self.parse_errors.iter().map(|e| e.to_string()))
            .collect()
    }

    pub fn scroll_errors(&mut self, down: bool) {
        let max = self.error_lines().len().saturating_sub(1);
        self.errors_scroll = if down {
            (self.errors_scroll + 1).min(max)
        } else {
            self.errors_scroll.saturating_sub(1)
        };
    }

    pub fn open_path_prompt(&mut self) {
        self.path_input = Some(PathInput::new(""));
        self.screen = AppScreen::PathPrompt;
    }

    pub fn handle_path_key(&mut self, key: KeyEvent) {
        let Some(input) = self.path_input.as_mut() else {
            self.screen = AppScreen::Study;
            return;
        };
        match input.handle(key) {
            InputResult::Continue => {}
            InputResult::Cancel => self.close_path_prompt(),
            InputResult::Submit => {
                let paths = local::split_path_list(input.value());
                self.close_path_prompt();
                self.open_files(paths);
            }
        }
    }

    fn close_path_prompt(&mut self) {
        self.path_input = None;
        self.screen = AppScreen::Study;
    }

    /// Name of the selected source, or `None` when every source is merged.
    pub fn selected_name(&self) -> Option<&str> {
        match self.selection? {
            Selection::All => None,
            Selection::Single(idx) => self.sources.get(idx).map(|s| s.name.as_str()),
        }
    }
}

fn chosen_sources(sources: &[SourceFile], selection: Selection) -> Vec<SourceFile> {
    match selection {
        Selection::All => sources.to_vec(),
        Selection::Single(idx) => sources.get(idx).cloned().into_iter().collect(),
    }
}
