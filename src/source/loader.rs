use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::deck::parser::{self, ParseOutcome};
use crate::event::AppEvent;
use crate::source::github::{self, Discovery, GithubContext};
use crate::source::{SourceError, SourceFile, SourceOrigin, TextFetcher, local};

pub enum LoadRequest {
    Discover {
        ctx: GithubContext,
        branches: Vec<String>,
        data_dir: String,
    },
    /// Read, parse and merge the given sources in order.
    Fetch { sources: Vec<SourceFile> },
}

#[derive(Debug)]
pub struct FetchedDeck {
    pub parsed: ParseOutcome,
    /// Number of sources that could be read.
    pub loaded: usize,
    pub failures: Vec<(String, SourceError)>,
}

#[derive(Debug)]
pub enum LoadOutcome {
    Discovered(Discovery),
    Fetched(FetchedDeck),
}

#[derive(Debug)]
pub struct Loaded {
    pub generation: u64,
    pub outcome: LoadOutcome,
}

pub fn read_text(fetcher: &dyn TextFetcher, source: &SourceFile) -> Result<String, SourceError> {
    match &source.origin {
        SourceOrigin::Inline(text) => Ok(text.clone()),
        SourceOrigin::Local(path) => local::read_source(path),
        SourceOrigin::Remote(url) => fetcher.fetch_text(url),
    }
}

/// Reads, parses and merges `sources` in order. A source that cannot be read
/// is skipped and reported; the rest are still used.
pub fn fetch_all(fetcher: &dyn TextFetcher, sources: &[SourceFile]) -> FetchedDeck {
    let mut outcomes = Vec::new();
    let mut failures = Vec::new();
    for source in sources {
        match read_text(fetcher, source) {
            Ok(text) => outcomes.push(parser::parse(&text, &source.name)),
            Err(e) => {
                log::warn!("skipping source {}: {e}", source.name);
                failures.push((source.name.clone(), e));
            }
        }
    }
    FetchedDeck {
        loaded: outcomes.len(),
        parsed: parser::merge(outcomes),
        failures,
    }
}

pub fn resolve(fetcher: &dyn TextFetcher, request: LoadRequest) -> LoadOutcome {
    match request {
        LoadRequest::Discover {
            ctx,
            branches,
            data_dir,
        } => LoadOutcome::Discovered(github::probe(fetcher, &ctx, &branches, &data_dir)),
        LoadRequest::Fetch { sources } => LoadOutcome::Fetched(fetch_all(fetcher, &sources)),
    }
}

/// Runs load requests on worker threads and posts the results to the event
/// channel. Each request gets a new generation; only the newest one is current.
pub struct SourceLoader {
    fetcher: Arc<dyn TextFetcher>,
    tx: Sender<AppEvent>,
    generation: u64,
}

impl SourceLoader {
    pub fn new(fetcher: Arc<dyn TextFetcher>, tx: Sender<AppEvent>) -> Self {
        Self {
            fetcher,
            tx,
            generation: 0,
        }
    }

    pub fn start(&mut self, request: LoadRequest) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let outcome = resolve(fetcher.as_ref(), request);
            // The receiver is gone once the app has quit.
            let _ = tx.send(AppEvent::Loaded(Loaded {
                generation,
                outcome,
            }));
        });

        generation
    }

    /// Whether a finished load is still wanted, i.e. no newer load started.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::source::fetch::DisabledFetcher;

    #[test]
    fn fetch_skips_unreadable_sources_and_merges_the_rest() {
        let sources = vec![
            SourceFile::inline("one.txt", "cat - kot\nbroken"),
            SourceFile::remote("two.txt", "https://example.com/two.txt"),
            SourceFile::inline("three.txt", "CAT - KOT\ndog - pies"),
        ];
        let LoadOutcome::Fetched(deck) = resolve(&DisabledFetcher, LoadRequest::Fetch { sources })
        else {
            panic!("expected a fetched deck");
        };

        assert_eq!(deck.loaded, 2);
        assert_eq!(deck.failures.len(), 1);
        assert_eq!(deck.failures[0].0, "two.txt");
        let fronts: Vec<&str> = deck.parsed.cards.iter().map(|c| c.front()).collect();
        assert_eq!(fronts, vec!["cat", "dog"]);
        assert_eq!(deck.parsed.errors.len(), 1);
        assert_eq!(deck.parsed.errors[0].source, "one.txt");
    }

    #[test]
    fn generations_increase_and_only_latest_is_current() {
        let (tx, rx) = mpsc::channel();
        let mut loader = SourceLoader::new(Arc::new(DisabledFetcher), tx);

        let first = loader.start(LoadRequest::Fetch {
            sources: vec![SourceFile::inline("a.txt", "a - b")],
        });
        let second = loader.start(LoadRequest::Fetch {
            sources: vec![SourceFile::inline("c.txt", "c - d")],
        });

        assert!(second > first);
        assert!(!loader.is_current(first));
        assert!(loader.is_current(second));

        let mut seen = Vec::new();
        for _ in 0..2 {
            match rx.recv().unwrap() {
                AppEvent::Loaded(loaded) => seen.push(loaded.generation),
                _ => panic!("unexpected event"),
            }
        }
        seen.sort();
        assert_eq!(seen, vec![first, second]);
    }
}
