pub mod fetch;
pub mod github;
pub mod loader;
pub mod local;
pub mod sample;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("network access is disabled")]
    NetworkDisabled,

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected directory listing from {url}: {source}")]
    Listing {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the text of a source comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceOrigin {
    Inline(String),
    Local(PathBuf),
    Remote(String),
}

/// A named text blob that can be parsed into cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub origin: SourceOrigin,
}

impl SourceFile {
    pub fn inline(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: SourceOrigin::Inline(text.into()),
        }
    }

    pub fn local(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            origin: SourceOrigin::Local(path),
        }
    }

    pub fn remote(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: SourceOrigin::Remote(url.into()),
        }
    }
}

/// Blocking text download. Injected so discovery and loading can be tested
/// without a network.
pub trait TextFetcher: Send + Sync {
    fn fetch_text(&self, url: &str) -> Result<String, SourceError>;
}
