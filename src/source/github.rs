//! Discovery of `*.txt` decks in a GitHub repository.
//!
//! Branches are probed one after another through the contents API; the first
//! branch whose data directory lists at least one text file wins.

use serde::Deserialize;

use crate::source::{SourceError, SourceFile, TextFetcher};

pub const DEFAULT_BRANCHES: &[&str] = &["main", "master", "gh-pages"];
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GithubContext {
    pub owner: String,
    pub repo: String,
}

impl GithubContext {
    /// Accepts `owner/repo`, `https://github.com/owner/repo[...]` or a Pages
    /// URL such as `https://owner.github.io/repo/`.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let without_scheme = spec
            .strip_prefix("https://")
            .or_else(|| spec.strip_prefix("http://"));

        let Some(rest) = without_scheme else {
            let (owner, repo) = spec.split_once('/')?;
            return Self::from_parts(owner, repo);
        };

        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        if let Some(owner) = host.strip_suffix(".github.io") {
            return Self::from_parts(owner, segments.next()?);
        }
        if host == "github.com" || host == "www.github.com" {
            let owner = segments.next()?;
            return Self::from_parts(owner, segments.next()?);
        }
        None
    }

    fn from_parts(owner: &str, repo: &str) -> Option<Self> {
        let repo = repo.trim_end_matches('/').trim_end_matches(".git");
        let valid = |s: &str| {
            !s.is_empty()
                && s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !valid(owner) || !valid(repo) {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn contents_url(&self, data_dir: &str, branch: &str) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}?ref={}",
            self.owner,
            self.repo,
            data_dir,
            urlencoding::encode(branch)
        )
    }

    pub fn raw_url(&self, branch: &str, data_dir: &str, name: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{}/{}/{}",
            self.owner,
            self.repo,
            branch,
            data_dir,
            urlencoding::encode(name)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Discovery {
    Found {
        branch: String,
        files: Vec<SourceFile>,
    },
    NotFound,
}

#[derive(Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// The contents API answers with an object instead of an array when the path
/// is a file; that case lists nothing.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Entries(Vec<ContentEntry>),
    Other(serde::de::IgnoredAny),
}

/// Lists the text decks of one branch as fetchable remote sources.
pub fn list_branch(
    fetcher: &dyn TextFetcher,
    ctx: &GithubContext,
    branch: &str,
    data_dir: &str,
) -> Result<Vec<SourceFile>, SourceError> {
    let url = ctx.contents_url(data_dir, branch);
    let body = fetcher.fetch_text(&url)?;
    let listing: Listing =
        serde_json::from_str(&body).map_err(|source| SourceError::Listing { url, source })?;

    let entries = match listing {
        Listing::Entries(entries) => entries,
        Listing::Other(_) => Vec::new(),
    };

    Ok(entries
        .into_iter()
        .filter(|e| e.kind == "file" && e.name.to_ascii_lowercase().ends_with(".txt"))
        .map(|e| {
            let url = ctx.raw_url(branch, data_dir, &e.name);
            SourceFile::remote(e.name, url)
        })
        .collect())
}

/// Probes `branches` in order and returns the first non-empty listing.
/// A branch whose listing fails is treated like a branch without decks.
pub fn probe(
    fetcher: &dyn TextFetcher,
    ctx: &GithubContext,
    branches: &[String],
    data_dir: &str,
) -> Discovery {
    for branch in branches {
        match list_branch(fetcher, ctx, branch, data_dir) {
            Ok(files) if !files.is_empty() => {
                log::info!(
                    "found {} decks in {}/{}@{}",
                    files.len(),
                    ctx.owner,
                    ctx.repo,
                    branch
                );
                return Discovery::Found {
                    branch: branch.clone(),
                    files,
                };
            }
            Ok(_) => log::debug!("no decks on branch {branch}"),
            Err(e) => log::debug!("listing branch {branch} failed: {e}"),
        }
    }
    Discovery::NotFound
}
