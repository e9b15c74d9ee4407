use std::sync::Arc;

use crate::source::{SourceError, TextFetcher};

/// Fetcher used when downloads are turned off in the config or at build time.
pub struct DisabledFetcher;

impl TextFetcher for DisabledFetcher {
    fn fetch_text(&self, _url: &str) -> Result<String, SourceError> {
        Err(SourceError::NetworkDisabled)
    }
}

#[cfg(feature = "network")]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl HttpFetcher {
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent(concat!("fiszki/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "network")]
impl TextFetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        let request_err = |e: reqwest::Error| SourceError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .map_err(request_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(request_err)
    }
}

/// Picks the HTTP fetcher when downloads are enabled and compiled in.
pub fn default_fetcher(network_enabled: bool) -> Arc<dyn TextFetcher> {
    if network_enabled
        && let Some(fetcher) = http_fetcher()
    {
        return fetcher;
    }
    Arc::new(DisabledFetcher)
}

#[cfg(feature = "network")]
fn http_fetcher() -> Option<Arc<dyn TextFetcher>> {
    match HttpFetcher::new() {
        Ok(fetcher) => Some(Arc::new(fetcher)),
        Err(e) => {
            log::warn!("HTTP client unavailable, working offline: {e}");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn http_fetcher() -> Option<Arc<dyn TextFetcher>> {
    None
}
