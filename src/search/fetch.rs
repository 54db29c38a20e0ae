//! Search-result page fetchers.

use std::time::Duration;

use crate::config::Config;
use crate::search::{SearchError, SearchResult};

/// Fetches one page of search results as HTML.
///
/// Implementations are shared across worker threads.
pub trait PageFetcher: Sync {
    fn fetch_page(&self, query: &str, page: u32) -> SearchResult<String>;
}

/// Plain HTTP GET of the search page via `ureq`.
///
/// The library's search UI renders results client-side, so this only sees
/// what the server embeds in the initial HTML. A browser-backed fetcher can
/// implement [`PageFetcher`] instead.
pub struct HttpPageFetcher {
    agent: ureq::Agent,
    search_url: String,
}

impl HttpPageFetcher {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();
        Self {
            agent,
            search_url: config.search_url.clone(),
        }
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_page(&self, query: &str, page: u32) -> SearchResult<String> {
        let fetch_error = |message: String| SearchError::Fetch {
            query: query.to_string(),
            page,
            message,
        };
        self.agent
            .get(&self.search_url)
            .query("q", query)
            .query("uilang", "bo")
            .query("page", &page.to_string())
            .call()
            .map_err(|e| fetch_error(e.to_string()))?
            .into_string()
            .map_err(|e| fetch_error(format!("read body: {e}")))
    }
}
