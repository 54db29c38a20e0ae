//! Search-result scraping: find instance ids for a query.
//!
//! Pages are fetched in parallel on a bounded pool and reassembled by page
//! number, then mined for `/show/bdr:<ID>?` links.

pub mod fetch;
pub mod scrape;

use miette::Diagnostic;
use thiserror::Error;

pub use fetch::{HttpPageFetcher, PageFetcher};
pub use scrape::{extract_instance_ids, related_instance_ids, run_scrape};

#[derive(Debug, Error, Diagnostic)]
pub enum SearchError {
    #[error("failed to fetch page {page} for \"{query}\": {message}")]
    #[diagnostic(
        code(bdrc::search::fetch),
        help("Check that the search endpoint is reachable. Failed pages are skipped.")
    )]
    Fetch {
        query: String,
        page: u32,
        message: String,
    },

    #[error("could not start worker pool: {message}")]
    #[diagnostic(
        code(bdrc::search::pool),
        help("Lower the worker count with --workers or in the config file.")
    )]
    Pool { message: String },
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
