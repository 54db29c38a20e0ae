//! Parallel scraping of search results and instance-id extraction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use scraper::{Html, Selector};

use crate::search::fetch::PageFetcher;
use crate::search::{SearchError, SearchResult};

static RE_INSTANCE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/show/bdr:([A-Z0-9_]+)\?").unwrap());

/// Fetch pages `1..=pages` on a pool of `workers` threads.
///
/// Pages complete in any order; the result is keyed by page number. A page
/// that fails to fetch is logged and comes back empty.
pub fn run_scrape<F: PageFetcher + ?Sized>(
    fetcher: &F,
    query: &str,
    pages: u32,
    workers: usize,
) -> SearchResult<BTreeMap<u32, String>> {
    tracing::info!(query, pages, workers, "starting parallel scrape");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| SearchError::Pool {
            message: e.to_string(),
        })?;

    let results: BTreeMap<u32, String> = pool.install(|| {
        (1..=pages)
            .into_par_iter()
            .map(|page| match fetcher.fetch_page(query, page) {
                Ok(html) => (page, html),
                Err(e) => {
                    tracing::error!(page, error = %e, "error scraping page");
                    (page, String::new())
                }
            })
            .collect()
    });

    tracing::info!(pages = results.len(), "completed scraping");
    Ok(results)
}

/// Unique instance ids linked from a results page, sorted.
pub fn extract_instance_ids(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut ids = BTreeSet::new();
    if let Ok(sel) = Selector::parse("a[href]") {
        for el in document.select(&sel) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            if let Some(caps) = RE_INSTANCE_HREF.captures(href) {
                ids.insert(caps[1].to_string());
            }
        }
    }
    tracing::debug!(count = ids.len(), "extracted instance ids");
    ids.into_iter().collect()
}

/// Scrape every page and return the union of instance ids, sorted.
pub fn related_instance_ids<F: PageFetcher + ?Sized>(
    fetcher: &F,
    query: &str,
    pages: u32,
    workers: usize,
) -> SearchResult<Vec<String>> {
    let scraped = run_scrape(fetcher, query, pages, workers)?;
    let ids: BTreeSet<String> = scraped
        .values()
        .map(String::as_str)
        .flat_map(extract_instance_ids)
        .collect();
    tracing::info!(query, count = ids.len(), "total unique instance ids");
    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Serves `<a>` links whose ids encode the page number; page 3 fails.
    struct FakeFetcher;

    impl PageFetcher for FakeFetcher {
        fn fetch_page(&self, query: &str, page: u32) -> SearchResult<String> {
            if page == 3 {
                return Err(SearchError::Fetch {
                    query: query.into(),
                    page,
                    message: "timeout".into(),
                });
            }
            // Later pages answer first.
            std::thread::sleep(std::time::Duration::from_millis(u64::from(10 - page)));
            Ok(format!(
                r#"<html><body>
                <a href="/show/bdr:MW{page}?uilang=bo">one</a>
                <a href="/show/bdr:MW{page}?tab=x">dup</a>
                <a href="/show/bdr:MW0?x">shared</a>
                </body></html>"#
            ))
        }
    }

    #[test]
    fn reassembles_by_page_number() {
        let pages = run_scrape(&FakeFetcher, "sher phyin", 6, 3).unwrap();
        let keys: Vec<u32> = pages.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5, 6]);
        assert!(pages[&1].contains("bdr:MW1?"));
        assert!(pages[&6].contains("bdr:MW6?"));
    }

    #[test]
    fn failed_page_is_empty() {
        let pages = run_scrape(&FakeFetcher, "q", 4, 2).unwrap();
        assert_eq!(pages[&3], "");
    }

    #[test]
    fn extracts_unique_ids_from_matching_links() {
        let html = r#"
            <a href="/show/bdr:MW22084?uilang=bo">a</a>
            <a href="/show/bdr:MW22084?tab=1">b</a>
            <a href="/show/bdr:W1KG_12?x">c</a>
            <a href="/show/bdr:lowercase?x">d</a>
            <a href="/show/bdr:MW9">no query</a>
            <a href="https://example.org/show/bdr:MW7?x">absolute</a>
            <span href="/show/bdr:MW8?x">not a link</span>
        "#;
        assert_eq!(extract_instance_ids(html), vec!["MW22084", "W1KG_12"]);
    }

    #[test]
    fn union_across_pages() {
        let ids = related_instance_ids(&FakeFetcher, "q", 4, 4).unwrap();
        assert_eq!(ids, vec!["MW0", "MW1", "MW2", "MW4"]);
    }

    #[test]
    fn zero_pages_is_empty() {
        assert!(run_scrape(&FakeFetcher, "q", 0, 2).unwrap().is_empty());
    }
}
