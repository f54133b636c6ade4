//! Fetch/extract adapter
//!
//! Combines a `PageFetcher` and a `SelectorEvaluator` into a single
//! `visit(url)` operation that either yields both result groups or fails.

use crate::config::SelectorConfig;
use crate::crawler::extract::{Extraction, SelectorEvaluator};
use crate::crawler::fetcher::PageFetcher;
use crate::FetchError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use url::Url;

/// Stateless (apart from a visit counter) adapter shared by all workers
pub struct PageVisitor {
    fetcher: Arc<dyn PageFetcher>,
    evaluator: Arc<dyn SelectorEvaluator>,
    /// Link selectors followed by content selectors
    selectors: Vec<String>,
    link_selector_count: usize,
    visited: AtomicU64,
}

impl PageVisitor {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        evaluator: Arc<dyn SelectorEvaluator>,
        selectors: &SelectorConfig,
    ) -> Self {
        let mut all = selectors.links.clone();
        all.extend(selectors.content.iter().cloned());

        Self {
            fetcher,
            evaluator,
            selectors: all,
            link_selector_count: selectors.links.len(),
            visited: AtomicU64::new(0),
        }
    }

    /// Fetches `url` and evaluates every configured selector against it
    ///
    /// No retries. A selector failure fails the visit as a whole, so callers
    /// never see a partial extraction.
    pub async fn visit(&self, url: &Url) -> Result<Extraction, FetchError> {
        let page = self.fetcher.fetch(url).await?;

        let mut matches = self
            .evaluator
            .evaluate(&page, &self.selectors)
            .map_err(|failure| FetchError::Selector {
                url: url.to_string(),
                selector: failure.selector,
                message: failure.message,
            })?;
        self.visited.fetch_add(1, Ordering::Relaxed);

        let content = matches.split_off(self.link_selector_count.min(matches.len()));

        Ok(Extraction {
            url: url.clone(),
            links: matches,
            content,
        })
    }

    /// Number of pages fetched and evaluated successfully so far
    pub fn visited_count(&self) -> u64 {
        self.visited.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for PageVisitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageVisitor")
            .field("selectors", &self.selectors)
            .field("visited", &self.visited_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory collaborators shared by the crawler unit tests

    use super::*;
    use crate::crawler::fetcher::FetchedPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned bodies by URL; unknown URLs fail with HTTP 404
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        delay: Duration,
        pub requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.pages.get(url.as_str()) {
                Some(body) => Ok(FetchedPage {
                    url: url.clone(),
                    status: 200,
                    body: body.clone(),
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;
    use crate::crawler::extract::ScraperEvaluator;

    fn selectors(links: &[&str], content: &[&str]) -> SelectorConfig {
        SelectorConfig {
            links: links.iter().map(|s| s.to_string()).collect(),
            content: content.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn visitor(fetcher: StaticFetcher, selectors: SelectorConfig) -> PageVisitor {
        PageVisitor::new(Arc::new(fetcher), Arc::new(ScraperEvaluator), &selectors)
    }

    #[tokio::test]
    async fn test_visit_splits_link_and_content_groups() {
        let fetcher = StaticFetcher::new().page(
            "https://x.test/",
            r#"<h1>Home</h1><p>Intro</p><a href="/a">A</a>"#,
        );
        let visitor = visitor(fetcher, selectors(&["a"], &["h1", "p"]));

        let url = Url::parse("https://x.test/").unwrap();
        let extraction = visitor.visit(&url).await.unwrap();

        assert_eq!(extraction.url, url);
        assert_eq!(extraction.links.len(), 1);
        assert_eq!(extraction.links[0].selector, "a");
        assert_eq!(extraction.content.len(), 2);
        assert_eq!(extraction.content[0].elements[0].text, "Home");
        assert_eq!(extraction.content[1].elements[0].text, "Intro");
        assert_eq!(visitor.visited_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_not_counted() {
        let visitor = visitor(StaticFetcher::new(), selectors(&["a"], &[]));
        let url = Url::parse("https://x.test/missing").unwrap();

        let err = visitor.visit(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(err.url(), "https://x.test/missing");
        assert_eq!(visitor.visited_count(), 0);
    }

    #[tokio::test]
    async fn test_selector_failure_is_fetch_error() {
        let fetcher = StaticFetcher::new().page("https://x.test/", "<p>hi</p>");
        let visitor = visitor(fetcher, selectors(&["a"], &["!!!"]));
        let url = Url::parse("https://x.test/").unwrap();

        let err = visitor.visit(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Selector { ref selector, .. } if selector == "!!!"));
        assert_eq!(visitor.visited_count(), 0);
    }
}
