//! User callbacks invoked with visit results
//!
//! Callbacks run on worker tasks, once per successfully visited URL. Results
//! for different URLs may arrive in any order.

use crate::crawler::extract::SelectorMatch;
use std::sync::Arc;
use url::Url;

/// Receives one result group for one visited page
pub type ResultsHandler = Arc<dyn Fn(&Url, &[SelectorMatch]) + Send + Sync>;

/// Receives URLs that were newly queued after a visit
pub type AdmittedHandler = Arc<dyn Fn(&[Url]) + Send + Sync>;

/// Set of callbacks a crawler reports to
///
/// Every callback is optional. Cloning is cheap.
#[derive(Clone, Default)]
pub struct CrawlHandlers {
    on_links: Option<ResultsHandler>,
    on_content: Option<ResultsHandler>,
    on_admitted: Option<AdmittedHandler>,
}

impl CrawlHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the link selector matches of each visited page
    pub fn on_links<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Url, &[SelectorMatch]) + Send + Sync + 'static,
    {
        self.on_links = Some(Arc::new(handler));
        self
    }

    /// Called with the content selector matches of each visited page
    pub fn on_content<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Url, &[SelectorMatch]) + Send + Sync + 'static,
    {
        self.on_content = Some(Arc::new(handler));
        self
    }

    /// Called with the URLs a visit added to the frontier (skipped when none)
    pub fn on_admitted<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[Url]) + Send + Sync + 'static,
    {
        self.on_admitted = Some(Arc::new(handler));
        self
    }

    pub(crate) fn links(&self, url: &Url, matches: &[SelectorMatch]) {
        if let Some(handler) = &self.on_links {
            handler(url, matches);
        }
    }

    pub(crate) fn content(&self, url: &Url, matches: &[SelectorMatch]) {
        if let Some(handler) = &self.on_content {
            handler(url, matches);
        }
    }

    pub(crate) fn admitted(&self, urls: &[Url]) {
        if urls.is_empty() {
            return;
        }
        if let Some(handler) = &self.on_admitted {
            handler(urls);
        }
    }
}

impl std::fmt::Debug for CrawlHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlHandlers")
            .field("on_links", &self.on_links.is_some())
            .field("on_content", &self.on_content.is_some())
            .field("on_admitted", &self.on_admitted.is_some())
            .finish()
    }
}
