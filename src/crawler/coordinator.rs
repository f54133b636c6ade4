//! Crawler facade
//!
//! Validates configuration, seeds the frontier and exposes start/pause
//! controls over the scheduler.

use crate::config::{validate, Config};
use crate::crawler::extract::{ScraperEvaluator, SelectorEvaluator};
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::handlers::CrawlHandlers;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::visitor::PageVisitor;
use crate::output::CrawlStats;
use crate::state::CrawlPhase;
use crate::url::{resolve_url, ScopePolicy};
use crate::{ConfigError, CrawlError};
use std::sync::Arc;
use url::Url;

/// A configured crawl: frontier, scheduler and configuration
#[derive(Debug)]
pub struct Crawler {
    config: Arc<Config>,
    scheduler: Arc<Scheduler>,
}

impl Crawler {
    /// Creates a crawler that fetches over HTTP and evaluates CSS selectors
    ///
    /// The configuration is validated before any client is built, so an
    /// invalid configuration never causes network activity.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use trawler::{Config, CrawlHandlers, Crawler};
    ///
    /// # async fn example() -> Result<(), trawler::CrawlError> {
    /// let config = Config::new("https://example.com/", vec!["a".to_string()]);
    /// let handlers = CrawlHandlers::new().on_links(|url, matches| {
    ///     println!("{}: {} link selectors matched", url, matches.len());
    /// });
    ///
    /// let crawler = Crawler::new(config, handlers)?;
    /// crawler.start();
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config, handlers: CrawlHandlers) -> Result<Self, CrawlError> {
        // Checked here too so no HTTP client exists for an invalid configuration
        validate(&config)?;
        let fetcher = HttpFetcher::new(&config.user_agent)?;
        Ok(Self::with_collaborators(
            config,
            Arc::new(fetcher),
            Arc::new(ScraperEvaluator::new()),
            handlers,
        )?)
    }

    /// Creates a crawler around caller-supplied fetch and selector capabilities
    ///
    /// Validates the configuration itself, so it is safe to call directly.
    /// Selectors are always checked as CSS, whatever evaluator is supplied.
    pub fn with_collaborators(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        evaluator: Arc<dyn SelectorEvaluator>,
        handlers: CrawlHandlers,
    ) -> Result<Self, ConfigError> {
        validate(&config)?;

        let base = Url::parse(&config.crawler.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
        let seed = resolve_url(&base, base.as_str())
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

        let mut frontier = Frontier::new(
            base,
            ScopePolicy::from_ignore_external(config.crawler.ignore_external),
        );
        frontier.admit([seed.as_str()]);

        let visitor = PageVisitor::new(fetcher, evaluator, &config.selectors);
        let scheduler = Scheduler::new(&config.crawler, frontier, visitor, handlers);

        tracing::debug!(
            "Crawler configured: seed {}, {} workers, {}ms between ticks, ignore external: {}",
            seed,
            config.crawler.workers,
            config.crawler.time_between_requests,
            config.crawler.ignore_external
        );

        Ok(Self {
            config: Arc::new(config),
            scheduler: Arc::new(scheduler),
        })
    }

    /// Starts (or resumes) dispatching
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        self.scheduler.start();
    }

    /// Stops scheduling new ticks; in-flight visits still complete
    pub fn pause(&self) {
        self.scheduler.pause();
    }

    /// Waits until the dispatch loop has exited (after pause or, with
    /// stop-when-idle, once the frontier drains)
    pub async fn stopped(&self) {
        self.scheduler.stopped().await;
    }

    /// Waits until the loop has exited and in-flight visits have been routed
    pub async fn drained(&self) {
        self.scheduler.drained().await;
    }

    /// Adds URLs to the frontier, subject to the same rules as discovered links
    ///
    /// # Returns
    ///
    /// The number of URLs newly queued
    pub fn admit<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scheduler.admit(urls).len()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.scheduler.phase()
    }

    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    /// Pages fetched successfully so far (observability only)
    pub fn visited_count(&self) -> u64 {
        self.scheduler.visited_count()
    }

    pub fn frontier_len(&self) -> usize {
        self.scheduler.frontier_len()
    }

    /// Snapshot of crawl counters
    pub fn stats(&self) -> CrawlStats {
        let frontier = self.scheduler.frontier_stats();
        CrawlStats {
            phase: self.phase(),
            ticks: self.scheduler.tick_count(),
            visited: self.scheduler.visited_count(),
            failed: self.scheduler.failed_count(),
            admitted: frontier.admitted,
            duplicates: frontier.duplicates,
            out_of_scope: frontier.out_of_scope,
            unresolvable: frontier.unresolvable,
            queued: self.scheduler.frontier_len(),
            in_flight: self.scheduler.in_flight(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
