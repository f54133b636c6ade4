//! Crawler module: the crawl core
//!
//! - `Frontier`: de-duplicated FIFO queue with scope filtering
//! - `PageVisitor`: fetch + selector evaluation behind one `visit(url)`
//! - `Scheduler`: paced ticks over a fixed pool of worker slots
//! - `Crawler`: configuration-validating facade with start/pause controls
//!
//! Fetching and selector evaluation sit behind the `PageFetcher` and
//! `SelectorEvaluator` traits; `HttpFetcher` and `ScraperEvaluator` are the
//! default implementations.

mod coordinator;
mod extract;
mod fetcher;
mod frontier;
mod handlers;
mod pacer;
mod scheduler;
mod visitor;

pub use coordinator::Crawler;
pub use extract::{
    Element, Extraction, ScraperEvaluator, SelectorEvaluator, SelectorFailure, SelectorMatch,
};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, FrontierStats};
pub use handlers::{AdmittedHandler, CrawlHandlers, ResultsHandler};
pub use pacer::Pacer;
pub use scheduler::Scheduler;
pub use visitor::PageVisitor;
