//! State module for tracking crawl progress
//!
//! - `CrawlPhase`: lifecycle of the dispatch loop (idle, running, paused, finished)

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
