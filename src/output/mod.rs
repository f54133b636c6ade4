//! Output module
//!
//! This module handles:
//! - Appending discovered links to a file
//! - Crawl statistics snapshots and their console report

mod link_file;
pub mod stats;

pub use link_file::LinkFileSink;
pub use stats::{print_statistics, CrawlStats};
