//! Crawl statistics
//!
//! Counters are for observability only; nothing in the crawl core reads them
//! back to make decisions.

use crate::state::CrawlPhase;

/// Snapshot of a crawler's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    /// Lifecycle phase at snapshot time
    pub phase: CrawlPhase,

    /// Dispatch ticks executed
    pub ticks: u64,

    /// Pages fetched successfully
    pub visited: u64,

    /// Visits that failed and were dropped
    pub failed: u64,

    /// URLs accepted into the frontier, seed included
    pub admitted: u64,

    /// Discovered links already seen
    pub duplicates: u64,

    /// Discovered links outside the crawl scope
    pub out_of_scope: u64,

    /// Discovered links that did not resolve to an http(s) URL
    pub unresolvable: u64,

    /// URLs still waiting in the frontier
    pub queued: usize,

    /// Visits holding a worker slot
    pub in_flight: usize,
}

impl CrawlStats {
    /// Share of attempted visits that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.visited + self.failed;
        if attempted == 0 {
            0.0
        } else {
            (self.visited as f64 / attempted as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Phase: {}", stats.phase);
    println!("  Ticks: {}", stats.ticks);
    println!("  Pages visited: {}", stats.visited);
    println!("  Failed visits: {}", stats.failed);
    println!("  Still queued: {}", stats.queued);
    println!();

    println!("Discovered Links:");
    println!("  Admitted: {}", stats.admitted);
    println!("  Duplicates: {}", stats.duplicates);
    println!("  Out of scope: {}", stats.out_of_scope);
    println!("  Unresolvable: {}", stats.unresolvable);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} visits)",
        stats.success_rate(),
        stats.visited,
        stats.visited + stats.failed
    );
}
