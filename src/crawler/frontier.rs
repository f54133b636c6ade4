//! De-duplicated FIFO frontier
//!
//! The frontier owns the queue of URLs waiting to be visited and the set of
//! every URL it has ever accepted. Both use the same normalized key, so a URL
//! admitted under two spellings is stored once, and a URL that has already
//! been claimed by a worker can never be queued again.

use crate::url::{resolve_url, ScopePolicy};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Counters describing what happened to admitted candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Candidates accepted into the queue
    pub admitted: u64,

    /// Candidates already seen (queued or claimed)
    pub duplicates: u64,

    /// Candidates dropped by the scope filter
    pub out_of_scope: u64,

    /// Candidates that could not be resolved to an http(s) URL
    pub unresolvable: u64,
}

/// Queue of URLs yet to be visited, unique by normalized URL
#[derive(Debug)]
pub struct Frontier {
    base: Url,
    scope: ScopePolicy,
    pending: VecDeque<Url>,
    seen: HashSet<String>,
    stats: FrontierStats,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `base` - URL that relative references are resolved against
    /// * `scope` - Scope rule applied on admission
    pub fn new(base: Url, scope: ScopePolicy) -> Self {
        Self {
            base,
            scope,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            stats: FrontierStats::default(),
        }
    }

    /// Admits candidate references into the frontier
    ///
    /// Each candidate is resolved against the base URL, filtered by scope and
    /// inserted if its normalized form has never been seen. Rejected
    /// candidates are dropped silently.
    ///
    /// # Returns
    ///
    /// The URLs that were newly queued, in admission order
    pub fn admit<I, S>(&mut self, candidates: I) -> Vec<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut admitted = Vec::new();

        for candidate in candidates {
            let candidate = candidate.as_ref();

            let url = match resolve_url(&self.base, candidate) {
                Ok(url) => url,
                Err(e) => {
                    tracing::trace!("Skipping link '{}': {}", candidate, e);
                    self.stats.unresolvable += 1;
                    continue;
                }
            };

            if !self.scope.allows(&self.base, &url) {
                tracing::trace!("Skipping out-of-scope link {}", url);
                self.stats.out_of_scope += 1;
                continue;
            }

            if !self.seen.insert(url.as_str().to_string()) {
                self.stats.duplicates += 1;
                continue;
            }

            self.stats.admitted += 1;
            self.pending.push_back(url.clone());
            admitted.push(url);
        }

        admitted
    }

    /// Removes and returns the oldest queued URL
    ///
    /// `None` means the frontier is currently empty, which is not an error.
    pub fn take_next(&mut self) -> Option<Url> {
        self.pending.pop_front()
    }

    /// Returns the number of URLs waiting to be visited
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether no URL is waiting to be visited
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the number of distinct URLs ever admitted
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if the normalized form of `candidate` was ever admitted
    pub fn has_seen(&self, candidate: &str) -> bool {
        resolve_url(&self.base, candidate)
            .map(|url| self.seen.contains(url.as_str()))
            .unwrap_or(false)
    }

    pub fn stats(&self) -> FrontierStats {
        self.stats
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}
