//! URL handling module for Trawler
//!
//! This module resolves discovered references against the crawl's base URL
//! and decides whether a resolved URL is inside the crawl's scope.

mod normalize;
mod scope;

pub use normalize::resolve_url;
pub use scope::{extract_domain, is_external};

use ::url::Url;

/// Scope rule applied to discovered URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Every resolved http(s) URL is admitted
    Anywhere,
    /// Only URLs on the base URL's host are admitted
    SameSite,
}

impl ScopePolicy {
    /// Chooses the policy from the `ignore-external` flag
    pub fn from_ignore_external(ignore_external: bool) -> Self {
        if ignore_external {
            Self::SameSite
        } else {
            Self::Anywhere
        }
    }

    /// Returns true if `url` may enter the frontier
    pub fn allows(&self, base: &Url, url: &Url) -> bool {
        match self {
            Self::Anywhere => true,
            Self::SameSite => !is_external(base, url),
        }
    }
}
