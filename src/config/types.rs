use serde::Deserialize;
use std::time::Duration;

/// Default number of worker slots
pub const DEFAULT_WORKERS: u32 = 10;

/// Default delay between dispatch ticks (milliseconds)
pub const DEFAULT_TIME_BETWEEN_REQUESTS: u64 = 1000;

/// Main configuration structure for Trawler
///
/// Immutable for the lifetime of a crawl run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub selectors: SelectorConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration in code with every optional field defaulted
    ///
    /// The result still has to pass validation when handed to a crawler.
    pub fn new(base_url: impl Into<String>, link_selectors: Vec<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                base_url: base_url.into(),
                workers: DEFAULT_WORKERS,
                time_between_requests: DEFAULT_TIME_BETWEEN_REQUESTS,
                ignore_external: false,
                debug: false,
                stop_when_idle: false,
            },
            selectors: SelectorConfig {
                links: link_selectors,
                content: Vec::new(),
            },
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; also the base for resolving relative links and for scope checks
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of worker slots (maximum visits in flight)
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Minimum time between the starts of two dispatch ticks (milliseconds)
    #[serde(rename = "time-between-requests", default = "default_time_between_requests")]
    pub time_between_requests: u64,

    /// Drop discovered links that point outside the base URL's host
    #[serde(rename = "ignore-external", default)]
    pub ignore_external: bool,

    /// Log per-visit progress at info level
    #[serde(default)]
    pub debug: bool,

    /// Finish once the frontier is empty and nothing is in flight,
    /// instead of polling forever
    #[serde(rename = "stop-when-idle", default)]
    pub stop_when_idle: bool,
}

impl CrawlerConfig {
    /// The inter-tick delay as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.time_between_requests)
    }
}

/// CSS selectors evaluated against every fetched page
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Selectors whose matches carry an href to follow (must be non-empty)
    #[serde(default)]
    pub links: Vec<String>,

    /// Selectors whose matches are handed verbatim to the content callback
    #[serde(default)]
    pub content: Vec<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// File that every newly admitted link is appended to
    #[serde(rename = "links-path", default)]
    pub links_path: Option<String>,
}

fn default_workers() -> u32 {
    DEFAULT_WORKERS
}

fn default_time_between_requests() -> u64 {
    DEFAULT_TIME_BETWEEN_REQUESTS
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
