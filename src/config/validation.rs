use crate::config::types::{Config, CrawlerConfig, SelectorConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on worker slots
const MAX_WORKERS: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_selectors(&config.selectors)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates selector lists
///
/// Checked first so that a missing link selector is reported before anything else.
/// Every selector must compile as CSS; a selector that cannot be parsed would
/// otherwise fail every visit.
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    if config.links.is_empty() {
        return Err(ConfigError::MissingLinkSelectors);
    }

    for selector in config.links.iter().chain(config.content.iter()) {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "selectors cannot be blank".to_string(),
            ));
        }

        Selector::parse(selector).map_err(|e| {
            ConfigError::Validation(format!("invalid selector '{}': {}", selector, e))
        })?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.time_between_requests == 0 {
        return Err(ConfigError::Validation(
            "time_between_requests must be at least 1 millisecond".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}
