use crate::UrlError;
use url::Url;

/// Schemes that never name a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a discovered reference against the base URL and normalizes it
///
/// This is the single normalization used for frontier keys, so two spellings
/// of the same page always produce the same string.
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty references
/// 2. Reject `javascript:`, `mailto:`, `tel:` and `data:` references
/// 3. Reject fragment-only references (same-page anchors)
/// 4. Resolve against the base URL (absolute references are kept as-is;
///    scheme and host are lowercased and dot segments removed by the parser)
/// 5. Require an http or https scheme
/// 6. Remove the fragment
///
/// # Examples
///
/// ```
/// use trawler::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let url = resolve_url(&base, "/news/../about#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn resolve_url(base: &Url, candidate: &str) -> Result<Url, UrlError> {
    let candidate = candidate.trim();

    if candidate.is_empty() {
        return Err(UrlError::Empty);
    }

    let lowered = candidate.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return Err(UrlError::UnsupportedScheme(candidate.to_string()));
    }

    if candidate.starts_with('#') {
        return Err(UrlError::FragmentOnly(candidate.to_string()));
    }

    let mut url = base
        .join(candidate)
        .map_err(|e| UrlError::Parse(format!("{}: {}", candidate, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    url.set_fragment(None);

    Ok(url)
}
