use url::Url;

/// Extracts the lowercase host from a URL
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` points outside the base URL's site
///
/// A URL is on the same site when its host and explicit port match the base.
/// The scheme is ignored, so `http://` and `https://` links to the base host
/// are both in scope.
pub fn is_external(base: &Url, url: &Url) -> bool {
    extract_domain(base) != extract_domain(url) || base.port() != url.port()
}
