use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes the fetcher knows how to retrieve. Anything else is interned and
/// reported, but never dispatched and never counted as broken.
const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "file"];

/// Returns true if linkscout can fetch URLs with the given scheme
pub fn is_supported_scheme(scheme: &str) -> bool {
    SUPPORTED_SCHEMES.contains(&scheme)
}

/// Normalizes a raw URL string into its destination key plus fragment
///
/// The destination key is the URL with the fragment removed, rendered through
/// the `url` crate's canonical serialization, so the same resource always
/// produces the same key. The fragment is everything after the first `#`,
/// preserved verbatim.
///
/// # Examples
///
/// ```
/// use linkscout::url::normalize_url;
///
/// let (url, fragment) = normalize_url("http://example.com/a#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a");
/// assert_eq!(fragment.as_deref(), Some("top"));
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<(Url, Option<String>)> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    let fragment = url.fragment().map(|f| f.to_string());
    url.set_fragment(None);

    Ok((url, fragment))
}

/// Resolves `href` against a base URL and splits off its fragment
///
/// Used by the coordinator for every outbound link a parsed page yields.
pub fn split_fragment(base: &Url, href: &str) -> UrlResult<(Url, Option<String>)> {
    let mut resolved = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("'{}' against {}: {}", href, base, e)))?;

    let fragment = resolved.fragment().map(|f| f.to_string());
    resolved.set_fragment(None);

    Ok((resolved, fragment))
}
