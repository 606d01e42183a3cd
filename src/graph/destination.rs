use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

/// One redirect hop: the resolved target and the status code that sent us there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicRedirectInfo {
    pub url: String,
    pub status_code: u16,
}

/// A resource identified by its fragment-stripped URL: the node of the crawl graph
///
/// Two Destinations are equal iff their `url` is equal; fragments requested by
/// origins accumulate in `fragments` and are not part of identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Normalized URL string, the identity key. For unparseable input this
    /// retains the original text.
    pub url: String,

    /// Parsed form; `None` when the URL failed to parse
    #[serde(skip)]
    pub uri: Option<Url>,

    /// Union of fragments requested by every origin that targeted this destination
    pub fragments: BTreeSet<String>,

    pub status_code: Option<u16>,
    pub primary_type: Option<String>,
    pub sub_type: Option<String>,

    /// Redirect hops in order, empty if the response was direct
    pub redirects: Vec<BasicRedirectInfo>,

    /// URL after redirect resolution
    pub final_url: Option<String>,

    /// Anchor names declared on this resource; only meaningful when `is_source`
    pub anchors: Vec<String>,

    pub is_external: bool,

    /// The page was fetched and its body parsed for links and anchors
    pub is_source: bool,

    /// The URL could not be parsed; never dispatched
    pub is_invalid: bool,

    /// Transport-level failure: DNS, connect, TLS, timeout, reset
    pub did_not_connect: bool,

    /// Deliberately left unchecked: matched the skip list, or external while
    /// external checking is off
    pub was_skipped: bool,
}

impl Destination {
    /// Creates a fresh destination for a parsed URL
    pub fn new(uri: Url) -> Self {
        Self {
            url: uri.as_str().to_string(),
            uri: Some(uri),
            fragments: BTreeSet::new(),
            status_code: None,
            primary_type: None,
            sub_type: None,
            redirects: Vec::new(),
            final_url: None,
            anchors: Vec::new(),
            is_external: false,
            is_source: false,
            is_invalid: false,
            did_not_connect: false,
            was_skipped: false,
        }
    }

    /// Creates a destination for text that failed to parse as a URL
    pub fn invalid(raw: &str) -> Self {
        Self {
            url: raw.to_string(),
            uri: None,
            fragments: BTreeSet::new(),
            status_code: None,
            primary_type: None,
            sub_type: None,
            redirects: Vec::new(),
            final_url: None,
            anchors: Vec::new(),
            is_external: false,
            is_source: false,
            is_invalid: true,
            did_not_connect: false,
            was_skipped: false,
        }
    }

    /// True once a fetch was attempted: either the transport failed or a
    /// status code came back. The coordinator never redispatches a tried
    /// destination.
    pub fn was_tried(&self) -> bool {
        self.did_not_connect || self.status_code.is_some()
    }

    /// True if the scheme is outside what the fetcher supports.
    /// Unsupported-scheme destinations are reported but never dispatched and
    /// never counted as broken.
    pub fn is_unsupported_scheme(&self) -> bool {
        match &self.uri {
            Some(uri) => !crate::url::is_supported_scheme(uri.scheme()),
            None => false,
        }
    }

    /// A destination that was supposed to resolve and did not.
    /// Unsupported schemes and deliberately skipped destinations are
    /// excluded; an untried destination is broken only if its URL was
    /// invalid to begin with.
    pub fn is_broken(&self) -> bool {
        if self.is_unsupported_scheme() {
            return false;
        }
        if self.is_invalid || self.did_not_connect {
            return true;
        }
        match self.status_code {
            Some(code) => code != 200,
            None => false,
        }
    }

    /// True if the content type is one the parser understands (HTML or CSS)
    pub fn is_parseable(&self) -> bool {
        match (self.primary_type.as_deref(), self.sub_type.as_deref()) {
            (Some("text"), Some("html")) | (Some("text"), Some("css")) => true,
            _ => false,
        }
    }

    /// Records a fragment requested by some origin
    pub fn add_fragment(&mut self, fragment: &str) {
        self.fragments.insert(fragment.to_string());
    }

    /// Returns true if the given fragment resolves on this destination:
    /// the empty fragment always does, anything else must be a declared anchor
    pub fn satisfies_fragment(&self, fragment: &str) -> bool {
        fragment.is_empty() || self.anchors.iter().any(|a| a == fragment)
    }

    /// Merges a worker's result into this destination
    pub fn apply_result(&mut self, result: &DestinationResult) {
        self.final_url = result.final_url.clone();
        self.status_code = result.status_code;
        self.primary_type = result.primary_type.clone();
        self.sub_type = result.sub_type.clone();
        self.redirects = result.redirects.clone();
        self.is_source = result.is_source;
        self.anchors = result.anchors.clone();
        self.did_not_connect = result.did_not_connect;
    }

    /// Short human-readable account of this destination's outcome
    pub fn status_description(&self) -> String {
        if self.is_invalid {
            return "invalid URL".to_string();
        }
        if self.is_unsupported_scheme() {
            return "unsupported scheme".to_string();
        }
        if self.was_skipped {
            return "skipped".to_string();
        }
        if self.did_not_connect {
            return "connection failed".to_string();
        }
        match self.status_code {
            Some(code) => format!("HTTP {}", code),
            None => "unchecked".to_string(),
        }
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Destination {}

/// The serializable message a worker produces for one destination
///
/// Carries `url` as the correlation key and exactly the fields the store
/// merges into the matching Destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationResult {
    pub url: String,
    pub final_url: Option<String>,
    pub status_code: Option<u16>,
    pub primary_type: Option<String>,
    pub sub_type: Option<String>,
    #[serde(default)]
    pub redirects: Vec<BasicRedirectInfo>,
    #[serde(default)]
    pub is_source: bool,
    #[serde(default)]
    pub anchors: Vec<String>,
    #[serde(default)]
    pub did_not_connect: bool,
}

impl DestinationResult {
    /// An empty result for a URL, to be filled in by the fetch
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// The result for a transport-level failure
    pub fn connection_failed(url: &str) -> Self {
        Self {
            url: url.to_string(),
            did_not_connect: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(raw: &str) -> Destination {
        Destination::new(Url::parse(raw).unwrap())
    }

    #[test]
    fn test_identity_ignores_fragments() {
        let mut a = dest("http://example.com/p");
        let b = dest("http://example.com/p");
        a.add_fragment("top");
        assert_eq!(a, b);
    }

    #[test]
    fn test_was_tried() {
        let mut d = dest("http://example.com/");
        assert!(!d.was_tried());

        d.status_code = Some(404);
        assert!(d.was_tried());

        let mut d = dest("http://example.com/");
        d.did_not_connect = true;
        assert!(d.was_tried());
    }

    #[test]
    fn test_broken_on_non_200() {
        let mut d = dest("http://example.com/");
        d.status_code = Some(404);
        assert!(d.is_broken());

        d.status_code = Some(200);
        assert!(!d.is_broken());
    }

    #[test]
    fn test_broken_on_connection_failure() {
        let mut d = dest("http://example.com/");
        d.did_not_connect = true;
        assert!(d.is_broken());
    }

    #[test]
    fn test_invalid_is_broken() {
        let d = Destination::invalid("ht!tp://nope");
        assert!(d.is_broken());
        assert!(!d.was_tried());
    }

    #[test]
    fn test_unsupported_scheme_not_broken() {
        let d = dest("mailto:someone@example.com");
        assert!(d.is_unsupported_scheme());
        assert!(!d.is_broken());
    }

    #[test]
    fn test_skipped_destination_not_broken() {
        let mut d = dest("http://external.example/");
        d.is_external = true;
        d.was_skipped = true;
        assert!(!d.is_broken());
    }

    #[test]
    fn test_untried_destination_not_broken() {
        let d = dest("http://example.com/never-dispatched");
        assert!(!d.is_broken());
    }

    #[test]
    fn test_satisfies_fragment() {
        let mut d = dest("http://example.com/p");
        d.anchors = vec!["top".to_string(), "install".to_string()];

        assert!(d.satisfies_fragment(""));
        assert!(d.satisfies_fragment("top"));
        assert!(!d.satisfies_fragment("ghost"));
    }

    #[test]
    fn test_apply_result_copies_all_fields() {
        let mut d = dest("http://example.com/p");
        let result = DestinationResult {
            url: "http://example.com/p".to_string(),
            final_url: Some("http://example.com/q".to_string()),
            status_code: Some(200),
            primary_type: Some("text".to_string()),
            sub_type: Some("html".to_string()),
            redirects: vec![BasicRedirectInfo {
                url: "http://example.com/q".to_string(),
                status_code: 301,
            }],
            is_source: true,
            anchors: vec!["top".to_string()],
            did_not_connect: false,
        };

        d.apply_result(&result);

        assert_eq!(d.status_code, Some(200));
        assert_eq!(d.final_url.as_deref(), Some("http://example.com/q"));
        assert_eq!(d.redirects.len(), 1);
        assert!(d.is_source);
        assert_eq!(d.anchors, vec!["top".to_string()]);
    }

    #[test]
    fn test_parseable_content_types() {
        let mut d = dest("http://example.com/");
        d.primary_type = Some("text".to_string());
        d.sub_type = Some("html".to_string());
        assert!(d.is_parseable());

        d.sub_type = Some("css".to_string());
        assert!(d.is_parseable());

        d.sub_type = Some("plain".to_string());
        assert!(!d.is_parseable());

        d.primary_type = Some("image".to_string());
        d.sub_type = Some("png".to_string());
        assert!(!d.is_parseable());
    }

    #[test]
    fn test_result_roundtrip_preserves_all_fields() {
        let result = DestinationResult {
            url: "http://example.com/p".to_string(),
            final_url: Some("http://example.com/r".to_string()),
            status_code: Some(200),
            primary_type: Some("text".to_string()),
            sub_type: Some("html".to_string()),
            redirects: vec![
                BasicRedirectInfo {
                    url: "http://example.com/q".to_string(),
                    status_code: 301,
                },
                BasicRedirectInfo {
                    url: "http://example.com/r".to_string(),
                    status_code: 302,
                },
            ],
            is_source: true,
            anchors: vec!["a".to_string(), "b".to_string()],
            did_not_connect: false,
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: DestinationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
        // Redirect order must survive the round trip
        assert_eq!(back.redirects[0].status_code, 301);
        assert_eq!(back.redirects[1].status_code, 302);
    }

    #[test]
    fn test_result_field_names_are_stable() {
        let result = DestinationResult {
            url: "http://example.com/".to_string(),
            status_code: Some(200),
            primary_type: Some("text".to_string()),
            did_not_connect: false,
            ..Default::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        let map = value.as_object().unwrap();
        for key in [
            "url",
            "statusCode",
            "primaryType",
            "subType",
            "redirects",
            "finalUrl",
            "isSource",
            "anchors",
            "didNotConnect",
        ] {
            assert!(map.contains_key(key), "missing field {}", key);
        }
    }
}
