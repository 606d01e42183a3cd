use serde::Serialize;

/// Where a link was found: the source page plus the textual location within it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    /// URL of the page the link appeared on
    pub url: String,

    /// Textual location within the source, e.g. `a[href]` or `css url()`
    pub location: String,
}

impl Origin {
    pub fn new(url: &str, location: &str) -> Self {
        Self {
            url: url.to_string(),
            location: location.to_string(),
        }
    }
}

/// An Origin → Destination edge, tagged with the fragment the origin requested
///
/// The fragment governs anchor validation separately from link reachability:
/// a link can resolve (destination healthy) while its fragment is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub origin: Origin,

    /// Normalized URL of the target destination (store key)
    pub destination_url: String,

    /// The specific fragment this origin requested, if any
    pub fragment: Option<String>,
}

impl Link {
    pub fn new(origin: Origin, destination_url: &str, fragment: Option<String>) -> Self {
        Self {
            origin,
            destination_url: destination_url.to_string(),
            fragment,
        }
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.fragment {
            Some(fragment) if !fragment.is_empty() => write!(
                f,
                "{} -> {}#{} ({})",
                self.origin.url, self.destination_url, fragment, self.origin.location
            ),
            _ => write!(
                f,
                "{} -> {} ({})",
                self.origin.url, self.destination_url, self.origin.location
            ),
        }
    }
}
