use serde::Deserialize;
use std::time::Duration;

/// Default number of concurrent fetch workers
pub const DEFAULT_CONNECTIONS: usize = 4;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Runtime options for one crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Number of concurrent fetch workers
    pub connections: usize,

    /// Per-request timeout
    pub timeout: Duration,

    /// Also check (but never recurse into) external links
    pub check_external: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Glob patterns for URLs that are interned but never dispatched
    pub skip: Vec<String>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            connections: DEFAULT_CONNECTIONS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            check_external: true,
            user_agent: format!("linkscout/{}", env!("CARGO_PKG_VERSION")),
            skip: Vec::new(),
        }
    }
}

/// Contents of an optional TOML configuration file
///
/// Every field is optional; unset fields fall back to CLI values or defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Seed URLs, appended to the CLI positional seeds
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Host-glob patterns marking URLs as internal
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Glob patterns for URLs to skip entirely
    #[serde(default)]
    pub skip: Vec<String>,

    pub connections: Option<usize>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,

    #[serde(rename = "check-external")]
    pub check_external: Option<bool>,

    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Applies file values onto options, leaving CLI-set fields alone when
    /// the file does not mention them
    pub fn apply_to(&self, options: &mut CrawlOptions) {
        if let Some(connections) = self.connections {
            options.connections = connections;
        }
        if let Some(timeout) = self.timeout {
            options.timeout = Duration::from_secs(timeout);
        }
        if let Some(check_external) = self.check_external {
            options.check_external = check_external;
        }
        if let Some(user_agent) = &self.user_agent {
            options.user_agent = user_agent.clone();
        }
        options.skip.extend(self.skip.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CrawlOptions::default();
        assert_eq!(options.connections, 4);
        assert_eq!(options.timeout, Duration::from_secs(20));
        assert!(options.check_external);
        assert!(options.user_agent.starts_with("linkscout/"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = FileConfig {
            connections: Some(8),
            timeout: Some(5),
            check_external: Some(false),
            ..Default::default()
        };

        let mut options = CrawlOptions::default();
        file.apply_to(&mut options);

        assert_eq!(options.connections, 8);
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert!(!options.check_external);
    }

    #[test]
    fn test_unset_file_fields_leave_options_alone() {
        let file = FileConfig::default();
        let mut options = CrawlOptions {
            connections: 12,
            ..Default::default()
        };
        file.apply_to(&mut options);
        assert_eq!(options.connections, 12);
    }
}
