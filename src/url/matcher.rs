//! Host-glob matching for the internal/external boundary
//!
//! A glob describes an internal host+path prefix, e.g.
//! `http://example.com/guides**`. A URL matching any configured glob is
//! internal and subject to recursion; everything else is external and only
//! checked for reachability.

use crate::{ConfigError, ConfigResult};
use regex::Regex;
use url::Url;

/// A single compiled host-glob pattern
///
/// Glob syntax, applied to the URL's full string form:
/// - `**` matches any run of characters, including `/`
/// - `*` matches any run of characters except `/`
/// - `?` matches a single character except `/`
#[derive(Debug, Clone)]
pub struct HostGlob {
    pattern: String,
    regex: Regex,
}

impl HostGlob {
    /// Compiles a glob pattern
    pub fn new(pattern: &str) -> ConfigResult<Self> {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Host pattern cannot be empty".to_string(),
            ));
        }

        let regex = Regex::new(&glob_to_regex(pattern))
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns true if the URL's full string form matches this glob
    pub fn matches(&self, url: &Url) -> bool {
        self.regex.is_match(url.as_str())
    }

    /// The original pattern text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Translates a glob into an anchored regex over the URL string
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }

    out.push('$');
    out
}

/// The set of globs defining what counts as internal for one crawl
#[derive(Debug, Clone, Default)]
pub struct HostGlobSet {
    globs: Vec<HostGlob>,
}

impl HostGlobSet {
    /// Compiles a set of glob patterns
    pub fn new(patterns: &[String]) -> ConfigResult<Self> {
        let globs = patterns
            .iter()
            .map(|p| HostGlob::new(p))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self { globs })
    }

    /// Builds the implicit glob set for seeds with no explicit patterns:
    /// each seed contributes `<seed>**`
    pub fn from_seeds(seeds: &[Url]) -> ConfigResult<Self> {
        let patterns: Vec<String> = seeds.iter().map(|s| format!("{}**", s)).collect();
        Self::new(&patterns)
    }

    /// Returns true if the URI matches any glob in the set
    pub fn matches_as_internal(&self, url: &Url) -> bool {
        self.globs.iter().any(|g| g.matches(url))
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.globs.len()
    }
}
