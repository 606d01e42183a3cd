use crate::graph::{Destination, DestinationResult};
use crate::url::normalize_url;
use crate::{LinkScoutError, Result};
use std::collections::HashMap;
use url::Url;

/// Deduplicating set of destinations keyed by normalized URL
///
/// The store is single-writer: only the crawl coordinator mutates it. At most
/// one Destination exists per normalized URL; iteration yields destinations
/// in insertion order.
#[derive(Debug, Default)]
pub struct DestinationStore {
    index: HashMap<String, usize>,
    destinations: Vec<Destination>,
}

impl DestinationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing Destination for a raw URL string, or creates,
    /// inserts, and returns a new one. A fragment on the input is added to
    /// the Destination's fragment set. Unparseable input yields an invalid
    /// destination keyed by the original text.
    pub fn intern(&mut self, raw: &str) -> &mut Destination {
        match normalize_url(raw) {
            Ok((uri, fragment)) => self.intern_uri(uri, fragment.as_deref()),
            Err(_) => {
                let idx = match self.index.get(raw) {
                    Some(&idx) => idx,
                    None => {
                        let idx = self.destinations.len();
                        self.destinations.push(Destination::invalid(raw));
                        self.index.insert(raw.to_string(), idx);
                        idx
                    }
                };
                &mut self.destinations[idx]
            }
        }
    }

    /// Interns an already-parsed, fragment-free URI, recording the fragment
    /// the referencing origin requested (if any)
    pub fn intern_uri(&mut self, uri: Url, fragment: Option<&str>) -> &mut Destination {
        let key = uri.as_str().to_string();
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = self.destinations.len();
                self.destinations.push(Destination::new(uri));
                self.index.insert(key, idx);
                idx
            }
        };

        let destination = &mut self.destinations[idx];
        if let Some(fragment) = fragment {
            destination.add_fragment(fragment);
        }
        destination
    }

    /// Merges a worker's result into the Destination it belongs to
    ///
    /// The destination must exist and must not have been tried already; either
    /// condition failing is a coordinator bug, not a crawl-data problem.
    pub fn merge(&mut self, result: &DestinationResult) -> Result<()> {
        let idx = *self.index.get(&result.url).ok_or_else(|| {
            LinkScoutError::Internal(format!(
                "result for unknown destination: {}",
                result.url
            ))
        })?;

        let destination = &mut self.destinations[idx];
        if destination.was_tried() {
            return Err(LinkScoutError::Internal(format!(
                "second result for already-checked destination: {}",
                result.url
            )));
        }

        destination.apply_result(result);
        Ok(())
    }

    pub fn get(&self, url: &str) -> Option<&Destination> {
        self.index.get(url).map(|&idx| &self.destinations[idx])
    }

    pub fn get_mut(&mut self, url: &str) -> Option<&mut Destination> {
        let idx = *self.index.get(url)?;
        Some(&mut self.destinations[idx])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    /// Iterates all interned destinations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Consumes the store, yielding destinations in insertion order
    pub fn into_destinations(self) -> Vec<Destination> {
        self.destinations
    }
}
