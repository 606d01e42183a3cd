//! Crawl results and their classification
//!
//! The coordinator hands over the raw graph; this module answers the
//! questions the CLI cares about: which links are broken, which fragments
//! point at anchors that do not exist, and the overall tally.

use crate::graph::{Destination, Link};
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;

/// The complete output of one crawl
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Every destination referenced or seeded, in discovery order
    pub destinations: Vec<Destination>,

    /// Every Origin → Destination edge observed
    pub links: Vec<Link>,
}

/// Aggregate counts for the summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStats {
    pub destinations: usize,
    pub checked: usize,
    pub broken: usize,
    pub warnings: usize,
    pub skipped: usize,
    pub unsupported: usize,
}

impl CrawlResult {
    fn by_url(&self) -> HashMap<&str, &Destination> {
        self.destinations
            .iter()
            .map(|d| (d.url.as_str(), d))
            .collect()
    }

    /// Links whose destination is broken (see the destination's own rules:
    /// unsupported schemes and skips are excluded)
    pub fn broken_links(&self) -> Vec<&Link> {
        let by_url = self.by_url();
        self.links
            .iter()
            .filter(|link| {
                by_url
                    .get(link.destination_url.as_str())
                    .map(|d| d.is_broken())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Links that resolved but whose fragment names no anchor on the
    /// destination page. Only validated against parsed sources; the empty
    /// fragment always passes.
    pub fn anchor_warnings(&self) -> Vec<&Link> {
        let by_url = self.by_url();
        self.links
            .iter()
            .filter(|link| {
                let Some(fragment) = link.fragment.as_deref() else {
                    return false;
                };
                let Some(destination) = by_url.get(link.destination_url.as_str()) else {
                    return false;
                };
                destination.is_source && !destination.satisfies_fragment(fragment)
            })
            .collect()
    }

    pub fn has_broken_links(&self) -> bool {
        self.destinations.iter().any(|d| d.is_broken())
    }

    pub fn stats(&self) -> CrawlStats {
        CrawlStats {
            destinations: self.destinations.len(),
            checked: self.destinations.iter().filter(|d| d.was_tried()).count(),
            broken: self.destinations.iter().filter(|d| d.is_broken()).count(),
            warnings: self.anchor_warnings().len(),
            skipped: self.destinations.iter().filter(|d| d.was_skipped).count(),
            unsupported: self
                .destinations
                .iter()
                .filter(|d| d.is_unsupported_scheme())
                .count(),
        }
    }

    /// The canonical map form of the whole result
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes the human-readable report to stdout
pub fn print_report(result: &CrawlResult) {
    let broken = result.broken_links();
    let warnings = result.anchor_warnings();
    let by_url = result.by_url();

    if !broken.is_empty() {
        println!("Broken links:");
        for link in &broken {
            let cause = by_url
                .get(link.destination_url.as_str())
                .map(|d| d.status_description())
                .unwrap_or_else(|| "unknown".to_string());
            println!("  {} ({})", link, cause);
        }
        println!();
    }

    if !warnings.is_empty() {
        println!("Missing anchors:");
        for link in &warnings {
            println!("  {}", link);
        }
        println!();
    }

    let stats = result.stats();
    println!(
        "Checked {} of {} destinations: {} broken, {} anchor warnings, {} skipped",
        stats.checked, stats.destinations, stats.broken, stats.warnings, stats.skipped
    );
}
