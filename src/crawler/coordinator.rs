//! The crawl coordinator: single owner of all mutable crawl state
//!
//! The coordinator seeds the frontier, keeps the worker pool saturated,
//! absorbs results from the single ingress channel, and discovers new
//! destinations from each page's outbound links. Workers never touch the
//! store; all mutation happens here, so a page's edges are applied
//! atomically in one coordinator step.

use crate::config::CrawlOptions;
use crate::crawler::fetcher::{build_http_client, FetchTask};
use crate::crawler::pool::FetchPool;
use crate::graph::{DestinationStore, Link, Origin};
use crate::report::CrawlResult;
use crate::url::{normalize_url, split_fragment, HostGlobSet};
use crate::{LinkScoutError, Result};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Runs a crawl over the given seeds and returns the full result graph
///
/// When `host_globs` is empty, each seed contributes an implicit
/// `<seed>**` pattern, so a crawl of `http://example.com/docs/` stays under
/// `/docs/` by default.
///
/// # Arguments
///
/// * `seeds` - URLs to start from; each becomes an internal destination
/// * `host_globs` - patterns defining the internal boundary (may be empty)
/// * `options` - concurrency, timeout, and skip configuration
///
/// # Returns
///
/// * `Ok(CrawlResult)` - every destination and link the crawl observed
/// * `Err(LinkScoutError)` - invalid input, or a crawl invariant violation
///
/// # Example
///
/// ```no_run
/// use linkscout::{crawl, CrawlOptions};
///
/// # async fn example() -> linkscout::Result<()> {
/// let seeds = vec!["http://localhost:4000/".to_string()];
/// let result = crawl(&seeds, &[], &CrawlOptions::default()).await?;
/// println!("{} destinations checked", result.destinations.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    seeds: &[String],
    host_globs: &[String],
    options: &CrawlOptions,
) -> Result<CrawlResult> {
    let mut seed_uris = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let (uri, fragment) = normalize_url(seed)?;
        seed_uris.push((uri, fragment));
    }

    let internal_globs = if host_globs.is_empty() {
        let bare: Vec<Url> = seed_uris.iter().map(|(u, _)| u.clone()).collect();
        HostGlobSet::from_seeds(&bare)?
    } else {
        HostGlobSet::new(host_globs)?
    };
    let skip_globs = HostGlobSet::new(&options.skip)?;

    tracing::info!(
        "starting crawl: {} seeds, {} host globs, {} connections",
        seed_uris.len(),
        internal_globs.len(),
        options.connections
    );

    let client = build_http_client(options)?;
    let (pool, dispatch, mut results) = FetchPool::spawn(client, options.connections);

    let mut store = DestinationStore::new();
    let mut links: Vec<Link> = Vec::new();
    let mut pending: VecDeque<String> = VecDeque::new();
    let mut in_flight: HashSet<String> = HashSet::new();

    for (uri, fragment) in seed_uris {
        let newly_seen = !store.contains(uri.as_str());
        let skipped = skip_globs.matches_as_internal(&uri);
        let destination = store.intern_uri(uri, fragment.as_deref());
        if newly_seen {
            // Seeds are internal by definition
            destination.is_external = false;
            if skipped {
                destination.was_skipped = true;
            } else {
                pending.push_back(destination.url.clone());
            }
        }
    }

    while !pending.is_empty() || !in_flight.is_empty() {
        // Keep the pool saturated up to its capacity
        while in_flight.len() < options.connections {
            let Some(url) = pending.pop_front() else {
                break;
            };
            let should_parse = store
                .get(&url)
                .map(|d| !d.is_external)
                .unwrap_or(false);

            dispatch
                .send(FetchTask {
                    url: url.clone(),
                    should_parse,
                })
                .await
                .map_err(|_| {
                    LinkScoutError::Internal("worker pool closed mid-crawl".to_string())
                })?;
            in_flight.insert(url);
        }

        let Some(outcome) = results.recv().await else {
            return Err(LinkScoutError::Internal(
                "results channel closed with work outstanding".to_string(),
            ));
        };

        let origin_url = outcome.result.url.clone();
        if !in_flight.remove(&origin_url) {
            return Err(LinkScoutError::Internal(format!(
                "result for a destination that was never dispatched: {}",
                origin_url
            )));
        }
        store.merge(&outcome.result)?;

        if outcome.links.is_empty() {
            continue;
        }

        // Hrefs resolve against the final URL so pages behind redirects
        // produce correct absolute targets
        let base = outcome
            .result
            .final_url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .or_else(|| Url::parse(&origin_url).ok());
        let Some(base) = base else {
            continue;
        };

        tracing::debug!(
            "{} yielded {} outbound links",
            origin_url,
            outcome.links.len()
        );

        for extracted in &outcome.links {
            let origin = Origin::new(&origin_url, &extracted.location);

            match split_fragment(&base, &extracted.href) {
                Ok((target, fragment)) => {
                    let newly_seen = !store.contains(target.as_str());
                    let destination = store.intern_uri(target.clone(), fragment.as_deref());
                    links.push(Link::new(origin, &destination.url, fragment));

                    if newly_seen {
                        destination.is_external = !internal_globs.matches_as_internal(&target);

                        if destination.is_unsupported_scheme() {
                            // Interned and reported, never fetched
                            continue;
                        }
                        if skip_globs.matches_as_internal(&target)
                            || (destination.is_external && !options.check_external)
                        {
                            destination.was_skipped = true;
                            continue;
                        }
                        pending.push_back(destination.url.clone());
                    }
                }
                Err(_) => {
                    // Unresolvable href: keep the edge, flag the target
                    let destination_url = store.intern(&extracted.href).url.clone();
                    links.push(Link::new(origin, &destination_url, None));
                }
            }
        }
    }

    drop(dispatch);
    pool.join().await;

    // Every destination must end the crawl checked or skipped for cause
    for destination in store.iter() {
        if !destination.was_tried()
            && !destination.is_invalid
            && !destination.is_unsupported_scheme()
            && !destination.was_skipped
        {
            return Err(LinkScoutError::Internal(format!(
                "destination neither checked nor skipped: {}",
                destination.url
            )));
        }
    }

    tracing::info!(
        "crawl finished: {} destinations, {} links",
        store.len(),
        links.len()
    );

    Ok(CrawlResult {
        destinations: store.into_destinations(),
        links,
    })
}
