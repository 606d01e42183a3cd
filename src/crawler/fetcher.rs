//! The fetch worker: one task in, one result out
//!
//! Given `{url, shouldParse}`, a worker issues the request, follows redirects
//! manually so every hop is recorded, classifies failures, and parses the
//! body for links and anchors when asked to. Workers are stateless between
//! tasks and never touch the destination store.

use crate::config::CrawlOptions;
use crate::crawler::parser::{parse_body, ExtractedLink};
use crate::graph::{BasicRedirectInfo, DestinationResult};
use reqwest::{redirect::Policy, Client, Response};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Redirect chains longer than this never produce a terminal response
const MAX_REDIRECTS: usize = 10;

/// A unit of work handed to the pool: fetch this URL, optionally parse it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    /// Normalized, fragment-free URL (the destination store key)
    pub url: String,

    /// True for internal destinations: read and parse the body
    pub should_parse: bool,
}

/// What one fetch produced: the result to merge plus any outbound links
/// discovered while parsing, keyed by origin = the task's URL
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub result: DestinationResult,
    pub links: Vec<ExtractedLink>,
}

impl FetchOutcome {
    fn bare(result: DestinationResult) -> Self {
        Self {
            result,
            links: Vec::new(),
        }
    }
}

/// Builds the HTTP client shared by all workers
///
/// Redirects are disabled so the fetch loop can record each hop; the
/// connection pool is shared read-only across workers. Proxy environment
/// variables are honored by reqwest's defaults.
pub fn build_http_client(options: &CrawlOptions) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.timeout)
        .connect_timeout(Duration::from_secs(10).min(options.timeout))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one destination and produces its result
///
/// Unsupported schemes come back with neither a status code nor
/// `didNotConnect`: they are unreachable by design, not broken.
pub async fn fetch_destination(client: &Client, task: &FetchTask) -> FetchOutcome {
    let url = match Url::parse(&task.url) {
        Ok(url) => url,
        Err(_) => {
            // The coordinator never dispatches unparseable URLs; if one
            // slips through, report it as unconnectable rather than panic.
            return FetchOutcome::bare(DestinationResult::connection_failed(&task.url));
        }
    };

    match url.scheme() {
        "http" | "https" => fetch_http(client, &url, task).await,
        "file" => fetch_file(&url, task).await,
        _ => FetchOutcome::bare(DestinationResult::new(&task.url)),
    }
}

/// HTTP(S) fetch with manual redirect following
async fn fetch_http(client: &Client, url: &Url, task: &FetchTask) -> FetchOutcome {
    let mut result = DestinationResult::new(&task.url);
    let mut current = url.clone();
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(current.as_str().to_string());

    let response = loop {
        let response = match client.get(current.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("transport failure for {}: {}", current, e);
                result.did_not_connect = true;
                return FetchOutcome::bare(result);
            }
        };

        let status = response.status();
        if !status.is_redirection() {
            break response;
        }

        let Some(next) = redirect_target(&response, &current) else {
            // Redirect without a usable Location header: terminal, and the
            // 3xx status speaks for itself in the report.
            result.status_code = Some(status.as_u16());
            result.final_url = Some(current.to_string());
            return FetchOutcome::bare(result);
        };

        result.redirects.push(BasicRedirectInfo {
            url: next.to_string(),
            status_code: status.as_u16(),
        });

        if result.redirects.len() > MAX_REDIRECTS || !visited.insert(next.as_str().to_string()) {
            tracing::debug!("redirect loop or excessive chain at {}", next);
            result.did_not_connect = true;
            return FetchOutcome::bare(result);
        }

        current = next;
    };

    let status = response.status();
    result.status_code = Some(status.as_u16());
    result.final_url = Some(current.to_string());

    if let Some((primary, sub)) = content_type_of(&response) {
        result.primary_type = Some(primary);
        result.sub_type = Some(sub);
    }

    if !should_read_body(task, &result, status.as_u16()) {
        return FetchOutcome::bare(result);
    }

    match response.text().await {
        Ok(body) => {
            let primary = result.primary_type.as_deref().unwrap_or("");
            let sub = result.sub_type.as_deref().unwrap_or("");
            match parse_body(&body, primary, sub) {
                Some(parsed) => {
                    result.is_source = true;
                    result.anchors = parsed.anchors;
                    FetchOutcome {
                        result,
                        links: parsed.links,
                    }
                }
                None => FetchOutcome::bare(result),
            }
        }
        Err(e) => {
            // The resource claimed a parseable type but the body could not
            // be read as text; degrade to a source with no anchors.
            tracing::debug!("unreadable body for {}: {}", task.url, e);
            result.is_source = true;
            FetchOutcome::bare(result)
        }
    }
}

/// Local filesystem fetch for `file://` destinations
///
/// A directory resolves to its `index.html`; a missing or unreadable file
/// reports `didNotConnect`. Content type is inferred from the extension.
async fn fetch_file(url: &Url, task: &FetchTask) -> FetchOutcome {
    let mut result = DestinationResult::new(&task.url);

    let Ok(mut path) = url.to_file_path() else {
        result.did_not_connect = true;
        return FetchOutcome::bare(result);
    };

    if path.is_dir() {
        path.push("index.html");
    }

    let (primary, sub) = file_content_type(&path);
    result.final_url = Some(task.url.clone());

    match tokio::fs::read_to_string(&path).await {
        Ok(body) => {
            result.status_code = Some(200);
            result.primary_type = Some(primary.to_string());
            result.sub_type = Some(sub.to_string());

            if task.should_parse {
                if let Some(parsed) = parse_body(&body, primary, sub) {
                    result.is_source = true;
                    result.anchors = parsed.anchors;
                    return FetchOutcome {
                        result,
                        links: parsed.links,
                    };
                }
            }
            FetchOutcome::bare(result)
        }
        Err(e) => {
            tracing::debug!("file read failed for {}: {}", path.display(), e);
            result.did_not_connect = true;
            FetchOutcome::bare(result)
        }
    }
}

/// Resolves a redirect's Location header against the redirecting URL
fn redirect_target(response: &Response, current: &Url) -> Option<Url> {
    let location = response.headers().get("location")?.to_str().ok()?;
    current.join(location).ok()
}

/// Splits a Content-Type header into (primary, sub), dropping parameters
fn content_type_of(response: &Response) -> Option<(String, String)> {
    let header = response.headers().get("content-type")?.to_str().ok()?;
    let mime = header.split(';').next()?.trim();
    let (primary, sub) = mime.split_once('/')?;
    Some((
        primary.trim().to_ascii_lowercase(),
        sub.trim().to_ascii_lowercase(),
    ))
}

/// Body reads happen only for successful, parseable, internal fetches
fn should_read_body(task: &FetchTask, result: &DestinationResult, status: u16) -> bool {
    if !task.should_parse || status != 200 {
        return false;
    }
    matches!(
        (result.primary_type.as_deref(), result.sub_type.as_deref()),
        (Some("text"), Some("html")) | (Some("text"), Some("css"))
    )
}

fn file_content_type(path: &PathBuf) -> (&'static str, &'static str) {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => ("text", "html"),
        Some("css") => ("text", "css"),
        _ => ("application", "octet-stream"),
    }
}
