//! The crawl engine
//!
//! The coordinator owns all mutable crawl state and drives a fixed pool of
//! fetch workers over two channels. Workers fetch, follow redirects, and
//! parse; the coordinator dedups, classifies, and schedules.

mod coordinator;
mod fetcher;
mod parser;
mod pool;

pub use coordinator::crawl;
pub use fetcher::{build_http_client, fetch_destination, FetchOutcome, FetchTask};
pub use parser::{parse_css, parse_html, ExtractedLink, ParsedDocument};
pub use pool::FetchPool;
