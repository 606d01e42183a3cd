//! The crawl graph: destinations, links, and the deduplicating store
//!
//! A Destination is a URL with the fragment stripped; fragments accumulate on
//! the Destination as a side set instead of splitting graph nodes. Links are
//! Origin → Destination edges tagged with the fragment the origin requested.

mod destination;
mod link;
mod store;

pub use destination::{BasicRedirectInfo, Destination, DestinationResult};
pub use link::{Link, Origin};
pub use store::DestinationStore;
