//! Configuration for linkscout
//!
//! Options come from CLI flags, optionally layered over a TOML config file.
//! CLI values win over file values; file values win over defaults.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{CrawlOptions, FileConfig};
pub use validation::validate;
