//! URL handling for linkscout
//!
//! This module provides URL normalization (the destination identity key),
//! fragment splitting, and host-glob matching for the internal/external
//! boundary.

mod matcher;
mod normalize;

pub use matcher::{HostGlob, HostGlobSet};
pub use normalize::{is_supported_scheme, normalize_url, split_fragment};
