//! URL handling module for Maxtract
//!
//! This module turns raw `href` values into canonical addresses and decides which
//! canonical addresses fall inside the crawl's domain scope.

mod normalize;
mod scope;

pub use normalize::{canonicalize, parse_root, resolve};
pub use scope::{host_matches, DomainScope};
