//! The two halves of a crawl: keeping a local mirror of the remote bulk
//! archives current ([`mirror`]), and walking the article documents packed
//! inside each archive ([`scan`]).

pub mod error;
pub mod mirror;
pub mod scan;

pub use crate::mirror::{LocalCache, Mirror, SyncReport};
pub use crate::scan::{Archive, scan};
