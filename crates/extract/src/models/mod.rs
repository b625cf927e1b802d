mod filter;
mod link;
mod skip;

pub use self::filter::MediaFilter;
pub use self::link::SupplementaryLink;
pub use self::skip::Skip;
