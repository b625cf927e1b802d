//! Incremental mirroring of remote resources into a local cache.
//!
//! The entry point is [`Mirror::sync`], which walks an ordered list of
//! `(remote path, local name)` pairs over one transfer session and reports a
//! [`SyncOutcome`] for each. Downloads stream through a
//! [`ChunkSink`](oami_transfer::ChunkSink) into a scratch file that replaces
//! the cached copy only once the transfer is complete.

mod cache;
pub mod error;
mod progress;
mod sink;
mod sync;

pub use self::cache::{LocalCache, PartFile};
pub use self::progress::{LogProgress, NoProgress, Progress};
pub use self::sync::{Mirror, SyncEntry, SyncOutcome, SyncReport};
