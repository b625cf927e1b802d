pub mod client;
pub mod error;
mod path;
mod sink;

#[cfg(feature = "mock")]
pub use crate::client::MockServer;
pub use crate::client::{Connector, FtpConnector, TransferSession};
pub use crate::path::local_name;
pub use crate::sink::ChunkSink;
