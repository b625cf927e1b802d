//! Transfer client traits and implementations.
//!
//! A [`Connector`] knows how to reach one server and opens
//! [`TransferSession`]s against it. A session is a stateful conversation
//! (think FTP control connection): it is opened once, reused for every
//! command, and closed explicitly when the caller is done with it.

mod ftp;
#[cfg(feature = "mock")]
mod mock;

pub use self::ftp::{FtpConnector, FtpSession};
#[cfg(feature = "mock")]
pub use self::mock::{Call, MockServer, MockSession};
use crate::error::Result;
use crate::sink::ChunkSink;

/// Opens sessions against a single transfer server.
///
/// # Examples
///
/// ```no_run
/// use oami_transfer::{ChunkSink, Connector, FtpConnector, TransferSession, error::Result};
///
/// fn fetch_into_memory(connector: &impl Connector, remote: &str) -> Result<Vec<u8>> {
///     let mut session = connector.connect()?;
///     let mut data = Vec::new();
///     session.fetch(remote, &mut data)?;
///     session.close()?;
///     Ok(data)
/// }
///
/// let connector = FtpConnector::new("ftp.ncbi.nlm.nih.gov");
/// let data = fetch_into_memory(&connector, "pub/pmc/readme.txt").unwrap();
/// ```
pub trait Connector {
    type Session: TransferSession;

    /// Server address, for logging only.
    fn server(&self) -> &str;

    /// Establish a session: connect, authenticate, and switch to binary
    /// transfer mode. Returns [`Connect`](crate::error::ErrorKind::Connect)
    /// if the server cannot be reached or refuses the login.
    fn connect(&self) -> Result<Self::Session>;
}

/// An established request/response session.
///
/// All paths are remote paths as understood by the server (forward slashes,
/// relative to the login directory unless absolute).
pub trait TransferSession {
    /// List the names inside a remote directory.
    fn list(&mut self, directory: &str) -> Result<Vec<String>>;

    /// Size of a remote resource in bytes, as reported by the server in
    /// binary mode. Returns [`NotFound`](crate::error::ErrorKind::NotFound)
    /// if the resource does not exist.
    fn size(&mut self, path: &str) -> Result<u64>;

    /// Stream a remote resource into `sink`, one chunk at a time, until the
    /// end of the stream. Returns the number of bytes delivered.
    ///
    /// Chunks are handed to the sink synchronously and in order; a sink
    /// error aborts the transfer with
    /// [`Sink`](crate::error::ErrorKind::Sink).
    fn fetch(&mut self, path: &str, sink: &mut dyn ChunkSink) -> Result<u64>;

    /// End the session politely.
    fn close(self) -> Result<()>;
}
