//! Destination for streamed bytes.

use std::io::Result as IoResult;

/// Receives a remote resource's bytes as the session streams them.
///
/// Chunks arrive in order, exactly once each, in whatever sizes the server
/// (or the client's read buffer) produces. An error returned from
/// [`accept`](Self::accept) aborts the transfer.
///
/// # Examples
///
/// ```
/// use oami_transfer::ChunkSink;
///
/// struct Counter(u64);
/// impl ChunkSink for Counter {
///     fn accept(&mut self, chunk: &[u8]) -> std::io::Result<()> {
///         self.0 += chunk.len() as u64;
///         Ok(())
///     }
/// }
///
/// let mut counter = Counter(0);
/// counter.accept(b"abc").unwrap();
/// assert_eq!(counter.0, 3);
/// assert_eq!(counter.expected_size(), None);
/// ```
pub trait ChunkSink {
    /// Total number of bytes the sink expects to receive, when known in
    /// advance (e.g. from a size query).
    fn expected_size(&self) -> Option<u64> {
        None
    }

    /// Accept the next chunk.
    fn accept(&mut self, chunk: &[u8]) -> IoResult<()>;
}

impl ChunkSink for Vec<u8> {
    fn accept(&mut self, chunk: &[u8]) -> IoResult<()> {
        self.extend_from_slice(chunk);
        Ok(())
    }
}

impl<S: ChunkSink + ?Sized> ChunkSink for &mut S {
    fn expected_size(&self) -> Option<u64> {
        (**self).expected_size()
    }

    fn accept(&mut self, chunk: &[u8]) -> IoResult<()> {
        (**self).accept(chunk)
    }
}
