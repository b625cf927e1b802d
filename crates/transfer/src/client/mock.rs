//! In-memory transfer server for testing.

use crate::error::{ErrorKind, Result};
use crate::sink::ChunkSink;
use crate::{Connector, TransferSession};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const DEFAULT_CHUNK_SIZE: usize = 4;

/// A command received by a [`MockServer`], recorded in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Connect,
    List(String),
    Size(String),
    Fetch(String),
    Close,
}

#[derive(Default)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    calls: Vec<Call>,
    offline: bool,
}

/// In-memory transfer server for testing.
///
/// Files live in a map behind a [`Mutex`]; every command any session sends
/// is recorded so tests can assert on exactly which transfers happened.
/// Clones share the same state, so keep one handle for assertions and give
/// another to the code under test.
///
/// # Examples
///
/// ```
/// use oami_transfer::{Connector, MockServer, TransferSession};
/// use oami_transfer::client::Call;
///
/// let server = MockServer::with_files([("pub/pmc/a.tar.gz", b"data".to_vec())]);
/// let mut session = server.connect().unwrap();
/// assert_eq!(session.size("pub/pmc/a.tar.gz").unwrap(), 4);
/// session.close().unwrap();
/// assert_eq!(server.calls(), [Call::Connect, Call::Size("pub/pmc/a.tar.gz".into()), Call::Close]);
/// ```
#[derive(Clone)]
pub struct MockServer {
    name: String,
    chunk_size: usize,
    state: Arc<Mutex<State>>,
}

impl MockServer {
    /// Create a mock server pre-populated with files.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let files = files.into_iter().map(|(path, data)| (path.into(), data.into())).collect();
        Self {
            name: "mock".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            state: Arc::new(Mutex::new(State { files, ..State::default() })),
        }
    }

    /// Change the name reported by [`Connector::server`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Change how many bytes each streamed chunk carries.
    ///
    /// Panics on zero; a zero-sized chunk would never make progress.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "MockServer::with_chunk_size: chunk size must be positive");
        self.chunk_size = chunk_size;
        self
    }

    /// Refuse every connection attempt from now on.
    pub fn offline(self) -> Self {
        self.lock().offline = true;
        self
    }

    /// Add or replace a file on the server.
    pub fn put(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.lock().files.insert(path.into(), data.into());
    }

    /// Every command received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Remote paths that were actually streamed, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Fetch(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the calls recorded so far.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
impl Default for MockServer {
    fn default() -> Self {
        let files: [(&str, &[u8]); 0] = [];
        Self::with_files(files)
    }
}

impl Connector for MockServer {
    type Session = MockSession;

    fn server(&self) -> &str {
        &self.name
    }

    fn connect(&self) -> Result<MockSession> {
        let mut state = self.lock();
        if state.offline {
            exn::bail!(ErrorKind::Connect(self.name.clone()));
        }
        state.calls.push(Call::Connect);
        Ok(MockSession { server: self.clone() })
    }
}

/// A session against a [`MockServer`].
pub struct MockSession {
    server: MockServer,
}

impl TransferSession for MockSession {
    fn list(&mut self, directory: &str) -> Result<Vec<String>> {
        let mut state = self.server.lock();
        state.calls.push(Call::List(directory.to_string()));
        let prefix = format!("{}/", directory.trim_end_matches('/'));
        Ok(state.files.keys().filter(|path| path.starts_with(&prefix)).cloned().collect())
    }

    fn size(&mut self, path: &str) -> Result<u64> {
        let mut state = self.server.lock();
        state.calls.push(Call::Size(path.to_string()));
        let data = state.files.get(path).ok_or_else(|| ErrorKind::NotFound(path.to_string()))?;
        Ok(data.len() as u64)
    }

    fn fetch(&mut self, path: &str, sink: &mut dyn ChunkSink) -> Result<u64> {
        // Copy the file out so the lock isn't held while the sink runs.
        let data = {
            let mut state = self.server.lock();
            state.calls.push(Call::Fetch(path.to_string()));
            state.files.get(path).cloned().ok_or_else(|| ErrorKind::NotFound(path.to_string()))?
        };
        for chunk in data.chunks(self.server.chunk_size) {
            sink.accept(chunk).map_err(|_| ErrorKind::Sink(path.to_string()))?;
        }
        Ok(data.len() as u64)
    }

    fn close(self) -> Result<()> {
        self.server.lock().calls.push(Call::Close);
        Ok(())
    }
}
