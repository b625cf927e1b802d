use crate::mirror::cache::LocalCache;
use crate::mirror::error::{Error, ErrorKind, Result};
use crate::mirror::progress::Progress;
use crate::mirror::sink::FileSink;
use exn::ResultExt;
use oami_transfer::{Connector, TransferSession};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

/// What happened to one resource during a sync.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Local and remote sizes matched; nothing was transferred.
    UpToDate(u64),
    /// The resource was (re)downloaded; carries the new local size.
    Downloaded(u64),
    /// The resource could not be mirrored. Any older local copy is left as
    /// it was, but is not considered present.
    Failed(Error),
}

impl SyncOutcome {
    /// Returns `true` if the local file can be used after the sync.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct SyncEntry {
    pub remote: String,
    /// Location in the local cache.
    pub local: PathBuf,
    pub outcome: SyncOutcome,
}

/// Per-resource outcomes of one [`Mirror::sync`], in the order requested.
#[derive(Debug, Default)]
pub struct SyncReport {
    entries: Vec<SyncEntry>,
}

impl SyncReport {
    pub fn entries(&self) -> &[SyncEntry] {
        &self.entries
    }

    /// Local files usable after the sync, in the order requested.
    pub fn present(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter(|entry| entry.outcome.is_present()).map(|entry| entry.local.as_path())
    }

    pub fn downloaded(&self) -> usize {
        self.count(|outcome| matches!(outcome, SyncOutcome::Downloaded(_)))
    }

    pub fn up_to_date(&self) -> usize {
        self.count(|outcome| matches!(outcome, SyncOutcome::UpToDate(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, SyncOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.entries.iter().filter(|entry| predicate(&entry.outcome)).count()
    }
}

/// Keeps a [`LocalCache`] in step with a list of remote resources.
///
/// Resources are handled strictly in list order over a single session; size
/// equality is the only freshness signal.
#[derive(Debug, Clone)]
pub struct Mirror<C> {
    connector: C,
    cache: LocalCache,
    skip_same_sized: bool,
}

impl<C: Connector> Mirror<C> {
    pub fn new(connector: C, cache: LocalCache) -> Self {
        Self {
            connector,
            cache,
            skip_same_sized: true,
        }
    }

    /// When `false`, every resource is downloaded again even if the local
    /// copy already has the remote size.
    pub fn skip_same_sized(mut self, skip: bool) -> Self {
        self.skip_same_sized = skip;
        self
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Bring every `(remote path, local name)` pair up to date.
    ///
    /// Never fails as a whole: a resource that cannot be mirrored is
    /// reported as [`SyncOutcome::Failed`] and the next one is attempted. If
    /// no session can be opened at all, every resource fails.
    #[instrument(skip_all, fields(server = self.connector.server(), resources = pairs.len()))]
    pub fn sync<P: Progress + ?Sized>(&self, pairs: &[(String, PathBuf)], progress: &mut P) -> SyncReport {
        let mut session = match self.connector.connect() {
            Ok(session) => session,
            Err(e) => {
                error!(error = ?e, "could not open a session, nothing will be mirrored");
                let entries = pairs
                    .iter()
                    .map(|(remote, local)| SyncEntry {
                        remote: remote.clone(),
                        local: self.cache.path(local),
                        outcome: SyncOutcome::Failed(ErrorKind::Unreachable(self.connector.server().to_string()).into()),
                    })
                    .collect();
                return SyncReport { entries };
            },
        };
        let mut entries = Vec::with_capacity(pairs.len());
        for (remote, local) in pairs {
            let outcome = match self.sync_one(&mut session, remote, local, progress) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(remote = %remote, error = ?e, "could not mirror resource, skipping");
                    SyncOutcome::Failed(e)
                },
            };
            entries.push(SyncEntry {
                remote: remote.clone(),
                local: self.cache.path(local),
                outcome,
            });
        }
        if let Err(e) = session.close() {
            warn!(error = ?e, "could not close session cleanly");
        }
        SyncReport { entries }
    }

    fn sync_one<P: Progress + ?Sized>(
        &self,
        session: &mut C::Session,
        remote: &str,
        local: &Path,
        progress: &mut P,
    ) -> Result<SyncOutcome> {
        let remote_size = session.size(remote).or_raise(|| ErrorKind::Transfer(remote.to_string()))?;
        let local_size = self.cache.size(local)?;
        if self.skip_same_sized && remote_size == local_size {
            info!(remote, size = remote_size, "up to date, skipping");
            return Ok(SyncOutcome::UpToDate(local_size));
        }
        let path = self.cache.path(local);
        info!(remote, path = %path.display(), size = remote_size, "downloading {remote} from server, saving as {}", path.display());
        let mut part = self.cache.create(local)?;
        progress.start(remote, remote_size);
        let received = session
            .fetch(remote, &mut FileSink::new(&mut part, &mut *progress, remote_size))
            .or_raise(|| ErrorKind::Transfer(remote.to_string()))?;
        if received != remote_size || part.written() != remote_size {
            exn::bail!(ErrorKind::Truncated {
                expected: remote_size,
                received: part.written(),
            });
        }
        let size = part.commit()?;
        progress.finish();
        Ok(SyncOutcome::Downloaded(size))
    }
}
