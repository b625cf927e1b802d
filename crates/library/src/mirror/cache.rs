//! Local cache directory holding one file per mirrored resource.

use crate::mirror::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const PART_EXTENSION: &str = "part";

/// The directory mirrored resources are stored in.
///
/// Files are named after the final segment of their remote path and are
/// compared with the remote copy by size alone.
///
/// # Examples
///
/// ```
/// use oami_library::LocalCache;
///
/// let dir = tempfile::tempdir().unwrap();
/// let cache = LocalCache::prepare(dir.path().join("PubMed")).unwrap();
/// assert_eq!(cache.size("articles.A-B.tar.gz").unwrap(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    /// Use `root` as the cache directory, creating it (and its parents) if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` exists but is not a directory, cannot be
    /// created, or cannot be listed.
    #[instrument(skip_all, fields(path = %root.as_ref().display()))]
    pub fn prepare(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::Cache(root));
            }
            info!("cache directory already exists, using it");
        } else {
            fs::create_dir_all(&root).or_raise(|| ErrorKind::Cache(root.clone()))?;
            info!("created cache directory");
        }
        // Existence isn't access; make sure we can actually look inside.
        fs::read_dir(&root).or_raise(|| ErrorKind::Cache(root.clone()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a cached file.
    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    /// Size of a cached file, `0` if it does not exist yet.
    pub fn size(&self, name: impl AsRef<Path>) -> Result<u64> {
        let path = self.path(name);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
            Ok(_) => exn::bail!(ErrorKind::Cache(path)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(0),
            Err(e) => Err(e).or_raise(|| ErrorKind::Cache(path)),
        }
    }

    /// Open a scratch file next to `name`; nothing at `name` changes until
    /// the returned [`PartFile`] is committed.
    pub fn create(&self, name: impl AsRef<Path>) -> Result<PartFile> {
        let target = self.path(name);
        let mut part = target.clone().into_os_string();
        part.push(".");
        part.push(PART_EXTENSION);
        let part = PathBuf::from(part);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&part)
            .or_raise(|| ErrorKind::Cache(part.clone()))?;
        Ok(PartFile {
            writer: BufWriter::new(file),
            part,
            target,
            written: 0,
        })
    }
}

/// A download in progress, written beside its final location.
///
/// Dropping a `PartFile` without committing it removes the scratch file.
#[derive(Debug)]
pub struct PartFile {
    writer: BufWriter<File>,
    part: PathBuf,
    target: PathBuf,
    written: u64,
}

impl PartFile {
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub(crate) fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush to disk and move over the target, replacing any older copy.
    pub fn commit(mut self) -> Result<u64> {
        self.writer.flush().or_raise(|| ErrorKind::Cache(self.part.clone()))?;
        self.writer.get_ref().sync_all().or_raise(|| ErrorKind::Cache(self.part.clone()))?;
        fs::rename(&self.part, &self.target).or_raise(|| ErrorKind::Cache(self.target.clone()))?;
        debug!(path = %self.target.display(), size = self.written, "committed download");
        // Already renamed; keep Drop from deleting anything.
        self.part = PathBuf::new();
        Ok(self.written)
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.part.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.part)
            && e.kind() != IoErrorKind::NotFound
        {
            debug!(path = %self.part.display(), error = %e, "could not remove partial download");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_creates_nested() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("cache").join("PubMed");
        let cache = LocalCache::prepare(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(cache.root(), root);
        // A second time is fine; the directory is reused.
        LocalCache::prepare(&root).unwrap();
    }

    #[test]
    fn test_prepare_rejects_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("PubMed");
        fs::write(&root, b"not a directory").unwrap();
        let err = LocalCache::prepare(&root).unwrap_err();
        assert_eq!(*err, ErrorKind::Cache(root));
    }

    #[test]
    fn test_size() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::prepare(dir.path()).unwrap();
        assert_eq!(cache.size("a.tar.gz").unwrap(), 0);
        fs::write(cache.path("a.tar.gz"), b"12345").unwrap();
        assert_eq!(cache.size("a.tar.gz").unwrap(), 5);
        fs::create_dir(cache.path("sub")).unwrap();
        assert!(cache.size("sub").is_err());
    }

    #[test]
    fn test_commit_replaces() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::prepare(dir.path()).unwrap();
        fs::write(cache.path("a.tar.gz"), b"old contents, longer").unwrap();
        let mut part = cache.create("a.tar.gz").unwrap();
        part.write(b"new").unwrap();
        // Untouched until committed.
        assert_eq!(fs::read(cache.path("a.tar.gz")).unwrap(), b"old contents, longer");
        assert_eq!(part.commit().unwrap(), 3);
        assert_eq!(fs::read(cache.path("a.tar.gz")).unwrap(), b"new");
        assert!(!cache.path("a.tar.gz.part").exists());
    }

    #[test]
    fn test_drop_discards() {
        let dir = tempdir().unwrap();
        let cache = LocalCache::prepare(dir.path()).unwrap();
        fs::write(cache.path("a.tar.gz"), b"old").unwrap();
        {
            let mut part = cache.create("a.tar.gz").unwrap();
            part.write(b"partial").unwrap();
            assert!(cache.path("a.tar.gz.part").exists());
        }
        assert!(!cache.path("a.tar.gz.part").exists());
        assert_eq!(fs::read(cache.path("a.tar.gz")).unwrap(), b"old");
    }
}
