use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::scan::ScanStats;
use crate::scan::error::{ErrorKind, Result as ScanResult};
use exn::ResultExt;
use oami_compress::Compression;
use oami_extract::{ArticleDocument, is_article_name};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tar::Entries;
use tracing::{debug, instrument, trace, warn};

const BLOCK_SIZE: usize = 512;

/// An opened container, positioned at its first member.
pub struct Archive {
    path: PathBuf,
    compression: Compression,
    inner: tar::Archive<Box<dyn Read>>,
}

impl Archive {
    /// Open a container, detecting its compression from the leading magic
    /// bytes or a tar header, or from the file extension when the contents
    /// are inconclusive.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> LibraryResult<Self> {
        Self::open_inner(path.as_ref()).or_raise(|| LibraryErrorKind::Scan)
    }

    fn open_inner(path: &Path) -> ScanResult<Self> {
        let file = File::open(path).or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
        let mut reader = BufReader::new(file);
        let named = Compression::from_path(path);
        let sniffed = Compression::sniff(&mut reader).or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
        let head = reader.fill_buf().or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
        let compression = if sniffed == Compression::None && !is_plain_tar(head) {
            trace!(%named, "contents inconclusive, going by the file name");
            named
        } else {
            if !named.check_magic_bytes(head) {
                warn!(%named, %sniffed, "file name disagrees with contents, trusting contents");
            }
            sniffed
        };
        debug!(%compression, "opened container");
        Ok(Self {
            path: path.to_path_buf(),
            compression,
            inner: tar::Archive::new(compression.wrap_reader(reader)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// The article documents in this container, in member order.
    ///
    /// Can only be called once per [`Archive`]; open the container again to
    /// start over.
    pub fn documents(&mut self) -> LibraryResult<Documents<'_>> {
        let entries = self
            .inner
            .entries()
            .or_raise(|| ErrorKind::Container(self.path.clone()))
            .or_raise(|| LibraryErrorKind::Scan)?;
        Ok(Documents {
            entries,
            path: &self.path,
            stats: ScanStats::default(),
            done: false,
        })
    }
}

/// A bare tar stream has no leading magic; its first header block carries
/// `ustar` at offset 257.
fn is_plain_tar(head: &[u8]) -> bool {
    head.get(..BLOCK_SIZE).is_some_and(|block| {
        let header = tar::Header::from_byte_slice(block);
        header.as_ustar().is_some() || header.as_gnu().is_some()
    })
}

/// Iterator over the article documents of an [`Archive`].
///
/// Yields `Err` at most once, when the container stream itself fails, and
/// nothing after that.
pub struct Documents<'a> {
    entries: Entries<'a, Box<dyn Read>>,
    path: &'a Path,
    stats: ScanStats,
    done: bool,
}

impl Documents<'_> {
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    fn next_inner(&mut self) -> Option<ScanResult<ArticleDocument>> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e).or_raise(|| ErrorKind::Container(self.path.to_path_buf()))),
            };
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let member = match entry.path() {
                Ok(name) => name.into_owned(),
                Err(e) => {
                    warn!(error = %e, "member has an unreadable name, skipping");
                    continue;
                },
            };
            if !is_article_name(&member) {
                // Left unread; the tar reader skips over its data.
                trace!(member = %member.display(), "not an article, skipping");
                continue;
            }
            let member = member.display().to_string();
            match ArticleDocument::parse(BufReader::new(entry)) {
                Ok(document) => {
                    self.stats.documents += 1;
                    return Some(Ok(document.with_source(member)));
                },
                Err(e) => {
                    self.stats.skipped += 1;
                    warn!(member = %member, error = ?e, "could not parse article, skipping");
                },
            }
        }
    }
}

impl Iterator for Documents<'_> {
    type Item = LibraryResult<ArticleDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_inner();
        match &next {
            None | Some(Err(_)) => self.done = true,
            Some(Ok(_)) => {},
        }
        next.map(|result| result.or_raise(|| LibraryErrorKind::Scan))
    }
}
