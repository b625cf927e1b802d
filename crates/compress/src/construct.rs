use crate::Compression;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::BufRead;
use std::path::Path;

const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

impl Compression {
    /// Detect compression from a file extension. Understands the tarball
    /// shorthands (`.tgz`, `.tbz2`) as well as double extensions such as
    /// `.tar.gz`, where only the final extension matters.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "bz2" | "tbz" | "tbz2" => Compression::Bzip2,
                "gz" | "tgz" => Compression::Gzip,
                _ => Compression::None,
            })
            .unwrap_or(Compression::None)
    }

    /// Detect compression format from magic bytes.
    ///
    /// Returns the `None` variant if no magic bytes match or if the input is
    /// too short to detect any format.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&BZIP2_MAGIC) {
            return Compression::Bzip2;
        }
        if bytes.starts_with(&GZIP_MAGIC) {
            return Compression::Gzip;
        }
        Compression::None
    }

    /// Detect the compression format of a buffered reader without consuming
    /// any of its bytes; the reader can be handed to
    /// [`wrap_reader`](Self::wrap_reader) afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{BufReader, Cursor};
    /// use oami_compress::Compression;
    ///
    /// let mut reader = BufReader::new(Cursor::new(vec![0x1F, 0x8B, 0x08, 0x00]));
    /// assert_eq!(Compression::sniff(&mut reader).unwrap(), Compression::Gzip);
    /// ```
    pub fn sniff<R: BufRead>(reader: &mut R) -> Result<Self> {
        let head = reader.fill_buf().or_raise(|| ErrorKind::Io)?;
        Ok(Compression::from_magic_bytes(head))
    }
}
