//! Compression detection and decoding for mirrored archive containers.
//!
//! Bulk archives are published as compressed tarballs. This crate figures out
//! which compression layer sits in front of the tar stream and wraps a reader
//! to peel it off:
//!
//! - **Format detection** from file names ([`Compression::from_path`]) or
//!   magic bytes ([`Compression::from_magic_bytes`])
//! - **Streaming** decoding via [`Compression::wrap_reader`], and the
//!   matching encoder via [`Compression::wrap_writer`] for building fixtures
//! - **Sniffing** a buffered reader without consuming it
//!   ([`Compression::sniff`])

mod construct;
pub mod error;
mod ops;
mod util;

/// A supported compression format. Defaults to [`None`](Self::None)
/// (a bare tar stream).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2, .tbz2)
    Bzip2,
    /// Gzip compression (.gz, .tgz)
    Gzip,
}

#[cfg(test)]
mod tests {
    use crate::Compression;

    #[test]
    fn compression_default() {
        assert_eq!(Compression::default(), Compression::None);
    }
}
