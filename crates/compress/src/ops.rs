//! Compression Operations

use crate::Compression;
use bzip2::{Compression as BzCompression, read::MultiBzDecoder, write::BzEncoder};
use flate2::{Compression as GzCompression, read::MultiGzDecoder, write::GzEncoder};
use std::io::{Read, Write};

// Encoding only exists to build test containers; favour speed.
const BZIP2_LEVEL: BzCompression = BzCompression::fast();
const GZIP_LEVEL: GzCompression = GzCompression::fast();

impl Compression {
    /// Wrap a reader with the appropriate decompression layer.
    ///
    /// Multi-member streams (concatenated gzip/bzip2 members, as produced by
    /// parallel compressors) are decoded in full.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read, Write};
    /// use oami_compress::Compression;
    ///
    /// let mut compressed = Vec::new();
    /// {
    ///     let mut writer = Compression::Gzip.wrap_writer(&mut compressed);
    ///     writer.write_all(b"Hello, world!").unwrap();
    /// }
    /// let mut reader = Compression::Gzip.wrap_reader(Cursor::new(compressed));
    /// let mut decompressed = Vec::new();
    /// reader.read_to_end(&mut decompressed).unwrap();
    /// assert_eq!(decompressed, b"Hello, world!");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => Box::new(MultiBzDecoder::new(reader)),
            Compression::Gzip => Box::new(MultiGzDecoder::new(reader)),
        }
    }

    /// Wrap a writer with the appropriate compression layer. The stream is
    /// finalised when the returned writer is dropped.
    pub fn wrap_writer<'a, W: Write + 'a>(&self, writer: W) -> Box<dyn Write + 'a> {
        match self {
            Compression::None => Box::new(writer),
            Compression::Bzip2 => Box::new(BzEncoder::new(writer, BZIP2_LEVEL)),
            Compression::Gzip => Box::new(GzEncoder::new(writer, GZIP_LEVEL)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;
    use rstest::rstest;
    use std::io::{Read, Write};

    fn compress(format: Compression, data: &[u8]) -> Vec<u8> {
        let mut output = Vec::new();
        {
            let mut writer = format.wrap_writer(&mut output);
            writer.write_all(data).unwrap();
        }
        output
    }

    fn decompress(format: Compression, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut output = Vec::new();
        format.wrap_reader(data).read_to_end(&mut output)?;
        Ok(output)
    }

    #[rstest]
    #[case(Compression::None)]
    #[case(Compression::Bzip2)]
    #[case(Compression::Gzip)]
    fn test_wrap_reader(#[case] format: Compression) {
        let original = b"<article><front/></article>";
        let compressed = compress(format, original);
        assert_eq!(Compression::from_magic_bytes(&compressed), format);
        assert_eq!(decompress(format, &compressed).unwrap(), original);
    }

    #[rstest]
    #[case(Compression::Bzip2)]
    #[case(Compression::Gzip)]
    fn test_invalid_compressed_data(#[case] format: Compression) {
        assert!(decompress(format, b"This is not compressed data").is_err());
    }

    #[test]
    fn test_multi_member_gzip() {
        let mut joined = compress(Compression::Gzip, b"first ");
        joined.extend(compress(Compression::Gzip, b"second"));
        assert_eq!(decompress(Compression::Gzip, &joined).unwrap(), b"first second");
    }
}
