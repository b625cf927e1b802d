use crate::Compression;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Compression {
    /// Returns the short name (for logging)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
        }
    }

    /// Returns `true` if `bytes` carry this format's magic bytes, or none at
    /// all for [`None`](Self::None).
    #[must_use]
    pub fn check_magic_bytes(&self, bytes: &[u8]) -> bool {
        *self == Self::from_magic_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;

    #[test]
    fn test_check_magic_bytes() {
        assert!(Compression::Gzip.check_magic_bytes(&[0x1F, 0x8B, 0x08]));
        assert!(!Compression::Gzip.check_magic_bytes(b"BZh9"));
        assert!(Compression::None.check_magic_bytes(b"plain tar header"));
        assert!(!Compression::None.check_magic_bytes(&[0x42, 0x5A, 0x68, 0x39]));
    }
}
