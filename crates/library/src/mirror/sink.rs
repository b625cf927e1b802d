use crate::mirror::cache::PartFile;
use crate::mirror::progress::Progress;
use oami_transfer::ChunkSink;
use std::io::Result as IoResult;

/// Writes streamed chunks into a [`PartFile`], signalling progress after
/// every chunk.
pub(crate) struct FileSink<'a, P: Progress + ?Sized> {
    file: &'a mut PartFile,
    progress: &'a mut P,
    expected: u64,
}

impl<'a, P: Progress + ?Sized> FileSink<'a, P> {
    pub(crate) fn new(file: &'a mut PartFile, progress: &'a mut P, expected: u64) -> Self {
        Self { file, progress, expected }
    }
}

impl<P: Progress + ?Sized> ChunkSink for FileSink<'_, P> {
    fn expected_size(&self) -> Option<u64> {
        Some(self.expected)
    }

    fn accept(&mut self, chunk: &[u8]) -> IoResult<()> {
        self.file.write(chunk)?;
        self.progress.advance(chunk.len() as u64);
        Ok(())
    }
}
