use tracing::{debug, info};

/// Receives a signal for every chunk written during a download.
///
/// Calls arrive in order: one [`start`](Self::start), any number of
/// [`advance`](Self::advance), then [`finish`](Self::finish) if (and only if)
/// the transfer completed.
pub trait Progress {
    fn start(&mut self, name: &str, total: u64);
    fn advance(&mut self, bytes: u64);
    fn finish(&mut self) {}
}

/// Discards every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _name: &str, _total: u64) {}
    fn advance(&mut self, _bytes: u64) {}
}

/// Reports progress as tracing events, one per tenth of the transfer.
#[derive(Debug, Default, Clone)]
pub struct LogProgress {
    name: String,
    total: u64,
    done: u64,
    reported: u64,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whole tenths completed so far.
    fn tenths(&self) -> u64 {
        if self.total == 0 {
            return 10;
        }
        (self.done.min(self.total) * 10) / self.total
    }
}

impl Progress for LogProgress {
    fn start(&mut self, name: &str, total: u64) {
        self.name = name.to_string();
        self.total = total;
        self.done = 0;
        self.reported = 0;
    }

    fn advance(&mut self, bytes: u64) {
        self.done += bytes;
        let tenths = self.tenths();
        if tenths > self.reported && tenths < 10 {
            self.reported = tenths;
            debug!(name = %self.name, done = self.done, total = self.total, "{}% downloaded", tenths * 10);
        }
    }

    fn finish(&mut self) {
        info!(name = %self.name, size = self.done, "download complete");
    }
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn start(&mut self, name: &str, total: u64) {
        (**self).start(name, total)
    }

    fn advance(&mut self, bytes: u64) {
        (**self).advance(bytes)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, &[5], 0)]
    #[case(100, &[10], 1)]
    #[case(100, &[30, 30], 6)]
    #[case(100, &[100], 0)]
    #[case(0, &[], 0)]
    fn test_log_progress_tenths(#[case] total: u64, #[case] chunks: &[u64], #[case] reported: u64) {
        let mut progress = LogProgress::new();
        progress.start("a.tar.gz", total);
        for chunk in chunks {
            progress.advance(*chunk);
        }
        // Completion is reported by `finish`, not as "100%".
        assert_eq!(progress.reported, reported);
    }

    #[test]
    fn test_restart_resets() {
        let mut progress = LogProgress::new();
        progress.start("a", 10);
        progress.advance(5);
        progress.start("b", 10);
        assert_eq!(progress.done, 0);
        assert_eq!(progress.reported, 0);
        assert_eq!(progress.name, "b");
    }
}
