//! Mirror the PubMed Central bulk archives and list the supplementary media
//! their articles link to.
//!
//! [`run`] is the whole pipeline: sync every configured archive into the
//! local cache, then scan each archive that is present, resolve every
//! supplementary-material cross-reference, and write one absolute URL per
//! line.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use oami_extract::Resolver;
use oami_library::mirror::LogProgress;
use oami_library::{LocalCache, Mirror, scan};
use oami_transfer::Connector;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::{error, info, instrument};

pub use oami_config::Config;

/// Counts from one [`run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Archives present locally after the sync.
    pub synced: usize,
    /// Archives that could not be mirrored.
    pub failed: usize,
    /// Archives scanned to the end.
    pub scanned: usize,
    /// Article documents parsed.
    pub documents: usize,
    /// Article members skipped because they did not parse, in archives
    /// scanned to the end.
    pub skipped: usize,
    /// URLs written.
    pub links: usize,
}

/// Create (or reuse) the cache directory. Failure here is the only thing
/// that stops a run before any transfer.
pub fn prepare_cache(config: &Config) -> Result<LocalCache> {
    LocalCache::prepare(&config.cache_dir).or_raise(|| ErrorKind::Setup)
}

/// Sync, scan, resolve, and write one URL per line to `out`, in archive
/// order, then member order, then cross-reference order.
///
/// # Errors
///
/// Fails if the configuration is unusable, the cache directory cannot be
/// prepared, or `out` stops accepting writes. Transfer, container and
/// member problems are logged and skipped.
#[instrument(skip_all, fields(server = connector.server()))]
pub fn run<C: Connector>(config: &Config, connector: C, out: &mut impl Write) -> Result<Summary> {
    config.validate().or_raise(|| ErrorKind::Config)?;
    let pairs = config.pairs().or_raise(|| ErrorKind::Config)?;
    let cache = prepare_cache(config)?;

    let mirror = Mirror::new(connector, cache).skip_same_sized(config.skip_same_sized);
    let report = mirror.sync(&pairs, &mut LogProgress::new());
    let mut summary = Summary {
        synced: report.present().count(),
        failed: report.failed(),
        ..Summary::default()
    };
    info!(
        downloaded = report.downloaded(),
        up_to_date = report.up_to_date(),
        failed = summary.failed,
        "sync finished"
    );

    let resolver = Resolver::new(config.media_filter);
    for container in report.present() {
        scan_container(container, resolver, out, &mut summary)?;
    }
    info!(?summary, "run finished");
    Ok(summary)
}

#[instrument(skip_all, fields(path = %container.display()))]
fn scan_container(container: &Path, resolver: Resolver, out: &mut impl Write, summary: &mut Summary) -> Result<()> {
    let mut failed_write = None;
    let scanned = scan(container, |document| {
        summary.documents += 1;
        for link in resolver.resolve(&document) {
            if let Err(e) = writeln!(out, "{link}") {
                failed_write = Some(e);
                return ControlFlow::Break(());
            }
            summary.links += 1;
        }
        ControlFlow::Continue(())
    });
    if let Some(e) = failed_write {
        return Err(e).or_raise(|| ErrorKind::Output);
    }
    out.flush().or_raise(|| ErrorKind::Output)?;
    match scanned {
        Ok(stats) => {
            summary.skipped += stats.skipped;
            summary.scanned += 1;
        },
        Err(e) => error!(error = ?e, "could not read container, skipping the rest of it"),
    }
    Ok(())
}
