//! Run configuration.
//!
//! Every setting has a default matching the public PubMed Central FTP
//! layout; any of them can be overridden with an `OAMI_`-prefixed
//! environment variable:
//!
//! | variable | example |
//! |---|---|
//! | `OAMI_SERVER` | `ftp.ncbi.nlm.nih.gov` |
//! | `OAMI_REMOTE_PATHS` | `[pub/pmc/articles.A-B.tar.gz, pub/pmc/articles.C-H.tar.gz]` |
//! | `OAMI_CACHE_DIR` | `/var/cache/oami` |
//! | `OAMI_SKIP_SAME_SIZED` | `false` |
//! | `OAMI_MEDIA_FILTER` | `audio-video` |

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Serialized};
use oami_extract::MediaFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, instrument};

pub const ENV_PREFIX: &str = "OAMI_";

const DEFAULT_SERVER: &str = "ftp.ncbi.nlm.nih.gov";
const DEFAULT_REMOTE_PATHS: [&str; 4] = [
    "pub/pmc/articles.A-B.tar.gz",
    "pub/pmc/articles.C-H.tar.gz",
    "pub/pmc/articles.I-N.tar.gz",
    "pub/pmc/articles.O-Z.tar.gz",
];
const DEFAULT_CACHE_DIR: &str = "cache/PubMed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transfer server host, optionally with `:port`.
    pub server: String,
    /// Remote archives to mirror, in the order they are synced and scanned.
    pub remote_paths: Vec<String>,
    /// Local directory mirrored archives are stored in.
    pub cache_dir: PathBuf,
    /// Skip the transfer when the local copy already has the remote size.
    pub skip_same_sized: bool,
    pub media_filter: MediaFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            remote_paths: DEFAULT_REMOTE_PATHS.iter().map(|path| path.to_string()).collect(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            skip_same_sized: true,
            media_filter: MediaFilter::default(),
        }
    }
}

impl Config {
    /// Defaults, overlaid with `OAMI_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load and validate the configuration.
    #[instrument]
    pub fn load() -> Result<Self> {
        Self::from_figment(&Self::figment())
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Config = figment.extract().map_err(|e| ErrorKind::Load(e.to_string()))?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Reject settings that could never produce a useful run.
    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid {
                field: "server",
                reason: "must not be empty".to_string(),
            });
        }
        if self.remote_paths.is_empty() {
            exn::bail!(ErrorKind::Invalid {
                field: "remote_paths",
                reason: "must name at least one archive".to_string(),
            });
        }
        self.pairs()?;
        Ok(())
    }

    /// `(remote path, local file name)` for every remote path, in order. The
    /// local name is the final segment of the remote path.
    pub fn pairs(&self) -> Result<Vec<(String, PathBuf)>> {
        self.remote_paths
            .iter()
            .map(|remote| {
                let local = oami_transfer::local_name(remote).or_raise(|| ErrorKind::Invalid {
                    field: "remote_paths",
                    reason: format!("{remote:?} does not name a file"),
                })?;
                Ok((remote.clone(), local))
            })
            .collect()
    }
}
