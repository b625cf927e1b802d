use oami::Config;
use oami_transfer::FtpConnector;
use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = ?e, "could not load configuration");
            return ExitCode::FAILURE;
        },
    };
    info!(server = %config.server, cache = %config.cache_dir.display(), "starting");

    let connector = FtpConnector::new(config.server.clone());
    // URLs share stderr with the log; RUST_LOG=off leaves only URLs.
    match oami::run(&config, connector, &mut io::stderr()) {
        Ok(summary) => {
            info!(links = summary.links, failed = summary.failed, "done");
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!(error = ?e, "aborting");
            ExitCode::FAILURE
        },
    }
}
