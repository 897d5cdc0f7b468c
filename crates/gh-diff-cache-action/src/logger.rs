//! Logging for workflow runs
//!
//! Logs go to stderr, which the runner shows in the step log. The level is
//! `info` by default and `debug` when the workflow is re-run with debug
//! logging (`RUNNER_DEBUG=1`). `RUST_LOG` overrides both.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default level for the given `RUNNER_DEBUG` value
fn default_level(runner_debug: Option<&str>) -> LevelFilter {
    match runner_debug {
        Some("1") => LevelFilter::Debug,
        _ => LevelFilter::Info,
    }
}

/// Initialize the global logger
pub fn init() {
    let level = default_level(std::env::var("RUNNER_DEBUG").ok().as_deref());

    Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
