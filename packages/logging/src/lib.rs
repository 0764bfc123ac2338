#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use free_log_client::FreeLogLayer;
pub use log;
use pmu_config::get_logs_dir_path;
use thiserror::Error;

pub use free_log_client;

#[cfg(feature = "macros")]
mod macros;

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Logs(#[from] free_log_client::LogsInitError),
    #[error(transparent)]
    BuildLogsConfig(#[from] free_log_client::BuildLogsConfigError),
    #[error(transparent)]
    BuildFileWriterConfig(#[from] free_log_client::BuildFileWriterConfigError),
}

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: &str = "pmu=trace";
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: &str = "pmu=info";

/// Compile-time log filter: `PMU_LOG`, then `RUST_LOG`, then the build default.
const LOG_FILTER: &str = match option_env!("PMU_LOG") {
    Some(v) => v,
    None => match option_env!("RUST_LOG") {
        Some(v) => v,
        None => DEFAULT_LOG_LEVEL,
    },
};

/// Initializes logging, optionally also writing to `<config dir>/logs/<filename>`.
///
/// # Errors
///
/// * If the log file writer could not be configured
/// * If the logger could not be installed
pub fn init(filename: Option<&str>) -> Result<FreeLogLayer, InitError> {
    let mut logs_config = free_log_client::LogsConfig::builder();

    if let Some(filename) = filename {
        if let Some(log_dir) =
            get_logs_dir_path().filter(|dir| dir.is_dir() || std::fs::create_dir_all(dir).is_ok())
        {
            logs_config = logs_config.with_file_writer(
                free_log_client::FileWriterConfig::builder()
                    .file_path(log_dir.join(filename))
                    .log_level(free_log_client::Level::Debug),
            )?;
        } else {
            log::warn!("Could not get config dir to put the logs into");
        }
    }

    let layer = free_log_client::init(logs_config.env_filter(LOG_FILTER))?;

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn log_filter_is_never_empty() {
        assert!(!LOG_FILTER.is_empty());
    }

    #[cfg(feature = "macros")]
    #[test_log::test]
    fn debug_or_trace_expands_in_both_modes() {
        let value = 42;
        crate::debug_or_trace!(("value={value}"), ("value={value} detail={:?}", [1, 2]));
    }
}
