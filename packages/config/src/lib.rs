#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::{
    path::PathBuf,
    sync::{LazyLock, Mutex, PoisonError},
};

#[cfg(feature = "file")]
pub mod file;

/// Environment variable that overrides the default config root.
pub const CONFIG_DIR_ENV: &str = "PMU_CONFIG_DIR";

static ROOT_DIR: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

/// Sets the root directory for PMU configuration.
///
/// By default, the root directory is `$PMU_CONFIG_DIR` when set, otherwise
/// `~/.local/pmu`. This function overrides both.
pub fn set_root_dir(path: PathBuf) {
    *ROOT_DIR.lock().unwrap_or_else(PoisonError::into_inner) = Some(path);
}

#[must_use]
fn get_root_dir() -> Option<PathBuf> {
    let mut root_dir = ROOT_DIR.lock().unwrap_or_else(PoisonError::into_inner);

    if root_dir.is_some() {
        return root_dir.clone();
    }

    *root_dir = std::env::var_os(CONFIG_DIR_ENV)
        .filter(|x| !x.is_empty())
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".local").join("pmu")));

    log::trace!("Resolved config root dir: {:?}", *root_dir);

    root_dir.clone()
}

/// Returns the path to the PMU configuration directory.
///
/// Defaults to `~/.local/pmu` unless overridden with [`set_root_dir`].
#[must_use]
pub fn get_config_dir_path() -> Option<PathBuf> {
    get_root_dir()
}

/// Returns the path to the log directory, `<config dir>/logs`.
#[must_use]
pub fn get_logs_dir_path() -> Option<PathBuf> {
    get_config_dir_path().map(|config| config.join("logs"))
}

/// Returns the path to the configuration directory, creating it if it doesn't exist.
///
/// Returns `None` if the directory cannot be created or the path cannot be determined.
#[must_use]
pub fn make_config_dir_path() -> Option<PathBuf> {
    if let Some(path) = get_config_dir_path()
        && (path.is_dir() || std::fs::create_dir_all(&path).is_ok())
    {
        return Some(path);
    }

    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn set_root_dir_overrides_config_and_logs_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pmu");

        set_root_dir(root.clone());

        assert_eq!(get_config_dir_path(), Some(root.clone()));
        assert_eq!(get_logs_dir_path(), Some(root.join("logs")));
        assert_eq!(make_config_dir_path(), Some(root.clone()));
        assert!(root.is_dir());
    }
}
