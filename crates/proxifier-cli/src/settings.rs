//! Settings file discovery

use anyhow::{Context, Result};
use proxifier_core::AppSettings;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file name in the working and user config directories
pub const FILE_NAME: &str = "proxifier.toml";

/// Per-user config directory
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "proxifier").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Candidate settings files, in search order
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(FILE_NAME)];
    if let Some(dir) = user_config_dir() {
        paths.push(dir.join(FILE_NAME));
    }
    paths
}

/// Find the settings file to use
///
/// An explicit path is used as given, existing or not; otherwise the first
/// existing search path wins.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    search_paths().into_iter().find(|path| path.exists())
}

/// Load settings, with defaults when no file is found
pub fn load(explicit: Option<&Path>) -> Result<(AppSettings, Option<PathBuf>)> {
    let Some(path) = locate(explicit) else {
        debug!("No settings file found, using defaults");
        return Ok((AppSettings::default(), None));
    };

    let settings = AppSettings::load(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    debug!(path = %path.display(), "Loaded settings");
    Ok((settings, Some(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(load(Some(&missing)).is_err());
    }

    #[test]
    fn test_explicit_path_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "[watch]\ninterval_ms = 50\n").unwrap();

        let (settings, found) = load(Some(&path)).unwrap();
        assert_eq!(settings.watch.interval_ms, 50);
        assert_eq!(found, Some(path));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "[watch]\ninterval_ms = 0\n").unwrap();
        assert!(load(Some(&path)).is_err());
    }
}
