//! JSON file persistence and configuration path resolution.
//!
//! The configuration lives in a single UTF-8 JSON document. Its location is
//! resolved in the following order:
//!
//! 1. `KSPHUB_CONFIG` environment variable (explicit path)
//! 2. `<platform-local-app-data>/KSPHub/config.json`
//!    (e.g. `~/.local/share/KSPHub` on Linux, `%LOCALAPPDATA%\KSPHub` on
//!    Windows, `~/Library/Application Support/KSPHub` on macOS)
//!
//! The default download cache is the sibling `downloads` directory, used
//! whenever no explicit cache directory is configured.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::Config;
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file name under the application data directory.
const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable for an explicit config file path.
const CONFIG_PATH_ENV: &str = "KSPHUB_CONFIG";

/// Application directory name under the platform data directory.
const APP_DIR_NAME: &str = "KSPHub";

/// Resolve the configuration file path.
///
/// The `KSPHUB_CONFIG` environment variable overrides the location entirely
/// (the file does not have to exist yet; a fresh one is created there on first
/// run). Otherwise the platform-local application data directory is used.
pub fn resolve_config_path() -> ConfigResult<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    Ok(app_data_dir()?.join(CONFIG_FILE_NAME))
}

/// Default download cache directory, next to the config file.
pub fn default_download_cache_dir() -> ConfigResult<PathBuf> {
    Ok(app_data_dir()?.join("downloads"))
}

/// Platform-local application data directory for KSPHub.
fn app_data_dir() -> ConfigResult<PathBuf> {
    ProjectDirs::from("", "", APP_DIR_NAME)
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}

/// Load the configuration document from a file.
///
/// A missing file or directory yields [`ConfigError::NotFound`]; a file that
/// exists but is not a valid document yields [`ConfigError::ParseError`]. The
/// file is never modified by a load, failed or otherwise.
pub fn load(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let config = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Save the configuration document to a file, overwriting any previous
/// contents.
///
/// The parent directory is created if absent. The document is written to a
/// temporary sibling and renamed into place, so a crash mid-write leaves the
/// previous file intact.
pub fn save(path: &Path, config: &Config) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let content = serde_json::to_string_pretty(config)?;

    let tmp = tmp_sibling(path);
    std::fs::write(&tmp, content)
        .and_then(|()| std::fs::rename(&tmp, path))
        .map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!(path = %path.display(), "saved configuration");
    Ok(())
}

/// Temporary file path next to the target, on the same filesystem so the
/// rename stays atomic.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::InstanceEntry;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_env_override_wins() {
        env::set_var(CONFIG_PATH_ENV, "/tmp/ksphub-test/custom.json");

        let path = resolve_config_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/ksphub-test/custom.json"));

        env::remove_var(CONFIG_PATH_ENV);
    }

    #[test]
    #[serial]
    fn test_default_path_ends_with_app_dir_and_file() {
        env::remove_var(CONFIG_PATH_ENV);

        let path = resolve_config_path().unwrap();
        assert!(path.ends_with(Path::new(APP_DIR_NAME).join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_default_cache_dir_is_downloads_sibling() {
        let cache = default_download_cache_dir().unwrap();
        assert!(cache.ends_with(Path::new(APP_DIR_NAME).join("downloads")));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.auto_start_instance = Some("Career".to_string());
        config.cache_size_limit = Some(1024);
        config.instances.push(InstanceEntry::new("Career", "/games/ksp"));
        config
            .auth_tokens
            .insert("example.com".to_string(), "abc123".to_string());

        save(&path, &config).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("config.json");

        save(&path, &Config::default()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("config.json");

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)), "got {err:?}");
    }

    #[test]
    fn test_invalid_json_is_parse_error_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }), "got {err:?}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "CacheSizeLimit": "lots" }"#).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }), "got {err:?}");
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut first = Config::default();
        first.refresh_rate = Some(15);
        save(&path, &first).unwrap();

        let second = Config::default();
        save(&path, &second).unwrap();

        assert_eq!(load(&path).unwrap(), second);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save(&path, &Config::default()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("config.json")]);
    }
}
