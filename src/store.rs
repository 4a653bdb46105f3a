//! The configuration store: a mutex-guarded document with write-through
//! persistence.
//!
//! One `ConfigStore` owns the authoritative in-memory copy of the
//! configuration for the process. The application's composition root creates
//! it once and shares it (typically behind an `Arc`); tests create throwaway
//! stores against temp paths instead of resetting global state.
//!
//! Every operation takes the single internal lock. Getters return a snapshot;
//! setters mutate the in-memory document and persist it to disk before
//! releasing the lock, so mutations from concurrent callers are totally
//! ordered and a reader can never observe an in-memory change that is not
//! already on disk. All calls are blocking and synchronous; a stalled disk
//! write stalls every other accessor in this process.
//!
//! There is no cross-process coordination: two processes holding stores
//! against the same file each believe their copy is authoritative, and the
//! last writer wins on disk.

use crate::error::{ConfigError, ConfigResult};
use crate::file_store;
use crate::legacy::{LegacyConfigSource, NullLegacySource};
use crate::migration;
use crate::schema::{Config, InstanceEntry};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Process-wide configuration store backed by a JSON file.
///
/// # Write failures
///
/// When a setter's persist step fails, the error is returned but the
/// in-memory document keeps the new value. Memory and disk then disagree
/// until the next successful persist. Callers that treat a write failure as
/// fatal (the expected posture for a settings file) are unaffected; callers
/// that continue must account for the divergence.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    state: Mutex<Config>,
}

impl ConfigStore {
    /// Open the store at `path` with no legacy source.
    ///
    /// Loads the file if it exists; otherwise persists an empty default
    /// document. A malformed file is an error, never silently replaced.
    ///
    /// # Example
    /// ```rust,ignore
    /// let store = ConfigStore::open("/home/user/.local/share/KSPHub/config.json")?;
    /// store.set_auth_token("example.com", "abc123")?;
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        Self::open_with_source(path, &NullLegacySource)
    }

    /// Open the store at the default resolved path (environment override,
    /// else the platform data directory), migrating from `legacy` on first
    /// run if it is present.
    pub fn open_default(legacy: &dyn LegacyConfigSource) -> ConfigResult<Self> {
        Self::open_with_source(file_store::resolve_config_path()?, legacy)
    }

    /// Open the store at `path`, migrating from `legacy` on first run.
    ///
    /// If the file loads, `legacy` is never consulted — migration only seeds
    /// a configuration that does not exist yet. If the file is absent, a
    /// fresh document is built (from `legacy` when its capability probe
    /// reports present, empty otherwise) and persisted before this returns,
    /// which is what makes a second open skip migration entirely.
    pub fn open_with_source(
        path: impl Into<PathBuf>,
        legacy: &dyn LegacyConfigSource,
    ) -> ConfigResult<Self> {
        let path = path.into();

        let config = match file_store::load(&path) {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => {
                let config = if legacy.is_present() {
                    match migration::migrate(legacy) {
                        Ok(config) => config,
                        Err(e) => {
                            warn!(error = %e, "legacy migration aborted, starting empty");
                            Config::default()
                        }
                    }
                } else {
                    info!(path = %path.display(), "no configuration file, creating default");
                    Config::default()
                };
                file_store::save(&path, &config)?;
                config
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            state: Mutex::new(config),
        })
    }

    /// Path of the backing configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the instance to launch on application start, empty when none
    /// is configured.
    pub fn auto_start_instance(&self) -> String {
        self.state.lock().auto_start_instance.clone().unwrap_or_default()
    }

    /// Set the auto-start instance. `None` is stored as the empty string.
    pub fn set_auto_start_instance(&self, name: Option<&str>) -> ConfigResult<()> {
        let mut config = self.state.lock();
        config.auto_start_instance = Some(name.unwrap_or_default().to_string());
        file_store::save(&self.path, &config)
    }

    /// Effective download cache directory: the configured override, else the
    /// platform default next to the application data directory.
    pub fn download_cache_dir(&self) -> ConfigResult<PathBuf> {
        match self.state.lock().download_cache_dir.clone() {
            Some(dir) => Ok(dir),
            None => file_store::default_download_cache_dir(),
        }
    }

    /// The configured cache directory override, if any.
    pub fn download_cache_dir_override(&self) -> Option<PathBuf> {
        self.state.lock().download_cache_dir.clone()
    }

    /// Set or clear the download cache directory override.
    ///
    /// `None` or an empty string clears the override. A relative path is
    /// resolved against the current working directory before it is stored,
    /// so the persisted value is always absolute.
    pub fn set_download_cache_dir(&self, dir: Option<&str>) -> ConfigResult<()> {
        let stored = match dir {
            None | Some("") => None,
            Some(dir) => Some(absolutize(Path::new(dir))?),
        };

        let mut config = self.state.lock();
        config.download_cache_dir = stored;
        file_store::save(&self.path, &config)
    }

    /// Download cache size limit in bytes, `None` meaning unlimited.
    pub fn cache_size_limit(&self) -> Option<u64> {
        self.state.lock().cache_size_limit
    }

    /// Set the cache size limit. A negative value clears the limit.
    pub fn set_cache_size_limit(&self, bytes: i64) -> ConfigResult<()> {
        let mut config = self.state.lock();
        config.cache_size_limit = u64::try_from(bytes).ok();
        file_store::save(&self.path, &config)
    }

    /// Repository refresh interval in minutes, 0 meaning disabled.
    pub fn refresh_rate(&self) -> u32 {
        self.state.lock().refresh_rate.unwrap_or(0)
    }

    /// Set the refresh interval. A non-positive value disables refresh.
    pub fn set_refresh_rate(&self, minutes: i32) -> ConfigResult<()> {
        let mut config = self.state.lock();
        config.refresh_rate = if minutes > 0 { Some(minutes as u32) } else { None };
        file_store::save(&self.path, &config)
    }

    /// The stored build metadata, verbatim.
    pub fn builds(&self) -> serde_json::Value {
        self.state.lock().builds.clone()
    }

    /// Replace the stored build metadata. The value is opaque to this store
    /// and is persisted without validation.
    pub fn set_builds(&self, builds: serde_json::Value) -> ConfigResult<()> {
        let mut config = self.state.lock();
        config.builds = builds;
        file_store::save(&self.path, &config)
    }

    /// Snapshot of the registered instances, in stored order.
    pub fn instances(&self) -> Vec<InstanceEntry> {
        self.state.lock().instances.clone()
    }

    /// Replace the instance list wholesale.
    ///
    /// The caller supplies entries re-derived from its live instance handles
    /// (name plus resolved installation directory), already unique by name.
    pub fn replace_instances<I>(&self, instances: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = InstanceEntry>,
    {
        let mut config = self.state.lock();
        config.instances = instances.into_iter().collect();
        file_store::save(&self.path, &config)
    }

    /// Hosts that currently have an auth token stored.
    pub fn auth_token_hosts(&self) -> Vec<String> {
        self.state.lock().auth_tokens.keys().cloned().collect()
    }

    /// Look up the auth token for a host.
    pub fn auth_token(&self, host: &str) -> Option<String> {
        self.state.lock().auth_tokens.get(host).cloned()
    }

    /// Insert or overwrite the auth token for a host.
    pub fn set_auth_token(&self, host: &str, token: &str) -> ConfigResult<()> {
        let mut config = self.state.lock();
        config.auth_tokens.insert(host.to_string(), token.to_string());
        file_store::save(&self.path, &config)
    }

    /// Snapshot of the whole document, for display or diffing.
    pub fn snapshot(&self) -> Config {
        self.state.lock().clone()
    }
}

/// Resolve a possibly-relative path against the current working directory.
fn absolutize(path: &Path) -> ConfigResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(|e| ConfigError::PathResolution {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(cwd.join(path))
}
