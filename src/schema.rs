//! Configuration document schema.
//!
//! This module defines the structure of the persisted configuration file using
//! serde. Field names are mapped to the exact JSON keys written to disk so the
//! file stays readable by other tooling that knows the format.
//!
//! Absent or `null` fields deserialize as "unset" rather than erroring, and
//! unknown extra fields are ignored on load, so documents written by newer
//! versions of the application remain loadable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration document.
///
/// Normalization (clearing a negative cache limit, resolving a relative cache
/// directory) happens in the [`ConfigStore`](crate::ConfigStore) setters at
/// write time; a loaded document is taken as-is and never re-normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the instance to launch on application start.
    /// `None` or empty means no auto-start is configured.
    #[serde(rename = "AutoStartInstance")]
    pub auto_start_instance: Option<String>,

    /// Explicit download cache directory override.
    /// `None` means the platform default next to the config file is used.
    #[serde(rename = "DownloadCacheDir")]
    pub download_cache_dir: Option<PathBuf>,

    /// Download cache size limit in bytes. `None` means unlimited.
    #[serde(rename = "CacheSizeLimit")]
    pub cache_size_limit: Option<u64>,

    /// Repository refresh interval in minutes. `None` means disabled.
    #[serde(rename = "RefreshRate")]
    pub refresh_rate: Option<u32>,

    /// Application-defined build metadata, stored and returned verbatim.
    #[serde(rename = "KSPBuilds")]
    pub builds: serde_json::Value,

    /// Registered game instances, in insertion order, unique by name.
    #[serde(rename = "KspInstances")]
    pub instances: Vec<InstanceEntry>,

    /// Auth tokens keyed by host.
    #[serde(rename = "AuthTokens")]
    pub auth_tokens: BTreeMap<String, String>,
}

/// A named, independently located installation of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceEntry {
    /// User-chosen instance name.
    #[serde(rename = "Name")]
    pub name: String,

    /// Root directory of the installation.
    #[serde(rename = "Path")]
    pub path: PathBuf,
}

impl InstanceEntry {
    /// Create an entry from a name and a resolved installation directory.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_document_is_empty() {
        let config = Config::default();
        assert_eq!(config.auto_start_instance, None);
        assert_eq!(config.download_cache_dir, None);
        assert_eq!(config.cache_size_limit, None);
        assert_eq!(config.refresh_rate, None);
        assert_eq!(config.builds, serde_json::Value::Null);
        assert!(config.instances.is_empty());
        assert!(config.auth_tokens.is_empty());
    }

    #[test]
    fn test_empty_object_deserializes_to_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_null_fields_are_unset() {
        let json = r#"{
            "AutoStartInstance": null,
            "DownloadCacheDir": null,
            "CacheSizeLimit": null,
            "RefreshRate": null,
            "KSPBuilds": null
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "AutoStartInstance": "Career",
            "SomeFutureField": { "nested": [1, 2, 3] }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.auto_start_instance.as_deref(), Some("Career"));
    }

    #[test]
    fn test_full_document_roundtrip() {
        let json = r#"{
            "AutoStartInstance": "Career",
            "DownloadCacheDir": "/var/cache/ksphub",
            "CacheSizeLimit": 5000000000,
            "RefreshRate": 60,
            "KSPBuilds": { "builds": { "1.12.5": "03190" } },
            "KspInstances": [
                { "Name": "Career", "Path": "/games/ksp" },
                { "Name": "Sandbox", "Path": "/games/ksp-sandbox" }
            ],
            "AuthTokens": { "example.com": "abc123" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.cache_size_limit, Some(5_000_000_000));
        assert_eq!(config.refresh_rate, Some(60));
        assert_eq!(config.instances.len(), 2);
        assert_eq!(config.instances[0], InstanceEntry::new("Career", "/games/ksp"));
        assert_eq!(
            config.auth_tokens.get("example.com").map(String::as_str),
            Some("abc123")
        );

        let text = serde_json::to_string_pretty(&config).unwrap();
        let reparsed: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_instance_order_is_preserved() {
        let config = Config {
            instances: vec![
                InstanceEntry::new("zulu", "/z"),
                InstanceEntry::new("alpha", "/a"),
            ],
            ..Default::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let reparsed: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed.instances[0].name, "zulu");
        assert_eq!(reparsed.instances[1].name, "alpha");
    }

    #[test]
    fn test_builds_value_is_opaque() {
        let builds = serde_json::json!({ "builds": { "1.4.1": "02089" }, "extra": true });
        let config = Config {
            builds: builds.clone(),
            ..Default::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let reparsed: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed.builds, builds);
    }
}
