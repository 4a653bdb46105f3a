//! Legacy configuration source abstraction.
//!
//! Before the JSON file existed, settings lived in a platform-specific store
//! (the Windows registry in practice). That store is only ever consulted once,
//! to seed a fresh configuration file, and is consumed through the read-only
//! [`LegacyConfigSource`] trait so the store itself never links against
//! platform registry code.
//!
//! Two implementations ship with this crate: [`NullLegacySource`] for the
//! common case where no legacy store exists, and [`MemoryLegacySource`] for
//! tests and for embedders that want to seed a first-run configuration
//! programmatically. The production registry-backed implementation lives in
//! the host application.

use crate::schema::InstanceEntry;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// The legacy source could not be enumerated at all.
///
/// This aborts migration; individual unreadable fields are skipped instead
/// (see [`migrate`](crate::migration::migrate)).
#[derive(Debug, Clone, Error)]
#[error("Failed to enumerate legacy configuration: {0}")]
pub struct LegacyError(pub String);

/// Read-only view of a legacy configuration store.
///
/// All scalar accessors return `None` both for "not set" and "unreadable";
/// migration treats the two identically and leaves the field at its default.
pub trait LegacyConfigSource: Send {
    /// Whether a legacy store exists at all. When this returns `false`,
    /// migration is skipped entirely and a fresh configuration starts empty.
    fn is_present(&self) -> bool;

    /// Enumerate the registered instances.
    ///
    /// Unlike the scalar accessors, a failure here aborts the whole
    /// migration, since an instance list read half-way is worse than none.
    fn instances(&self) -> Result<Vec<InstanceEntry>, LegacyError>;

    /// The stored build metadata, verbatim.
    fn builds(&self) -> Option<serde_json::Value>;

    /// Name of the auto-start instance.
    fn auto_start_instance(&self) -> Option<String>;

    /// Explicit download cache directory override.
    fn download_cache_dir(&self) -> Option<PathBuf>;

    /// Download cache size limit in bytes.
    fn cache_size_limit(&self) -> Option<u64>;

    /// Repository refresh interval in minutes.
    fn refresh_rate(&self) -> Option<u32>;

    /// Hosts that may have an auth token stored.
    fn auth_token_hosts(&self) -> Vec<String>;

    /// Look up the token for a host. `None` means missing or unreadable;
    /// such hosts are skipped during migration.
    fn auth_token(&self, host: &str) -> Option<String>;
}

/// Legacy source used when no legacy store exists.
///
/// Reports absent from its capability probe, so opening a store with it never
/// triggers migration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLegacySource;

impl LegacyConfigSource for NullLegacySource {
    fn is_present(&self) -> bool {
        false
    }

    fn instances(&self) -> Result<Vec<InstanceEntry>, LegacyError> {
        Ok(Vec::new())
    }

    fn builds(&self) -> Option<serde_json::Value> {
        None
    }

    fn auto_start_instance(&self) -> Option<String> {
        None
    }

    fn download_cache_dir(&self) -> Option<PathBuf> {
        None
    }

    fn cache_size_limit(&self) -> Option<u64> {
        None
    }

    fn refresh_rate(&self) -> Option<u32> {
        None
    }

    fn auth_token_hosts(&self) -> Vec<String> {
        Vec::new()
    }

    fn auth_token(&self, _host: &str) -> Option<String> {
        None
    }
}

/// In-memory legacy source for tests and programmatic first-run seeding.
///
/// Fields are public; fill in whatever the scenario needs and leave the rest
/// at their defaults. `fail_enumeration` makes [`instances`] fail, simulating
/// a legacy store that is present but unenumerable.
///
/// # Example
/// ```
/// use ksphub_config::{InstanceEntry, LegacyConfigSource, MemoryLegacySource};
///
/// let mut source = MemoryLegacySource::default();
/// source.instances.push(InstanceEntry::new("Career", "/games/ksp"));
/// source.auth_tokens.insert("example.com".into(), "abc123".into());
///
/// assert!(source.is_present());
/// assert_eq!(source.auth_token("example.com").as_deref(), Some("abc123"));
/// ```
///
/// [`instances`]: LegacyConfigSource::instances
#[derive(Debug, Clone, Default)]
pub struct MemoryLegacySource {
    pub instances: Vec<InstanceEntry>,
    pub builds: Option<serde_json::Value>,
    pub auto_start_instance: Option<String>,
    pub download_cache_dir: Option<PathBuf>,
    pub cache_size_limit: Option<u64>,
    pub refresh_rate: Option<u32>,
    pub auth_tokens: BTreeMap<String, String>,
    /// Hosts reported by the host enumeration that have no readable token.
    /// Migration must skip these.
    pub unreadable_hosts: Vec<String>,
    /// When set, `instances()` fails and migration aborts.
    pub fail_enumeration: bool,
}

impl LegacyConfigSource for MemoryLegacySource {
    fn is_present(&self) -> bool {
        true
    }

    fn instances(&self) -> Result<Vec<InstanceEntry>, LegacyError> {
        if self.fail_enumeration {
            Err(LegacyError("simulated enumeration failure".to_string()))
        } else {
            Ok(self.instances.clone())
        }
    }

    fn builds(&self) -> Option<serde_json::Value> {
        self.builds.clone()
    }

    fn auto_start_instance(&self) -> Option<String> {
        self.auto_start_instance.clone()
    }

    fn download_cache_dir(&self) -> Option<PathBuf> {
        self.download_cache_dir.clone()
    }

    fn cache_size_limit(&self) -> Option<u64> {
        self.cache_size_limit
    }

    fn refresh_rate(&self) -> Option<u32> {
        self.refresh_rate
    }

    fn auth_token_hosts(&self) -> Vec<String> {
        self.auth_tokens
            .keys()
            .cloned()
            .chain(self.unreadable_hosts.iter().cloned())
            .collect()
    }

    fn auth_token(&self, host: &str) -> Option<String> {
        self.auth_tokens.get(host).cloned()
    }
}
