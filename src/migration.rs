//! One-time migration from a legacy configuration store.
//!
//! Runs only when [`ConfigStore::open_with_source`](crate::ConfigStore::open_with_source)
//! finds no configuration file and the legacy source's capability probe
//! reports present. The routine always fills a freshly default-constructed
//! document and never merges into an existing one, so it is idempotent by
//! construction: once the seeded file is on disk, the `NotFound` trigger can
//! never fire again for that path.
//!
//! The legacy store is left in place afterwards; deleting it is a separate,
//! user-driven action.

use crate::legacy::{LegacyConfigSource, LegacyError};
use crate::schema::Config;
use tracing::{debug, info, warn};

/// Build a fresh configuration document from a legacy source.
///
/// Instance enumeration failure aborts with an error and the caller falls
/// back to an empty default document. Every other field is best-effort: an
/// unreadable scalar is left at its default, and only hosts whose token
/// lookup succeeds are copied.
pub fn migrate(source: &dyn LegacyConfigSource) -> Result<Config, LegacyError> {
    let instances = source.instances()?;

    let mut config = Config {
        instances,
        auto_start_instance: source.auto_start_instance(),
        download_cache_dir: source.download_cache_dir(),
        cache_size_limit: source.cache_size_limit(),
        // Normalize here: the legacy store used non-positive to mean disabled.
        refresh_rate: source.refresh_rate().filter(|&minutes| minutes > 0),
        ..Default::default()
    };

    if let Some(builds) = source.builds() {
        config.builds = builds;
    }

    for host in source.auth_token_hosts() {
        match source.auth_token(&host) {
            Some(token) => {
                config.auth_tokens.insert(host, token);
            }
            None => {
                warn!(host = %host, "skipping auth token with no readable value");
            }
        }
    }

    debug!(
        instances = config.instances.len(),
        tokens = config.auth_tokens.len(),
        "collected legacy settings"
    );
    info!("migrated configuration from legacy store");
    Ok(config)
}
