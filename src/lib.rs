//! KSPHub Configuration Library
//!
//! This library is the persisted configuration subsystem of the KSPHub
//! instance manager: a single JSON document holding the instance registry,
//! download cache settings, repository refresh rate, build metadata, and
//! per-host auth tokens, guarded by one lock and written through to disk on
//! every mutation.
//!
//! # Modules
//!
//! - `schema`: the configuration document and its serde mapping
//! - `file_store`: JSON persistence and config path resolution
//! - `store`: the mutex-guarded, write-through [`ConfigStore`]
//! - `legacy`: read-only abstraction over a legacy settings store
//! - `migration`: one-time seeding of a fresh document from a legacy store
//! - `error`: unified error handling
//!
//! # Example
//!
//! ```rust,ignore
//! use ksphub_config::{ConfigStore, NullLegacySource};
//!
//! // Load from the resolved platform path, or create a fresh file.
//! let store = ConfigStore::open_default(&NullLegacySource)?;
//!
//! store.set_refresh_rate(60)?;
//! store.set_auth_token("spacedock.info", "token")?;
//!
//! for instance in store.instances() {
//!     println!("{} -> {}", instance.name, instance.path.display());
//! }
//! ```

pub mod error;
pub mod file_store;
pub mod legacy;
pub mod migration;
pub mod schema;
pub mod store;

// Re-export commonly used types for convenience
pub use error::{ConfigError, ConfigResult};
pub use legacy::{LegacyConfigSource, LegacyError, MemoryLegacySource, NullLegacySource};
pub use migration::migrate;
pub use schema::{Config, InstanceEntry};
pub use store::ConfigStore;
