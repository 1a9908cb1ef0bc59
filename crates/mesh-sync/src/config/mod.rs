//! Configuration for the synchronization engine
//!
//! - Generic YAML config loading/saving
//! - Default config location inside the mesh collection
//! - `SyncConfig` with tempo, matcher, mixer and Auto-DJ sections
//!
//! # Usage
//!
//! ```ignore
//! use mesh_sync::config::{load_config, default_config_path, SyncConfig};
//!
//! let config: SyncConfig = load_config(&default_config_path("sync-config.yaml"));
//! ```

mod io;
mod paths;
mod settings;

pub use io::{load_config, save_config};
pub use paths::{default_collection_path, default_config_path, SYNC_CONFIG_FILENAME};
pub use settings::{AutoDjConfig, MatcherConfig, MixerConfig, SyncConfig, TempoConfig};
