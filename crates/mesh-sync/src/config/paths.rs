//! Default locations for sync configuration

use std::path::PathBuf;

/// File name of the sync config inside the collection
pub const SYNC_CONFIG_FILENAME: &str = "sync-config.yaml";

/// Get the default collection path
///
/// Returns: `~/Music/mesh-collection`
pub fn default_collection_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Music")
        .join("mesh-collection")
}

/// Get the default config file path for a given file name
///
/// Returns: `~/Music/mesh-collection/{filename}`
pub fn default_config_path(filename: &str) -> PathBuf {
    default_collection_path().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_path() {
        let path = default_config_path(SYNC_CONFIG_FILENAME);
        assert!(path.ends_with("mesh-collection/sync-config.yaml"));
    }
}
