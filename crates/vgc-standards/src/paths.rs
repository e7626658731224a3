//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "VGC_STANDARDS_DIR";

/// File name of the lookup tables inside the standards directory.
pub const LOOKUPS_FILE_NAME: &str = "lookups.toml";

/// Standards directory named by `VGC_STANDARDS_DIR`, if set.
pub fn standards_dir_override() -> Option<PathBuf> {
    std::env::var_os(STANDARDS_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `VGC_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    standards_dir_override()
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards"))
}

/// Lookup tables path under the standards root.
pub fn lookups_path() -> PathBuf {
    standards_root().join(LOOKUPS_FILE_NAME)
}
