//! Config path resolution
//!
//! Every path hangs off the app's writable files directory, which the host
//! hands us at startup.

use std::path::{Path, PathBuf};

/// Returns the configs directory.
///
/// Path: `<files_dir>/configs/`
pub fn configs_dir(files_dir: &Path) -> PathBuf {
    files_dir.join("configs")
}

/// Returns the core config path.
///
/// Path: `<files_dir>/configs/core.toml`
pub fn core_config_path(files_dir: &Path) -> PathBuf {
    configs_dir(files_dir).join("core.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_config_path_format() {
        let base = PathBuf::from("/data/data/com.example.tunnel/files");
        let path = core_config_path(&base);
        assert!(path.ends_with("configs/core.toml"));
        assert!(path.starts_with(&base));
    }
}
