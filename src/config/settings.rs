//! Configuration file location
//!
//! Resolves where the backing file lives and the defaults derived from that
//! location.

use crate::error::{EiamError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "ephemeral-iam";
const CONFIG_FILE: &str = "config.yaml";

/// Directory holding the configuration file, certificates and proxy logs
pub fn get_config_dir() -> Result<PathBuf> {
    // Use XDG Base Directory specification on Linux and macOS
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        use std::env;
        let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config_home)
        } else {
            let home_dir = env::var("HOME")
                .map_err(|_| EiamError::config("HOME environment variable not set"))?;
            PathBuf::from(home_dir).join(".config")
        };
        Ok(config_dir.join(APP_DIR))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EiamError::config("Unable to determine config directory"))?;
        Ok(config_dir.join(APP_DIR))
    }
}

/// Default path of the backing file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Use `override_path` when given, otherwise the default location
pub fn resolve_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/eiam/custom.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/eiam/custom.yaml"));
    }

    #[test]
    fn test_default_path_shape() {
        if let Ok(path) = get_config_path() {
            assert!(path.ends_with("ephemeral-iam/config.yaml"));
        }
    }
}
