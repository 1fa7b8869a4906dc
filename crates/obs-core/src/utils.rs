//! Shared utility functions for obs crates

use anyhow::anyhow;
use std::path::PathBuf;

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "OBS_CLI_CONFIG";

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// tests and wrapper scripts can redirect it.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Get the default configuration file path (~/.config/obs-cli/config.yaml)
///
/// `OBS_CLI_CONFIG` takes precedence when set.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    Ok(get_home_dir()?
        .join(".config")
        .join("obs-cli")
        .join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_get_home_dir_from_env() {
        if std::env::var("HOME").is_ok() {
            let home = get_home_dir().unwrap();
            assert!(!home.as_os_str().is_empty());
        }
    }

    #[test]
    #[serial]
    fn test_default_config_path_env_override() {
        std::env::set_var(CONFIG_PATH_ENV, "/tmp/obs-test/config.yaml");
        let path = default_config_path().unwrap();
        std::env::remove_var(CONFIG_PATH_ENV);

        assert_eq!(path, PathBuf::from("/tmp/obs-test/config.yaml"));
    }

    #[test]
    #[serial]
    fn test_default_config_path_under_home() {
        std::env::remove_var(CONFIG_PATH_ENV);
        let path = default_config_path().unwrap();
        assert!(path.ends_with(".config/obs-cli/config.yaml"));
    }
}
