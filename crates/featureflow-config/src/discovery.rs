//! Configuration file discovery

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "FEATUREFLOW_CONFIG_PATH";

const CANDIDATES: [&str; 4] = [
    "feature.local.kdl",
    ".feature.local.kdl",
    "feature.kdl",
    ".feature.kdl",
];

const CONFIG_DIR: &str = ".featureflow";

/// Locate the configuration file
///
/// Search order:
/// 1. `explicit` (the `--config` flag)
/// 2. `FEATUREFLOW_CONFIG_PATH`
/// 3. current directory: feature.local.kdl, .feature.local.kdl, feature.kdl, .feature.kdl
/// 4. `./.featureflow/` with the same names
/// 5. `~/.config/featureflow/feature.kdl`
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
        };
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points to {}, which does not exist",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    let current_dir = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
    })?;
    if let Some(path) = find_in_dir(&current_dir) {
        return Ok(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("featureflow").join("feature.kdl");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Look in `dir`, then in `dir/.featureflow/`
pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    let nested = dir.join(CONFIG_DIR);
    [dir.to_path_buf(), nested]
        .into_iter()
        .filter(|d| d.is_dir())
        .flat_map(|d| CANDIDATES.iter().map(move |name| d.join(name)))
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_find_in_dir_plain() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("feature.kdl"), "// test").unwrap();

        let found = find_in_dir(temp_dir.path()).unwrap();
        assert!(found.ends_with("feature.kdl"));
    }

    #[test]
    fn test_local_file_has_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("feature.kdl"), "// shared").unwrap();
        fs::write(temp_dir.path().join("feature.local.kdl"), "// local").unwrap();

        let found = find_in_dir(temp_dir.path()).unwrap();
        assert!(found.ends_with("feature.local.kdl"));
    }

    #[test]
    fn test_hidden_local_beats_visible_shared() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(".feature.local.kdl"), "// hidden").unwrap();
        fs::write(temp_dir.path().join("feature.kdl"), "// visible").unwrap();

        let found = find_in_dir(temp_dir.path()).unwrap();
        assert!(found.ends_with(".feature.local.kdl"));
    }

    #[test]
    fn test_nested_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join(".featureflow");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("feature.kdl"), "// nested").unwrap();

        let found = find_in_dir(temp_dir.path()).unwrap();
        assert!(found.ends_with(".featureflow/feature.kdl"));
    }

    #[test]
    fn test_find_in_empty_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(find_in_dir(temp_dir.path()).is_none());
    }

    #[test]
    fn test_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.kdl");
        fs::write(&path, "// custom").unwrap();

        assert_eq!(find_config_file(Some(&path)).unwrap(), path);
        assert!(matches!(
            find_config_file(Some(&temp_dir.path().join("missing.kdl"))),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_env_var_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("from-env.kdl");
        fs::write(&path, "// env").unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(path.as_os_str()), || {
            assert_eq!(find_config_file(None).unwrap(), path);
        });
    }
}
