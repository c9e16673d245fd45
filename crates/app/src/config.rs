use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// User preferences, kept between runs.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub last_page: Option<PathBuf>,
    #[serde(default)]
    pub reduced_motion: bool,
    /// Overrides the page's lead-in fallback when set.
    #[serde(default)]
    pub fallback_ms: Option<u64>,
}

impl Config {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("onair").join("config.toml"))
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                warn!("ignoring unreadable config {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        self.save_to(&path);
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(contents) = toml::to_string_pretty(self) {
            if let Err(e) = fs::write(path, contents) {
                warn!("could not save config {}: {e}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("tempdir");
        assert_eq!(Config::load_from(&dir.path().join("none.toml")), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            last_page: Some(PathBuf::from("/pages/pigeon.json")),
            reduced_motion: true,
            fallback_ms: Some(900),
        };

        config.save_to(&path);

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "reduced_motion = true\n").expect("write");

        let config = Config::load_from(&path);
        assert!(config.reduced_motion);
        assert_eq!(config.last_page, None);
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "reduced_motion = [").expect("write");
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
