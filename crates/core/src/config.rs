//! Store configuration
//!
//! A store is described by where it lives and how its bytes are framed.
//! Configuration can be built in code or read from TOML:
//!
//! ```toml
//! path = "settings.ini.gz"
//! gzip = true
//! compression_level = 9
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use crate::disk::{DEFAULT_COMPRESSION_LEVEL, Framing};
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file a store reads and writes
pub const DEFAULT_PATH: &str = "vars.ini";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// File the store reads and writes
    pub path: PathBuf,
    /// Frame the file with gzip
    pub gzip: bool,
    /// Gzip level, 1 (fastest) to 9 (smallest); ignored for plain files
    pub compression_level: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: PathBuf::from(DEFAULT_PATH),
            gzip: false,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a TOML config file
    ///
    /// A relative `path` inside the file is resolved against the config
    /// file's directory.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if config.path.is_relative()
            && let Some(dir) = config_path.parent()
        {
            config.path = dir.join(&config.path);
        }
        Ok(config)
    }

    pub fn framing(&self) -> Framing {
        if self.gzip {
            Framing::Gzip(self.compression_level.clamp(1, 9))
        } else {
            Framing::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.framing(), Framing::Plain);
    }

    #[test]
    fn test_parse_full() {
        let config = StoreConfig::from_toml_str(
            r#"
            path = "state.ini.gz"
            gzip = true
            compression_level = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.path, PathBuf::from("state.ini.gz"));
        assert_eq!(config.framing(), Framing::Gzip(9));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = StoreConfig::from_toml_str("compress = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_resolves_relative_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("dynvar.toml");
        fs::write(&config_path, "path = \"data.ini\"\n").unwrap();

        let config = StoreConfig::load(&config_path).unwrap();
        assert_eq!(config.path, dir.path().join("data.ini"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = StoreConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::new("x.ini")
            .with_gzip(true)
            .with_compression_level(0);
        assert_eq!(config.framing(), Framing::Gzip(1));
    }
}
