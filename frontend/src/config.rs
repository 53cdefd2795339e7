//! Optional TOML settings file. Command-line flags override every field.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// MAME-style rompath, a ZIP file, or a directory of loose ROMs.
    pub rom_path: Option<PathBuf>,
    /// Where `<machine>.nvram` files live. Defaults to next to the ROMs.
    pub nvram_dir: Option<PathBuf>,
    pub skip_checksums: bool,
    pub log_level: Option<String>,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicitly named file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Load the file at the default location, if there is one.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/astrocade/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("astrocade").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = Config::parse("", Path::new("test.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn all_fields() {
        let text = r#"
            rom_path = "/roms"
            nvram_dir = "/var/astrocade"
            skip_checksums = true
            log_level = "debug"
        "#;
        let config = Config::parse(text, Path::new("test.toml")).unwrap();
        assert_eq!(config.rom_path, Some(PathBuf::from("/roms")));
        assert_eq!(config.nvram_dir, Some(PathBuf::from("/var/astrocade")));
        assert!(config.skip_checksums);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Config::parse("scale = 3", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("astrocade_config_test_missing.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(Config::load(&path), Err(ConfigError::Io { .. })));
    }
}
