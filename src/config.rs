use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::engine::DEFAULT_SCROLLBACK;
use crate::error::{Error, Result};
use crate::render::Argb;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lines kept above the screen.
    pub scrollback: usize,
    pub colors: ColorConfig,
    pub cell: CellConfig,
    pub notification: NotificationConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrollback: DEFAULT_SCROLLBACK,
            colors: ColorConfig::default(),
            cell: CellConfig::default(),
            notification: NotificationConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub foreground: Argb,
    pub background: Argb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: Argb::rgb(0xcc, 0xcc, 0xcc),
            background: Argb::BLACK,
        }
    }
}

/// Pixel size of a grid cell.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CellConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            width: 1,
            height: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    pub duration_ms: u64,
}

impl NotificationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { duration_ms: 2000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: PathBuf::from("termview.log"),
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads `path` if given and present, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.cell.width == 0 || self.cell.height == 0 {
            return Err(Error::InvalidCellSize {
                width: self.cell.width,
                height: self.cell.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_source_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.scrollback, 140);
        assert_eq!(config.colors.foreground, Argb::rgb(0xcc, 0xcc, 0xcc));
        assert_eq!((config.cell.width, config.cell.height), (1, 2));
        assert_eq!(config.notification.duration(), Duration::from_secs(2));
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = Config::from_toml_str(
            r##"
            scrollback = 500

            [colors]
            background = "#101010"

            [cell]
            width = 8
            height = 16
            "##,
        )
        .unwrap();
        assert_eq!(config.scrollback, 500);
        assert_eq!(config.colors.background, Argb::rgb(0x10, 0x10, 0x10));
        assert_eq!(config.colors.foreground, Argb::rgb(0xcc, 0xcc, 0xcc));
        assert_eq!((config.cell.width, config.cell.height), (8, 16));
    }

    #[test]
    fn rejects_bad_color() {
        let err = Config::from_toml_str("[colors]\nforeground = \"red\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("red"));
    }

    #[test]
    fn rejects_zero_cell() {
        let err = Config::from_toml_str("[cell]\nwidth = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidCellSize { width: 0, height: 2 }));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_toml_str("colour = 1").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[notification]\nduration_ms = 500").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.notification.duration(), Duration::from_millis(500));
    }

    #[test]
    fn missing_file_is_io_error_unless_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(Config::load(&path), Err(Error::Io { .. })));
        assert_eq!(Config::load_or_default(Some(&path)).unwrap().scrollback, 140);
        assert_eq!(Config::load_or_default(None).unwrap().scrollback, 140);
    }
}
