use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use modforge_generate::GenerateOptions;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "modforge.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Project settings read from `modforge.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub paths: PathSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathSettings {
    /// Fragment directory or single schema file.
    pub schema: PathBuf,
    pub modules: PathBuf,
    pub router_index: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        let defaults = GenerateOptions::default();
        Self {
            schema: defaults.schema_path,
            modules: defaults.modules_dir,
            router_index: defaults.router_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Extension of generated files, without the dot.
    pub extension: String,
    /// Array literal in the router index that lists module routes.
    pub route_table: String,
    /// Import path from the router index to the modules root.
    pub import_prefix: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        let defaults = GenerateOptions::default();
        Self {
            extension: defaults.extension,
            route_table: defaults.route_table,
            import_prefix: defaults.import_prefix,
        }
    }
}

impl Settings {
    /// Read `explicit`, or `modforge.toml` when present, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        match explicit {
            Some(path) if !path.is_file() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::read(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_options(self) -> GenerateOptions {
        GenerateOptions {
            schema_path: self.paths.schema,
            modules_dir: self.paths.modules,
            router_index: self.paths.router_index,
            extension: self.output.extension,
            route_table: self.output.route_table,
            import_prefix: self.output.import_prefix,
            ..GenerateOptions::default()
        }
    }
}
