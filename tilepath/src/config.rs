//! `tilepath.toml` configuration.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tilepath_core::{CostTable, CostTableError};

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "tilepath.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct TerrainConfig {
    /// Top-left symbol that marks a frame to strip. Empty disables it.
    #[serde(default = "default_border_marker")]
    pub border_marker: String,
    #[serde(default = "default_costs")]
    pub costs: BTreeMap<String, u32>,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_path_marker")]
    pub path: char,
    #[serde(default = "default_start_marker")]
    pub start: char,
    #[serde(default = "default_end_marker")]
    pub end: char,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_border_marker() -> String { "x".to_string() }
fn default_costs() -> BTreeMap<String, u32> {
    CostTable::default()
        .iter()
        .map(|(ch, cost)| (ch.to_string(), cost))
        .collect()
}
fn default_path_marker() -> char { 'o' }
fn default_start_marker() -> char { 'S' }
fn default_end_marker() -> char { 'E' }
fn default_level() -> String { "info".to_string() }

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            border_marker: default_border_marker(),
            costs: default_costs(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            path: default_path_marker(),
            start: default_start_marker(),
            end: default_end_marker(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    /// A terrain key or border marker that is not exactly one character.
    InvalidSymbol(String),
    Costs(CostTableError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "could not read {}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "invalid config {}: {source}", path.display()),
            Self::InvalidSymbol(s) => write!(f, "terrain symbol {s:?} must be a single character"),
            Self::Costs(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Costs(e) => Some(e),
            Self::InvalidSymbol(_) => None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`]
    /// is read if present and defaults are used otherwise. The second value
    /// names the file that was read.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
                Ok((config, Some(path)))
            }
            Err(e) if !required && e.kind() == io::ErrorKind::NotFound => {
                Ok((Self::default(), None))
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Validate the terrain section into a [`CostTable`].
    pub fn cost_table(&self) -> Result<CostTable, ConfigError> {
        let border = match self.terrain.border_marker.as_str() {
            "" => None,
            s => Some(single_char(s)?),
        };
        let mut table = CostTable::empty();
        table.set_border(border);
        for (key, &cost) in &self.terrain.costs {
            table
                .set(single_char(key)?, cost)
                .map_err(ConfigError::Costs)?;
        }
        Ok(table)
    }
}

fn single_char(s: &str) -> Result<char, ConfigError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ConfigError::InvalidSymbol(s.to_string())),
    }
}
