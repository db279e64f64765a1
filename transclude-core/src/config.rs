//! Engine configuration.
//!
//! # File layout
//!
//! ```yaml
//! root_dir:            # a single path or an ordered override chain
//!   - site/desktop
//!   - site/default
//! data_dir: data
//! template_ext: .html
//! datafile_ext: .json
//! exclude: "^/api/"
//! default_channel: desktop
//! static_data_types:
//!   CONFIG: config
//!   CHECKOUT_HEADER: checkoutHeader
//! defaults_file: defaults.yaml
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::Channel;

pub const DEFAULT_CONFIG_FILE: &str = "transclude.yaml";
pub const DEFAULT_TEMPLATE_EXT: &str = ".html";
pub const DEFAULT_DATAFILE_EXT: &str = ".json";
pub const DEFAULT_CHANNEL: &str = "default";
pub const DEFAULT_CHANNEL_PARAM: &str = "channel";
pub const DEFAULT_PAGE_SCOPED_TYPE: &str = "CHECKOUT_HEADER";
pub const NO_CACHE_FLAG: &str = "NO_CACHE";
pub const DEFAULT_MAX_DEPTH: usize = 32;
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Configuration supplied at engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ordered override chain; the first root holding a template wins.
    #[serde(rename = "root_dir", deserialize_with = "one_or_many")]
    pub root_dirs: Vec<PathBuf>,
    /// Directory holding companion JSON data files.
    pub data_dir: PathBuf,
    pub template_ext: String,
    pub datafile_ext: String,
    /// Regex matched against request URLs; matches bypass the engine.
    pub exclude: Option<String>,
    /// Logical name → data-type key queried from the static data provider.
    pub static_data_types: BTreeMap<String, String>,
    /// Logical name of the data type further indexed by page path.
    pub page_scoped_type: Option<String>,
    pub default_channel: String,
    /// Query parameter carrying the channel.
    pub channel_param: String,
    /// Trailing directive tokens recognised as flags.
    pub exclude_flags: Vec<String>,
    /// Nesting bound for partial composition.
    pub max_depth: usize,
    /// Channel defaults document (YAML or JSON) backing static data.
    pub defaults_file: Option<PathBuf>,
    /// Directory the server resolves page requests against.
    pub pages_dir: Option<PathBuf>,
    /// HTML-escape `{{name}}` output.
    pub autoescape: bool,
    /// Largest response body the middleware will buffer.
    pub max_body_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_dirs: Vec::new(),
            data_dir: PathBuf::new(),
            template_ext: DEFAULT_TEMPLATE_EXT.to_string(),
            datafile_ext: DEFAULT_DATAFILE_EXT.to_string(),
            exclude: None,
            static_data_types: BTreeMap::new(),
            page_scoped_type: Some(DEFAULT_PAGE_SCOPED_TYPE.to_string()),
            default_channel: DEFAULT_CHANNEL.to_string(),
            channel_param: DEFAULT_CHANNEL_PARAM.to_string(),
            exclude_flags: vec![NO_CACHE_FLAG.to_string()],
            max_depth: DEFAULT_MAX_DEPTH,
            defaults_file: None,
            pages_dir: None,
            autoescape: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    })
}

impl EngineConfig {
    /// Minimal configuration for an override chain and a data directory.
    pub fn new(root_dirs: Vec<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dirs,
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Load and validate a configuration file.
    ///
    /// Returns `ConfigError::NotFound` if absent,
    /// `ConfigError::Parse` (with path + line context) if malformed YAML.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let mut config: EngineConfig =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_relative(base);
        config.validate()?;
        Ok(config)
    }

    /// Anchor every relative path in the configuration at `base`.
    pub fn resolve_relative(&mut self, base: &Path) {
        for root in &mut self.root_dirs {
            *root = anchor(base, root);
        }
        self.data_dir = anchor(base, &self.data_dir);
        if let Some(file) = self.defaults_file.as_mut() {
            *file = anchor(base, file);
        }
        if let Some(dir) = self.pages_dir.as_mut() {
            *dir = anchor(base, dir);
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_dirs.is_empty() {
            return Err(ConfigError::NoRoots);
        }
        self.exclude_regex()?;
        Ok(())
    }

    /// Compiled `exclude` pattern, if one is configured.
    pub fn exclude_regex(&self) -> Result<Option<Regex>, ConfigError> {
        match self.exclude.as_deref() {
            None | Some("") => Ok(None),
            Some(pattern) => Regex::new(pattern)
                .map(Some)
                .map_err(|source| ConfigError::InvalidExclude {
                    pattern: pattern.to_string(),
                    source,
                }),
        }
    }

    /// Directory page requests resolve against; falls back to the first root.
    pub fn pages_root(&self) -> Option<&Path> {
        self.pages_dir
            .as_deref()
            .or_else(|| self.root_dirs.first().map(PathBuf::as_path))
    }

    pub fn default_channel(&self) -> Channel {
        Channel::from(self.default_channel.as_str())
    }

    /// Data-type key of the page-scoped logical type, if it is configured.
    pub fn page_scoped_key(&self) -> Option<&str> {
        let logical = self.page_scoped_type.as_deref()?;
        self.static_data_types.get(logical).map(String::as_str)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
