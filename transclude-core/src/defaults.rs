//! Channel defaults — the static data provider consulted once per request.
//!
//! # Document layout
//!
//! ```yaml
//! default_channel: desktop
//! channels:
//!   desktop:
//!     config: { channel: desktop, brand: Acme }
//!     checkoutHeader:
//!       checkout/basket: { title: Basket }
//!   mobile:
//!     config: { channel: mobile, brand: Acme }
//! ```
//!
//! The file may be YAML or JSON (JSON parses as YAML).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{io_err, ConfigError};
use crate::types::Channel;

/// Source of request-wide static data.
pub trait StaticDataProvider: Send + Sync {
    /// Value configured for `data_type` on `channel`, if any.
    fn get(&self, channel: &Channel, data_type: &str) -> Option<Value>;
}

/// Provider with no data; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStaticData;

impl StaticDataProvider for NoStaticData {
    fn get(&self, _channel: &Channel, _data_type: &str) -> Option<Value> {
        None
    }
}

/// Per-channel static data loaded from a defaults document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelDefaults {
    /// Channel consulted when the requested channel lacks a data type.
    #[serde(default)]
    pub default_channel: Option<String>,
    #[serde(default)]
    pub channels: BTreeMap<String, BTreeMap<String, Value>>,
}

impl ChannelDefaults {
    /// Load a defaults document from disk.
    ///
    /// Channel keys are lowercased to match [`Channel`]; keys differing only
    /// in case merge, later data types winning.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let loaded: ChannelDefaults =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut defaults = ChannelDefaults {
            default_channel: loaded.default_channel,
            channels: BTreeMap::new(),
        };
        for (channel, types) in loaded.channels {
            defaults
                .channels
                .entry(channel.to_lowercase())
                .or_default()
                .extend(types);
        }
        Ok(defaults)
    }

    /// Set one value; used by tests and embedders building defaults in code.
    pub fn insert(&mut self, channel: &str, data_type: &str, value: Value) {
        self.channels
            .entry(channel.to_lowercase())
            .or_default()
            .insert(data_type.to_string(), value);
    }
}

impl StaticDataProvider for ChannelDefaults {
    fn get(&self, channel: &Channel, data_type: &str) -> Option<Value> {
        let direct = self
            .channels
            .get(channel.as_str())
            .and_then(|types| types.get(data_type));
        if let Some(value) = direct {
            return Some(value.clone());
        }
        let fallback = self.default_channel.as_deref()?.to_lowercase();
        if fallback == channel.as_str() {
            return None;
        }
        self.channels
            .get(&fallback)
            .and_then(|types| types.get(data_type))
            .cloned()
    }
}
