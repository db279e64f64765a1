//! Transclude core library — configuration, channel defaults, shared newtypes.
//!
//! - [`config`] — [`EngineConfig`], loaded from `transclude.yaml`
//! - [`defaults`] — [`StaticDataProvider`] and the file-backed [`ChannelDefaults`]
//! - [`types`] — newtypes shared by the engine, server and CLI
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod defaults;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use defaults::{ChannelDefaults, NoStaticData, StaticDataProvider};
pub use error::ConfigError;
pub use types::{Channel, DataMap, DirectiveKey, PagePath};
