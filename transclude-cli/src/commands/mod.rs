pub mod inspect;
pub mod render;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use transclude_core::config::DEFAULT_CONFIG_FILE;
use transclude_core::EngineConfig;
use transclude_engine::Engine;

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    EngineConfig::load_at(path)
        .with_context(|| format!("failed to load config at {}", path.display()))
}

pub fn load_engine(path: &Path) -> Result<Engine> {
    let config = load_config(path)?;
    Engine::new(config).context("failed to build engine")
}

pub fn read_body(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
