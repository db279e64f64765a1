//! `transclude render` — run a file through the engine once.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use transclude_core::{Channel, PagePath};
use transclude_engine::request::channel_from;
use transclude_engine::RequestScope;

use super::{default_config_path, load_engine, read_body};

/// Arguments for `transclude render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// HTML file holding directives.
    pub file: PathBuf,

    /// Engine configuration file.
    #[arg(long, default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Channel to render for; defaults to the configured channel.
    #[arg(long)]
    pub channel: Option<String>,

    /// Page path used for page-scoped static data.
    #[arg(long, default_value = "")]
    pub page: String,

    /// Extra request parameter, e.g. `--param oldMapper=basket`.
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let engine = load_engine(&self.config)?;
        let body = read_body(&self.file)?;

        let params: BTreeMap<String, String> = self.params.into_iter().collect();
        let config = engine.config();
        let channel = match self.channel.as_deref() {
            Some(channel) => Channel::from(channel),
            None => channel_from(&params, &config.channel_param, &config.default_channel),
        };
        let scope = RequestScope {
            channel,
            page_path: PagePath::from_uri_path(&self.page),
            params,
        };

        let out = engine
            .process(&body, &scope)
            .with_context(|| format!("failed to render {}", self.file.display()))?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(out.as_bytes())
            .context("failed to write output")?;
        Ok(())
    }
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
