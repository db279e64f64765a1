//! `transclude serve` — HTTP server with transclusion applied to every page.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{default_config_path, load_config};

/// Arguments for `transclude serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Engine configuration file.
    #[arg(long, default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Address to bind.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

impl ServeArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(&self.config)?;
        let addr = SocketAddr::new(self.bind, self.port);
        println!("Serving on http://{addr} (ctrl-c to stop)");
        transclude_server::start_blocking(config, addr).context("server exited with an error")
    }
}
