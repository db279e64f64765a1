//! `transclude inspect` — where each directive in a file resolves.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use transclude_core::Channel;
use transclude_engine::{DirectiveReport, DirectiveStatus};

use super::{default_config_path, load_engine, read_body};

/// Arguments for `transclude inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// HTML file holding directives.
    pub file: PathBuf,

    /// Engine configuration file.
    #[arg(long, default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Channel substituted for `%s`; defaults to the configured channel.
    #[arg(long)]
    pub channel: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl InspectArgs {
    pub fn run(self) -> Result<()> {
        let engine = load_engine(&self.config)?;
        let body = read_body(&self.file)?;
        let channel = self
            .channel
            .as_deref()
            .map(Channel::from)
            .unwrap_or_else(|| engine.config().default_channel());

        let reports = engine.inspect(&body, &channel);
        if self.json {
            print_json(&self.file, &channel, reports)?;
            return Ok(());
        }
        print_table(&self.file, &channel, reports);
        Ok(())
    }
}

#[derive(Serialize)]
struct InspectJson<'a> {
    file: &'a Path,
    channel: &'a str,
    directives: Vec<DirectiveReport>,
}

#[derive(Tabled)]
struct DirectiveRow {
    #[tabled(rename = "directive")]
    directive: String,
    #[tabled(rename = "key")]
    key: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "data")]
    data: String,
    #[tabled(rename = "flags")]
    flags: String,
    #[tabled(rename = "status")]
    status: String,
}

fn print_json(file: &Path, channel: &Channel, reports: Vec<DirectiveReport>) -> Result<()> {
    let payload = InspectJson {
        file,
        channel: channel.as_str(),
        directives: reports,
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn print_table(file: &Path, channel: &Channel, reports: Vec<DirectiveReport>) {
    let unresolved = reports
        .iter()
        .filter(|r| !matches!(r.status, DirectiveStatus::Resolved | DirectiveStatus::Unmatched))
        .count();
    println!(
        "{} | channel {} | {} directives | {} unresolved",
        file.display(),
        channel.as_str().bold(),
        reports.len(),
        unresolved,
    );
    if reports.is_empty() {
        println!("No directives found.");
        return;
    }

    let rows: Vec<DirectiveRow> = reports
        .into_iter()
        .map(|r| DirectiveRow {
            status: status_label(r.status),
            directive: r.directive,
            key: r.key.unwrap_or_else(|| "-".to_string()),
            template: display_path(r.template.as_deref()),
            data: display_path(r.data.as_deref()),
            flags: if r.flags.is_empty() {
                "-".to_string()
            } else {
                r.flags.join(",")
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "-".to_string(), |p| p.display().to_string())
}

fn status_label(status: DirectiveStatus) -> String {
    let label = status.to_string();
    match status {
        DirectiveStatus::Resolved => label.green().to_string(),
        DirectiveStatus::Unmatched => label.yellow().to_string(),
        _ => label.red().to_string(),
    }
}
