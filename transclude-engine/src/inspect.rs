//! Directive inspection — how each directive in a body would resolve.
//!
//! Used by `transclude inspect`. Nothing is rendered and resolution failures
//! are reported per directive instead of aborting.

use std::path::PathBuf;

use serde::Serialize;

use transclude_core::Channel;

use crate::error::EngineError;
use crate::pipeline::Engine;
use crate::resolver::TemplateLookup;
use crate::scanner::{scan, Directive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveStatus {
    Resolved,
    /// `%s` path with no match on any root; renders empty.
    Unmatched,
    MissingTemplate,
    MissingData,
    Malformed,
}

impl std::fmt::Display for DirectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DirectiveStatus::Resolved => "resolved",
            DirectiveStatus::Unmatched => "unmatched",
            DirectiveStatus::MissingTemplate => "missing template",
            DirectiveStatus::MissingData => "missing data",
            DirectiveStatus::Malformed => "malformed",
        };
        f.write_str(label)
    }
}

/// One directive occurrence and where it resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveReport {
    pub directive: String,
    pub key: Option<String>,
    pub template: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub flags: Vec<String>,
    pub status: DirectiveStatus,
}

impl Engine {
    /// Report every top-level directive of `body`, duplicates included.
    pub fn inspect(&self, body: &str, channel: &Channel) -> Vec<DirectiveReport> {
        scan(body)
            .into_iter()
            .map(|found| self.inspect_one(found.text, channel))
            .collect()
    }

    fn inspect_one(&self, text: &str, channel: &Channel) -> DirectiveReport {
        let mut report = DirectiveReport {
            directive: text.to_string(),
            key: None,
            template: None,
            data: None,
            flags: Vec::new(),
            status: DirectiveStatus::Resolved,
        };

        let directive = match Directive::parse(text, self.flags()) {
            Ok(directive) => directive,
            Err(_) => {
                report.status = DirectiveStatus::Malformed;
                return report;
            }
        };
        report.key = Some(directive.key.to_string());
        report.flags = directive.flags.clone();

        if let Some(data_ref) = directive.data_ref.as_deref() {
            match self.resolver().resolve_data_path(data_ref, channel) {
                Ok(path) => {
                    if !path.is_file() {
                        report.status = DirectiveStatus::MissingData;
                    }
                    report.data = Some(path);
                }
                Err(_) => report.status = DirectiveStatus::MissingData,
            }
        }

        match self
            .resolver()
            .resolve_template_path(&directive.template_ref, channel)
        {
            Ok(TemplateLookup::Found(resolved)) => report.template = Some(resolved.full),
            Ok(TemplateLookup::UnmatchedPlaceholder { relative }) => {
                report.template = Some(PathBuf::from(relative));
                report.status = DirectiveStatus::Unmatched;
            }
            Err(EngineError::PartialNotFound { path }) => {
                report.template = Some(PathBuf::from(path));
                report.status = DirectiveStatus::MissingTemplate;
            }
            Err(_) => report.status = DirectiveStatus::MissingTemplate,
        }
        report
    }
}
