//! Request scope — channel, page path and query parameters of one request.

use std::collections::BTreeMap;

use regex::Regex;

use transclude_core::{Channel, EngineConfig, PagePath};

pub const OLD_MAPPER_PARAM: &str = "oldMapper";
pub const NEW_MAPPER_PARAM: &str = "newMapper";

/// Per-request inputs consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    pub channel: Channel,
    pub page_path: PagePath,
    pub params: BTreeMap<String, String>,
}

impl RequestScope {
    pub fn new(channel: impl Into<Channel>, page_path: impl Into<PagePath>) -> Self {
        RequestScope {
            channel: channel.into(),
            page_path: page_path.into(),
            params: BTreeMap::new(),
        }
    }

    /// Build the scope for a URI path and raw query string.
    pub fn from_uri(path: &str, query: Option<&str>, config: &EngineConfig) -> Self {
        let params = query.map(parse_query).unwrap_or_default();
        let channel = channel_from(&params, &config.channel_param, &config.default_channel);
        RequestScope {
            channel,
            page_path: PagePath::from_uri_path(path),
            params,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// `(oldMapper, newMapper)` when both are present.
    pub fn mappers(&self) -> Option<(&str, &str)> {
        let old = self.params.get(OLD_MAPPER_PARAM)?;
        let new = self.params.get(NEW_MAPPER_PARAM)?;
        Some((old.as_str(), new.as_str()))
    }
}

/// Split `a=1&b=2`; pairs without exactly one `=` are dropped.
pub fn parse_query(query: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for pair in query.split('&') {
        let mut parts = pair.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        params.insert(decode(key), decode(value));
    }
    params
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Channel named by `param`, or `default` when absent or empty.
pub fn channel_from(params: &BTreeMap<String, String>, param: &str, default: &str) -> Channel {
    match params.get(param).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(value) => Channel::from(value),
        None => Channel::from(default),
    }
}

/// Asset URLs (any `.`) and URLs matching `exclude` bypass the engine.
pub fn is_excluded(url: &str, exclude: Option<&Regex>) -> bool {
    url.contains('.') || exclude.is_some_and(|re| re.is_match(url))
}
