//! Directive scanner and grammar.
//!
//! A transclusion directive is
//!
//! ```text
//! {{ ( { )?  ws*  >  ws*  body  } } ( } )?
//! body := ( [A-Za-z0-9] | _ - % @ / . \ | | ws )*
//! ```
//!
//! The body is tokenised on `|` into `templateRef | dataRef | flags...`.
//! Recognised flags are popped from the end and never become part of the
//! registry key.

use transclude_core::config::NO_CACHE_FLAG;
use transclude_core::DirectiveKey;

use crate::error::EngineError;

/// One directive occurrence inside a body of markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveMatch<'a> {
    /// Exact directive text, braces included.
    pub text: &'a str,
    /// Byte offset of the first opening brace.
    pub start: usize,
    /// Byte offset one past the last closing brace.
    pub end: usize,
}

/// Every directive in `markup`, in document order, duplicates preserved.
pub fn scan(markup: &str) -> Vec<DirectiveMatch<'_>> {
    let bytes = markup.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            if let Some(end) = match_directive(bytes, i) {
                found.push(DirectiveMatch {
                    text: &markup[i..end],
                    start: i,
                    end,
                });
                i = end;
                continue;
            }
        }
        i += 1;
    }
    found
}

fn match_directive(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 2;
    if bytes.get(i) == Some(&b'{') {
        i += 1;
    }
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    if bytes.get(i) != Some(&b'>') {
        return None;
    }
    i += 1;
    while bytes.get(i).is_some_and(|&b| is_body_byte(b)) {
        i += 1;
    }
    if bytes.get(i) != Some(&b'}') || bytes.get(i + 1) != Some(&b'}') {
        return None;
    }
    i += 2;
    if bytes.get(i) == Some(&b'}') {
        i += 1;
    }
    Some(i)
}

fn is_body_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || b.is_ascii_whitespace()
        || matches!(b, b'_' | b'-' | b'%' | b'@' | b'/' | b'.' | b'\\' | b'|')
}

/// Remove all whitespace and the enclosing brace markers.
///
/// `{{ > views/header | header }}` → `views/header|header`
pub fn strip_syntax(directive: &str) -> String {
    let compact: String = directive.chars().filter(|c| !c.is_whitespace()).collect();
    let opened = compact.trim_start_matches('{');
    let opened = if opened.len() < compact.len() {
        opened.strip_prefix('>').unwrap_or(opened)
    } else {
        opened
    };
    opened.trim_end_matches('}').to_string()
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Trailing directive tokens recognised as flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    flags: Vec<String>,
}

impl FlagSet {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FlagSet {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// `true` when `token` is a recognised flag.
    pub fn has_exclude_flag(&self, token: &str) -> bool {
        self.flags.iter().any(|f| f == token)
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        FlagSet::new([NO_CACHE_FLAG])
    }
}

// ---------------------------------------------------------------------------
// Directive
// ---------------------------------------------------------------------------

/// A parsed transclusion directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Registry key: remaining tokens joined by `|`.
    pub key: DirectiveKey,
    pub template_ref: String,
    pub data_ref: Option<String>,
    /// Recognised flags, in directive order.
    pub flags: Vec<String>,
}

impl Directive {
    /// Parse directive text (braces included, or already stripped).
    pub fn parse(text: &str, flags: &FlagSet) -> Result<Self, EngineError> {
        let stripped = strip_syntax(text);
        let mut tokens: Vec<&str> = stripped.split('|').collect();

        let mut popped = Vec::new();
        while tokens.len() > 1 {
            match tokens.last() {
                Some(last) if flags.has_exclude_flag(last) => {
                    popped.push(last.to_string());
                    tokens.pop();
                }
                _ => break,
            }
        }
        popped.reverse();

        let template_ref = tokens[0];
        if template_ref.is_empty() {
            return Err(EngineError::MalformedDirective {
                directive: text.to_string(),
            });
        }
        if tokens.len() > 2 {
            tracing::warn!(
                "ignoring unrecognised directive tokens {:?} in '{}'",
                &tokens[2..],
                text
            );
        }

        let data_ref = tokens
            .get(1)
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string());

        Ok(Directive {
            key: DirectiveKey::from(tokens.join("|")),
            template_ref: template_ref.to_string(),
            data_ref,
            flags: popped,
        })
    }

    /// A flagged directive is always reloaded instead of reusing its entry.
    pub fn bypasses_cache(&self) -> bool {
        !self.flags.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
