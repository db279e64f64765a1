//! Brace notation → tera source, bound to one data mapping.
//!
//! | notation            | meaning                                           |
//! |---------------------|---------------------------------------------------|
//! | `{{name}}`          | value of `name`, HTML-escaped under autoescape    |
//! | `{{{name}}}`        | value of `name`, never escaped                    |
//! | `{{& name}}`        | same as triple braces                             |
//! | `{{#name}}..{{/name}}` | once per list item, once for a truthy value    |
//! | `{{^name}}..{{/name}}` | once when `name` is falsy or an empty list     |
//! | `{{! note}}`        | dropped                                           |
//! | `{{> name}}`        | renders nothing; partials are expanded upstream   |
//!
//! Names are resolved here, not by tera: a lookup walks the context stack from
//! the innermost section outwards and takes the first context holding the full
//! dotted path. `.` is the innermost context. Missing names render empty, and
//! keys may hold any non-space characters (`header-title`, `not`, `true`).
//!
//! Each resolved value becomes a numbered slot and the emitted tera source is
//! nothing but `{{ slot.N }}` references, so escaping stays with tera and no
//! template text is ever parsed as tera syntax.
//!
//! Tags alone on their line (sections, comments, partials) take the line with
//! them, as the notation requires.

use serde_json::Value;

use transclude_core::DataMap;

use crate::error::RenderError;

/// Context variable holding the slot values.
pub const SLOT_VAR: &str = "slot";

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const TRIPLE_OPEN: &str = "{{{";
const TRIPLE_CLOSE: &str = "}}}";

/// Tera source plus the values its slots refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub source: String,
    pub slots: Vec<String>,
}

/// Translate `template` for rendering against `data`.
pub fn translate(template: &str, data: &DataMap) -> Result<Translation, RenderError> {
    let nodes = parse(template)?;
    let root = Value::Object(data.clone());
    let mut stack = vec![&root];
    let mut out = Translation::default();
    emit(&nodes, &mut stack, &mut out);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node<'a> {
    Text(&'a str),
    Var {
        name: &'a str,
        escape: bool,
    },
    Section {
        name: &'a str,
        inverted: bool,
        children: Vec<Node<'a>>,
    },
}

enum Tag<'a> {
    Var { name: &'a str, escape: bool },
    Open { name: &'a str, inverted: bool },
    Close { name: &'a str },
    Comment,
    Partial,
}

impl Tag<'_> {
    fn may_stand_alone(&self) -> bool {
        !matches!(self, Tag::Var { .. })
    }
}

struct Frame<'a> {
    name: &'a str,
    inverted: bool,
    nodes: Vec<Node<'a>>,
}

fn parse(source: &str) -> Result<Vec<Node<'_>>, RenderError> {
    let mut root: Vec<Node<'_>> = Vec::new();
    let mut open: Vec<Frame<'_>> = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find(OPEN) {
        let start = pos + found;
        let Some((inner, end, triple)) = tag_bounds(source, start) else {
            break;
        };
        let tag = classify(inner, triple, &source[start..end])?;
        let (text_end, next) = if tag.may_stand_alone() {
            standalone(source, start, end).unwrap_or((start, end))
        } else {
            (start, end)
        };

        let nodes = open.last_mut().map_or(&mut root, |f| &mut f.nodes);
        if text_end > pos {
            nodes.push(Node::Text(&source[pos..text_end]));
        }
        match tag {
            Tag::Var { name, escape } => nodes.push(Node::Var { name, escape }),
            Tag::Comment | Tag::Partial => {}
            Tag::Open { name, inverted } => open.push(Frame {
                name,
                inverted,
                nodes: Vec::new(),
            }),
            Tag::Close { name } => {
                let frame = open
                    .pop()
                    .ok_or_else(|| RenderError::UnopenedSection {
                        name: name.to_string(),
                    })?;
                if frame.name != name {
                    return Err(RenderError::UnclosedSection {
                        name: frame.name.to_string(),
                    });
                }
                let section = Node::Section {
                    name: frame.name,
                    inverted: frame.inverted,
                    children: frame.nodes,
                };
                open.last_mut().map_or(&mut root, |f| &mut f.nodes).push(section);
            }
        }
        pos = next;
    }

    if let Some(frame) = open.last() {
        return Err(RenderError::UnclosedSection {
            name: frame.name.to_string(),
        });
    }
    if pos < source.len() {
        root.push(Node::Text(&source[pos..]));
    }
    Ok(root)
}

/// `(inner, end, triple)` for the tag opening at `start`; `None` if unclosed.
fn tag_bounds(source: &str, start: usize) -> Option<(&str, usize, bool)> {
    let tail = &source[start..];
    if tail.starts_with(TRIPLE_OPEN) {
        let body = &tail[TRIPLE_OPEN.len()..];
        let end = body.find(TRIPLE_CLOSE)?;
        return Some((
            &body[..end],
            start + TRIPLE_OPEN.len() + end + TRIPLE_CLOSE.len(),
            true,
        ));
    }
    let body = &tail[OPEN.len()..];
    let end = body.find(CLOSE)?;
    Some((&body[..end], start + OPEN.len() + end + CLOSE.len(), false))
}

fn classify<'a>(inner: &'a str, triple: bool, raw: &str) -> Result<Tag<'a>, RenderError> {
    let inner = inner.trim();
    if triple {
        return Ok(Tag::Var {
            name: inner,
            escape: false,
        });
    }
    let mut chars = inner.chars();
    let sigil = chars.next();
    let rest = chars.as_str().trim();
    Ok(match sigil {
        Some('!') => Tag::Comment,
        Some('>') => Tag::Partial,
        Some('#') => Tag::Open {
            name: rest,
            inverted: false,
        },
        Some('^') => Tag::Open {
            name: rest,
            inverted: true,
        },
        Some('/') => Tag::Close { name: rest },
        Some('&') => Tag::Var {
            name: rest,
            escape: false,
        },
        Some('=') => {
            return Err(RenderError::UnsupportedTag {
                tag: raw.to_string(),
            })
        }
        _ => Tag::Var {
            name: inner,
            escape: true,
        },
    })
}

/// When the tag at `start..end` is alone on its line, the range to drop
/// instead: `(line start, one past the line break)`.
fn standalone(source: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let blank = |s: &str| s.chars().all(|c| c == ' ' || c == '\t');

    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    if !blank(&source[line_start..start]) {
        return None;
    }
    let after = &source[end..];
    let (trailing, next) = match after.find('\n') {
        Some(i) => (&after[..i], end + i + 1),
        None => (after, source.len()),
    };
    if !blank(trailing.strip_suffix('\r').unwrap_or(trailing)) {
        return None;
    }
    Some((line_start, next))
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

fn emit<'v>(nodes: &[Node<'_>], stack: &mut Vec<&'v Value>, out: &mut Translation) {
    for node in nodes {
        match node {
            Node::Text(text) => push_literal(out, text),
            Node::Var { name, escape } => {
                let text = lookup(stack, name).map(stringify).unwrap_or_default();
                push_slot(out, text, *escape);
            }
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let value = lookup(stack, name);
                if *inverted {
                    if !is_truthy(value) {
                        emit(children, stack, out);
                    }
                    continue;
                }
                match value {
                    Some(Value::Array(items)) => {
                        for item in items {
                            stack.push(item);
                            emit(children, stack, out);
                            stack.pop();
                        }
                    }
                    Some(value) if is_truthy(Some(value)) => {
                        stack.push(value);
                        emit(children, stack, out);
                        stack.pop();
                    }
                    _ => {}
                }
            }
        }
    }
}

fn push_literal(out: &mut Translation, text: &str) {
    if text.contains('{') {
        push_slot(out, text.to_string(), false);
    } else {
        out.source.push_str(text);
    }
}

fn push_slot(out: &mut Translation, text: String, escape: bool) {
    if text.is_empty() {
        return;
    }
    let index = out.slots.len();
    out.slots.push(text);
    out.source.push_str("{{ ");
    out.source.push_str(SLOT_VAR);
    out.source.push('.');
    out.source.push_str(&index.to_string());
    if !escape {
        out.source.push_str(" | safe");
    }
    out.source.push_str(" }}");
}

/// First context, innermost out, that holds the whole dotted path.
fn lookup<'v>(stack: &[&'v Value], name: &str) -> Option<&'v Value> {
    if name == "." {
        return stack.last().copied();
    }
    stack
        .iter()
        .rev()
        .find_map(|&context| walk(context, name.split('.')))
}

fn walk<'v, 'n>(mut value: &'v Value, path: impl Iterator<Item = &'n str>) -> Option<&'v Value> {
    for segment in path {
        value = match value {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(value)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(_)) => true,
    }
}

/// Text form of a value: lists join their items with `,`, objects print as
/// JSON, null is empty.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}
