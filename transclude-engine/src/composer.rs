//! Recursive composer — expands partials nested inside registered partials.
//!
//! Nested templates are read straight from the resolver, never through the
//! registry: a nested partial usually has no top-level directive and so no
//! entry of its own. Only nested *content* is inlined; a nested directive's
//! data ref is ignored and the text renders with the owning entry's data.

use transclude_core::Channel;

use crate::error::EngineError;
use crate::loader::load_template;
use crate::registry::PartialRegistry;
use crate::resolver::{PathResolver, ResolvedPath};
use crate::scanner::{scan, Directive, FlagSet};

/// Expand every entry's content until it holds no directive.
///
/// Fails with [`EngineError::CycleDetected`] when a template reappears on its
/// own expansion chain or the chain grows past `max_depth`.
pub fn compose(
    registry: &mut PartialRegistry,
    resolver: &PathResolver,
    flags: &FlagSet,
    channel: &Channel,
    max_depth: usize,
) -> Result<(), EngineError> {
    let composer = Composer {
        resolver,
        flags,
        channel,
        max_depth,
    };
    for (key, entry) in registry.iter_mut() {
        let mut chain: Vec<ResolvedPath> = entry.source.iter().cloned().collect();
        let composed = composer.expand(&entry.content, &mut chain)?;
        if composed != entry.content {
            tracing::debug!("composed '{}' ({} bytes)", key, composed.len());
        }
        entry.content = composed;
    }
    Ok(())
}

struct Composer<'a> {
    resolver: &'a PathResolver,
    flags: &'a FlagSet,
    channel: &'a Channel,
    max_depth: usize,
}

impl Composer<'_> {
    fn expand(&self, content: &str, chain: &mut Vec<ResolvedPath>) -> Result<String, EngineError> {
        let found = scan(content);
        if found.is_empty() {
            return Ok(content.to_string());
        }

        let mut out = String::with_capacity(content.len());
        let mut last = 0;
        for m in found {
            out.push_str(&content[last..m.start]);
            last = m.end;

            let directive = Directive::parse(m.text, self.flags)?;
            let nested = load_template(self.resolver, &directive.template_ref, self.channel)?;
            let Some(source) = nested.source else {
                continue;
            };

            if chain.iter().any(|p| p.full == source.full) || chain.len() >= self.max_depth {
                let mut names: Vec<String> = chain.iter().map(|p| p.relative.clone()).collect();
                names.push(source.relative);
                return Err(EngineError::CycleDetected { chain: names });
            }

            chain.push(source);
            let expanded = self.expand(&nested.content, chain)?;
            chain.pop();
            out.push_str(&expanded);
        }
        out.push_str(&content[last..]);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_partials;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    fn run(root: &Path, body: &str, max_depth: usize) -> Result<PartialRegistry, EngineError> {
        let resolver = PathResolver::new(vec![root.to_path_buf()], root.join("data"), ".html", ".json");
        let flags = FlagSet::default();
        let channel = Channel::from("desktop");
        let mut registry = PartialRegistry::new();
        load_partials(body, &resolver, &flags, &channel, &mut registry)?;
        compose(&mut registry, &resolver, &flags, &channel, max_depth)?;
        Ok(registry)
    }

    #[test]
    fn nested_partials_reach_fixpoint() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "outer.html", "<div>{{> middle}}</div>");
        write(dir.path(), "middle.html", "<p>{{> inner}}|{{> inner}}</p>");
        write(dir.path(), "inner.html", "<b>{{value}}</b>");

        let registry = run(dir.path(), "{{> outer}}", 32).expect("compose");
        let entry = registry.get(&"outer".into()).expect("entry");
        assert!(scan(&entry.content).is_empty());
        assert_eq!(entry.content, "<div><p><b>{{value}}</b>|<b>{{value}}</b></p></div>");
    }

    #[test]
    fn mutual_reference_is_a_cycle() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "outer.html", "a {{> inner}}");
        write(dir.path(), "inner.html", "b {{> outer}}");

        let err = run(dir.path(), "{{> outer}}", 32).unwrap_err();
        match err {
            EngineError::CycleDetected { chain } => {
                assert_eq!(chain, vec!["outer.html", "inner.html", "outer.html"]);
            }
            other => panic!("expected CycleDetected, got {other}"),
        }
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "loop.html", "{{> loop}}");
        let err = run(dir.path(), "{{> loop}}", 32).unwrap_err();
        assert!(matches!(err, EngineError::CycleDetected { .. }));
    }

    #[test]
    fn depth_bound_stops_deep_chains() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "l0.html", "{{> l1}}");
        write(dir.path(), "l1.html", "{{> l2}}");
        write(dir.path(), "l2.html", "{{> l3}}");
        write(dir.path(), "l3.html", "end");

        assert!(run(dir.path(), "{{> l0}}", 4).is_ok());
        let err = run(dir.path(), "{{> l0}}", 3).unwrap_err();
        assert!(matches!(err, EngineError::CycleDetected { .. }));
    }

    #[test]
    fn unresolved_nested_partial_fails() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "outer.html", "{{> missing/piece}}");
        let err = run(dir.path(), "{{> outer}}", 32).unwrap_err();
        assert!(matches!(err, EngineError::PartialNotFound { ref path } if path == "missing/piece.html"));
    }

    #[test]
    fn nested_placeholder_without_match_expands_empty() {
        let dir = TempDir::new().expect("tempdir");
        write(dir.path(), "outer.html", "[{{> promo_%s}}]");
        let registry = run(dir.path(), "{{> outer}}", 32).expect("compose");
        assert_eq!(registry.get(&"outer".into()).unwrap().content, "[]");
    }
}
