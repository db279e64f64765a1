use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use serde_json::json;

use transclude_core::{Channel, ChannelDefaults, EngineConfig};
use transclude_engine::{Engine, EngineError, RequestScope};
use transclude_renderer::TeraRenderer;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Site fixture: index page, header/content/footer partials, one nested partial.
fn demo_site() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    dir.child("site/index.html")
        .write_str(
            "<h1>index page</h1>\n{{> views/header|header}}\n{{> views/content|content}}\n{{> views/footer}}",
        )
        .expect("index");
    dir.child("site/views/header.html")
        .write_str("<h2>{{headerData}}</h2>")
        .expect("header");
    dir.child("site/views/content.html")
        .write_str("<h3>{{contentData}}</h3>\n{{> views/nested}}")
        .expect("content");
    dir.child("site/views/nested.html")
        .write_str("<h4>{{nestedData}}</h4>")
        .expect("nested");
    dir.child("site/views/footer.html")
        .write_str("<h2>{{footerData}}</h2>")
        .expect("footer");
    dir.child("data/header.json")
        .write_str(r#"{"headerData": "HEADER SECTION DATA"}"#)
        .expect("header data");
    dir.child("data/content.json")
        .write_str(r#"{"contentData": "CONTENT SECTION DATA", "nestedData": "NESTED SECTION DATA"}"#)
        .expect("content data");
    dir
}

fn engine_for(dir: &TempDir, roots: &[&str]) -> Engine {
    let roots: Vec<PathBuf> = roots.iter().map(|r| dir.path().join(r)).collect();
    Engine::new(EngineConfig::new(roots, dir.path().join("data"))).expect("engine")
}

fn read(dir: &TempDir, rel: &str) -> String {
    std::fs::read_to_string(dir.path().join(rel)).expect("read fixture")
}

#[test]
fn renders_index_page_end_to_end() {
    init_logging();
    let dir = demo_site();
    let engine = engine_for(&dir, &["site"]);

    let out = engine
        .process(&read(&dir, "site/index.html"), &RequestScope::new("desktop", ""))
        .expect("process");
    assert_eq!(
        out,
        "<h1>index page</h1>\n<h2>HEADER SECTION DATA</h2>\n<h3>CONTENT SECTION DATA</h3>\n<h4>NESTED SECTION DATA</h4>\n<h2></h2>"
    );
}

#[test]
fn session_stages_expose_intermediate_registry() {
    let dir = demo_site();
    let engine = engine_for(&dir, &["site"]);
    let body = read(&dir, "site/index.html");
    let mut session = engine.session(&RequestScope::new("desktop", ""));

    assert_eq!(session.load(&engine, &body).expect("load"), 3);
    let content = session
        .registry
        .get(&"views/content|content".into())
        .expect("content entry");
    assert_eq!(content.content, "<h3>{{contentData}}</h3>\n{{> views/nested}}");
    assert_eq!(
        content.data.as_ref().map(|d| d["contentData"].clone()),
        Some(json!("CONTENT SECTION DATA"))
    );
    assert_eq!(session.registry.get(&"views/footer".into()).unwrap().data, None);

    session.compose(&engine).expect("compose");
    session.compile(&engine).expect("compile");
    assert_eq!(
        session.registry.get(&"views/footer".into()).unwrap().content,
        "<h2></h2>"
    );

    session.reset();
    assert!(session.registry.is_empty());
}

#[test]
fn body_without_directives_is_unchanged() {
    let dir = demo_site();
    let engine = engine_for(&dir, &["site"]);
    let body = "<p>{{not a directive}} plain</p>";
    assert_eq!(
        engine.process(body, &RequestScope::new("desktop", "")).unwrap(),
        body
    );
}

#[test]
fn duplicate_directives_render_identically() {
    let dir = demo_site();
    let engine = engine_for(&dir, &["site"]);
    let body = "{{> views/header|header}}|{{> views/header | header | NO_CACHE}}";
    let out = engine.process(body, &RequestScope::new("desktop", "")).unwrap();
    assert_eq!(out, "<h2>HEADER SECTION DATA</h2>|<h2>HEADER SECTION DATA</h2>");
}

#[test]
fn earlier_root_overrides_later_root() {
    let dir = demo_site();
    dir.child("brand/views/header.html")
        .write_str("<h2 class=\"brand\">{{headerData}}</h2>")
        .expect("brand header");
    let engine = engine_for(&dir, &["brand", "site"]);

    let out = engine
        .process(
            "{{> views/header|header}}{{> views/footer}}",
            &RequestScope::new("desktop", ""),
        )
        .unwrap();
    assert_eq!(out, "<h2 class=\"brand\">HEADER SECTION DATA</h2><h2></h2>");
}

#[test]
fn channel_placeholder_selects_variant_or_renders_empty() {
    let dir = demo_site();
    dir.child("site/promo_mobile.html")
        .write_str("<em>mobile promo</em>")
        .expect("promo");
    let engine = engine_for(&dir, &["site"]);
    let body = "[{{> promo_%s}}]";

    let mobile = engine.process(body, &RequestScope::new("mobile", "")).unwrap();
    assert_eq!(mobile, "[<em>mobile promo</em>]");
    let desktop = engine.process(body, &RequestScope::new("desktop", "")).unwrap();
    assert_eq!(desktop, "[]");
}

#[test]
fn missing_partial_aborts_with_relative_path() {
    let dir = demo_site();
    let engine = engine_for(&dir, &["site"]);
    let err = engine
        .process("ok {{> views/absent}}", &RequestScope::new("desktop", ""))
        .unwrap_err();
    assert_eq!(err.to_string(), "Partial file not found: views/absent.html");
}

#[test]
fn missing_data_file_aborts() {
    let dir = demo_site();
    let engine = engine_for(&dir, &["site"]);
    let err = engine
        .process("{{> views/header|nothere}}", &RequestScope::new("desktop", ""))
        .unwrap_err();
    assert!(matches!(err, EngineError::DataFileNotFound { .. }), "got: {err}");
}

#[test]
fn nested_cycle_is_reported() {
    let dir = demo_site();
    dir.child("site/views/a.html").write_str("A{{> views/b}}").unwrap();
    dir.child("site/views/b.html").write_str("B{{> views/a}}").unwrap();
    let engine = engine_for(&dir, &["site"]);

    let err = engine
        .process("{{> views/a}}", &RequestScope::new("desktop", ""))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "partial cycle detected: views/a.html -> views/b.html -> views/a.html"
    );
}

#[test]
fn static_data_overrides_local_data() {
    let dir = demo_site();
    dir.child("site/views/banner.html")
        .write_str("{{config.title}}/{{local}}")
        .unwrap();
    dir.child("data/banner.json")
        .write_str(r#"{"config": {"title": "from file"}, "local": "kept"}"#)
        .unwrap();

    let mut config = EngineConfig::new(vec![dir.path().join("site")], dir.path().join("data"));
    config
        .static_data_types
        .insert("CONFIG".to_string(), "config".to_string());
    let mut defaults = ChannelDefaults::default();
    defaults.insert("desktop", "config", json!({"title": "from defaults"}));
    let engine = Engine::with_parts(
        config,
        Arc::new(TeraRenderer::default()),
        Arc::new(defaults),
    )
    .expect("engine");

    let out = engine
        .process("{{> views/banner|banner}}", &RequestScope::new("desktop", ""))
        .unwrap();
    assert_eq!(out, "from defaults/kept");
}

#[test]
fn mapper_swap_runs_before_scanning() {
    let dir = demo_site();
    dir.child("site/views/bag.html").write_str("<i>bag</i>").unwrap();
    let engine = engine_for(&dir, &["site"]);
    let scope = RequestScope::new("desktop", "")
        .with_param("oldMapper", "basket")
        .with_param("newMapper", "bag");

    let out = engine.process("{{> views/basket}}", &scope).unwrap();
    assert_eq!(out, "<i>bag</i>");
}

#[test]
fn variables_are_escaped_unless_triple_braced() {
    let dir = demo_site();
    dir.child("site/views/raw.html")
        .write_str("{{markup}}|{{{markup}}}|{{& markup}}")
        .unwrap();
    dir.child("data/raw.json")
        .write_str(r#"{"markup": "<b>x</b>"}"#)
        .unwrap();
    let engine = engine_for(&dir, &["site"]);

    let out = engine
        .process("{{> views/raw|raw}}", &RequestScope::new("desktop", ""))
        .unwrap();
    assert!(out.starts_with("&lt;b&gt;x&lt;"), "got: {out}");
    assert!(out.ends_with("|<b>x</b>|<b>x</b>"), "got: {out}");
}

#[test]
fn list_sections_iterate_partial_data() {
    let dir = demo_site();
    dir.child("site/views/list.html")
        .write_str("<ul>{{#items}}<li>{{name}}</li>{{/items}}</ul>")
        .unwrap();
    dir.child("data/list.json")
        .write_str(r#"{"items": [{"name": "a"}, {"name": "b"}]}"#)
        .unwrap();
    let engine = engine_for(&dir, &["site"]);

    let out = engine
        .process("{{> views/list|list}}", &RequestScope::new("desktop", ""))
        .unwrap();
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn hyphenated_data_keys_render() {
    let dir = demo_site();
    dir.child("site/views/title.html")
        .write_str("<h2>{{header-title}}</h2>")
        .unwrap();
    dir.child("data/title.json")
        .write_str(r#"{"header-title": "T"}"#)
        .unwrap();
    let engine = engine_for(&dir, &["site"]);

    let out = engine
        .process("{{> views/title|title}}", &RequestScope::new("desktop", ""))
        .unwrap();
    assert_eq!(out, "<h2>T</h2>");
}

#[test]
fn concurrent_requests_keep_separate_registries() {
    let dir = demo_site();
    dir.child("site/promo_mobile.html").write_str("M").unwrap();
    dir.child("site/promo_tablet.html").write_str("T").unwrap();
    let engine = Arc::new(engine_for(&dir, &["site"]));

    let handles: Vec<_> = ["mobile", "tablet"]
        .into_iter()
        .cycle()
        .take(8)
        .map(|channel| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let out = engine
                    .process("{{> promo_%s}}", &RequestScope::new(channel, ""))
                    .expect("process");
                (channel, out)
            })
        })
        .collect();

    for handle in handles {
        let (channel, out) = handle.join().expect("join");
        let expected = if channel == "mobile" { "M" } else { "T" };
        assert_eq!(out, expected);
    }
}

#[test]
fn scope_from_uri_reads_channel_param() {
    let dir = demo_site();
    let engine = engine_for(&dir, &["site"]);
    let scope = engine.scope_for("/checkout/basket/", Some("channel=Mobile&x=1"));
    assert_eq!(scope.channel, Channel::from("mobile"));
    assert_eq!(scope.page_path.as_str(), "checkout/basket");

    let fallback = engine.scope_for("/", None);
    assert_eq!(fallback.channel, Channel::from("default"));
    assert!(fallback.page_path.is_root());
}

#[test]
fn exclusion_covers_assets_and_pattern() {
    let dir = demo_site();
    let mut config = EngineConfig::new(vec![dir.path().join("site")], dir.path().join("data"));
    config.exclude = Some("^/api/".to_string());
    let engine = Engine::new(config).expect("engine");

    assert!(engine.is_excluded("/static/app.css"));
    assert!(engine.is_excluded("/api/orders"));
    assert!(!engine.is_excluded("/checkout/basket"));
}

#[test]
fn invalid_exclude_pattern_fails_construction() {
    let dir = demo_site();
    let mut config = EngineConfig::new(vec![dir.path().join("site")], dir.path().join("data"));
    config.exclude = Some("(".to_string());
    assert!(matches!(Engine::new(config), Err(EngineError::Config(_))));
}
