use serde_json::json;
use transclude_core::DataMap;
use transclude_renderer::{Render, RenderError, TeraRenderer};

fn map(value: serde_json::Value) -> DataMap {
    value.as_object().cloned().expect("object")
}

#[test]
fn partial_with_nested_fragment_renders_against_one_mapping() {
    let template = "<h3>{{contentData}}</h3>\n<h4>{{nestedData}}</h4>";
    let data = map(json!({
        "contentData": "CONTENT SECTION DATA",
        "nestedData": "NESTED SECTION DATA",
    }));
    let out = TeraRenderer::default().render(template, &data).expect("render");
    assert_eq!(out, "<h3>CONTENT SECTION DATA</h3>\n<h4>NESTED SECTION DATA</h4>");
}

#[test]
fn whitespace_and_line_breaks_are_preserved() {
    let template = "<ul>\n  <li>{{ a }}</li>\n\n  <li>{{b}}</li>\n</ul>\n";
    let out = TeraRenderer::default()
        .render(template, &map(json!({"a": 1, "b": true})))
        .expect("render");
    assert_eq!(out, "<ul>\n  <li>1</li>\n\n  <li>true</li>\n</ul>\n");
}

#[test]
fn list_section_iterates_items_with_their_fields_in_scope() {
    let template = "<ul>{{#items}}<li>{{name}}</li>{{/items}}</ul>";
    let data = map(json!({"items": [{"name": "a"}, {"name": "b"}]}));
    let out = TeraRenderer::default().render(template, &data).expect("render");
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn truthy_section_renders_once_and_inverted_renders_on_falsy() {
    let template = "{{#user}}hi {{name}}{{/user}}{{^user}}guest{{/user}}";
    let renderer = TeraRenderer::default();

    let known = renderer
        .render(template, &map(json!({"user": {"name": "ann"}})))
        .expect("render");
    assert_eq!(known, "hi ann");
    let anonymous = renderer
        .render(template, &map(json!({"user": false})))
        .expect("render");
    assert_eq!(anonymous, "guest");
    let empty = renderer
        .render("{{^items}}none{{/items}}", &map(json!({"items": []})))
        .expect("render");
    assert_eq!(empty, "none");
}

#[test]
fn standalone_section_lines_leave_no_blank_lines() {
    let template = "<ul>\n{{#items}}\n  <li>{{.}}</li>\n{{/items}}\n</ul>\n";
    let out = TeraRenderer::default()
        .render(template, &map(json!({"items": ["x", "y"]})))
        .expect("render");
    assert_eq!(out, "<ul>\n  <li>x</li>\n  <li>y</li>\n</ul>\n");
}

#[test]
fn hyphenated_and_keyword_keys_resolve() {
    let data = map(json!({"header-title": "T", "not": "n", "in": "i", "true": "t"}));
    let out = TeraRenderer::default()
        .render("<h2>{{header-title}}</h2>{{not}}{{in}}{{true}}", &data)
        .expect("render");
    assert_eq!(out, "<h2>T</h2>nit");
}

#[test]
fn unbalanced_sections_are_errors() {
    let err = TeraRenderer::default()
        .render("{{#list}}<li>{{.}}</li>", &DataMap::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::UnclosedSection { ref name } if name == "list"));

    let err = TeraRenderer::default()
        .render("{{=<% %>=}}", &DataMap::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedTag { ref tag } if tag == "{{=<% %>=}}"));
}
