use blocks::node::component::ComponentKind;
use blocks::parser::Parser;
use blocks::style::Breakpoint;

fn parse(source: &str) -> blocks::Layout {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect("parse failed")
}

#[test]
fn reads_a_full_export() {
    let layout = parse(
        r#"{
          "data": {
            "blocks": [
              {
                "id": "builder-root",
                "tagName": "html",
                "properties": { "lang": "en" },
                "children": [
                  { "tagName": "head", "children": [ { "tagName": "title" } ] },
                  {
                    "tagName": "a",
                    "linkUrl": "/about",
                    "component": { "name": "Text", "options": { "text": "<b>About</b>" } },
                    "responsiveStyles": {
                      "large": { "fontWeight": "700" },
                      "small": { "display": "none" }
                    }
                  }
                ]
              },
              { "tagName": "section" }
            ]
          }
        }"#,
    );

    assert_eq!(layout.blocks.len(), 2);
    assert!(layout.diagnostics.is_empty());

    let root = layout.root().expect("root block");
    assert_eq!(root.id.as_deref(), Some("builder-root"));
    assert_eq!(root.property("lang"), Some(Some("en")));
    assert!(root.children[0].is_tagged("head"));

    let link = &root.children[1];
    assert_eq!(link.link_url.as_deref(), Some("/about"));
    assert_eq!(link.component_kind(), ComponentKind::Text);
    assert_eq!(
        link.component.as_ref().and_then(|c| c.text()),
        Some("<b>About</b>")
    );
    assert_eq!(link.responsive_styles.get(Breakpoint::Small).len(), 1);
    assert!(link.responsive_styles.get(Breakpoint::Medium).is_empty());
}

#[test]
fn empty_export_parses_to_no_blocks() {
    let layout = parse("{}");
    assert!(layout.root().is_none());
}

#[test]
fn shape_problems_are_warnings_not_errors() {
    let layout = parse(r#"{ "data": { "blocks": "nope" } }"#);
    assert!(layout.blocks.is_empty());
    assert_eq!(layout.diagnostics.len(), 1);
    assert!(layout.diagnostics[0].is_warning());
    assert!(layout.diagnostics[0].to_string().contains("data.blocks"));
}

#[test]
fn diagnostics_render_through_codespan() {
    let errors = Parser::new("{ \"data\": }".to_string(), 0)
        .parse()
        .unwrap_err();
    let diagnostic = errors[0].to_diagnostic();
    assert_eq!(diagnostic.labels.len(), 1);
    assert!(diagnostic.message.starts_with("invalid JSON"));
}
