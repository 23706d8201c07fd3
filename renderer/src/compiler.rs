use blocks::metadata::LiveMetadata;
use blocks::node::BlockNode;
use blocks::node::component::ComponentKind;
use blocks::style::Breakpoint;

use crate::attributes::{Attributes, build_base_attrs, escape_html};
use crate::context::CompileContext;
use crate::style::{filter_styles, serialize_declarations};

/// Base stylesheet emitted ahead of any generated media rules.
pub const RESET_CSS: &str = "html,body{margin:0;padding:0;box-sizing:border-box;}*,*::before,*::after{box-sizing:inherit;}";

/// Title used when a `<title>` block has no text beneath it.
pub const TITLE_FALLBACK: &str = "Builder Page";

/// Elements rendered as a lone start tag with no content.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Compiles one block tree into a document.
///
/// Each compiler owns the class counter and media buckets for a single run,
/// so `compile_document` consumes it. Independent runs need independent
/// compilers and never share state.
pub struct DocumentCompiler<'m> {
    metadata: &'m LiveMetadata,
    context: CompileContext,
}

impl<'m> DocumentCompiler<'m> {
    pub fn new(metadata: &'m LiveMetadata) -> Self {
        DocumentCompiler {
            metadata,
            context: CompileContext::new(),
        }
    }

    pub fn context(&self) -> &CompileContext {
        &self.context
    }

    /// Render `root` as the `<html>` element of a complete document.
    pub fn compile_document(mut self, root: &BlockNode) -> String {
        // 1. <html> attributes
        let mut html_attrs = build_base_attrs(root);
        self.apply_responsive_styles(root, &resolve_tag_name(root), &mut html_attrs);
        if !self.metadata.html_class.is_empty() {
            html_attrs.append_class(&self.metadata.html_class);
        }

        // 2. Split children into head blocks and body blocks
        let (head_nodes, body_nodes): (Vec<&BlockNode>, Vec<&BlockNode>) =
            root.children.iter().partition(|child| child.is_tagged("head"));

        // 3. <head> attributes come from the first head block
        let head_attrs = match head_nodes.first() {
            Some(primary) => {
                let mut attrs = build_base_attrs(primary);
                self.apply_responsive_styles(primary, &resolve_tag_name(primary), &mut attrs);
                attrs
            }
            None => Attributes::new(),
        };

        // 4. Head content: fixed meta tags, then the head blocks' children unwrapped
        let mut head = String::new();
        head.push_str("<meta charset=\"utf-8\">");
        head.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
        for head_node in &head_nodes {
            for child in &head_node.children {
                head.push_str(&self.render_node(child));
            }
        }
        for url in &self.metadata.stylesheet_urls {
            head.push_str("<link rel=\"stylesheet\" href=\"");
            head.push_str(&escape_html(url));
            head.push_str("\">");
        }

        // 5. Body content. Must happen before the style block is assembled.
        let mut body = String::new();
        for node in &body_nodes {
            body.push_str(&self.render_node(node));
        }

        // 6. Generated stylesheet
        let media_css = self.context.media_css();
        head.push_str("<style>");
        head.push_str(RESET_CSS);
        if !media_css.is_empty() {
            head.push('\n');
            head.push_str(&media_css);
        }
        head.push_str("</style>");

        let mut body_attrs = Attributes::new();
        if !self.metadata.body_class.is_empty() {
            body_attrs.set("class", self.metadata.body_class.as_str());
        }

        log::debug!(
            "compiled document: {} generated class(es); media rules medium={} small={} xsmall={}",
            self.context.classes_allocated(),
            self.context.rules(Breakpoint::Medium).len(),
            self.context.rules(Breakpoint::Small).len(),
            self.context.rules(Breakpoint::XSmall).len(),
        );

        format!(
            "<!doctype html><html{}><head{}>{}</head><body{}>{}</body></html>",
            html_attrs.render(),
            head_attrs.render(),
            head,
            body_attrs.render(),
            body
        )
    }

    /// Render a block and its subtree to markup, recording any media rules.
    pub fn render_node(&mut self, node: &BlockNode) -> String {
        let tag_name = resolve_tag_name(node);
        log::trace!("render <{}> component={:?}", tag_name, node.component_name());

        let mut attrs = build_base_attrs(node);
        self.apply_responsive_styles(node, &tag_name, &mut attrs);
        let attr_string = attrs.render();

        if tag_name == "title" {
            let title = collect_title_text(node);
            return format!("<title{}>{}</title>", attr_string, escape_html(&title));
        }

        if VOID_TAGS.contains(&tag_name.as_str()) {
            if !node.children.is_empty() {
                log::trace!("dropping {} child(ren) of void <{}>", node.children.len(), tag_name);
            }
            return format!("<{}{}>", tag_name, attr_string);
        }

        let mut inner = String::new();
        let injected = match node.component_kind() {
            ComponentKind::Text => node.component.as_ref().and_then(|c| c.text()),
            ComponentKind::CustomCode => node.component.as_ref().and_then(|c| c.code()),
            _ => None,
        };
        if let Some(markup) = injected {
            inner.push_str(markup);
        }
        for child in &node.children {
            inner.push_str(&self.render_node(child));
        }

        format!("<{}{}>{}</{}>", tag_name, attr_string, inner, tag_name)
    }

    /// Put `large` styles inline and give the node one generated class for
    /// any other breakpoint that still has styles after filtering.
    fn apply_responsive_styles(&mut self, node: &BlockNode, tag_name: &str, attrs: &mut Attributes) {
        let styles = &node.responsive_styles;

        let large = filter_styles(tag_name, &styles.large);
        let inline = serialize_declarations(&large);
        if !inline.is_empty() {
            attrs.set("style", inline);
        }

        let mut class_name: Option<String> = None;
        for breakpoint in Breakpoint::RESPONSIVE {
            let filtered = filter_styles(tag_name, styles.get(breakpoint));
            if filtered.is_empty() {
                continue;
            }

            let class = class_name.get_or_insert_with(|| {
                let class = self.context.next_class_name();
                attrs.append_class(&class);
                class
            });

            let declarations = serialize_declarations(&filtered);
            if !declarations.is_empty() {
                self.context.push_rule(breakpoint, class, &declarations);
            }
        }
    }
}

/// The explicit tag (trimmed, lower-cased), else `img` for `Raw:Img`, else `div`.
pub fn resolve_tag_name(node: &BlockNode) -> String {
    let explicit = node.tag_name.as_deref().map(str::trim).unwrap_or("");
    if !explicit.is_empty() {
        return explicit.to_lowercase();
    }
    match node.component_kind() {
        ComponentKind::RawImg => "img".to_string(),
        _ => "div".to_string(),
    }
}

/// Concatenate the tag-stripped text of every `Text` component in the
/// subtree (depth-first, the node itself included) and trim it.
pub fn collect_title_text(node: &BlockNode) -> String {
    fn walk(node: &BlockNode, out: &mut String) {
        if node.component_kind() == ComponentKind::Text {
            if let Some(text) = node.component.as_ref().and_then(|c| c.text()) {
                out.push_str(&strip_tags(text));
            }
        }
        for child in &node.children {
            walk(child, out);
        }
    }

    let mut text = String::new();
    walk(node, &mut text);
    let title = text.trim();
    if title.is_empty() {
        TITLE_FALLBACK.to_string()
    } else {
        title.to_string()
    }
}

/// Remove every `<...>` run. A `<` with no closing `>` is kept as text.
fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}
