use blocks::node::BlockNode;
use blocks::node::component::ComponentKind;

/// An insertion-ordered HTML attribute map.
///
/// Setting an existing name replaces its value in place, so author-set
/// attributes keep their position even when the compiler rewrites them.
/// A `None` value is never rendered but still counts as present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, Option<String>)>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// The value of `name`, or `None` when absent or null.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.insert(name.to_string(), Some(value.into()));
    }

    /// Set `name` only if the map has no entry for it (null entries count).
    pub fn set_default(&mut self, name: &str, value: &str) {
        if !self.contains(name) {
            self.set(name, value);
        }
    }

    /// Append a class to the `class` attribute, space-joined and trimmed.
    pub fn append_class(&mut self, class: &str) {
        let existing = self.get("class").unwrap_or("");
        let joined = format!("{} {}", existing, class).trim().to_string();
        self.set("class", joined);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as ` name="value"` pairs, ready to follow a tag name.
    /// Empty values render as bare boolean attributes; null values are omitted.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            let Some(value) = value else {
                continue;
            };
            out.push(' ');
            out.push_str(&escape_html(name));
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape_html(value));
                out.push('"');
            }
        }
        out
    }

    fn insert(&mut self, name: String, value: Option<String>) {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }
}

impl FromIterator<(String, Option<String>)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

/// Start from the author's raw properties, then fill `id`, `href`, and (for
/// `Raw:Img`) `src` from the block's own fields where the author did not.
pub fn build_base_attrs(node: &BlockNode) -> Attributes {
    let mut attrs: Attributes = node.properties.iter().cloned().collect();

    if let Some(id) = node.id.as_deref().filter(|id| !id.is_empty()) {
        attrs.set_default("id", id);
    }

    if let Some(href) = node.link_url.as_deref().filter(|url| !url.is_empty()) {
        attrs.set_default("href", href);
    }

    if node.component_kind() == ComponentKind::RawImg {
        let image = node.component.as_ref().and_then(|c| c.image());
        if let Some(src) = image.filter(|src| !src.is_empty()) {
            attrs.set_default("src", src);
        }
    }

    attrs
}

/// Escape text for use in element content or a double-quoted attribute value.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocks::node::component::Component;

    fn props(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn renders_boolean_and_omits_null() {
        let attrs: Attributes = props(&[
            ("data-x", Some("1 < 2")),
            ("hidden", Some("")),
            ("title", None),
        ])
        .into_iter()
        .collect();
        assert_eq!(attrs.render(), " data-x=\"1 &lt; 2\" hidden");
    }

    #[test]
    fn set_keeps_original_position() {
        let mut attrs: Attributes = props(&[("style", Some("color:red;")), ("alt", Some("a"))])
            .into_iter()
            .collect();
        attrs.set("style", "margin:0;");
        attrs.set("id", "x");
        assert_eq!(attrs.render(), " style=\"margin:0;\" alt=\"a\" id=\"x\"");
    }

    #[test]
    fn append_class_joins_and_trims() {
        let mut attrs = Attributes::new();
        attrs.append_class("bp-1");
        assert_eq!(attrs.get("class"), Some("bp-1"));

        let mut attrs: Attributes = props(&[("class", Some("card "))]).into_iter().collect();
        attrs.append_class("bp-2");
        assert_eq!(attrs.get("class"), Some("card  bp-2"));

        let mut attrs: Attributes = props(&[("class", None)]).into_iter().collect();
        attrs.append_class("bp-3");
        assert_eq!(attrs.get("class"), Some("bp-3"));
    }

    #[test]
    fn defaults_never_override_author_properties() {
        let node = BlockNode {
            id: Some("builder-1".to_string()),
            link_url: Some("/from-link".to_string()),
            properties: props(&[("href", Some("/explicit")), ("src", None)]),
            component: Some(Component::new("Raw:Img").with_option("image", "/a.png")),
            ..BlockNode::default()
        };
        let attrs = build_base_attrs(&node);
        assert_eq!(attrs.render(), " href=\"/explicit\" id=\"builder-1\"");
    }

    #[test]
    fn raw_img_supplies_src() {
        let node = BlockNode {
            component: Some(Component::new("Raw:Img").with_option("image", "/a.png")),
            ..BlockNode::default()
        };
        assert_eq!(build_base_attrs(&node).get("src"), Some("/a.png"));

        let other = BlockNode {
            component: Some(Component::new("Image").with_option("image", "/a.png")),
            ..BlockNode::default()
        };
        assert!(!build_base_attrs(&other).contains("src"));
    }

    #[test]
    fn empty_id_and_link_are_ignored() {
        let node = BlockNode {
            id: Some(String::new()),
            link_url: Some(String::new()),
            ..BlockNode::default()
        };
        assert!(build_base_attrs(&node).is_empty());
    }
}
