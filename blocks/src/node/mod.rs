pub mod component;

use crate::node::component::{Component, ComponentKind};
use crate::style::ResponsiveStyles;

/// A single block of the exported layout tree.
/// The compiler only ever reads these; nothing downstream mutates the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockNode {
    /// Builder-assigned id, used as the default `id` attribute.
    pub id: Option<String>,
    /// Explicit HTML tag, exactly as exported (not trimmed or lower-cased).
    pub tag_name: Option<String>,
    /// Link target, used as the default `href` attribute.
    pub link_url: Option<String>,
    /// Author-set HTML attributes in source order.
    /// A `None` value is a JSON `null`: never rendered, but still counts as "set".
    pub properties: Vec<(String, Option<String>)>,
    /// Style maps for each breakpoint.
    pub responsive_styles: ResponsiveStyles,
    pub component: Option<Component>,
    /// Child blocks in document order. Non-object entries were dropped at parse time.
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    /// The component name, or `""` when the block has no component.
    pub fn component_name(&self) -> &str {
        self.component
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("")
    }

    pub fn component_kind(&self) -> ComponentKind<'_> {
        ComponentKind::from_name(self.component_name())
    }

    /// Case-insensitive comparison against the raw exported tag name.
    pub fn is_tagged(&self, name: &str) -> bool {
        self.tag_name
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    /// Look up an author property. Returns `Some(None)` for an explicit null.
    pub fn property(&self, name: &str) -> Option<Option<&str>> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_deref())
    }
}
