//! Conversion of builder style maps to CSS, and removal of export noise.

use blocks::style::{StyleMap, StyleProperty};

/// Properties the exporter writes for every element without any authored intent.
const DROPPED_PROPERTIES: &[&str] = &[
    "outline",
    "outlineColor",
    "outlineOffset",
    "outlineStyle",
    "outlineWidth",
    "textDecorationColor",
    "textEmphasisColor",
];

/// The exporter's default font stacks. Only exact matches are dropped.
const DROPPED_FONT_FAMILIES: &[&str] = &["\"Times New Roman\"", "Arial, Helvetica, sans-serif"];

/// Document-structural tags that never carry visual styling.
const UNSTYLED_TAGS: &[&str] = &["html", "head", "title"];

/// Convert a camel-case property name to its CSS form (`fontWeight` -> `font-weight`).
/// Names that already contain a hyphen are returned unchanged.
pub fn to_css_declaration_name(name: &str) -> String {
    if name.contains('-') {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_uppercase() {
            out.push('-');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Serialize to `prop:value;prop:value;`, skipping absent values.
/// Returns an empty string when nothing survives.
pub fn serialize_declarations(styles: &StyleMap) -> String {
    let mut out = String::new();
    for property in styles {
        let Some(value) = &property.value else {
            continue;
        };
        out.push_str(&to_css_declaration_name(&property.name));
        out.push(':');
        out.push_str(value);
        out.push(';');
    }
    out
}

/// Drop export artifacts from a style map, given the element's resolved tag name.
pub fn filter_styles(tag_name: &str, styles: &StyleMap) -> StyleMap {
    if UNSTYLED_TAGS.contains(&tag_name) {
        return StyleMap::new();
    }

    styles
        .iter()
        .filter(|property| !is_export_noise(property))
        .cloned()
        .collect()
}

fn is_export_noise(property: &StyleProperty) -> bool {
    if DROPPED_PROPERTIES.contains(&property.name.as_str()) {
        return true;
    }
    property.name == "fontFamily"
        && property
            .value
            .as_deref()
            .is_some_and(|family| DROPPED_FONT_FAMILIES.contains(&family))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_to_kebab_case() {
        assert_eq!(to_css_declaration_name("fontWeight"), "font-weight");
        assert_eq!(to_css_declaration_name("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(to_css_declaration_name("color"), "color");
        assert_eq!(to_css_declaration_name("WebkitLineClamp"), "-webkit-line-clamp");
    }

    #[test]
    fn hyphenated_names_are_left_alone() {
        assert_eq!(to_css_declaration_name("--brandColor"), "--brandColor");
        assert_eq!(to_css_declaration_name("-webkit-box"), "-webkit-box");
    }

    #[test]
    fn serializes_in_order_and_skips_absent_values() {
        let mut styles = StyleMap::new().with("display", "flex");
        styles.insert("gap", None);
        styles.insert("flexDirection", Some("column".to_string()));
        assert_eq!(
            serialize_declarations(&styles),
            "display:flex;flex-direction:column;"
        );
        assert_eq!(serialize_declarations(&StyleMap::new()), "");
    }

    #[test]
    fn drops_outline_and_decoration_noise() {
        let styles = StyleMap::new()
            .with("outlineColor", "rgb(0, 0, 0)")
            .with("textDecorationColor", "rgb(0, 0, 0)")
            .with("textEmphasisColor", "rgb(0, 0, 0)")
            .with("color", "red");
        let filtered = filter_styles("p", &styles);
        assert_eq!(filtered, StyleMap::new().with("color", "red"));
    }

    #[test]
    fn drops_only_default_font_stacks() {
        let default_stack = StyleMap::new().with("fontFamily", "Arial, Helvetica, sans-serif");
        assert!(filter_styles("p", &default_stack).is_empty());

        let times = StyleMap::new().with("fontFamily", "\"Times New Roman\"");
        assert!(filter_styles("p", &times).is_empty());

        let custom = StyleMap::new().with("fontFamily", "Aspekta, sans-serif");
        assert_eq!(filter_styles("p", &custom), custom);
    }

    #[test]
    fn structural_tags_lose_every_style() {
        let styles = StyleMap::new().with("color", "red").with("margin", "0");
        for tag in ["html", "head", "title"] {
            assert!(filter_styles(tag, &styles).is_empty(), "{} kept styles", tag);
        }
        assert_eq!(filter_styles("body", &styles).len(), 2);
    }
}
