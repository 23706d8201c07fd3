use serde_json::{Map, Value};

use crate::node::BlockNode;
use crate::node::component::Component;
use crate::parser::error::ParseError;
use crate::style::{Breakpoint, ResponsiveStyles, StyleMap};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read `data.blocks` from the export document.
/// Never fails: shape problems become warnings and the offending part is
/// treated as absent.
pub fn read_blocks(
    document: &Map<String, Value>,
    file_id: usize,
) -> (Vec<BlockNode>, Vec<ParseError>) {
    let mut reader = TreeReader {
        file_id,
        warnings: Vec::new(),
    };

    let entries = match document.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::Object(data)) => match data.get("blocks") {
            None | Some(Value::Null) => None,
            Some(Value::Array(entries)) => Some(entries),
            Some(other) => {
                reader.warn("`blocks` is not an array", "data.blocks", other);
                None
            }
        },
        Some(other) => {
            reader.warn("`data` is not an object", "data", other);
            None
        }
    };

    let blocks = entries
        .map(|entries| reader.read_list(entries, "data.blocks"))
        .unwrap_or_default();

    (blocks, reader.warnings)
}

/// Render a JSON scalar the way it appears in markup.
/// `null` is absent; strings are verbatim; everything else is its compact JSON text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tree reader
// ---------------------------------------------------------------------------

struct TreeReader {
    file_id: usize,
    warnings: Vec<ParseError>,
}

impl TreeReader {
    fn warn(&mut self, message: &str, path: &str, found: &Value) {
        self.warnings.push(
            ParseError::warning(
                format!("{}, found {}", message, json_type_name(found)),
                self.file_id,
            )
            .with_note(format!("at {}", path)),
        );
    }

    fn read_list(&mut self, entries: &[Value], path: &str) -> Vec<BlockNode> {
        let mut nodes = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let entry_path = format!("{}[{}]", path, index);
            match entry {
                Value::Object(fields) => nodes.push(self.read_node(fields, &entry_path)),
                other => self.warn("skipping block that is not an object", &entry_path, other),
            }
        }
        nodes
    }

    fn read_node(&mut self, fields: &Map<String, Value>, path: &str) -> BlockNode {
        let tag_name = self.string_field(fields, "tagName", path);
        let id = self.string_field(fields, "id", path);
        let link_url = self.string_field(fields, "linkUrl", path);

        let properties = match fields.get("properties") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(props)) => props
                .iter()
                .map(|(key, value)| (key.clone(), scalar_text(value)))
                .collect(),
            Some(other) => {
                self.warn("ignoring non-object `properties`", path, other);
                Vec::new()
            }
        };

        let responsive_styles = match fields.get("responsiveStyles") {
            None | Some(Value::Null) => ResponsiveStyles::default(),
            Some(Value::Object(styles)) => self.read_responsive_styles(styles, path),
            Some(other) => {
                self.warn("ignoring non-object `responsiveStyles`", path, other);
                ResponsiveStyles::default()
            }
        };

        let component = match fields.get("component") {
            None | Some(Value::Null) => None,
            Some(Value::Object(component)) => Some(read_component(component)),
            Some(other) => {
                self.warn("ignoring non-object `component`", path, other);
                None
            }
        };

        let children = match fields.get("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => {
                self.read_list(entries, &format!("{}.children", path))
            }
            Some(other) => {
                self.warn("ignoring non-array `children`", path, other);
                Vec::new()
            }
        };

        BlockNode {
            id,
            tag_name,
            link_url,
            properties,
            responsive_styles,
            component,
            children,
        }
    }

    /// A string field; any other non-null value is dropped with a warning.
    fn string_field(&mut self, fields: &Map<String, Value>, key: &str, path: &str) -> Option<String> {
        match fields.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(other) => {
                self.warn(&format!("ignoring non-string `{}`", key), path, other);
                None
            }
        }
    }

    fn read_responsive_styles(
        &mut self,
        styles: &Map<String, Value>,
        path: &str,
    ) -> ResponsiveStyles {
        let mut responsive = ResponsiveStyles::default();
        for (key, value) in styles {
            let Some(breakpoint) = Breakpoint::from_name(key) else {
                self.warn(
                    &format!("ignoring unknown breakpoint `{}`", key),
                    path,
                    value,
                );
                continue;
            };
            match value {
                Value::Null => {}
                Value::Object(declarations) => {
                    *responsive.get_mut(breakpoint) = read_style_map(declarations);
                }
                other => self.warn(
                    &format!("ignoring non-object `{}` styles", breakpoint),
                    path,
                    other,
                ),
            }
        }
        responsive
    }
}

fn read_style_map(declarations: &Map<String, Value>) -> StyleMap {
    let mut map = StyleMap::new();
    for (name, value) in declarations {
        map.insert(name.clone(), scalar_text(value));
    }
    map
}

fn read_component(fields: &Map<String, Value>) -> Component {
    Component {
        name: fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        options: fields
            .get("options")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
