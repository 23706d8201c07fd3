use serde_json::{Map, Value};

/// The component descriptor attached to a block: `{ name, options }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub name: String,
    pub options: Map<String, Value>,
}

/// Component names the compiler gives special rendering semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind<'a> {
    /// `options.text` is raw markup injected before the children.
    Text,
    /// `options.code` is raw markup injected before the children.
    CustomCode,
    /// `options.image` supplies a default `src`; the tag defaults to `img`.
    RawImg,
    /// Any other component, rendered generically.
    Other(&'a str),
}

impl<'a> ComponentKind<'a> {
    pub fn from_name(name: &'a str) -> Self {
        match name {
            "Text" => ComponentKind::Text,
            "Custom Code" => ComponentKind::CustomCode,
            "Raw:Img" => ComponentKind::RawImg,
            other => ComponentKind::Other(other),
        }
    }
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Component {
            name: name.into(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// A string option. Non-string values are treated as missing.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.option_str("text")
    }

    pub fn code(&self) -> Option<&str> {
        self.option_str("code")
    }

    pub fn image(&self) -> Option<&str> {
        self.option_str("image")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_special_names_exactly() {
        assert_eq!(ComponentKind::from_name("Text"), ComponentKind::Text);
        assert_eq!(ComponentKind::from_name("Custom Code"), ComponentKind::CustomCode);
        assert_eq!(ComponentKind::from_name("Raw:Img"), ComponentKind::RawImg);
        assert_eq!(ComponentKind::from_name("text"), ComponentKind::Other("text"));
    }

    #[test]
    fn non_string_options_read_as_missing() {
        let component = Component::new("Text").with_option("text", 42);
        assert_eq!(component.text(), None);

        let component = Component::new("Raw:Img").with_option("image", "/a.png");
        assert_eq!(component.image(), Some("/a.png"));
    }
}
