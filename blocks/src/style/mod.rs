use std::fmt;

/// A responsive breakpoint. `Large` is the unconditional default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Breakpoint {
    Large,
    Medium,
    Small,
    XSmall,
}

impl Breakpoint {
    /// Every breakpoint, widest first.
    pub const ALL: [Breakpoint; 4] = [
        Breakpoint::Large,
        Breakpoint::Medium,
        Breakpoint::Small,
        Breakpoint::XSmall,
    ];

    /// Breakpoints that compile to media-scoped classes, in emission order.
    pub const RESPONSIVE: [Breakpoint; 3] =
        [Breakpoint::Medium, Breakpoint::Small, Breakpoint::XSmall];

    /// The key used for this breakpoint in `responsiveStyles`.
    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Large => "large",
            Breakpoint::Medium => "medium",
            Breakpoint::Small => "small",
            Breakpoint::XSmall => "xsmall",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Breakpoint::ALL.into_iter().find(|bp| bp.name() == name)
    }

    /// The media condition for this breakpoint. `Large` has none.
    pub fn media_query(self) -> Option<&'static str> {
        match self {
            Breakpoint::Large => None,
            Breakpoint::Medium => Some("(max-width: 991px)"),
            Breakpoint::Small => Some("(max-width: 640px)"),
            Breakpoint::XSmall => Some("(max-width: 480px)"),
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One camel-case style property. `None` marks an absent value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleProperty {
    pub name: String,
    pub value: Option<String>,
}

/// An ordered style-property mapping. Names are unique; iteration follows
/// first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    properties: Vec<StyleProperty>,
}

impl StyleMap {
    pub fn new() -> Self {
        StyleMap::default()
    }

    /// Set a property, replacing the value in place if the name already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.properties.push(StyleProperty { name, value }),
        }
    }

    /// Builder-style insert of a present value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&StyleProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyleProperty> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<StyleProperty> for StyleMap {
    fn from_iter<I: IntoIterator<Item = StyleProperty>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for property in iter {
            map.insert(property.name, property.value);
        }
        map
    }
}

impl<'a> IntoIterator for &'a StyleMap {
    type Item = &'a StyleProperty;
    type IntoIter = std::slice::Iter<'a, StyleProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

/// The four per-breakpoint style maps of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsiveStyles {
    pub large: StyleMap,
    pub medium: StyleMap,
    pub small: StyleMap,
    pub xsmall: StyleMap,
}

impl ResponsiveStyles {
    pub fn get(&self, breakpoint: Breakpoint) -> &StyleMap {
        match breakpoint {
            Breakpoint::Large => &self.large,
            Breakpoint::Medium => &self.medium,
            Breakpoint::Small => &self.small,
            Breakpoint::XSmall => &self.xsmall,
        }
    }

    pub fn get_mut(&mut self, breakpoint: Breakpoint) -> &mut StyleMap {
        match breakpoint {
            Breakpoint::Large => &mut self.large,
            Breakpoint::Medium => &mut self.medium,
            Breakpoint::Small => &mut self.small,
            Breakpoint::XSmall => &mut self.xsmall,
        }
    }

    pub fn is_empty(&self) -> bool {
        Breakpoint::ALL.iter().all(|bp| self.get(*bp).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_names_round_trip() {
        for bp in Breakpoint::ALL {
            assert_eq!(Breakpoint::from_name(bp.name()), Some(bp));
        }
        assert_eq!(Breakpoint::from_name("huge"), None);
        assert_eq!(Breakpoint::from_name("Large"), None);
    }

    #[test]
    fn only_large_lacks_a_media_query() {
        assert_eq!(Breakpoint::Large.media_query(), None);
        assert_eq!(Breakpoint::Small.media_query(), Some("(max-width: 640px)"));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = StyleMap::new().with("color", "red").with("margin", "0");
        map.insert("color", Some("blue".to_string()));
        let names: Vec<&str> = map.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["color", "margin"]);
        assert_eq!(map.get("color").and_then(|p| p.value.as_deref()), Some("blue"));
    }
}
