//! Element Attributes
//!
//! Elements carry a handful of attributes, so they live in a small vector in
//! source order. Names are ASCII-lowercased on the way in, as HTML does, and
//! compared case-insensitively on lookup.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// Attribute collection of one element
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.find(name).map(|attr| attr.value.as_str())
    }

    /// Set an attribute, returning the previous value
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attributes.push(Attr {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        });
        None
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attr> {
        let index = self.attributes.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Toggle a boolean attribute (`open`, `hidden`, `disabled`). Returns
    /// whether it is present afterwards.
    pub fn toggle_attribute(&mut self, name: &str, force: Option<bool>) -> bool {
        let present = self.has_attribute(name);
        let want = force.unwrap_or(!present);
        if want && !present {
            self.set_attribute(name, "");
        } else if !want && present {
            self.remove_attribute(name);
        }
        want
    }

    /// Attributes in source order
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }

    fn find(&self, name: &str) -> Option<&Attr> {
        self.attributes.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aria_attributes() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("role", "button");
        attrs.set_attribute("aria-expanded", "false");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.set_attribute("aria-expanded", "true"), Some("false".to_string()));
        assert_eq!(attrs.get_attribute("aria-expanded"), Some("true"));
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut attrs = NamedNodeMap::new();
        attrs.set_attribute("TabIndex", "-1");
        assert_eq!(attrs.get_attribute("tabindex"), Some("-1"));
        assert_eq!(attrs.iter().next().map(|a| a.name.as_str()), Some("tabindex"));
        assert!(attrs.remove_attribute("TABINDEX").is_some());
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_toggle_open() {
        let mut attrs = NamedNodeMap::new();
        assert!(attrs.toggle_attribute("open", None));
        assert_eq!(attrs.get_attribute("open"), Some(""));
        assert!(!attrs.toggle_attribute("open", None));
        assert!(attrs.toggle_attribute("open", Some(true)));
        assert!(attrs.toggle_attribute("open", Some(true)));
        assert_eq!(attrs.len(), 1);
    }
}
