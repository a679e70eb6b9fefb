//! ARIA Support
//!
//! The roles and states storefront widgets write onto their elements.

use storefront_dom::{Document, NodeId};

/// Roles the behaviours write. A disclosure summary becomes a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Button,
}

impl AriaRole {
    /// Attribute value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
        }
    }
}

/// Set the `role` attribute
pub fn set_role(doc: &mut Document, id: NodeId, role: AriaRole) {
    doc.set_attribute(id, "role", role.as_str());
}

/// Write `aria-expanded`
pub fn set_expanded(doc: &mut Document, id: NodeId, expanded: bool) {
    doc.set_attribute(id, "aria-expanded", if expanded { "true" } else { "false" });
}

/// Read `aria-expanded` (None when absent or not a boolean)
pub fn is_expanded(doc: &Document, id: NodeId) -> Option<bool> {
    match doc.get_attribute(id, "aria-expanded")? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Point `aria-controls` at the element with the given id
pub fn set_controls(doc: &mut Document, id: NodeId, controlled_id: &str) {
    doc.set_attribute(id, "aria-controls", controlled_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_roundtrip() {
        let mut doc = Document::new();
        let summary = doc.create_child(doc.body(), "summary");
        assert_eq!(is_expanded(&doc, summary), None);

        set_expanded(&mut doc, summary, true);
        assert_eq!(doc.get_attribute(summary, "aria-expanded"), Some("true"));
        set_expanded(&mut doc, summary, false);
        assert_eq!(is_expanded(&doc, summary), Some(false));
    }

    #[test]
    fn test_role_attribute() {
        let mut doc = Document::new();
        let summary = doc.create_child(doc.body(), "summary");
        set_role(&mut doc, summary, AriaRole::Button);
        assert_eq!(doc.get_attribute(summary, "role"), Some("button"));
    }
}
