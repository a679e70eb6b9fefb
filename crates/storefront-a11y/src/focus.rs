//! Focusable element queries

use storefront_dom::{Document, NodeId};

/// Elements a focus trap considers tabbable
pub const FOCUSABLE_SELECTOR: &str = "summary, a[href], button:enabled, [tabindex]:not([tabindex^='-']), \
     [draggable], area, input:not([type=hidden]):enabled, select:enabled, textarea:enabled, object, iframe";

/// Focusable descendants of `container`, in tree order. Computed fresh on
/// every call.
pub fn focusable_elements(doc: &Document, container: NodeId) -> Vec<NodeId> {
    match doc.query_selector_all(container, FOCUSABLE_SELECTOR) {
        Ok(elements) => elements,
        Err(err) => {
            tracing::warn!("Focusable selector rejected: {}", err);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focusable_elements_in_tree_order() {
        let mut doc = Document::new();
        let container = doc.create_child(doc.body(), "div");
        let button = doc.create_child(container, "button");
        let wrapper = doc.create_child(container, "p");
        let input = doc.create_child(wrapper, "input");
        let link = doc.create_child(container, "a");
        doc.set_attribute(link, "href", "/cart");

        assert_eq!(focusable_elements(&doc, container), vec![button, input, link]);
    }

    #[test]
    fn test_excluded_elements() {
        let mut doc = Document::new();
        let container = doc.create_child(doc.body(), "div");
        let disabled = doc.create_child(container, "button");
        doc.set_attribute(disabled, "disabled", "");
        let hidden = doc.create_child(container, "input");
        doc.set_attribute(hidden, "type", "hidden");
        let negative = doc.create_child(container, "div");
        doc.set_attribute(negative, "tabindex", "-1");
        doc.create_child(container, "a");

        let positive = doc.create_child(container, "div");
        doc.set_attribute(positive, "tabindex", "0");
        let draggable = doc.create_child(container, "img");
        doc.set_attribute(draggable, "draggable", "true");

        assert_eq!(focusable_elements(&doc, container), vec![positive, draggable]);
    }

    #[test]
    fn test_container_itself_is_not_included() {
        let mut doc = Document::new();
        let container = doc.create_child(doc.body(), "details");
        let summary = doc.create_child(container, "summary");
        doc.set_attribute(container, "tabindex", "0");

        assert_eq!(focusable_elements(&doc, container), vec![summary]);
    }
}
