//! Focus Trap
//!
//! Keeps Tab navigation inside a container. At most one trap is active; a
//! new activation releases the previous trap first.
//!
//! While active, three document listeners exist:
//! - `focusin`: arms the keydown listener when focus lands on the container
//!   or one of the boundary elements
//! - `focusout`: disarms it
//! - `keydown`: wraps Tab from the last element to the first and Shift+Tab
//!   from the first element (or the container) to the last

use storefront_dom::{Document, Event, EventTarget, EventType, HandlerId, Key, ListenerOptions, NodeId};

use crate::focus::focusable_elements;

/// Input types whose existing text is selected when a trap focuses them
const SELECT_ON_FOCUS: &[&str] = &["search", "text", "email", "url"];

/// State of the active trap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTrap {
    pub container: NodeId,
    /// First focusable element (None for a container without any)
    pub first: Option<NodeId>,
    /// Last focusable element
    pub last: Option<NodeId>,
    pub focus_in: HandlerId,
    pub focus_out: HandlerId,
    pub key_down: HandlerId,
}

impl ActiveTrap {
    /// Check whether a node is the container or one of the boundary elements
    fn is_boundary(&self, node: NodeId) -> bool {
        node == self.container || Some(node) == self.first || Some(node) == self.last
    }

    fn owns(&self, handler: HandlerId) -> bool {
        handler == self.focus_in || handler == self.focus_out || handler == self.key_down
    }
}

/// Owner of the single active focus trap
#[derive(Debug, Default)]
pub struct FocusTrapManager {
    active: Option<ActiveTrap>,
}

impl FocusTrapManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a trap is active
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The active trap
    pub fn active_trap(&self) -> Option<&ActiveTrap> {
        self.active.as_ref()
    }

    /// Trap focus inside `container` and focus `element_to_focus` (the
    /// container itself by default). Any previous trap is released first.
    pub fn activate(&mut self, doc: &mut Document, container: NodeId, element_to_focus: Option<NodeId>) {
        let elements = focusable_elements(doc, container);
        let first = elements.first().copied();
        let last = elements.last().copied();

        self.release(doc, None);

        let trap = ActiveTrap {
            container,
            first,
            last,
            focus_in: doc.allocate_handler(),
            focus_out: doc.allocate_handler(),
            key_down: doc.allocate_handler(),
        };
        doc.add_event_listener(EventTarget::DOCUMENT, EventType::FocusOut, trap.focus_out, ListenerOptions::default());
        doc.add_event_listener(EventTarget::DOCUMENT, EventType::FocusIn, trap.focus_in, ListenerOptions::default());

        tracing::debug!(
            "Focus trap activated on {} ({} focusable elements)",
            container,
            elements.len()
        );
        self.active = Some(trap);

        let target = element_to_focus.unwrap_or(container);
        doc.focus(target);

        if doc.is_tag(target, "input") && SELECT_ON_FOCUS.contains(&doc.input_type(target).as_str()) {
            let len = doc.value(target).chars().count();
            if len > 0 {
                doc.set_selection_range(target, 0, len);
            }
        }
    }

    /// Remove the trap's listeners and optionally move focus. Releasing
    /// without an active trap only moves focus.
    pub fn release(&mut self, doc: &mut Document, element_to_focus: Option<NodeId>) {
        if let Some(trap) = self.active.take() {
            doc.remove_event_listener(EventTarget::DOCUMENT, &EventType::FocusIn, trap.focus_in, false);
            doc.remove_event_listener(EventTarget::DOCUMENT, &EventType::FocusOut, trap.focus_out, false);
            doc.remove_event_listener(EventTarget::DOCUMENT, &EventType::KeyDown, trap.key_down, false);
            tracing::debug!("Focus trap on {} released", trap.container);
        }

        if let Some(element) = element_to_focus {
            doc.focus(element);
        }
    }

    /// Handle an event for one of the trap's listeners. Returns false when
    /// the handler id does not belong to the active trap.
    pub fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, event: &mut Event) -> bool {
        let Some(trap) = self.active.as_ref().filter(|t| t.owns(handler)) else {
            return false;
        };
        let Some(target) = event.target_node() else { return true };

        if handler == trap.focus_in {
            if trap.is_boundary(target) {
                doc.add_event_listener(EventTarget::DOCUMENT, EventType::KeyDown, trap.key_down, ListenerOptions::default());
            }
        } else if handler == trap.focus_out {
            doc.remove_event_listener(EventTarget::DOCUMENT, &EventType::KeyDown, trap.key_down, false);
        } else {
            Self::wrap_tab(trap, doc, target, event);
        }
        true
    }

    fn wrap_tab(trap: &ActiveTrap, doc: &mut Document, target: NodeId, event: &mut Event) {
        if event.key() != Some(&Key::Tab) {
            return;
        }
        let (Some(first), Some(last)) = (trap.first, trap.last) else { return };
        let backward = event.shift_key();

        if target == last && !backward {
            event.prevent_default();
            doc.focus(first);
        } else if (target == trap.container || target == first) && backward {
            event.prevent_default();
            doc.focus(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_records_boundaries() {
        let mut doc = Document::new();
        let container = doc.create_child(doc.body(), "div");
        doc.set_attribute(container, "tabindex", "-1");
        let first = doc.create_child(container, "button");
        doc.create_child(container, "input");
        let last = doc.create_child(container, "textarea");

        let mut traps = FocusTrapManager::new();
        traps.activate(&mut doc, container, None);

        let trap = traps.active_trap().unwrap();
        assert_eq!(trap.first, Some(first));
        assert_eq!(trap.last, Some(last));
        assert_eq!(doc.active_element(), Some(container));
        assert!(doc.listeners().is_registered(EventTarget::DOCUMENT, &EventType::FocusIn, trap.focus_in));
        assert!(!doc.listeners().is_registered(EventTarget::DOCUMENT, &EventType::KeyDown, trap.key_down));
    }

    #[test]
    fn test_release_removes_all_listeners() {
        let mut doc = Document::new();
        let container = doc.create_child(doc.body(), "div");
        let mut traps = FocusTrapManager::new();

        traps.activate(&mut doc, container, None);
        assert_eq!(doc.listeners().len(), 2);
        traps.release(&mut doc, None);
        assert!(!traps.is_active());
        assert!(doc.listeners().is_empty());

        traps.release(&mut doc, None);
        assert!(doc.listeners().is_empty());
    }

    #[test]
    fn test_search_input_text_is_selected() {
        let mut doc = Document::new();
        let container = doc.create_child(doc.body(), "form");
        let input = doc.create_child(container, "input");
        doc.set_attribute(input, "type", "search");
        doc.set_value(input, "sneakers");

        let mut traps = FocusTrapManager::new();
        traps.activate(&mut doc, container, Some(input));
        assert_eq!(doc.active_element(), Some(input));
        assert_eq!(doc.selection_range(input), Some((0, 8)));
    }

    #[test]
    fn test_foreign_handler_is_not_claimed() {
        let mut doc = Document::new();
        let container = doc.create_child(doc.body(), "div");
        let mut traps = FocusTrapManager::new();
        traps.activate(&mut doc, container, None);

        let foreign = doc.allocate_handler();
        let mut event = Event::custom("noop", container);
        assert!(!traps.handle_event(&mut doc, foreign, &mut event));
    }
}
