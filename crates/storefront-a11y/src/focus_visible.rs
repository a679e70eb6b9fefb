//! `:focus-visible` polyfill
//!
//! On runtimes whose selector engine rejects `:focus-visible`, marks the
//! focused element with a class when focus followed keyboard navigation and
//! leaves it unmarked when focus followed a pointer press.

use storefront_dom::{Document, Event, EventTarget, EventType, HandlerId, ListenerOptions, NodeId};

/// Polyfill state; exists only when installed
#[derive(Debug)]
pub struct FocusVisiblePolyfill {
    class: String,
    /// Most recent relevant input was a pointer press
    mouse_click: bool,
    current: Option<NodeId>,
    key_down: HandlerId,
    mouse_down: HandlerId,
    focus: HandlerId,
}

impl FocusVisiblePolyfill {
    /// Probe `:focus-visible` and install the polyfill only if the runtime
    /// rejects it
    pub fn install_if_needed(doc: &mut Document, class: &str) -> Option<Self> {
        match doc.parse_selector(":focus-visible") {
            Ok(_) => {
                tracing::debug!("Native :focus-visible supported, polyfill not installed");
                None
            }
            Err(err) => {
                tracing::debug!("Installing focus-visible polyfill ({})", err);
                Some(Self::install(doc, class))
            }
        }
    }

    /// Install unconditionally
    pub fn install(doc: &mut Document, class: &str) -> Self {
        let polyfill = Self {
            class: class.to_string(),
            mouse_click: false,
            current: None,
            key_down: doc.allocate_handler(),
            mouse_down: doc.allocate_handler(),
            focus: doc.allocate_handler(),
        };
        doc.add_event_listener(EventTarget::Window, EventType::KeyDown, polyfill.key_down, ListenerOptions::default());
        doc.add_event_listener(EventTarget::Window, EventType::MouseDown, polyfill.mouse_down, ListenerOptions::default());
        doc.add_event_listener(EventTarget::Window, EventType::Focus, polyfill.focus, ListenerOptions::capture());
        polyfill
    }

    /// Check whether the polyfill's listeners are attached to `doc`
    pub fn is_installed(&self, doc: &Document) -> bool {
        doc.listeners().is_registered(EventTarget::Window, &EventType::Focus, self.focus)
    }

    /// Element currently carrying the marker class
    pub fn focused_element(&self) -> Option<NodeId> {
        self.current
    }

    /// Marker class name
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Handle an event for one of the polyfill's listeners. Returns false
    /// when the handler id is not the polyfill's.
    pub fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, event: &mut Event) -> bool {
        if handler == self.key_down {
            if event.key().is_some_and(|k| k.is_navigation()) {
                self.mouse_click = false;
            }
        } else if handler == self.mouse_down {
            self.mouse_click = true;
        } else if handler == self.focus {
            if let Some(previous) = self.current.take() {
                doc.remove_class(previous, &self.class);
            }
            if self.mouse_click {
                return true;
            }
            self.current = doc.active_element();
            if let Some(current) = self.current {
                doc.add_class(current, &self.class);
            }
        } else {
            return false;
        }
        true
    }
}
