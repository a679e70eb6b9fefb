//! Event routing for the accessibility behaviours

use storefront_dom::{Document, Event, EventHandler, HandlerId, NodeId};

use crate::{DisclosureController, FocusTrapManager, FocusVisiblePolyfill};

/// Owns the behaviours and hands each listener callback to the one that
/// registered it
#[derive(Debug, Default)]
pub struct A11yHandlers {
    pub traps: FocusTrapManager,
    pub polyfill: Option<FocusVisiblePolyfill>,
    pub disclosures: Option<DisclosureController>,
}

impl A11yHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trap focus inside `container`
    pub fn trap_focus(&mut self, doc: &mut Document, container: NodeId, element_to_focus: Option<NodeId>) {
        self.traps.activate(doc, container, element_to_focus);
        doc.flush_focus_events(self);
    }

    /// Release the active trap
    pub fn remove_trap_focus(&mut self, doc: &mut Document, element_to_focus: Option<NodeId>) {
        self.traps.release(doc, element_to_focus);
        doc.flush_focus_events(self);
    }

    /// Open a disclosure widget with focus trapped inside
    pub fn open_disclosure(&mut self, doc: &mut Document, details: NodeId) {
        if let Some(disclosures) = self.disclosures.as_mut() {
            disclosures.open(doc, &mut self.traps, details);
        }
        doc.flush_focus_events(self);
    }

    /// Close a disclosure widget and return focus to its summary
    pub fn close_disclosure(&mut self, doc: &mut Document, details: NodeId) {
        if let Some(disclosures) = self.disclosures.as_mut() {
            disclosures.close(doc, &mut self.traps, details);
        }
        doc.flush_focus_events(self);
    }

    /// Drain widgets closed since the last call
    pub fn take_closed(&mut self) -> Vec<NodeId> {
        self.disclosures
            .as_mut()
            .map(DisclosureController::take_closed)
            .unwrap_or_default()
    }

    /// Route an event; returns false if no behaviour owns the handler id
    pub fn dispatch(&mut self, doc: &mut Document, handler: HandlerId, event: &mut Event) -> bool {
        if self.traps.handle_event(doc, handler, event) {
            return true;
        }
        if let Some(polyfill) = self.polyfill.as_mut() {
            if polyfill.handle_event(doc, handler, event) {
                return true;
            }
        }
        if let Some(disclosures) = self.disclosures.as_mut() {
            return disclosures.handle_event(doc, &mut self.traps, handler, event);
        }
        false
    }
}

impl EventHandler for A11yHandlers {
    fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, event: &mut Event) {
        if !self.dispatch(doc, handler, event) {
            tracing::trace!("No behaviour owns handler {:?}", handler);
        }
    }
}
