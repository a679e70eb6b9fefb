//! Disclosure widgets
//!
//! Wires `details`/`summary` widgets: the summary gets `role="button"`,
//! `aria-expanded` and `aria-controls`; clicks keep `aria-expanded` in step
//! with the open state; Escape inside an open widget closes it and returns
//! focus to its summary. Widgets inside navigation drawers keep their own
//! Escape handling.

use storefront_dom::{Document, Event, EventType, HandlerId, ListenerOptions, NodeId};

use crate::aria::{self, AriaRole};
use crate::trap::FocusTrapManager;
use crate::A11yError;

/// One wired widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disclosure {
    pub details: NodeId,
    pub summary: NodeId,
    /// Escape closes this widget (false inside drawers)
    pub escape_bound: bool,
}

/// Wiring for every disclosure widget present at install time
#[derive(Debug)]
pub struct DisclosureController {
    widgets: Vec<Disclosure>,
    click: HandlerId,
    escape: HandlerId,
    closed: Vec<NodeId>,
}

impl DisclosureController {
    /// Wire every summary matching `summary_selector`. Summaries inside an
    /// element matching `drawer_selector` get no Escape binding.
    pub fn install(doc: &mut Document, summary_selector: &str, drawer_selector: &str) -> Result<Self, A11yError> {
        let summaries = doc.query_selector_all(NodeId::ROOT, summary_selector)?;
        let drawers = doc.parse_selector(drawer_selector)?;

        let mut controller = Self {
            widgets: Vec::with_capacity(summaries.len()),
            click: doc.allocate_handler(),
            escape: doc.allocate_handler(),
            closed: Vec::new(),
        };

        for summary in summaries {
            let Some(details) = doc.parent_element(summary) else { continue };

            aria::set_role(doc, summary, AriaRole::Button);
            let open = doc.has_attribute(details, "open");
            aria::set_expanded(doc, summary, open);

            if let Some(content) = doc.next_element_sibling(summary) {
                if let Some(id) = doc.get_attribute(content, "id").map(str::to_string) {
                    aria::set_controls(doc, summary, &id);
                }
            }

            doc.add_event_listener(summary, EventType::Click, controller.click, ListenerOptions::default());

            let escape_bound = doc.closest_matching(summary, &drawers).is_none();
            if escape_bound {
                doc.add_event_listener(details, EventType::KeyUp, controller.escape, ListenerOptions::default());
            }
            controller.widgets.push(Disclosure { details, summary, escape_bound });
        }

        tracing::debug!("Wired {} disclosure widgets", controller.widgets.len());
        Ok(controller)
    }

    /// Wired widgets in document order
    pub fn widgets(&self) -> &[Disclosure] {
        &self.widgets
    }

    /// Widget whose `details` element is `details`
    pub fn widget(&self, details: NodeId) -> Option<&Disclosure> {
        self.widgets.iter().find(|w| w.details == details)
    }

    /// Drain the `details` elements closed with Escape since the last call
    pub fn take_closed(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.closed)
    }

    /// Open a widget and trap focus inside it, starting at the summary
    pub fn open(&mut self, doc: &mut Document, traps: &mut FocusTrapManager, details: NodeId) {
        let Some(summary) = doc.details_summary(details) else {
            tracing::trace!("open({}) ignored: no summary", details);
            return;
        };
        doc.set_attribute(details, "open", "");
        aria::set_expanded(doc, summary, true);
        traps.activate(doc, details, Some(summary));
    }

    /// Close a widget, release a trap held inside it and focus the summary
    pub fn close(&mut self, doc: &mut Document, traps: &mut FocusTrapManager, details: NodeId) {
        let Some(summary) = doc.details_summary(details) else {
            tracing::trace!("close({}) ignored: no summary", details);
            return;
        };
        doc.remove_attribute(details, "open");
        aria::set_expanded(doc, summary, false);

        let trapped_inside = traps
            .active_trap()
            .is_some_and(|t| doc.tree().is_inclusive_ancestor(details, t.container));
        if trapped_inside {
            traps.release(doc, None);
        }
        doc.focus(summary);
        self.closed.push(details);
    }

    /// Handle an event for the controller's listeners. Returns false when
    /// the handler id is not the controller's.
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        traps: &mut FocusTrapManager,
        handler: HandlerId,
        event: &mut Event,
    ) -> bool {
        if handler == self.click {
            self.on_summary_click(doc, event);
        } else if handler == self.escape {
            self.on_key_up_escape(doc, traps, event);
        } else {
            return false;
        }
        true
    }

    /// Runs before the default action toggles `open`, so the new state is the
    /// negation of the current one
    fn on_summary_click(&self, doc: &mut Document, event: &Event) {
        let Some(summary) = event.current_target.and_then(|t| t.node()) else { return };
        let Ok(Some(details)) = doc.closest(summary, "details") else { return };
        let expanded = !doc.has_attribute(details, "open");
        aria::set_expanded(doc, summary, expanded);
    }

    fn on_key_up_escape(&mut self, doc: &mut Document, traps: &mut FocusTrapManager, event: &Event) {
        if !event.code().is_some_and(|c| c.eq_ignore_ascii_case("escape")) {
            return;
        }
        let Some(target) = event.target_node() else { return };
        let Ok(Some(open_details)) = doc.closest(target, "details[open]") else { return };

        tracing::debug!("Escape closes disclosure {}", open_details);
        self.close(doc, traps, open_details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = r#"[id^="Details-"] summary"#;
    const DRAWERS: &str = "header-drawer, menu-drawer";

    fn widget(doc: &mut Document, parent: NodeId, id: &str, content_id: Option<&str>) -> (NodeId, NodeId) {
        let details = doc.create_child(parent, "details");
        doc.set_attribute(details, "id", id);
        let summary = doc.create_child(details, "summary");
        let content = doc.create_child(details, "div");
        if let Some(content_id) = content_id {
            doc.set_attribute(content, "id", content_id);
        }
        (details, summary)
    }

    #[test]
    fn test_install_sets_aria() {
        let mut doc = Document::new();
        let body = doc.body();
        let (details, summary) = widget(&mut doc, body, "Details-filter", Some("Filter-panel"));
        doc.set_attribute(details, "open", "");
        let (_, plain_summary) = widget(&mut doc, body, "Details-sort", None);

        let controller = DisclosureController::install(&mut doc, SUMMARY, DRAWERS).unwrap();
        assert_eq!(controller.widgets().len(), 2);
        assert_eq!(doc.get_attribute(summary, "role"), Some("button"));
        assert_eq!(doc.get_attribute(summary, "aria-expanded"), Some("true"));
        assert_eq!(doc.get_attribute(summary, "aria-controls"), Some("Filter-panel"));
        assert_eq!(doc.get_attribute(plain_summary, "aria-expanded"), Some("false"));
        assert!(!doc.has_attribute(plain_summary, "aria-controls"));
    }

    #[test]
    fn test_drawer_widgets_skip_escape() {
        let mut doc = Document::new();
        let drawer = doc.create_child(doc.body(), "menu-drawer");
        let (details, _) = widget(&mut doc, drawer, "Details-menu", None);

        let controller = DisclosureController::install(&mut doc, SUMMARY, DRAWERS).unwrap();
        let wired = controller.widget(details).unwrap();
        assert!(!wired.escape_bound);
        // Click binding still present
        assert_eq!(doc.listeners().len(), 1);
    }

    #[test]
    fn test_unmatched_details_are_ignored() {
        let mut doc = Document::new();
        let body = doc.body();
        widget(&mut doc, body, "Accordion-1", None);
        let controller = DisclosureController::install(&mut doc, SUMMARY, DRAWERS).unwrap();
        assert!(controller.widgets().is_empty());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let mut doc = Document::new();
        assert!(matches!(
            DisclosureController::install(&mut doc, "summary::marker", DRAWERS),
            Err(A11yError::Selector(_))
        ));
    }

    #[test]
    fn test_open_and_close_manage_trap() {
        let mut doc = Document::new();
        let body = doc.body();
        let (details, summary) = widget(&mut doc, body, "Details-cart", None);
        let mut controller = DisclosureController::install(&mut doc, SUMMARY, DRAWERS).unwrap();
        let mut traps = FocusTrapManager::new();

        controller.open(&mut doc, &mut traps, details);
        assert!(doc.has_attribute(details, "open"));
        assert_eq!(doc.active_element(), Some(summary));
        assert_eq!(traps.active_trap().map(|t| t.container), Some(details));

        controller.close(&mut doc, &mut traps, details);
        assert!(!doc.has_attribute(details, "open"));
        assert_eq!(aria::is_expanded(&doc, summary), Some(false));
        assert!(!traps.is_active());
        assert_eq!(controller.take_closed(), vec![details]);
        assert!(controller.take_closed().is_empty());
    }
}
