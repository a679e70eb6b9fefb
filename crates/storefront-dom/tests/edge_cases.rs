//! Edge case tests for storefront-dom
//!
//! Boundary conditions around tree mutation, selectors and dispatch that the
//! behaviour crates depend on.

use storefront_dom::{
    Document, DomError, Event, EventHandler, EventTarget, EventType, HandlerId, Key, KeyModifiers,
    ListenerOptions, NodeId, RuntimeFeatures, SelectorError,
};

// ============================================================================
// TREE EDGE CASES
// ============================================================================

#[test]
fn test_append_into_own_descendant_is_rejected() {
    let mut doc = Document::new();
    let outer = doc.create_child(doc.body(), "div");
    let inner = doc.create_child(outer, "div");

    let err = doc.append_child(inner, outer).unwrap_err();
    assert!(matches!(err, DomError::HierarchyRequest { .. }));
    assert_eq!(doc.parent_element(inner), Some(outer));
}

#[test]
fn test_append_missing_node() {
    let mut doc = Document::new();
    let err = doc.append_child(doc.body(), NodeId::NONE).unwrap_err();
    assert!(matches!(err, DomError::NotFound(_)));
}

#[test]
fn test_reparenting_moves_node() {
    let mut doc = Document::new();
    let a = doc.create_child(doc.body(), "div");
    let b = doc.create_child(doc.body(), "div");
    let child = doc.create_child(a, "span");

    doc.append_child(b, child).unwrap();
    assert_eq!(doc.tree().children(a).count(), 0);
    assert_eq!(doc.parent_element(child), Some(b));
}

#[test]
fn test_unicode_text_content() {
    let mut doc = Document::new();
    let option = doc.create_child(doc.body(), "option");
    doc.set_text_content(option, "  Québec  ");
    assert_eq!(doc.option_label(option), "Québec");
    assert_eq!(doc.value(option), "Québec");
}

// ============================================================================
// SELECTOR EDGE CASES
// ============================================================================

#[test]
fn test_query_selector_errors_surface() {
    let doc = Document::new();
    assert!(matches!(doc.query_selector_all(doc.body(), ""), Err(SelectorError::Empty)));
    assert!(matches!(
        doc.query_selector(doc.body(), ":hover"),
        Err(SelectorError::UnsupportedPseudoClass(_))
    ));
}

#[test]
fn test_legacy_runtime_rejects_focus_visible() {
    let doc = Document::with_features(RuntimeFeatures::legacy());
    assert!(doc.query_selector(NodeId::ROOT, ":focus-visible").is_err());
    assert!(doc.query_selector(NodeId::ROOT, ":focus").is_ok());
}

#[test]
fn test_closest_includes_self() {
    let mut doc = Document::new();
    let details = doc.create_child(doc.body(), "details");
    doc.set_attribute(details, "open", "");
    let summary = doc.create_child(details, "summary");

    assert_eq!(doc.closest(details, "details[open]").unwrap(), Some(details));
    assert_eq!(doc.closest(summary, "details[open]").unwrap(), Some(details));
    assert_eq!(doc.closest(summary, "header-drawer, menu-drawer").unwrap(), None);
}

#[test]
fn test_query_selector_all_is_in_tree_order() {
    let mut doc = Document::new();
    let first = doc.create_child(doc.body(), "iframe");
    let wrapper = doc.create_child(doc.body(), "div");
    let nested = doc.create_child(wrapper, "iframe");
    let last = doc.create_child(doc.body(), "iframe");
    for frame in [first, nested, last] {
        doc.add_class(frame, "js-youtube");
    }

    let found = doc.query_selector_all(NodeId::ROOT, ".js-youtube").unwrap();
    assert_eq!(found, vec![first, nested, last]);
}

#[test]
fn test_native_focus_visible_follows_modality() {
    let mut doc = Document::new();
    let button = doc.create_child(doc.body(), "button");

    doc.key_down(Key::Tab, KeyModifiers::NONE, &mut ());
    assert!(doc.matches(button, ":focus-visible").unwrap());

    doc.mouse_down(button, &mut ());
    assert!(doc.matches(button, ":focus").unwrap());
    assert!(!doc.matches(button, ":focus-visible").unwrap());
}

// ============================================================================
// DISPATCH EDGE CASES
// ============================================================================

/// Removes a sibling listener while running, and refocuses on demand
struct Mutating {
    remove: Option<(EventTarget, HandlerId)>,
    focus_on_call: Option<NodeId>,
    seen: Vec<HandlerId>,
}

impl EventHandler for Mutating {
    fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, event: &mut Event) {
        self.seen.push(handler);
        if let Some((target, victim)) = self.remove.take() {
            doc.remove_event_listener(target, &event.event_type, victim, false);
        }
        if let Some(node) = self.focus_on_call.take() {
            doc.focus(node);
        }
    }
}

#[test]
fn test_listener_removed_during_dispatch_is_skipped() {
    let mut doc = Document::new();
    let first = doc.allocate_handler();
    let second = doc.allocate_handler();
    doc.add_event_listener(EventTarget::DOCUMENT, EventType::KeyDown, first, ListenerOptions::default());
    doc.add_event_listener(EventTarget::DOCUMENT, EventType::KeyDown, second, ListenerOptions::default());

    let mut handler = Mutating {
        remove: Some((EventTarget::DOCUMENT, second)),
        focus_on_call: None,
        seen: Vec::new(),
    };
    doc.key_down(Key::Escape, KeyModifiers::NONE, &mut handler);
    assert_eq!(handler.seen, vec![first]);
}

#[test]
fn test_focus_inside_listener_fires_events_before_next_listener() {
    let mut doc = Document::new();
    let button = doc.create_child(doc.body(), "button");
    let on_click = doc.allocate_handler();
    let on_focus = doc.allocate_handler();
    let after = doc.allocate_handler();
    doc.add_event_listener(doc.body(), EventType::Click, on_click, ListenerOptions::default());
    doc.add_event_listener(button, EventType::Focus, on_focus, ListenerOptions::default());
    doc.add_event_listener(doc.body(), EventType::Click, after, ListenerOptions::default());

    let mut handler = Mutating { remove: None, focus_on_call: Some(button), seen: Vec::new() };
    doc.click(doc.body(), &mut handler);
    assert_eq!(handler.seen, vec![on_click, on_focus, after]);
}

#[test]
fn test_detached_target_skips_window() {
    let mut doc = Document::new();
    let detached = doc.create_element("div");
    let h = doc.allocate_handler();
    doc.add_event_listener(EventTarget::Window, EventType::Click, h, ListenerOptions::capture());

    let mut handler = Mutating { remove: None, focus_on_call: None, seen: Vec::new() };
    assert!(doc.click(detached, &mut handler));
    assert!(handler.seen.is_empty());
}

#[test]
fn test_custom_event_reaches_document_listener() {
    let mut doc = Document::new();
    let h = doc.allocate_handler();
    doc.add_event_listener(
        EventTarget::DOCUMENT,
        EventType::parse("product-model:pause"),
        h,
        ListenerOptions::default(),
    );

    let mut handler = Mutating { remove: None, focus_on_call: None, seen: Vec::new() };
    doc.dispatch_custom("product-model:pause", EventTarget::DOCUMENT, &mut handler);
    assert_eq!(handler.seen, vec![h]);
}

#[test]
fn test_queued_focus_moves_fire_in_queue_order() {
    let mut doc = Document::new();
    let body = doc.body();
    let [a, b, c] = [(); 3].map(|_| doc.create_child(body, "button"));
    let [on_a, on_b, on_c] = [(); 3].map(|_| doc.allocate_handler());
    doc.add_event_listener(a, EventType::Focus, on_a, ListenerOptions::default());
    doc.add_event_listener(b, EventType::Focus, on_b, ListenerOptions::default());
    doc.add_event_listener(c, EventType::Focus, on_c, ListenerOptions::default());

    doc.focus(a);
    doc.focus(b);
    assert!(doc.has_pending_focus_changes());

    // The focus listener on `a` moves focus on to `c`
    let mut handler = Mutating { remove: None, focus_on_call: Some(c), seen: Vec::new() };
    doc.flush_focus_events(&mut handler);

    assert_eq!(handler.seen, vec![on_a, on_b, on_c]);
    assert_eq!(doc.active_element(), Some(c));
    assert!(!doc.has_pending_focus_changes());
}
