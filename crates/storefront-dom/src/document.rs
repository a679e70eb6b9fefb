//! Document - High-level document API
//!
//! Wraps the arena tree with the element-level operations page scripts use:
//! attributes, classes, inline display, form values, selector queries and
//! listener registration. Every operation on a missing or non-element id is
//! a silent no-op.

use std::collections::VecDeque;

use crate::events::{EventTarget, EventType, HandlerId, ListenerId, ListenerOptions, ListenerRegistry};
use crate::focus::FocusChange;
use crate::selector::{SelectorError, SelectorList};
use crate::{style, DOMTokenList, DomError, DomTree, ElementData, NodeId, Outbox};

/// Platform capabilities page scripts check for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeFeatures {
    /// Whether the selector engine understands `:focus-visible`
    pub focus_visible_selector: bool,
}

impl RuntimeFeatures {
    /// An older engine without `:focus-visible`
    pub fn legacy() -> Self {
        Self { focus_visible_selector: false }
    }
}

impl Default for RuntimeFeatures {
    fn default() -> Self {
        Self { focus_visible_selector: true }
    }
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    features: RuntimeFeatures,
    listeners: ListenerRegistry,
    next_handler: u64,
    pub(crate) active: Option<NodeId>,
    pub(crate) pending_focus: VecDeque<FocusChange>,
    /// Most recent user input came from a pointer
    pub(crate) pointer_modality: bool,
    pub(crate) outbox: Outbox,
}

impl Document {
    /// Create a document with `html > (head, body)`
    pub fn new() -> Self {
        Self::with_features(RuntimeFeatures::default())
    }

    /// Create a document for a platform with the given capabilities
    pub fn with_features(features: RuntimeFeatures) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh nodes under the root cannot fail to attach
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
            features,
            listeners: ListenerRegistry::new(),
            next_handler: 0,
            active: None,
            pending_focus: VecDeque::new(),
            pointer_modality: false,
            outbox: Outbox::default(),
        }
    }

    /// Platform capabilities
    pub fn features(&self) -> RuntimeFeatures {
        self.features
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    // === Tree ===

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.tree.create_text(text)
    }

    /// Append `child` to `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.append_child(parent, child)
    }

    /// Create an element and append it to `parent`
    pub fn create_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.tree.create_element(tag);
        if let Err(err) = self.tree.append_child(parent, id) {
            tracing::trace!("create_child left {} detached: {}", id, err);
        }
        id
    }

    /// Detach a node from the document
    pub fn remove(&mut self, id: NodeId) {
        if let Some(active) = self.active {
            if self.tree.is_inclusive_ancestor(id, active) {
                self.active = None;
            }
        }
        self.tree.detach(id);
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.tree.parent(child) != Some(parent) {
            return false;
        }
        self.remove(child);
        true
    }

    /// Remove every child of `parent`
    pub fn replace_children(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = self.tree.children(parent).collect();
        for child in children {
            self.remove(child);
        }
        if let Some(el) = self.tree.element_mut(parent) {
            el.state.selected_index = None;
        }
    }

    /// Lowercased tag name
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.element(id).map(|e| e.tag.as_str())
    }

    /// Check whether `id` is an element with the given tag
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tree.is_tag(id, tag)
    }

    /// Parent element (None for children of the document node)
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id).filter(|&p| self.tree.element(p).is_some())
    }

    /// Next element sibling
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.tree.next_element_sibling(id)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.tree.get(id).and_then(|n| n.as_text()) {
            return text.to_string();
        }
        self.tree
            .descendants(id)
            .filter_map(|d| self.tree.get(d).and_then(|n| n.as_text()))
            .collect()
    }

    /// Replace children with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if self.tree.element(id).is_none() {
            return;
        }
        self.replace_children(id);
        if !text.is_empty() {
            let node = self.tree.create_text(text);
            let _ = self.tree.append_child(id, node);
        }
    }

    /// Find an element by its `id` attribute
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .find(|&n| self.get_attribute(n, "id") == Some(id))
    }

    // === Attributes ===

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.element(id).and_then(|e| e.get_attr(name))
    }

    /// Check if an attribute is present
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(el) = self.tree.element_mut(id) else { return };
        el.attrs.set_attribute(name, value);
        if name.eq_ignore_ascii_case("class") {
            el.classes = DOMTokenList::parse(value);
        }
    }

    /// Remove an attribute
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        let Some(el) = self.tree.element_mut(id) else { return };
        el.attrs.remove_attribute(name);
        if name.eq_ignore_ascii_case("class") {
            el.classes = DOMTokenList::new();
        }
    }

    /// Toggle a boolean attribute
    pub fn toggle_attribute(&mut self, id: NodeId, name: &str, force: Option<bool>) -> bool {
        self.tree
            .element_mut(id)
            .is_some_and(|el| el.attrs.toggle_attribute(name, force))
    }

    // === Classes ===

    /// Class list of an element
    pub fn class_list(&self, id: NodeId) -> Option<&DOMTokenList> {
        self.tree.element(id).map(|e| &e.classes)
    }

    /// Check for a class
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id).is_some_and(|c| c.contains(class))
    }

    /// Add a class
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        self.update_classes(id, |classes| {
            classes.add(class);
        });
    }

    /// Remove a class
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.update_classes(id, |classes| {
            classes.remove(class);
        });
    }

    fn update_classes(&mut self, id: NodeId, f: impl FnOnce(&mut DOMTokenList)) {
        let Some(el) = self.tree.element_mut(id) else { return };
        f(&mut el.classes);
        let value = el.classes.value();
        el.attrs.set_attribute("class", &value);
    }

    // === Inline style ===

    /// Inline `display` value, empty when unset
    pub fn style_display(&self, id: NodeId) -> &str {
        self.get_attribute(id, "style")
            .and_then(style::display_of)
            .unwrap_or("")
    }

    /// Set inline `display`; an empty value resets it to the default
    pub fn set_style_display(&mut self, id: NodeId, value: &str) {
        let Some(el) = self.tree.element_mut(id) else { return };
        let current = el.attrs.get_attribute("style").unwrap_or("");
        let updated = style::with_display(current, value);
        if updated.is_empty() {
            el.attrs.remove_attribute("style");
        } else {
            el.attrs.set_attribute("style", &updated);
        }
    }

    // === Form values ===

    /// Current value of a form control or option
    pub fn value(&self, id: NodeId) -> String {
        let Some(el) = self.tree.element(id) else { return String::new() };
        match el.tag.as_str() {
            "option" => el
                .get_attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| self.option_label(id)),
            "select" => self
                .selected_index(id)
                .and_then(|i| self.options(id).get(i).copied())
                .map(|opt| self.value(opt))
                .unwrap_or_default(),
            "textarea" => el.state.value.clone().unwrap_or_else(|| self.text_content(id)),
            _ => el
                .state
                .value
                .clone()
                .or_else(|| el.get_attr("value").map(str::to_string))
                .unwrap_or_default(),
        }
    }

    /// Set the dirty value of an input or textarea; the caret moves to the end
    pub fn set_value(&mut self, id: NodeId, value: &str) {
        let Some(el) = self.tree.element_mut(id) else { return };
        let len = value.chars().count();
        el.state.value = Some(value.to_string());
        el.state.selection = Some((len, len));
    }

    /// Visible label of an option
    pub fn option_label(&self, id: NodeId) -> String {
        self.text_content(id).trim().to_string()
    }

    /// Options of a select, in tree order (including inside optgroups)
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        if !self.is_tag(select, "select") {
            return Vec::new();
        }
        self.tree
            .descendants(select)
            .filter(|&d| self.is_tag(d, "option"))
            .collect()
    }

    /// Index of the selected option
    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        let el = self.tree.element(select)?;
        let options = self.options(select);
        if options.is_empty() {
            return None;
        }
        match el.state.selected_index {
            Some(i) if i < options.len() => Some(i),
            Some(_) => None,
            None => options
                .iter()
                .position(|&o| self.has_attribute(o, "selected"))
                .or(Some(0)),
        }
    }

    /// Select an option by index; out-of-range indices clear the selection
    pub fn set_selected_index(&mut self, select: NodeId, index: usize) {
        let count = self.options(select).len();
        if let Some(el) = self.tree.element_mut(select) {
            el.state.selected_index = Some(if index < count { index } else { usize::MAX });
        }
    }

    // === Media ===

    /// Pause a media element
    pub fn pause_media(&mut self, id: NodeId) {
        if let Some(el) = self.tree.element_mut(id) {
            el.state.paused = true;
        }
    }

    /// Start playback of a media element
    pub fn play_media(&mut self, id: NodeId) {
        if let Some(el) = self.tree.element_mut(id) {
            el.state.paused = false;
        }
    }

    /// Check whether a media element is paused
    pub fn is_paused(&self, id: NodeId) -> bool {
        self.tree.element(id).is_none_or(|e| e.state.paused)
    }

    pub(crate) fn element_data(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.element(id)
    }

    pub(crate) fn element_data_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.tree.element_mut(id)
    }

    // === Listeners ===

    /// Allocate a fresh handler id for a behaviour callback
    pub fn allocate_handler(&mut self) -> HandlerId {
        self.next_handler += 1;
        HandlerId(self.next_handler)
    }

    /// Register a listener
    pub fn add_event_listener(
        &mut self,
        target: impl Into<EventTarget>,
        event_type: EventType,
        handler: HandlerId,
        options: ListenerOptions,
    ) -> ListenerId {
        self.listeners.add(target.into(), event_type, handler, options)
    }

    /// Remove a listener registered with the same target, type, handler and phase
    pub fn remove_event_listener(
        &mut self,
        target: impl Into<EventTarget>,
        event_type: &EventType,
        handler: HandlerId,
        capture: bool,
    ) -> bool {
        self.listeners.remove(target.into(), event_type, handler, capture)
    }

    /// Listener registry
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub(crate) fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    // === Selectors ===

    /// Parse a selector against this document's capabilities
    pub fn parse_selector(&self, selector: &str) -> Result<SelectorList, SelectorError> {
        SelectorList::parse_with(selector, self.features)
    }

    /// First descendant of `root` matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let list = self.parse_selector(selector)?;
        Ok(self.tree.descendants(root).find(|&d| list.matches(self, d)))
    }

    /// All descendants of `root` matching `selector`, in tree order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = self.parse_selector(selector)?;
        Ok(self.select_all(root, &list))
    }

    /// All descendants of `root` matching a parsed selector
    pub fn select_all(&self, root: NodeId, list: &SelectorList) -> Vec<NodeId> {
        self.tree
            .descendants(root)
            .filter(|&d| list.matches(self, d))
            .collect()
    }

    /// Check whether an element matches `selector`
    pub fn matches(&self, id: NodeId, selector: &str) -> Result<bool, SelectorError> {
        let list = self.parse_selector(selector)?;
        Ok(list.matches(self, id))
    }

    /// Closest inclusive ancestor matching `selector`
    pub fn closest(&self, id: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let list = self.parse_selector(selector)?;
        Ok(self.closest_matching(id, &list))
    }

    /// Closest inclusive ancestor matching a parsed selector
    pub fn closest_matching(&self, id: NodeId, list: &SelectorList) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.tree.ancestors(id))
            .find(|&n| list.matches(self, n))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
