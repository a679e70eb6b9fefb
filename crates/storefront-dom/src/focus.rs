//! Focus
//!
//! Focusability rules, the active element, sequential (Tab) navigation order
//! and text selection of inputs. Focus moves are recorded as `FocusChange`s;
//! the dispatcher turns them into blur/focusout/focus/focusin events.

use std::collections::HashMap;

use crate::{Document, NodeId};

/// A completed focus move waiting for its events to be fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub from: Option<NodeId>,
    pub to: Option<NodeId>,
}

/// Parsed `tabindex`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// Negative: focusable by script or pointer, skipped by Tab
    Programmatic(i32),
    /// Zero or positive: part of the Tab sequence
    Sequential(i32),
}

impl TabIndex {
    /// Parse an attribute value; invalid values yield None
    pub fn parse(value: &str) -> Option<Self> {
        let n = value.trim().parse::<i32>().ok()?;
        Some(if n < 0 { Self::Programmatic(n) } else { Self::Sequential(n) })
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }

    pub fn value(&self) -> i32 {
        match *self {
            Self::Programmatic(n) | Self::Sequential(n) => n,
        }
    }
}

const DISABLEABLE: &[&str] = &["button", "input", "select", "textarea", "fieldset", "optgroup", "option"];
const SELECTABLE_INPUTS: &[&str] = &["text", "search", "url", "tel", "password", "email"];

impl Document {
    /// Currently focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Focused element when focus should be visibly indicated
    pub fn focus_visible_element(&self) -> Option<NodeId> {
        self.active.filter(|_| !self.pointer_modality)
    }

    /// Check whether an element can be disabled at all
    pub fn is_disableable(&self, id: NodeId) -> bool {
        self.tag_name(id).is_some_and(|tag| DISABLEABLE.contains(&tag))
    }

    /// Check whether a form control is disabled (own attribute, disabled
    /// optgroup, or disabled fieldset ancestor)
    pub fn is_disabled(&self, id: NodeId) -> bool {
        let Some(tag) = self.tag_name(id) else { return false };
        if !DISABLEABLE.contains(&tag) {
            return false;
        }
        if self.has_attribute(id, "disabled") {
            return true;
        }
        if tag == "option" {
            return self
                .parent_element(id)
                .is_some_and(|p| self.is_tag(p, "optgroup") && self.has_attribute(p, "disabled"));
        }
        self.tree()
            .ancestors(id)
            .any(|a| self.is_tag(a, "fieldset") && self.has_attribute(a, "disabled"))
    }

    /// Check whether an element is being rendered: attached, not `hidden`,
    /// not `display: none`, and not inside a closed `details` (other than its
    /// summary)
    pub fn is_rendered(&self, id: NodeId) -> bool {
        if self.tree().element(id).is_none() || !self.tree().is_connected(id) {
            return false;
        }

        let mut child = id;
        for node in std::iter::once(id).chain(self.tree().ancestors(id)) {
            if self.tree().element(node).is_none() {
                break;
            }
            if self.has_attribute(node, "hidden") || self.style_display(node) == "none" {
                return false;
            }
            if node != id
                && self.is_tag(node, "details")
                && !self.has_attribute(node, "open")
                && self.details_summary(node) != Some(child)
            {
                return false;
            }
            child = node;
        }
        true
    }

    /// First `summary` child of a `details` element
    pub fn details_summary(&self, details: NodeId) -> Option<NodeId> {
        self.tree()
            .element_children(details)
            .find(|&c| self.is_tag(c, "summary"))
    }

    /// Check whether an element is focusable without a `tabindex`
    pub fn is_natively_focusable(&self, id: NodeId) -> bool {
        let Some(tag) = self.tag_name(id) else { return false };
        match tag {
            "a" | "area" => self.has_attribute(id, "href"),
            "button" | "select" | "textarea" => !self.is_disabled(id),
            "input" => !self.is_input_type(id, "hidden") && !self.is_disabled(id),
            "summary" => self
                .parent_element(id)
                .is_some_and(|p| self.is_tag(p, "details") && self.details_summary(p) == Some(id)),
            "iframe" | "object" | "embed" => true,
            "audio" | "video" => self.has_attribute(id, "controls"),
            _ => self
                .get_attribute(id, "contenteditable")
                .is_some_and(|v| !v.eq_ignore_ascii_case("false")),
        }
    }

    /// Effective tab index, None when the element is not focusable at all
    pub fn tab_index(&self, id: NodeId) -> Option<TabIndex> {
        match self.get_attribute(id, "tabindex").and_then(TabIndex::parse) {
            Some(explicit) => Some(explicit),
            None if self.is_natively_focusable(id) => Some(TabIndex::Sequential(0)),
            None => None,
        }
    }

    /// Check whether `focus()` would succeed
    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.is_rendered(id) && !self.is_disabled(id) && self.tab_index(id).is_some()
    }

    /// Move focus to `id`. Non-focusable targets and the already focused
    /// element are silently ignored. Returns whether focus moved.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_focusable(id) {
            tracing::trace!("focus({}) ignored: not focusable", id);
            return false;
        }
        if self.active == Some(id) {
            return false;
        }
        let from = self.active.replace(id);
        self.pending_focus.push_back(FocusChange { from, to: Some(id) });
        true
    }

    /// Remove focus from the active element
    pub fn blur(&mut self) {
        if let Some(from) = self.active.take() {
            self.pending_focus.push_back(FocusChange { from: Some(from), to: None });
        }
    }

    /// Check for focus moves whose events have not been fired yet
    pub fn has_pending_focus_changes(&self) -> bool {
        !self.pending_focus.is_empty()
    }

    pub(crate) fn take_focus_change(&mut self) -> Option<FocusChange> {
        self.pending_focus.pop_front()
    }

    /// Elements reachable with Tab: positive tab indices first (ascending),
    /// then zero in tree order
    pub fn sequential_focus_order(&self) -> Vec<NodeId> {
        let mut order: Vec<(NodeId, i32)> = self
            .tree()
            .descendants(NodeId::ROOT)
            .filter(|&n| self.is_focusable(n))
            .filter_map(|n| match self.tab_index(n) {
                Some(TabIndex::Sequential(v)) => Some((n, v)),
                _ => None,
            })
            .collect();
        order.sort_by_key(|&(_, v)| if v == 0 { i32::MAX } else { v });
        order.into_iter().map(|(n, _)| n).collect()
    }

    /// Element Tab (or Shift+Tab) would move to from `from`; wraps around
    pub fn next_in_sequence(&self, from: Option<NodeId>, backward: bool) -> Option<NodeId> {
        let order = self.sequential_focus_order();
        let len = order.len();
        if len == 0 {
            return None;
        }

        let Some(from) = from else {
            return if backward { order.last().copied() } else { order.first().copied() };
        };

        if let Some(pos) = order.iter().position(|&n| n == from) {
            let next = if backward { (pos + len - 1) % len } else { (pos + 1) % len };
            return Some(order[next]);
        }

        // Starting point outside the sequence (e.g. a tabindex="-1" container):
        // continue from its position in tree order
        let position: HashMap<NodeId, usize> = self
            .tree()
            .descendants(NodeId::ROOT)
            .enumerate()
            .map(|(i, n)| (n, i))
            .collect();
        let from_pos = position.get(&from).copied().unwrap_or(0);
        let found = if backward {
            order.iter().rev().find(|n| position.get(n).is_some_and(|&p| p < from_pos))
        } else {
            order.iter().find(|n| position.get(n).is_some_and(|&p| p > from_pos))
        };
        found.copied().or(if backward { order.last().copied() } else { order.first().copied() })
    }

    /// Check whether an input's type is `ty` (missing/unknown type is "text")
    pub fn is_input_type(&self, id: NodeId, ty: &str) -> bool {
        self.is_tag(id, "input") && self.input_type(id) == ty
    }

    /// Normalised `type` of an input
    pub fn input_type(&self, id: NodeId) -> String {
        self.get_attribute(id, "type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    }

    /// Select a range of an input's or textarea's value (char offsets,
    /// clamped to the value length)
    pub fn set_selection_range(&mut self, id: NodeId, start: usize, end: usize) {
        let supported = self.is_tag(id, "textarea")
            || (self.is_tag(id, "input") && SELECTABLE_INPUTS.contains(&self.input_type(id).as_str()));
        if !supported {
            return;
        }
        let len = self.value(id).chars().count();
        let end = end.min(len);
        let start = start.min(end);
        if let Some(el) = self.element_data_mut(id) {
            el.state.selection = Some((start, end));
        }
    }

    /// Current selection of an input or textarea
    pub fn selection_range(&self, id: NodeId) -> Option<(usize, usize)> {
        self.element_data(id).and_then(|e| e.state.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_index_parse() {
        assert_eq!(TabIndex::parse("-1"), Some(TabIndex::Programmatic(-1)));
        assert_eq!(TabIndex::parse("0"), Some(TabIndex::Sequential(0)));
        assert_eq!(TabIndex::parse(" 5 "), Some(TabIndex::Sequential(5)));
        assert_eq!(TabIndex::parse("abc"), None);
        assert!(!TabIndex::Programmatic(-1).is_sequential());
    }

    #[test]
    fn test_focusability_rules() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.create_child(body, "div");
        let link = doc.create_child(body, "a");
        let anchor = doc.create_child(body, "a");
        let disabled = doc.create_child(body, "button");
        let hidden_input = doc.create_child(body, "input");
        doc.set_attribute(link, "href", "/cart");
        doc.set_attribute(disabled, "disabled", "");
        doc.set_attribute(hidden_input, "type", "hidden");

        assert!(!doc.is_focusable(div));
        assert!(doc.is_focusable(link));
        assert!(!doc.is_focusable(anchor));
        assert!(!doc.is_focusable(disabled));
        assert!(!doc.is_focusable(hidden_input));

        doc.set_attribute(div, "tabindex", "-1");
        assert!(doc.is_focusable(div));
    }

    #[test]
    fn test_closed_details_hides_content_not_summary() {
        let mut doc = Document::new();
        let details = doc.create_child(doc.body(), "details");
        let summary = doc.create_child(details, "summary");
        let content = doc.create_child(details, "div");
        let button = doc.create_child(content, "button");

        assert!(doc.is_focusable(summary));
        assert!(!doc.is_focusable(button));

        doc.set_attribute(details, "open", "");
        assert!(doc.is_focusable(button));
    }

    #[test]
    fn test_display_none_ancestor() {
        let mut doc = Document::new();
        let wrapper = doc.create_child(doc.body(), "div");
        let select = doc.create_child(wrapper, "select");
        assert!(doc.is_rendered(select));
        doc.set_style_display(wrapper, "none");
        assert!(!doc.is_rendered(select));
        assert!(!doc.focus(select));
    }

    #[test]
    fn test_focus_records_changes() {
        let mut doc = Document::new();
        let a = doc.create_child(doc.body(), "button");
        let b = doc.create_child(doc.body(), "button");

        assert!(doc.focus(a));
        assert!(!doc.focus(a));
        assert!(doc.focus(b));
        doc.blur();

        let changes: Vec<_> = std::iter::from_fn(|| doc.take_focus_change()).collect();
        assert_eq!(
            changes,
            vec![
                FocusChange { from: None, to: Some(a) },
                FocusChange { from: Some(a), to: Some(b) },
                FocusChange { from: Some(b), to: None },
            ]
        );
    }

    #[test]
    fn test_sequence_order_positive_first() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.create_child(body, "button");
        let b = doc.create_child(body, "button");
        let c = doc.create_child(body, "button");
        doc.set_attribute(c, "tabindex", "1");
        assert_eq!(doc.sequential_focus_order(), vec![c, a, b]);
    }

    #[test]
    fn test_next_in_sequence_from_container() {
        let mut doc = Document::new();
        let body = doc.body();
        let before = doc.create_child(body, "button");
        let container = doc.create_child(body, "div");
        doc.set_attribute(container, "tabindex", "-1");
        let inner = doc.create_child(container, "button");

        assert_eq!(doc.next_in_sequence(Some(container), false), Some(inner));
        assert_eq!(doc.next_in_sequence(Some(container), true), Some(before));
        assert_eq!(doc.next_in_sequence(Some(inner), false), Some(before));
        assert_eq!(doc.next_in_sequence(None, true), Some(inner));
    }

    #[test]
    fn test_selection_range_clamped() {
        let mut doc = Document::new();
        let input = doc.create_child(doc.body(), "input");
        doc.set_attribute(input, "type", "search");
        doc.set_value(input, "shoes");
        doc.set_selection_range(input, 0, 99);
        assert_eq!(doc.selection_range(input), Some((0, 5)));

        let checkbox = doc.create_child(doc.body(), "input");
        doc.set_attribute(checkbox, "type", "checkbox");
        doc.set_selection_range(checkbox, 0, 1);
        assert_eq!(doc.selection_range(checkbox), None);
    }
}
