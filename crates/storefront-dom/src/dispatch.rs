//! Event dispatch and user-agent input
//!
//! Implements capture / at-target / bubble propagation over the listener
//! registry, turns queued focus moves into focus events, and simulates the
//! browser's default actions for keyboard and pointer input.

use crate::events::{Event, EventHandler, EventPhase, EventTarget, EventType, Key, KeyModifiers};
use crate::{Document, NodeId};

impl Document {
    /// Dispatch an event. Returns false if a listener prevented the default.
    ///
    /// Listeners run in order Window, document, ancestors, target for capture
    /// and the reverse for bubbling. The listener list of each node is
    /// snapshotted when the event reaches it; listeners removed by earlier
    /// listeners are skipped. Focus moves made by a listener are flushed into
    /// focus events before the next listener runs.
    pub fn dispatch_event(&mut self, event: &mut Event, handler: &mut dyn EventHandler) -> bool {
        let path = self.event_path(event.target);
        let Some((&target, parents)) = path.split_last() else {
            return true;
        };

        event.phase = EventPhase::Capturing;
        for &current in parents {
            self.invoke_listeners(current, event, true, handler);
            if event.is_propagation_stopped() {
                break;
            }
        }

        if !event.is_propagation_stopped() {
            event.phase = EventPhase::AtTarget;
            self.invoke_listeners(target, event, true, handler);
            self.invoke_listeners(target, event, false, handler);
        }

        if event.bubbles && !event.is_propagation_stopped() {
            event.phase = EventPhase::Bubbling;
            for &current in parents.iter().rev() {
                self.invoke_listeners(current, event, false, handler);
                if event.is_propagation_stopped() {
                    break;
                }
            }
        }

        event.phase = EventPhase::None;
        event.current_target = None;
        !event.is_default_prevented()
    }

    /// Propagation path from Window down to the target. Detached nodes only
    /// reach their own ancestors.
    fn event_path(&self, target: EventTarget) -> Vec<EventTarget> {
        let EventTarget::Node(id) = target else {
            return vec![EventTarget::Window];
        };
        if self.tree().get(id).is_none() {
            return vec![target];
        }

        let mut path: Vec<EventTarget> = self.tree().ancestors(id).map(EventTarget::Node).collect();
        if self.tree().is_connected(id) {
            path.push(EventTarget::Window);
        }
        path.reverse();
        path.push(target);
        path
    }

    fn invoke_listeners(
        &mut self,
        current: EventTarget,
        event: &mut Event,
        capture: bool,
        handler: &mut dyn EventHandler,
    ) {
        let listeners = self.listeners().matching(current, &event.event_type, Some(capture));
        if listeners.is_empty() {
            return;
        }

        event.current_target = Some(current);
        for listener in listeners {
            if !self.listeners().contains(listener.id) {
                continue;
            }
            if listener.options.once {
                self.listeners_mut().remove_by_id(listener.id);
            }

            event.in_passive_listener = listener.options.passive;
            handler.handle_event(self, listener.handler, event);
            event.in_passive_listener = false;

            self.flush_focus_events(handler);
            event.current_target = Some(current);
        }
    }

    /// Fire blur/focusout and focus/focusin for every queued focus move, in
    /// queue order. Moves queued by listeners join the same queue.
    pub fn flush_focus_events(&mut self, handler: &mut dyn EventHandler) {
        while let Some(change) = self.take_focus_change() {
            if let Some(from) = change.from {
                let mut blur = Event::focus(EventType::Blur, from, change.to);
                self.dispatch_event(&mut blur, handler);
                let mut focus_out = Event::focus(EventType::FocusOut, from, change.to);
                self.dispatch_event(&mut focus_out, handler);
            }
            if let Some(to) = change.to {
                let mut focus = Event::focus(EventType::Focus, to, change.from);
                self.dispatch_event(&mut focus, handler);
                let mut focus_in = Event::focus(EventType::FocusIn, to, change.from);
                self.dispatch_event(&mut focus_in, handler);
            }
        }
    }

    // === User agent input ===

    /// Key press on the focused element (or body). Tab moves focus along the
    /// sequential navigation order unless a listener prevented it.
    pub fn key_down(&mut self, key: Key, modifiers: KeyModifiers, handler: &mut dyn EventHandler) -> bool {
        self.flush_focus_events(handler);
        self.pointer_modality = false;

        let target = self.active.unwrap_or(self.body());
        let is_tab = key == Key::Tab;
        let mut event = Event::keyboard(EventType::KeyDown, target, key, modifiers);
        let proceed = self.dispatch_event(&mut event, handler);

        if proceed && is_tab {
            if let Some(next) = self.next_in_sequence(self.active, modifiers.shift) {
                tracing::trace!("Tab moves focus to {}", next);
                self.focus(next);
            }
        }
        self.flush_focus_events(handler);
        proceed
    }

    /// Key release on the focused element (or body)
    pub fn key_up(&mut self, key: Key, modifiers: KeyModifiers, handler: &mut dyn EventHandler) -> bool {
        self.flush_focus_events(handler);
        let target = self.active.unwrap_or(self.body());
        let mut event = Event::keyboard(EventType::KeyUp, target, key, modifiers);
        let proceed = self.dispatch_event(&mut event, handler);
        self.flush_focus_events(handler);
        proceed
    }

    /// keydown followed by keyup
    pub fn press_key(&mut self, key: Key, modifiers: KeyModifiers, handler: &mut dyn EventHandler) {
        self.key_down(key.clone(), modifiers, handler);
        self.key_up(key, modifiers, handler);
    }

    /// Primary button press. Focuses the nearest focusable inclusive
    /// ancestor of the target, or blurs when there is none.
    pub fn mouse_down(&mut self, target: NodeId, handler: &mut dyn EventHandler) -> bool {
        self.flush_focus_events(handler);
        self.pointer_modality = true;

        let mut event = Event::new(EventType::MouseDown, target);
        let proceed = self.dispatch_event(&mut event, handler);

        if proceed {
            let focusable = std::iter::once(target)
                .chain(self.tree().ancestors(target))
                .find(|&n| self.is_focusable(n));
            match focusable {
                Some(node) => {
                    self.focus(node);
                }
                None => self.blur(),
            }
        }
        self.flush_focus_events(handler);
        proceed
    }

    /// Click activation. A `details` summary toggles its `open` attribute.
    pub fn click(&mut self, target: NodeId, handler: &mut dyn EventHandler) -> bool {
        self.flush_focus_events(handler);
        let mut event = Event::new(EventType::Click, target);
        let proceed = self.dispatch_event(&mut event, handler);

        if proceed {
            let summary = std::iter::once(target)
                .chain(self.tree().ancestors(target))
                .find(|&n| self.is_tag(n, "summary"));
            if let Some(summary) = summary {
                if let Some(details) = self.parent_element(summary) {
                    if self.is_tag(details, "details") && self.details_summary(details) == Some(summary) {
                        let open = self.toggle_attribute(details, "open", None);
                        tracing::trace!("details {} toggled, open={}", details, open);
                    }
                }
            }
        }
        self.flush_focus_events(handler);
        proceed
    }

    /// Pointer press then click, as a user clicking the element
    pub fn user_click(&mut self, target: NodeId, handler: &mut dyn EventHandler) -> bool {
        self.mouse_down(target, handler);
        self.click(target, handler)
    }

    /// User picks an option of a select, firing `change`
    pub fn select_option(&mut self, select: NodeId, index: usize, handler: &mut dyn EventHandler) {
        if self.selected_index(select) == Some(index) {
            return;
        }
        self.set_selected_index(select, index);
        let mut event = Event::new(EventType::Change, select);
        self.dispatch_event(&mut event, handler);
        self.flush_focus_events(handler);
    }

    /// Dispatch a `CustomEvent` by name
    pub fn dispatch_custom(&mut self, name: &str, target: impl Into<EventTarget>, handler: &mut dyn EventHandler) -> bool {
        let mut event = Event::custom(name, target);
        let proceed = self.dispatch_event(&mut event, handler);
        self.flush_focus_events(handler);
        proceed
    }
}
