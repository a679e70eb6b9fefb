//! DOM Events
//!
//! Event objects, keyboard/mouse details and the listener registry. Listeners
//! do not hold closures: each one names a `HandlerId` and the dispatcher hands
//! matching events to an [`EventHandler`] that knows what the id means.

use crate::{Document, NodeId};

/// Event types the storefront behaviours listen to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    MouseDown,
    Click,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    Change,
    Custom(String),
}

impl EventType {
    /// Parse from the DOM event name
    pub fn parse(name: &str) -> Self {
        match name {
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "mousedown" => Self::MouseDown,
            "click" => Self::Click,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "focusin" => Self::FocusIn,
            "focusout" => Self::FocusOut,
            "change" => Self::Change,
            other => Self::Custom(other.to_string()),
        }
    }

    /// DOM event name
    pub fn name(&self) -> &str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::MouseDown => "mousedown",
            Self::Click => "click",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::Change => "change",
            Self::Custom(name) => name,
        }
    }

    /// Check if this event type bubbles
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::Focus | Self::Blur | Self::Custom(_))
    }

    /// Check if the default action can be prevented
    pub fn cancelable(&self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp | Self::MouseDown | Self::Click)
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Node(NodeId),
}

impl EventTarget {
    /// The document node as a target
    pub const DOCUMENT: EventTarget = EventTarget::Node(NodeId::ROOT);

    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Window => None,
        }
    }
}

impl From<NodeId> for EventTarget {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Character(char),

    // Navigation
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    // Editing
    Backspace, Delete,
    Enter, Tab, Escape, Space,

    // Modifiers
    Shift, Control, Alt, Meta,

    Unidentified(String),
}

impl Key {
    /// Parse from a `KeyboardEvent.key` string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            " " | "Spacebar" => Self::Space,
            "Shift" => Self::Shift,
            "Control" => Self::Control,
            "Alt" => Self::Alt,
            "Meta" => Self::Meta,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }

    /// Physical key code (`KeyboardEvent.code`) for a US layout
    pub fn code(&self) -> String {
        match self {
            Self::Character(c) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
            Self::Character(c) if c.is_ascii_digit() => format!("Digit{c}"),
            Self::Character(_) | Self::Unidentified(_) => "Unidentified".to_string(),
            Self::Shift => "ShiftLeft".to_string(),
            Self::Control => "ControlLeft".to_string(),
            Self::Alt => "AltLeft".to_string(),
            Self::Meta => "MetaLeft".to_string(),
            named => format!("{named:?}"),
        }
    }

    /// Keys that signal keyboard navigation intent
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowUp | Self::ArrowDown | Self::ArrowLeft | Self::ArrowRight
                | Self::Tab | Self::Enter | Self::Space | Self::Escape
                | Self::Home | Self::End | Self::PageUp | Self::PageDown
        )
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    /// No modifiers held
    pub const NONE: KeyModifiers = KeyModifiers { shift: false, ctrl: false, alt: false, meta: false };
    /// Only Shift held
    pub const SHIFT: KeyModifiers = KeyModifiers { shift: true, ctrl: false, alt: false, meta: false };
}

/// Type-specific event payload
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    None,
    Keyboard {
        key: Key,
        code: String,
        modifiers: KeyModifiers,
    },
}

/// A dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: EventTarget,
    pub current_target: Option<EventTarget>,
    /// Element losing/gaining focus for focus events
    pub related_target: Option<NodeId>,
    pub phase: EventPhase,
    pub detail: EventDetail,
    pub bubbles: bool,
    pub cancelable: bool,
    pub(crate) in_passive_listener: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event with the type's default bubbling/cancelable flags
    pub fn new(event_type: EventType, target: impl Into<EventTarget>) -> Self {
        Self {
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            event_type,
            target: target.into(),
            current_target: None,
            related_target: None,
            phase: EventPhase::None,
            detail: EventDetail::None,
            in_passive_listener: false,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create a keydown/keyup event
    pub fn keyboard(event_type: EventType, target: NodeId, key: Key, modifiers: KeyModifiers) -> Self {
        let code = key.code();
        let mut event = Self::new(event_type, target);
        event.detail = EventDetail::Keyboard { key, code, modifiers };
        event
    }

    /// Create a focus/blur/focusin/focusout event
    pub fn focus(event_type: EventType, target: NodeId, related: Option<NodeId>) -> Self {
        let mut event = Self::new(event_type, target);
        event.related_target = related;
        event
    }

    /// Create a custom event (non-bubbling, like `new CustomEvent(name)`)
    pub fn custom(name: &str, target: impl Into<EventTarget>) -> Self {
        Self::new(EventType::Custom(name.to_string()), target)
    }

    /// Target node, if the event targets a node
    pub fn target_node(&self) -> Option<NodeId> {
        self.target.node()
    }

    /// Key for keyboard events
    pub fn key(&self) -> Option<&Key> {
        match &self.detail {
            EventDetail::Keyboard { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Physical key code for keyboard events
    pub fn code(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::Keyboard { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Shift state for keyboard events
    pub fn shift_key(&self) -> bool {
        matches!(&self.detail, EventDetail::Keyboard { modifiers, .. } if modifiers.shift)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable && !self.in_passive_listener {
            self.default_prevented = true;
        }
    }

    /// Stop propagation after the current target
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Identifies one callback owned by some behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

/// Identifies one listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Event listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
}

impl ListenerOptions {
    /// Capture-phase listener
    pub fn capture() -> Self {
        Self { capture: true, ..Self::default() }
    }
}

/// Registered listener
#[derive(Debug, Clone)]
pub struct Listener {
    pub id: ListenerId,
    pub target: EventTarget,
    pub event_type: EventType,
    pub handler: HandlerId,
    pub options: ListenerOptions,
}

/// All listeners of a document, in registration order
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Registering the same handler for the same
    /// target, type and phase again returns the existing registration.
    pub fn add(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        handler: HandlerId,
        options: ListenerOptions,
    ) -> ListenerId {
        if let Some(existing) = self.listeners.iter().find(|l| {
            l.target == target
                && l.event_type == event_type
                && l.handler == handler
                && l.options.capture == options.capture
        }) {
            return existing.id;
        }

        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(Listener { id, target, event_type, handler, options });
        id
    }

    /// Remove a listener by the same key it was added with
    pub fn remove(
        &mut self,
        target: EventTarget,
        event_type: &EventType,
        handler: HandlerId,
        capture: bool,
    ) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| {
            !(l.target == target
                && &l.event_type == event_type
                && l.handler == handler
                && l.options.capture == capture)
        });
        before != self.listeners.len()
    }

    /// Remove a listener by id
    pub fn remove_by_id(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Drop every registration of a handler
    pub fn remove_handler(&mut self, handler: HandlerId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.handler != handler);
        before - self.listeners.len()
    }

    /// Check whether a registration is still live
    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    /// Check whether a handler is registered for a target and type
    pub fn is_registered(&self, target: EventTarget, event_type: &EventType, handler: HandlerId) -> bool {
        self.listeners
            .iter()
            .any(|l| l.target == target && &l.event_type == event_type && l.handler == handler)
    }

    /// Snapshot of listeners for a target/type, optionally filtered by phase
    pub fn matching(&self, target: EventTarget, event_type: &EventType, capture: Option<bool>) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|l| l.target == target && &l.event_type == event_type)
            .filter(|l| capture.is_none_or(|c| l.options.capture == c))
            .cloned()
            .collect()
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Receives events for the handler ids registered on a document
pub trait EventHandler {
    fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, event: &mut Event);
}

/// Plain user-agent behaviour with no page scripts attached
impl EventHandler for () {
    fn handle_event(&mut self, _doc: &mut Document, _handler: HandlerId, _event: &mut Event) {}
}
