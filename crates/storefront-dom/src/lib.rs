//! Storefront DOM - Headless Document Object Model
//!
//! Arena-based document tree with just enough browser behaviour to drive
//! storefront accessibility code outside a browser:
//! - attributes, class lists and inline `display` style
//! - a CSS selector engine (`querySelectorAll`, `closest`, `matches`)
//! - focus tracking and sequential (Tab) navigation
//! - event listeners with capture/bubble dispatch
//! - an outbox for effects that leave the page (iframe messages, form posts)

mod node;
mod tree;
mod document;
mod attributes;
mod classlist;
mod style;
mod focus;
mod dispatch;
mod outbox;
pub mod selector;
pub mod events;

pub use node::{Node, NodeData, ElementData, ElementState};
pub use tree::DomTree;
pub use document::{Document, RuntimeFeatures};
pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use focus::{FocusChange, TabIndex};
pub use outbox::{Outbox, PostedMessage, FormSubmission};
pub use selector::{SelectorList, SelectorError};
pub use events::{
    Event, EventType, EventTarget, EventPhase, EventDetail, EventHandler,
    Key, KeyModifiers, HandlerId, ListenerId, ListenerOptions, Listener,
    ListenerRegistry,
};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this id points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// DOM error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("Node {0} does not exist")]
    NotFound(NodeId),

    #[error("Cannot insert {child} into {parent}: would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
