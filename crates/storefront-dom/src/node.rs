//! DOM Node
//!
//! Nodes link to each other through `NodeId`s instead of pointers; the
//! element payload carries attributes plus the runtime state a browser keeps
//! outside the attribute map (input value, selection, media playback).

use crate::{NodeId, NamedNodeMap, DOMTokenList};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercased tag name
    pub tag: String,
    /// Attribute map
    pub attrs: NamedNodeMap,
    /// Parsed `class` attribute
    pub classes: DOMTokenList,
    /// Runtime state not reflected in attributes
    pub state: ElementState,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: NamedNodeMap::new(),
            classes: DOMTokenList::new(),
            state: ElementState::default(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attribute(name)
    }

    /// Check the tag name
    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// Element state owned by the user agent
#[derive(Debug, Clone)]
pub struct ElementState {
    /// Dirty value of a form control (None = use the `value` attribute)
    pub value: Option<String>,
    /// Text selection of an input, as char offsets
    pub selection: Option<(usize, usize)>,
    /// Explicit `selectedIndex` of a select
    pub selected_index: Option<usize>,
    /// Media playback state
    pub paused: bool,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            value: None,
            selection: None,
            selected_index: None,
            paused: true,
        }
    }
}
