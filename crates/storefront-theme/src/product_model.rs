//! Product model
//!
//! A `product-model` element hosting a 3D `model-viewer`. While connected it
//! listens on the document for the media pause event and pauses its viewer.
//! The models offered for AR viewing are embedded as JSON in
//! `[id^="ProductJSON-"]` elements and collected once per page.

use serde_json::Value;
use storefront_dom::{Document, Event, EventTarget, EventType, HandlerId, ListenerOptions, NodeId};

use crate::Result;

const XR_MODEL_SELECTOR: &str = r#"[id^="ProductJSON-"]"#;

/// Read every embedded AR model description, removing each element once it
/// is read. Stops at the first element whose text is not JSON; that element
/// and the ones after it stay in the document.
pub fn collect_xr_models(doc: &mut Document) -> Result<Vec<Value>> {
    let mut models = Vec::new();
    for element in doc.query_selector_all(NodeId::ROOT, XR_MODEL_SELECTOR)? {
        models.push(serde_json::from_str(&doc.text_content(element))?);
        doc.remove(element);
    }
    tracing::debug!("Collected {} AR model description(s)", models.len());
    Ok(models)
}

#[derive(Debug)]
pub struct ProductModel {
    element: NodeId,
    viewer: Option<NodeId>,
    pause_event: EventType,
    on_pause: HandlerId,
}

impl ProductModel {
    /// Start listening on the document for the custom event `pause_event`.
    /// The name is always a custom event, even when it spells a built-in one.
    pub fn connect(doc: &mut Document, element: NodeId, pause_event: &str) -> Self {
        let viewer = doc.query_selector(element, "model-viewer").ok().flatten();
        let model = Self {
            element,
            viewer,
            pause_event: EventType::Custom(pause_event.to_string()),
            on_pause: doc.allocate_handler(),
        };
        doc.add_event_listener(
            EventTarget::DOCUMENT,
            model.pause_event.clone(),
            model.on_pause,
            ListenerOptions::default(),
        );
        model
    }

    /// Stop listening
    pub fn disconnect(&self, doc: &mut Document) {
        doc.remove_event_listener(EventTarget::DOCUMENT, &self.pause_event, self.on_pause, false);
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// The hosted `model-viewer`, if any
    pub fn viewer(&self) -> Option<NodeId> {
        self.viewer
    }

    /// Handle the pause event; false when the handler id is not this model's
    pub fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, _event: &mut Event) -> bool {
        if handler != self.on_pause {
            return false;
        }
        if let Some(viewer) = self.viewer {
            doc.pause_media(viewer);
            tracing::debug!("Product model {} paused", self.element);
        }
        true
    }
}
