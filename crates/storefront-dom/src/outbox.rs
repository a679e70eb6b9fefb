//! Outbox
//!
//! Effects that leave the page: `postMessage` calls into embedded frames and
//! form submissions. They are recorded in order so the host can forward them.

use crate::{Document, NodeId};

/// A message posted to an embedded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub target: NodeId,
    pub message: String,
    pub target_origin: String,
}

/// A submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form: NodeId,
    pub method: String,
    pub action: String,
    pub fields: Vec<(String, String)>,
}

/// Pending outbound effects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outbox {
    pub messages: Vec<PostedMessage>,
    pub submissions: Vec<FormSubmission>,
}

impl Outbox {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.submissions.is_empty()
    }
}

impl Document {
    /// `frame.contentWindow.postMessage(message, target_origin)`.
    /// Frames without a browsing context (non-iframes, detached) drop the message.
    pub fn post_message(&mut self, frame: NodeId, message: &str, target_origin: &str) -> bool {
        if !self.is_tag(frame, "iframe") || !self.tree().is_connected(frame) {
            tracing::trace!("postMessage to {} dropped: no content window", frame);
            return false;
        }
        self.outbox.messages.push(PostedMessage {
            target: frame,
            message: message.to_string(),
            target_origin: target_origin.to_string(),
        });
        true
    }

    /// Messages posted so far
    pub fn posted_messages(&self) -> &[PostedMessage] {
        &self.outbox.messages
    }

    /// Submit a form: collects named `input` values in tree order
    pub fn submit_form(&mut self, form: NodeId) -> bool {
        if !self.is_tag(form, "form") || !self.tree().is_connected(form) {
            tracing::trace!("submit of {} ignored: not a connected form", form);
            return false;
        }

        let fields = self
            .tree()
            .descendants(form)
            .filter(|&n| self.is_tag(n, "input") && !self.is_disabled(n))
            .filter_map(|n| {
                let name = self.get_attribute(n, "name")?;
                Some((name.to_string(), self.value(n)))
            })
            .collect();

        let method = self
            .get_attribute(form, "method")
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "get".to_string());
        let action = self.get_attribute(form, "action").unwrap_or("").to_string();

        tracing::debug!("Form {} submitted: {} {}", form, method, action);
        self.outbox.submissions.push(FormSubmission { form, method, action, fields });
        true
    }

    /// Forms submitted so far
    pub fn form_submissions(&self) -> &[FormSubmission] {
        &self.outbox.submissions
    }

    /// Drain all outbound effects
    pub fn take_outbox(&mut self) -> Outbox {
        std::mem::take(&mut self.outbox)
    }
}
