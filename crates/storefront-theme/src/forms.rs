//! Form helpers

use storefront_dom::{Document, NodeId};

/// Select the first option whose value or label equals `value`. Returns the
/// selected index; the selection is unchanged when nothing matches.
pub fn set_selector_by_value(doc: &mut Document, select: NodeId, value: &str) -> Option<usize> {
    let index = doc
        .options(select)
        .into_iter()
        .position(|option| doc.value(option) == value || doc.text_content(option) == value)?;
    doc.set_selected_index(select, index);
    Some(index)
}

/// Options for [`post_link`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostLinkOptions {
    /// Form method, `post` when unset
    pub method: Option<String>,
    /// Hidden fields, in order
    pub parameters: Vec<(String, String)>,
}

/// Navigate to `path` by submitting a temporary form with the parameters as
/// hidden inputs. The form is removed again after submission.
pub fn post_link(doc: &mut Document, path: &str, options: &PostLinkOptions) -> bool {
    let method = options.method.as_deref().unwrap_or("post");

    let form = doc.create_element("form");
    doc.set_attribute(form, "method", method);
    doc.set_attribute(form, "action", path);

    for (name, value) in &options.parameters {
        let field = doc.create_child(form, "input");
        doc.set_attribute(field, "type", "hidden");
        doc.set_attribute(field, "name", name);
        doc.set_attribute(field, "value", value);
    }

    let body = doc.body();
    if let Err(err) = doc.append_child(body, form) {
        tracing::warn!("post_link could not attach its form: {}", err);
        return false;
    }
    let submitted = doc.submit_form(form);
    doc.remove_child(body, form);
    submitted
}
