//! Country / province selector
//!
//! Keeps a province `select` in step with a country `select`. Each country
//! option carries its provinces as JSON in `data-provinces`
//! (`[["ON","Ontario"],["QC","Quebec"]]`); countries without provinces hide
//! the province container.

use serde_json::Value;
use storefront_dom::{Document, Event, EventType, HandlerId, ListenerOptions, NodeId};

use crate::forms::set_selector_by_value;
use crate::{Result, ThemeError};

/// Selector options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryProvinceOptions {
    /// Id of the element hidden when a country has no provinces; defaults to
    /// the province select itself
    pub hide_element: Option<String>,
}

/// A bound country/province pair
#[derive(Debug)]
pub struct CountryProvinceSelector {
    country: NodeId,
    province: NodeId,
    container: NodeId,
    on_change: HandlerId,
}

impl CountryProvinceSelector {
    /// Bind the selects with the given ids, apply their `data-default`
    /// values and populate the province list. Missing elements are an error.
    /// A failed initial population is logged and the binding is kept, so a
    /// later country change still fills the list.
    pub fn new(
        doc: &mut Document,
        country_id: &str,
        province_id: &str,
        options: &CountryProvinceOptions,
    ) -> Result<Self> {
        let find = |id: &str| doc.get_element_by_id(id).ok_or_else(|| ThemeError::MissingElement(id.to_string()));
        let country = find(country_id)?;
        let province = find(province_id)?;
        let container = find(options.hide_element.as_deref().unwrap_or(province_id))?;

        let selector = Self {
            country,
            province,
            container,
            on_change: doc.allocate_handler(),
        };
        doc.add_event_listener(country, EventType::Change, selector.on_change, ListenerOptions::default());

        match selector.init_country(doc) {
            Ok(()) => selector.init_province(doc),
            Err(err) => tracing::warn!("Country select {} not initialised: {}", country, err),
        }
        Ok(selector)
    }

    pub fn country(&self) -> NodeId {
        self.country
    }

    pub fn province(&self) -> NodeId {
        self.province
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Select the country's `data-default` and load its provinces
    pub fn init_country(&self, doc: &mut Document) -> Result<()> {
        if let Some(value) = doc.get_attribute(self.country, "data-default").map(str::to_string) {
            set_selector_by_value(doc, self.country, &value);
        }
        self.country_handler(doc)
    }

    /// Select the province's `data-default` when the list has options
    pub fn init_province(&self, doc: &mut Document) {
        let Some(value) = doc.get_attribute(self.province, "data-default").map(str::to_string) else {
            return;
        };
        if !value.is_empty() && !doc.options(self.province).is_empty() {
            set_selector_by_value(doc, self.province, &value);
        }
    }

    /// Rebuild the province list from the selected country option.
    /// `data-provinces` that is not a JSON list of lists is an error and leaves
    /// the list untouched; a missing attribute or `null` counts as no
    /// provinces. Each entry contributes its first two items as code and
    /// label, extra items are ignored and shorter entries skipped.
    pub fn country_handler(&self, doc: &mut Document) -> Result<()> {
        let Some(option) = doc
            .selected_index(self.country)
            .and_then(|i| doc.options(self.country).get(i).copied())
        else {
            tracing::trace!("Country select {} has no selected option", self.country);
            return Ok(());
        };

        let entries: Vec<Vec<Value>> = match doc.get_attribute(option, "data-provinces") {
            Some(raw) => serde_json::from_str::<Option<Vec<Vec<Value>>>>(raw)
                .map_err(|source| ThemeError::InvalidProvinceData { option, source })?
                .unwrap_or_default(),
            None => Vec::new(),
        };
        let provinces: Vec<(String, String)> = entries
            .iter()
            .filter_map(|entry| match entry.as_slice() {
                [code, label, ..] => Some((json_text(code), json_text(label))),
                _ => None,
            })
            .collect();

        Self::clear_options(doc, self.province);
        if provinces.is_empty() {
            doc.set_style_display(self.container, "none");
        } else {
            for (code, label) in &provinces {
                let element = doc.create_child(self.province, "option");
                doc.set_attribute(element, "value", code);
                doc.set_text_content(element, label);
            }
            doc.set_style_display(self.container, "");
        }

        tracing::debug!("Province list {} now has {} entries", self.province, provinces.len());
        Ok(())
    }

    /// Remove every option
    pub fn clear_options(doc: &mut Document, select: NodeId) {
        doc.replace_children(select);
    }

    /// Append options whose value and label are the same string
    pub fn set_options(doc: &mut Document, select: NodeId, values: &[&str]) {
        for value in values {
            let option = doc.create_child(select, "option");
            doc.set_attribute(option, "value", value);
            doc.set_text_content(option, value);
        }
    }

    /// Handle a `change` on the country select. None when the handler id is
    /// not this selector's.
    pub fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, _event: &mut Event) -> Option<Result<()>> {
        (handler == self.on_change).then(|| self.country_handler(doc))
    }
}

/// String items as-is, anything else in its JSON form
fn json_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
