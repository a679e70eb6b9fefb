//! Page - A storefront document with its theme behaviours attached

use storefront_a11y::{A11yHandlers, DisclosureController, FocusVisiblePolyfill};
use serde_json::Value;
use storefront_dom::{Document, Event, EventHandler, HandlerId, Key, KeyModifiers, NodeId};

use crate::country_province::{CountryProvinceOptions, CountryProvinceSelector};
use crate::forms::{self, PostLinkOptions};
use crate::media::{self, MediaPauseSummary};
use crate::product_model::{self, ProductModel};
use crate::{Result, ThemeConfig};

/// Every behaviour that owns listeners on the page
#[derive(Debug, Default)]
pub struct PageHandlers {
    pub a11y: A11yHandlers,
    pub country_selectors: Vec<CountryProvinceSelector>,
    pub product_models: Vec<ProductModel>,
}

impl EventHandler for PageHandlers {
    fn handle_event(&mut self, doc: &mut Document, handler: HandlerId, event: &mut Event) {
        if self.a11y.dispatch(doc, handler, event) {
            return;
        }

        for selector in &mut self.country_selectors {
            if let Some(result) = selector.handle_event(doc, handler, event) {
                if let Err(err) = result {
                    tracing::warn!("Country selector {} failed: {}", selector.country(), err);
                }
                return;
            }
        }

        for model in &mut self.product_models {
            if model.handle_event(doc, handler, event) {
                return;
            }
        }

        tracing::trace!("No page behaviour owns handler {:?}", handler);
    }
}

/// A loaded storefront page
pub struct Page {
    document: Document,
    config: ThemeConfig,
    handlers: PageHandlers,
    xr_models: Vec<Value>,
}

impl Page {
    /// Attach the theme behaviours to a document: disclosure widgets, the
    /// focus-visible polyfill when the runtime lacks `:focus-visible`, and
    /// every `product-model` element. Embedded AR model descriptions are
    /// collected; a malformed one is logged and ends the collection.
    pub fn new(mut document: Document, config: ThemeConfig) -> Result<Self> {
        config.validate()?;

        let disclosures =
            DisclosureController::install(&mut document, &config.details_selector, &config.drawer_selector)?;
        let polyfill = FocusVisiblePolyfill::install_if_needed(&mut document, &config.focus_visible_class);

        let product_models = document
            .query_selector_all(NodeId::ROOT, "product-model")?
            .into_iter()
            .map(|element| ProductModel::connect(&mut document, element, &config.media_pause_event))
            .collect::<Vec<_>>();

        let xr_models = product_model::collect_xr_models(&mut document).unwrap_or_else(|err| {
            tracing::warn!("AR models not loaded: {}", err);
            Vec::new()
        });

        tracing::info!(
            "Page ready: {} disclosures, {} product models, focus-visible polyfill {}",
            disclosures.widgets().len(),
            product_models.len(),
            if polyfill.is_some() { "installed" } else { "not needed" }
        );

        Ok(Self {
            document,
            config,
            handlers: PageHandlers {
                a11y: A11yHandlers {
                    polyfill,
                    disclosures: Some(disclosures),
                    ..A11yHandlers::default()
                },
                country_selectors: Vec::new(),
                product_models,
            },
            xr_models,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn handlers(&self) -> &PageHandlers {
        &self.handlers
    }

    /// AR model descriptions collected when the page loaded
    pub fn xr_models(&self) -> &[Value] {
        &self.xr_models
    }

    /// Bind a country/province select pair
    pub fn bind_country_province(
        &mut self,
        country_id: &str,
        province_id: &str,
        options: &CountryProvinceOptions,
    ) -> Result<()> {
        let selector = CountryProvinceSelector::new(&mut self.document, country_id, province_id, options)?;
        self.handlers.country_selectors.push(selector);
        Ok(())
    }

    // === Focus ===

    /// Trap focus inside `container`
    pub fn trap_focus(&mut self, container: NodeId, element_to_focus: Option<NodeId>) {
        self.handlers.a11y.traps.activate(&mut self.document, container, element_to_focus);
        self.document.flush_focus_events(&mut self.handlers);
    }

    /// Release the active focus trap
    pub fn remove_trap_focus(&mut self, element_to_focus: Option<NodeId>) {
        self.handlers.a11y.traps.release(&mut self.document, element_to_focus);
        self.document.flush_focus_events(&mut self.handlers);
    }

    pub fn open_disclosure(&mut self, details: NodeId) {
        let a11y = &mut self.handlers.a11y;
        if let Some(disclosures) = a11y.disclosures.as_mut() {
            disclosures.open(&mut self.document, &mut a11y.traps, details);
        }
        self.document.flush_focus_events(&mut self.handlers);
    }

    pub fn close_disclosure(&mut self, details: NodeId) {
        let a11y = &mut self.handlers.a11y;
        if let Some(disclosures) = a11y.disclosures.as_mut() {
            disclosures.close(&mut self.document, &mut a11y.traps, details);
        }
        self.document.flush_focus_events(&mut self.handlers);
        self.after_input();
    }

    /// Element showing a keyboard focus ring: the polyfill's element when it
    /// is installed, otherwise the document's native tracking
    pub fn focus_visible_element(&self) -> Option<NodeId> {
        match &self.handlers.a11y.polyfill {
            Some(polyfill) => polyfill.focused_element(),
            None => self.document.focus_visible_element(),
        }
    }

    // === Input ===

    pub fn key_down(&mut self, key: Key, modifiers: KeyModifiers) -> bool {
        let result = self.document.key_down(key, modifiers, &mut self.handlers);
        self.after_input();
        result
    }

    pub fn key_up(&mut self, key: Key, modifiers: KeyModifiers) -> bool {
        let result = self.document.key_up(key, modifiers, &mut self.handlers);
        self.after_input();
        result
    }

    /// `keydown` followed by `keyup`
    pub fn press_key(&mut self, key: Key, modifiers: KeyModifiers) {
        self.document.press_key(key, modifiers, &mut self.handlers);
        self.after_input();
    }

    pub fn mouse_down(&mut self, target: NodeId) -> bool {
        let result = self.document.mouse_down(target, &mut self.handlers);
        self.after_input();
        result
    }

    pub fn click(&mut self, target: NodeId) -> bool {
        let result = self.document.click(target, &mut self.handlers);
        self.after_input();
        result
    }

    /// `mousedown` followed by `click`
    pub fn user_click(&mut self, target: NodeId) -> bool {
        let result = self.document.user_click(target, &mut self.handlers);
        self.after_input();
        result
    }

    pub fn select_option(&mut self, select: NodeId, index: usize) {
        self.document.select_option(select, index, &mut self.handlers);
        self.after_input();
    }

    fn after_input(&mut self) {
        let closed = self.handlers.a11y.take_closed();
        if closed.is_empty() || !self.config.pause_media_on_close {
            return;
        }
        tracing::debug!("{} disclosure(s) closed, pausing media", closed.len());
        if let Err(err) = self.pause_all_media() {
            tracing::warn!("Failed to pause media: {}", err);
        }
    }

    // === Effects ===

    /// Pause every player on the page
    pub fn pause_all_media(&mut self) -> Result<MediaPauseSummary> {
        media::pause_all_media(&mut self.document, &self.config, &mut self.handlers)
    }

    /// Submit a temporary form to `path`
    pub fn post_link(&mut self, path: &str, options: &PostLinkOptions) -> bool {
        forms::post_link(&mut self.document, path, options)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("config", &self.config)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}
