//! Theme configuration

use serde::{Deserialize, Serialize};
use storefront_dom::{DOMTokenList, SelectorList};

use crate::{Result, ThemeError};

/// Selectors and class names the theme behaviours use. Every field has a
/// default, so a partial JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Class the focus-visible polyfill puts on keyboard-focused elements
    pub focus_visible_class: String,
    /// Summaries wired as disclosure widgets
    pub details_selector: String,
    /// Containers whose disclosures handle Escape themselves
    pub drawer_selector: String,
    pub youtube_selector: String,
    pub vimeo_selector: String,
    /// Custom event dispatched on the document to pause 3D models
    pub media_pause_event: String,
    /// Pause all media when Escape closes a disclosure
    pub pause_media_on_close: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            focus_visible_class: "focused".to_string(),
            details_selector: r#"[id^="Details-"] summary"#.to_string(),
            drawer_selector: "header-drawer, menu-drawer".to_string(),
            youtube_selector: ".js-youtube".to_string(),
            vimeo_selector: ".js-vimeo".to_string(),
            media_pause_event: "product-model:pause".to_string(),
            pause_media_on_close: false,
        }
    }
}

impl ThemeConfig {
    /// Load from JSON and check that every selector parses
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ThemeError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the selectors parse and the names are usable
    pub fn validate(&self) -> Result<()> {
        for selector in [
            &self.details_selector,
            &self.drawer_selector,
            &self.youtube_selector,
            &self.vimeo_selector,
        ] {
            SelectorList::parse(selector)?;
        }
        if !DOMTokenList::is_valid_token(&self.focus_visible_class) {
            return Err(ThemeError::Config {
                message: format!("focus_visible_class must be a single class, got {:?}", self.focus_visible_class),
            });
        }
        if self.media_pause_event.is_empty() {
            return Err(ThemeError::Config { message: "media_pause_event must not be empty".to_string() });
        }
        Ok(())
    }
}
