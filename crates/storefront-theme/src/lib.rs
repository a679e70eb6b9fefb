//! Storefront Theme
//!
//! Page-level wiring for a storefront theme on top of the accessibility
//! behaviours:
//! - `Page`: document, configuration and event routing
//! - media pause broadcast and the product model pause listener
//! - country/province select synchronisation
//! - form helpers (`set_selector_by_value`, `post_link`)
//! - fetch request configuration
//! - debounce and throttle

pub mod config;
pub mod country_province;
pub mod fetch;
pub mod forms;
pub mod media;
pub mod page;
pub mod product_model;
pub mod timing;

pub use config::ThemeConfig;
pub use country_province::{CountryProvinceOptions, CountryProvinceSelector};
pub use fetch::{fetch_config, FetchConfig, FetchHeaders};
pub use forms::{post_link, set_selector_by_value, PostLinkOptions};
pub use media::{pause_all_media, MediaPauseSummary};
pub use page::{Page, PageHandlers};
pub use product_model::{collect_xr_models, ProductModel};
pub use timing::{Debouncer, Throttle};

use storefront_a11y::A11yError;
use storefront_dom::{NodeId, SelectorError};

/// Result type alias using [`ThemeError`]
pub type Result<T> = std::result::Result<T, ThemeError>;

/// Theme error
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// `data-provinces` on a country option is not a list of `[code, label]` pairs
    #[error("Invalid province data on option {option}: {source}")]
    InvalidProvinceData {
        option: NodeId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Element not found: #{0}")]
    MissingElement(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    A11y(#[from] A11yError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
