//! Storefront Accessibility
//!
//! Keyboard accessibility behaviours for storefront pages.
//!
//! Features:
//! - Focusable element queries
//! - Focus trapping with Tab wrap-around
//! - `:focus-visible` polyfill for runtimes without native support
//! - Disclosure (details/summary) ARIA wiring and Escape handling

pub mod aria;
pub mod focus;
pub mod trap;
pub mod focus_visible;
pub mod disclosure;
mod handlers;

pub use aria::AriaRole;
pub use focus::{focusable_elements, FOCUSABLE_SELECTOR};
pub use trap::{ActiveTrap, FocusTrapManager};
pub use focus_visible::FocusVisiblePolyfill;
pub use disclosure::{Disclosure, DisclosureController};
pub use handlers::A11yHandlers;
pub use storefront_dom::TabIndex;

use storefront_dom::SelectorError;

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),
}
