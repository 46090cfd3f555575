//! Wishlist domain: toggle derivation, snapshot types, and the backend service.
//!
//! The centerpiece is [`WishlistToggle`], a pure controller: one button event
//! in, one [`ToggleCommand`] out. It never talks to Magento itself - handlers
//! execute the command against [`WishlistService`], which owns the snapshot
//! cache and the per-customer in-flight guard.

mod service;
mod toggle;
mod types;

pub use service::{WishlistService, WishlistError};
pub use toggle::WishlistToggle;
pub use types::{
    AddItemRequest, ConfigurableItemOption, ExtensionAttributes, ProductOption,
    RemoveItemRequest, ResolvedSelection, ToggleCommand, VariantNotSelected, WishlistAction,
    WishlistEntry, WishlistSnapshot,
};
