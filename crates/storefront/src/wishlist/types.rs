//! Wishlist value types: snapshots, resolution results, and commands.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use golden_fig_core::{AttributeId, Quantity, Sku, WishlistItemId};

use crate::notifications::Notification;

/// One saved wishlist item, keyed in the snapshot by its variant SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Backend item identifier, required for removal.
    pub item_id: WishlistItemId,
    pub quantity: Quantity,
}

/// A read-only view of one customer's wishlist at a point in time.
///
/// Built by [`WishlistService::snapshot`](super::WishlistService::snapshot);
/// the toggle controller only ever reads it. `pending` reflects whether a
/// mutation for this customer is in flight right now.
#[derive(Debug, Clone, Default)]
pub struct WishlistSnapshot {
    items: HashMap<Sku, WishlistEntry>,
    pending: bool,
}

impl WishlistSnapshot {
    /// Create a snapshot from an item map and the pending flag.
    #[must_use]
    pub fn new(items: HashMap<Sku, WishlistEntry>, pending: bool) -> Self {
        Self { items, pending }
    }

    /// Whether a mutation is currently in flight for this customer.
    #[must_use]
    pub const fn pending(&self) -> bool {
        self.pending
    }

    /// Whether the given SKU is saved in the wishlist.
    #[must_use]
    pub fn contains(&self, sku: &Sku) -> bool {
        self.items.contains_key(sku)
    }

    /// Look up the entry for a SKU.
    #[must_use]
    pub fn entry(&self, sku: &Sku) -> Option<&WishlistEntry> {
        self.items.get(sku)
    }

    /// Number of saved items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over saved entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Sku, &WishlistEntry)> {
        self.items.iter()
    }
}

/// A configurable product had no variant selected.
///
/// This is a value, not an exception: resolution reports it, `is_disabled`
/// and `is_in_wishlist` fold it into their flags, and `toggle` turns it into
/// a notification command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no variant selected")]
pub struct VariantNotSelected;

/// The outcome of variant resolution: the SKU a wishlist action targets,
/// plus the option data an add payload carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    /// The variant SKU for configurables, the product's own SKU otherwise.
    pub sku: Sku,
    /// Option data for configurables, `None` for simple products.
    pub product_option: Option<ProductOption>,
}

/// Option data attached to a configurable add-to-wishlist payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub extension_attributes: ExtensionAttributes,
}

/// Auxiliary option metadata for a variant selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionAttributes {
    pub configurable_item_options: Vec<ConfigurableItemOption>,
}

/// One selected configurable option: which attribute, which value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableItemOption {
    pub option_id: AttributeId,
    pub option_value: i64,
}

/// Payload for an add-to-wishlist dispatch.
///
/// Carries the parent product's SKU; the selected variant travels inside
/// `product_option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItemRequest {
    pub sku: Sku,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_option: Option<ProductOption>,
    pub quantity: Quantity,
}

/// Payload for a remove-from-wishlist dispatch.
///
/// Carries the variant SKU and the backend item id looked up from the
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveItemRequest {
    pub item_id: WishlistItemId,
    pub sku: Sku,
}

/// Which way a toggle event points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistAction {
    Add,
    Remove,
}

/// The single command a toggle derivation produces.
///
/// Exactly one of these per button event. Handlers execute `Add`/`Remove`
/// against the service, push `Notify` onto the flash queue, and do nothing
/// for `Ignore`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleCommand {
    /// A mutation is already in flight; drop the event silently.
    Ignore,
    /// The event cannot proceed; tell the shopper why.
    Notify(Notification),
    /// Dispatch an add against the wishlist backend.
    Add(AddItemRequest),
    /// Dispatch a removal against the wishlist backend.
    Remove(RemoveItemRequest),
}
