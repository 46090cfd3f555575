//! The wishlist toggle controller.
//!
//! Derives UI state (disabled, in-wishlist) and one [`ToggleCommand`] per
//! button event from a product, the shopper's variant selection, and a
//! read-only wishlist snapshot. Pure derivation: no I/O, no shared state.

use golden_fig_core::Quantity;

use crate::models::Product;
use crate::notifications::Notification;

use super::types::{
    AddItemRequest, ExtensionAttributes, ProductOption, RemoveItemRequest, ResolvedSelection,
    ToggleCommand, VariantNotSelected, WishlistAction, WishlistSnapshot,
};

/// Shown when a signed-out shopper presses the button.
pub const SIGN_IN_REQUIRED: &str =
    "You must sign in or register to add items to your wishlist.";

/// Shown when a configurable product has no variant selected.
pub const SELECT_VARIANT_FIRST: &str = "Please select the desired variant first.";

/// Shown when a removal races a change made elsewhere (e.g. a second tab).
pub const NOT_IN_WISHLIST: &str = "This item is no longer in your wishlist.";

/// Derives wishlist button state and commands for one product.
///
/// Construct with [`new`](Self::new), refine with the `with_*` setters, then
/// read the flags or ask for a command:
///
/// ```rust,ignore
/// let toggle = WishlistToggle::new(&product, &snapshot)
///     .with_selection(Some(0))
///     .signed_in(true);
///
/// if !toggle.is_disabled() {
///     match toggle.add() {
///         ToggleCommand::Add(request) => service.add(&customer, request).await?,
///         ToggleCommand::Notify(n) => flash::push(&session, n).await?,
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WishlistToggle<'a> {
    product: &'a Product,
    snapshot: &'a WishlistSnapshot,
    selection: Option<usize>,
    quantity: Quantity,
    signed_in: bool,
}

impl<'a> WishlistToggle<'a> {
    /// Create a toggle with no selection, quantity 1, and a signed-out shopper.
    #[must_use]
    pub fn new(product: &'a Product, snapshot: &'a WishlistSnapshot) -> Self {
        Self {
            product,
            snapshot,
            selection: None,
            quantity: Quantity::default(),
            signed_in: false,
        }
    }

    /// Set the selected variant index, if any.
    #[must_use]
    pub const fn with_selection(mut self, selection: Option<usize>) -> Self {
        self.selection = selection;
        self
    }

    /// Set the quantity an add command carries.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set whether the shopper is signed in.
    #[must_use]
    pub const fn signed_in(mut self, signed_in: bool) -> Self {
        self.signed_in = signed_in;
        self
    }

    /// Resolve the variant selection to the item a wishlist action targets.
    ///
    /// - A simple product resolves to its own SKU, regardless of selection.
    /// - A configurable product with no selection (or one past the end of
    ///   the variant list) fails with [`VariantNotSelected`].
    /// - Otherwise the selected variant's SKU, paired with the option data
    ///   the add payload carries.
    ///
    /// # Errors
    ///
    /// Returns [`VariantNotSelected`] when a configurable product lacks a
    /// usable selection.
    pub fn resolve(&self) -> Result<ResolvedSelection, VariantNotSelected> {
        if !self.product.is_configurable() {
            return Ok(ResolvedSelection {
                sku: self.product.sku.clone(),
                product_option: None,
            });
        }

        let variant = self
            .selection
            .and_then(|index| self.product.variants.get(index))
            .ok_or(VariantNotSelected)?;

        let options = self.product.configurable_item_options(variant);

        Ok(ResolvedSelection {
            sku: variant.sku.clone(),
            product_option: Some(ProductOption {
                extension_attributes: ExtensionAttributes {
                    configurable_item_options: options,
                },
            }),
        })
    }

    /// Whether the button should render disabled.
    ///
    /// True while a mutation is pending for this customer, or while a
    /// configurable product has no variant selected.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        if self.resolve().is_err() {
            return true;
        }
        self.snapshot.pending()
    }

    /// Whether the resolved item is currently saved in the wishlist.
    ///
    /// False whenever resolution fails.
    #[must_use]
    pub fn is_in_wishlist(&self) -> bool {
        self.resolve()
            .is_ok_and(|resolved| self.snapshot.contains(&resolved.sku))
    }

    /// Derive the command for an add event.
    #[must_use]
    pub fn add(&self) -> ToggleCommand {
        self.toggle(WishlistAction::Add)
    }

    /// Derive the command for a remove event.
    #[must_use]
    pub fn remove(&self) -> ToggleCommand {
        self.toggle(WishlistAction::Remove)
    }

    /// Derive the single command for a toggle event.
    ///
    /// The decision chain, in order:
    ///
    /// 1. Mutation pending - ignore the event silently.
    /// 2. Signed out - notify, no dispatch.
    /// 3. Resolution failure - notify, no dispatch.
    /// 4. Add - dispatch the parent SKU with option data and quantity.
    /// 5. Remove - look the resolved SKU up in the snapshot for its item id.
    ///    Callers gate removal on [`is_in_wishlist`](Self::is_in_wishlist);
    ///    if the entry vanished in between (stale snapshot, second tab) the
    ///    command degrades to a notification rather than guessing an id.
    #[must_use]
    pub fn toggle(&self, action: WishlistAction) -> ToggleCommand {
        if self.snapshot.pending() {
            return ToggleCommand::Ignore;
        }

        if !self.signed_in {
            return ToggleCommand::Notify(Notification::error(SIGN_IN_REQUIRED));
        }

        let Ok(resolved) = self.resolve() else {
            return ToggleCommand::Notify(Notification::error(SELECT_VARIANT_FIRST));
        };

        match action {
            WishlistAction::Add => ToggleCommand::Add(AddItemRequest {
                sku: self.product.sku.clone(),
                product_option: resolved.product_option,
                quantity: self.quantity,
            }),
            WishlistAction::Remove => match self.snapshot.entry(&resolved.sku) {
                Some(entry) => ToggleCommand::Remove(RemoveItemRequest {
                    item_id: entry.item_id,
                    sku: resolved.sku,
                }),
                None => ToggleCommand::Notify(Notification::error(NOT_IN_WISHLIST)),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use golden_fig_core::{AttributeId, CurrencyCode, Price, Sku, WishlistItemId};

    use crate::models::{ConfigurableOption, ProductKind, Variant};
    use crate::wishlist::WishlistEntry;

    use super::*;

    fn simple_product(sku: &str) -> Product {
        Product {
            sku: Sku::parse(sku).unwrap(),
            url_key: sku.to_lowercase(),
            name: format!("Product {sku}"),
            kind: ProductKind::Simple,
            price: Price::new(10.into(), CurrencyCode::USD),
            variants: vec![],
            configurable_options: vec![],
        }
    }

    fn configurable_product() -> Product {
        Product {
            sku: Sku::parse("A1").unwrap(),
            url_key: "a1".to_string(),
            name: "A1".to_string(),
            kind: ProductKind::Configurable,
            price: Price::new(10.into(), CurrencyCode::USD),
            variants: vec![Variant {
                sku: Sku::parse("A1-red").unwrap(),
                name: "A1 Red".to_string(),
                attributes: [("color".to_string(), 49)].into_iter().collect(),
            }],
            configurable_options: vec![ConfigurableOption {
                attribute_id: AttributeId::new(93),
                attribute_code: "color".to_string(),
                label: "Color".to_string(),
                values: vec![],
            }],
        }
    }

    fn snapshot_with(sku: &str, item_id: i64) -> WishlistSnapshot {
        let mut items = HashMap::new();
        items.insert(
            Sku::parse(sku).unwrap(),
            WishlistEntry {
                item_id: WishlistItemId::new(item_id),
                quantity: Quantity::default(),
            },
        );
        WishlistSnapshot::new(items, false)
    }

    #[test]
    fn test_simple_product_resolves_to_itself_regardless_of_selection() {
        let product = simple_product("A1");
        let snapshot = WishlistSnapshot::default();

        for selection in [None, Some(0), Some(7)] {
            let toggle = WishlistToggle::new(&product, &snapshot).with_selection(selection);
            let resolved = toggle.resolve().unwrap();
            assert_eq!(resolved.sku, Sku::parse("A1").unwrap());
            assert!(resolved.product_option.is_none());
        }
    }

    #[test]
    fn test_configurable_without_selection_fails_resolution() {
        let product = configurable_product();
        let snapshot = WishlistSnapshot::default();
        let toggle = WishlistToggle::new(&product, &snapshot);

        assert_eq!(toggle.resolve(), Err(VariantNotSelected));
        assert!(toggle.is_disabled());
        assert!(!toggle.is_in_wishlist());
    }

    #[test]
    fn test_out_of_range_selection_counts_as_no_selection() {
        let product = configurable_product();
        let snapshot = WishlistSnapshot::default();
        let toggle = WishlistToggle::new(&product, &snapshot).with_selection(Some(5));

        assert_eq!(toggle.resolve(), Err(VariantNotSelected));
    }

    #[test]
    fn test_membership_keyed_by_resolved_variant_sku() {
        let product = configurable_product();
        let in_list = snapshot_with("A1-red", 9);
        let not_in_list = snapshot_with("A1-blue", 3);

        let toggle = WishlistToggle::new(&product, &in_list).with_selection(Some(0));
        assert!(toggle.is_in_wishlist());

        let toggle = WishlistToggle::new(&product, &not_in_list).with_selection(Some(0));
        assert!(!toggle.is_in_wishlist());
    }

    #[test]
    fn test_toggle_while_pending_ignores_event() {
        let product = simple_product("A1");
        let snapshot = WishlistSnapshot::new(HashMap::new(), true);
        let toggle = WishlistToggle::new(&product, &snapshot).signed_in(true);

        assert_eq!(toggle.add(), ToggleCommand::Ignore);
        assert_eq!(toggle.remove(), ToggleCommand::Ignore);
        assert!(toggle.is_disabled());
    }

    #[test]
    fn test_toggle_while_signed_out_notifies_once() {
        let product = simple_product("A1");
        let snapshot = WishlistSnapshot::default();
        let toggle = WishlistToggle::new(&product, &snapshot);

        let ToggleCommand::Notify(notification) = toggle.add() else {
            panic!("expected a notification command");
        };
        assert!(notification.is_error());
        assert_eq!(notification.message, SIGN_IN_REQUIRED);
    }

    #[test]
    fn test_unresolved_variant_notifies() {
        let product = configurable_product();
        let snapshot = WishlistSnapshot::default();
        let toggle = WishlistToggle::new(&product, &snapshot).signed_in(true);

        let ToggleCommand::Notify(notification) = toggle.add() else {
            panic!("expected a notification command");
        };
        assert_eq!(notification.message, SELECT_VARIANT_FIRST);
    }

    #[test]
    fn test_simple_add_scenario() {
        // Product{simple, "A1"}, empty map: not in wishlist, not disabled,
        // add dispatches {sku: "A1", quantity: 1}.
        let product = simple_product("A1");
        let snapshot = WishlistSnapshot::default();
        let toggle = WishlistToggle::new(&product, &snapshot).signed_in(true);

        assert!(!toggle.is_in_wishlist());
        assert!(!toggle.is_disabled());

        let ToggleCommand::Add(request) = toggle.add() else {
            panic!("expected an add command");
        };
        assert_eq!(request.sku, Sku::parse("A1").unwrap());
        assert!(request.product_option.is_none());
        assert_eq!(request.quantity.get(), 1);
    }

    #[test]
    fn test_configurable_remove_scenario() {
        // Configurable with variants=["A1-red"], selection 0,
        // map={"A1-red": item_id 9}: in wishlist, remove dispatches
        // {item_id: 9, sku: "A1-red"}.
        let product = configurable_product();
        let snapshot = snapshot_with("A1-red", 9);
        let toggle = WishlistToggle::new(&product, &snapshot)
            .with_selection(Some(0))
            .signed_in(true);

        assert!(toggle.is_in_wishlist());

        let ToggleCommand::Remove(request) = toggle.remove() else {
            panic!("expected a remove command");
        };
        assert_eq!(request.item_id, WishlistItemId::new(9));
        assert_eq!(request.sku, Sku::parse("A1-red").unwrap());
    }

    #[test]
    fn test_configurable_add_carries_parent_sku_and_options() {
        let product = configurable_product();
        let snapshot = WishlistSnapshot::default();
        let toggle = WishlistToggle::new(&product, &snapshot)
            .with_selection(Some(0))
            .with_quantity(Quantity::new(2).unwrap())
            .signed_in(true);

        let ToggleCommand::Add(request) = toggle.add() else {
            panic!("expected an add command");
        };
        // Parent SKU on the payload, variant travels as option data.
        assert_eq!(request.sku, Sku::parse("A1").unwrap());
        assert_eq!(request.quantity.get(), 2);

        let option = request.product_option.unwrap();
        let items = option.extension_attributes.configurable_item_options;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].option_id, AttributeId::new(93));
        assert_eq!(items[0].option_value, 49);
    }

    #[test]
    fn test_remove_with_stale_snapshot_degrades_to_notification() {
        // The resolved SKU is absent from the map (changed in another tab
        // between derivation and dispatch). No panic, no invented item id.
        let product = simple_product("A1");
        let snapshot = WishlistSnapshot::default();
        let toggle = WishlistToggle::new(&product, &snapshot).signed_in(true);

        let ToggleCommand::Notify(notification) = toggle.remove() else {
            panic!("expected a notification command");
        };
        assert_eq!(notification.message, NOT_IN_WISHLIST);
    }
}
