//! Wire types for Magento GraphQL responses and their domain conversions.
//!
//! These structs mirror the JSON shapes the API returns; conversions into
//! domain models validate as they go (SKU parsing, quantity bounds), so the
//! rest of the crate never sees raw wire data.

use rust_decimal::Decimal;
use serde::Deserialize;

use golden_fig_core::{AttributeId, CurrencyCode, Price, Quantity, Sku, WishlistItemId};

use crate::models::{ConfigurableOption, OptionValue, Product, ProductKind, Variant};
use crate::wishlist::WishlistEntry;

use super::MagentoError;

/// A money value as Magento reports it.
#[derive(Debug, Deserialize)]
pub struct WireMoney {
    pub value: Decimal,
    pub currency: String,
}

impl From<WireMoney> for Price {
    fn from(money: WireMoney) -> Self {
        let currency_code = match money.currency.as_str() {
            "EUR" => CurrencyCode::EUR,
            "GBP" => CurrencyCode::GBP,
            "CAD" => CurrencyCode::CAD,
            "AUD" => CurrencyCode::AUD,
            _ => CurrencyCode::USD,
        };
        Self::new(money.value, currency_code)
    }
}

#[derive(Debug, Deserialize)]
pub struct WirePriceRange {
    pub minimum_price: WireMinimumPrice,
}

#[derive(Debug, Deserialize)]
pub struct WireMinimumPrice {
    pub final_price: WireMoney,
}

#[derive(Debug, Deserialize)]
pub struct WireVariantAttribute {
    pub code: String,
    pub value_index: i64,
}

#[derive(Debug, Deserialize)]
pub struct WireVariantProduct {
    pub sku: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WireVariant {
    pub product: WireVariantProduct,
    pub attributes: Vec<WireVariantAttribute>,
}

impl TryFrom<WireVariant> for Variant {
    type Error = MagentoError;

    fn try_from(wire: WireVariant) -> Result<Self, Self::Error> {
        Ok(Self {
            sku: parse_sku(&wire.product.sku)?,
            name: wire.product.name,
            attributes: wire
                .attributes
                .into_iter()
                .map(|a| (a.code, a.value_index))
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireOptionValue {
    pub value_index: i64,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct WireConfigurableOption {
    pub attribute_id_v2: i64,
    pub attribute_code: String,
    pub label: String,
    #[serde(default)]
    pub values: Vec<WireOptionValue>,
}

impl From<WireConfigurableOption> for ConfigurableOption {
    fn from(wire: WireConfigurableOption) -> Self {
        Self {
            attribute_id: AttributeId::new(wire.attribute_id_v2),
            attribute_code: wire.attribute_code,
            label: wire.label,
            values: wire
                .values
                .into_iter()
                .map(|v| OptionValue {
                    value_index: v.value_index,
                    label: v.label,
                })
                .collect(),
        }
    }
}

/// A catalog product as the `products` query returns it.
#[derive(Debug, Deserialize)]
pub struct WireProduct {
    pub sku: String,
    pub name: String,
    pub url_key: String,
    pub type_id: String,
    pub price_range: WirePriceRange,
    #[serde(default)]
    pub variants: Option<Vec<WireVariant>>,
    #[serde(default)]
    pub configurable_options: Option<Vec<WireConfigurableOption>>,
}

impl TryFrom<WireProduct> for Product {
    type Error = MagentoError;

    fn try_from(wire: WireProduct) -> Result<Self, Self::Error> {
        let kind = match wire.type_id.as_str() {
            "configurable" => ProductKind::Configurable,
            _ => ProductKind::Simple,
        };

        let variants = wire
            .variants
            .unwrap_or_default()
            .into_iter()
            .map(Variant::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sku: parse_sku(&wire.sku)?,
            url_key: wire.url_key,
            name: wire.name,
            kind,
            price: wire.price_range.minimum_price.final_price.into(),
            variants,
            configurable_options: wire
                .configurable_options
                .unwrap_or_default()
                .into_iter()
                .map(ConfigurableOption::from)
                .collect(),
        })
    }
}

/// A saved wishlist item as the `customer.wishlist` query returns it.
///
/// For configurable items `child_sku` names the selected variant; that SKU
/// keys wishlist membership, not the parent's.
#[derive(Debug, Deserialize)]
pub struct WireWishlistItem {
    pub id: i64,
    pub qty: f64,
    pub product: WireWishlistProduct,
    #[serde(default)]
    pub child_sku: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireWishlistProduct {
    pub sku: String,
    pub name: String,
}

impl WireWishlistItem {
    /// The SKU that keys this item in the snapshot map.
    #[must_use]
    pub fn membership_sku(&self) -> &str {
        self.child_sku.as_deref().unwrap_or(&self.product.sku)
    }

    /// Convert into a snapshot map pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the SKU fails validation.
    pub fn into_entry(self) -> Result<(Sku, WishlistEntry), MagentoError> {
        let sku = parse_sku(self.membership_sku())?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // Magento reports qty as a float but wishlist quantities are whole
        let qty = self.qty.round().max(1.0) as u32;

        Ok((
            sku,
            WishlistEntry {
                item_id: WishlistItemId::new(self.id),
                quantity: Quantity::new(qty).unwrap_or_default(),
            },
        ))
    }
}

fn parse_sku(raw: &str) -> Result<Sku, MagentoError> {
    Sku::parse(raw).map_err(|e| MagentoError::InvalidResponse(format!("bad sku {raw:?}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wire_product_json(type_id: &str) -> serde_json::Value {
        serde_json::json!({
            "sku": "A1",
            "name": "A1 Tee",
            "url_key": "a1-tee",
            "type_id": type_id,
            "price_range": {
                "minimum_price": { "final_price": { "value": "19.99", "currency": "USD" } }
            },
            "variants": [{
                "product": { "sku": "A1-red", "name": "A1 Tee Red" },
                "attributes": [{ "code": "color", "value_index": 49 }]
            }],
            "configurable_options": [{
                "attribute_id_v2": 93,
                "attribute_code": "color",
                "label": "Color",
                "values": [{ "value_index": 49, "label": "Red" }]
            }]
        })
    }

    #[test]
    fn test_configurable_product_conversion() {
        let wire: WireProduct =
            serde_json::from_value(wire_product_json("configurable")).unwrap();
        let product = Product::try_from(wire).unwrap();

        assert_eq!(product.sku.as_str(), "A1");
        assert!(product.is_configurable());
        assert_eq!(product.variants.len(), 1);
        assert_eq!(product.variants[0].sku.as_str(), "A1-red");
        assert_eq!(product.variants[0].attributes.get("color"), Some(&49));
        assert_eq!(
            product.configurable_options[0].attribute_id,
            AttributeId::new(93)
        );
        assert_eq!(product.price.display(), "$19.99");
    }

    #[test]
    fn test_simple_product_conversion() {
        let mut json = wire_product_json("simple");
        json["variants"] = serde_json::Value::Null;
        json["configurable_options"] = serde_json::Value::Null;

        let wire: WireProduct = serde_json::from_value(json).unwrap();
        let product = Product::try_from(wire).unwrap();

        assert!(!product.is_configurable());
        assert!(product.variants.is_empty());
    }

    #[test]
    fn test_invalid_sku_is_rejected() {
        let mut json = wire_product_json("simple");
        json["sku"] = serde_json::Value::String("has space".to_string());

        let wire: WireProduct = serde_json::from_value(json).unwrap();
        assert!(matches!(
            Product::try_from(wire),
            Err(MagentoError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_wishlist_item_keys_by_child_sku() {
        let wire = WireWishlistItem {
            id: 9,
            qty: 1.0,
            product: WireWishlistProduct {
                sku: "A1".to_string(),
                name: "A1 Tee".to_string(),
            },
            child_sku: Some("A1-red".to_string()),
        };

        let (sku, entry) = wire.into_entry().unwrap();
        assert_eq!(sku.as_str(), "A1-red");
        assert_eq!(entry.item_id, WishlistItemId::new(9));
    }

    #[test]
    fn test_wishlist_item_falls_back_to_product_sku() {
        let wire = WireWishlistItem {
            id: 4,
            qty: 2.0,
            product: WireWishlistProduct {
                sku: "B2".to_string(),
                name: "B2".to_string(),
            },
            child_sku: None,
        };

        let (sku, entry) = wire.into_entry().unwrap();
        assert_eq!(sku.as_str(), "B2");
        assert_eq!(entry.quantity.get(), 2);
    }
}
