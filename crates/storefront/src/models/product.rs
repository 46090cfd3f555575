//! Catalog product model.
//!
//! Products come in two kinds: simple (directly purchasable) and configurable
//! (the shopper must pick a variant, e.g. a size and color, before any cart or
//! wishlist action). Variants are ordered; UI selections reference them by
//! index into [`Product::variants`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use golden_fig_core::{AttributeId, Price, Sku};

use crate::wishlist::ConfigurableItemOption;

/// Product type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Simple,
    Configurable,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Parent SKU. Add-to-wishlist payloads carry this SKU even for
    /// configurable products; the selected variant travels as option data.
    pub sku: Sku,
    /// URL key used in product page paths.
    pub url_key: String,
    pub name: String,
    pub kind: ProductKind,
    pub price: Price,
    /// Ordered variant list. Empty for simple products.
    pub variants: Vec<Variant>,
    /// Option definitions for configurable products (e.g. Color, Size).
    pub configurable_options: Vec<ConfigurableOption>,
}

/// A concrete purchasable variant of a configurable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub sku: Sku,
    pub name: String,
    /// Selected option values, keyed by attribute code (e.g. `"color" -> 49`).
    pub attributes: BTreeMap<String, i64>,
}

/// A configurable option definition (one selectable axis, e.g. Color).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurableOption {
    pub attribute_id: AttributeId,
    pub attribute_code: String,
    pub label: String,
    pub values: Vec<OptionValue>,
}

/// One selectable value of a configurable option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionValue {
    pub value_index: i64,
    pub label: String,
}

impl Product {
    /// Whether this product requires a variant selection before wishlist or
    /// cart actions are meaningful.
    #[must_use]
    pub const fn is_configurable(&self) -> bool {
        matches!(self.kind, ProductKind::Configurable)
    }

    /// Compute the configurable item options for a selected variant.
    ///
    /// For each option definition on this product, looks up the variant's
    /// value for that attribute code and pairs it with the option's attribute
    /// id. Options the variant carries no value for are skipped.
    #[must_use]
    pub fn configurable_item_options(&self, variant: &Variant) -> Vec<ConfigurableItemOption> {
        self.configurable_options
            .iter()
            .filter_map(|option| {
                variant
                    .attributes
                    .get(&option.attribute_code)
                    .map(|&value| ConfigurableItemOption {
                        option_id: option.attribute_id,
                        option_value: value,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn configurable_product() -> Product {
        Product {
            sku: Sku::parse("A1").unwrap(),
            url_key: "a1-tee".to_string(),
            name: "A1 Tee".to_string(),
            kind: ProductKind::Configurable,
            price: Price::new(20.into(), golden_fig_core::CurrencyCode::USD),
            variants: vec![Variant {
                sku: Sku::parse("A1-red").unwrap(),
                name: "A1 Tee Red".to_string(),
                attributes: [("color".to_string(), 49)].into_iter().collect(),
            }],
            configurable_options: vec![
                ConfigurableOption {
                    attribute_id: AttributeId::new(93),
                    attribute_code: "color".to_string(),
                    label: "Color".to_string(),
                    values: vec![OptionValue {
                        value_index: 49,
                        label: "Red".to_string(),
                    }],
                },
                ConfigurableOption {
                    attribute_id: AttributeId::new(144),
                    attribute_code: "size".to_string(),
                    label: "Size".to_string(),
                    values: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_configurable_item_options_pairs_option_id_with_variant_value() {
        let product = configurable_product();
        let options = product.configurable_item_options(&product.variants[0]);

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].option_id, AttributeId::new(93));
        assert_eq!(options[0].option_value, 49);
    }

    #[test]
    fn test_configurable_item_options_skips_missing_attributes() {
        // The variant above carries no "size" value, so the size option
        // must not appear in the output.
        let product = configurable_product();
        let options = product.configurable_item_options(&product.variants[0]);

        assert!(!options
            .iter()
            .any(|o| o.option_id == AttributeId::new(144)));
    }

    #[test]
    fn test_is_configurable() {
        let product = configurable_product();
        assert!(product.is_configurable());
    }
}
