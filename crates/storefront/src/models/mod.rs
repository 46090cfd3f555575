//! Domain models for the storefront.

pub mod product;
pub mod session;

pub use product::{ConfigurableOption, OptionValue, Product, ProductKind, Variant};
pub use session::{CurrentCustomer, session_keys};
