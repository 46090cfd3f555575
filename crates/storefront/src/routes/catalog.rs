//! Catalog route handlers.
//!
//! Product listing and detail pages. The detail page renders the variant
//! picker for configurable products; the wishlist button itself is an HTMX
//! fragment served by the wishlist routes, so toggles never reload the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::OptionalCustomer;
use crate::models::Product;
use crate::notifications::{Notification, flash};
use crate::state::AppState;

/// Product card data for the listing page.
pub struct ProductCardView {
    pub url_key: String,
    pub name: String,
    pub price: String,
    pub configurable: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            url_key: product.url_key.clone(),
            name: product.name.clone(),
            price: product.price.display(),
            configurable: product.is_configurable(),
        }
    }
}

/// Variant option for the detail page picker.
pub struct VariantView {
    /// Index into the product's variant list; posted back on toggle.
    pub index: usize,
    pub name: String,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub customer_name: Option<String>,
    pub notifications: Vec<Notification>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub name: String,
    pub sku: String,
    pub price: String,
    pub configurable: bool,
    pub variants: Vec<VariantView>,
    pub customer_name: Option<String>,
    pub notifications: Vec<Notification>,
}

/// Display the product listing.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
) -> Result<impl IntoResponse> {
    let products = state.magento().get_products().await?;

    Ok(ProductIndexTemplate {
        products: products.iter().map(ProductCardView::from).collect(),
        customer_name: customer.map(|c| c.display_name().to_string()),
        notifications: flash::take(&session).await?,
    })
}

/// Display a product detail page.
#[instrument(skip(state, session, customer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    Path(url_key): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state
        .magento()
        .get_product_by_url_key(&url_key)
        .await
        .map_err(|e| match e {
            crate::magento::MagentoError::NotFound(_) => {
                AppError::NotFound(format!("Product not found: {url_key}"))
            }
            other => AppError::Magento(other),
        })?;

    Ok(ProductShowTemplate {
        name: product.name.clone(),
        sku: product.sku.to_string(),
        price: product.price.display(),
        configurable: product.is_configurable(),
        variants: product
            .variants
            .iter()
            .enumerate()
            .map(|(index, v)| VariantView {
                index,
                name: v.name.clone(),
            })
            .collect(),
        customer_name: customer.map(|c| c.display_name().to_string()),
        notifications: flash::take(&session).await?,
    })
}
