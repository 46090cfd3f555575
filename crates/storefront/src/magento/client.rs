//! Magento GraphQL client implementation.
//!
//! Per-operation `const` query strings with inline response structs, executed
//! through one `query` helper that handles auth headers, the `Store` header,
//! rate limiting, and GraphQL error envelopes.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use golden_fig_core::{CustomerId, Sku, WishlistItemId};

use crate::config::MagentoConfig;
use crate::models::Product;
use crate::wishlist::AddItemRequest;

use super::wire::{WireProduct, WireWishlistItem};
use super::{GraphQLError, GraphQLErrorLocation, MagentoError};

// ─────────────────────────────────────────────────────────────────────────────
// GraphQL Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GraphQLRequest {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<WireGraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct WireGraphQLError {
    message: String,
    #[serde(default)]
    locations: Vec<WireGraphQLErrorLocation>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WireGraphQLErrorLocation {
    line: i64,
    column: i64,
}

impl<T> GraphQLResponse<T> {
    fn into_result(self) -> Result<T, MagentoError> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Err(MagentoError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e
                            .locations
                            .into_iter()
                            .map(|l| GraphQLErrorLocation {
                                line: l.line,
                                column: l.column,
                            })
                            .collect(),
                        path: e.path,
                    })
                    .collect(),
            ));
        }

        self.data.ok_or_else(|| {
            MagentoError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }
}

/// Cached catalog values. Wishlist data is deliberately absent - it is
/// mutable per customer and the wishlist service owns its own cache.
#[derive(Clone)]
enum CacheValue {
    Product(Box<Product>),
    ProductList(Arc<Vec<Product>>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Magento Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the Magento GraphQL API.
///
/// Provides catalog reads (cached, 5 minute TTL), customer token handling,
/// and the wishlist operations. Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct MagentoClient {
    inner: Arc<MagentoClientInner>,
}

struct MagentoClientInner {
    client: reqwest::Client,
    endpoint: String,
    store_code: Option<String>,
    integration_token: Option<String>,
    cache: Cache<String, CacheValue>,
}

/// The customer record returned after login.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInfo {
    pub id: CustomerId,
    pub email: String,
    pub firstname: Option<String>,
}

impl MagentoClient {
    /// Create a new Magento client.
    #[must_use]
    pub fn new(config: &MagentoConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(MagentoClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_url.clone(),
                store_code: config.store_code.clone(),
                integration_token: config
                    .integration_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                cache,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // GraphQL Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a GraphQL operation.
    ///
    /// `token` is the customer token for customer-scoped operations; catalog
    /// reads pass `None` and fall back to the integration token if one is
    /// configured.
    async fn query<T: DeserializeOwned>(
        &self,
        token: Option<&str>,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<T, MagentoError> {
        let request = GraphQLRequest {
            query: query.to_string(),
            variables,
        };

        let mut builder = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);

        if let Some(token) = token.or(self.inner.integration_token.as_deref()) {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        if let Some(store) = &self.inner.store_code {
            builder = builder.header("Store", store);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(MagentoError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Magento API returned non-success status"
            );
            return Err(MagentoError::GraphQL(vec![GraphQLError {
                message: format!(
                    "HTTP {status}: {}",
                    response_text.chars().take(200).collect::<String>()
                ),
                locations: vec![],
                path: vec![],
            }]));
        }

        let gql_response: GraphQLResponse<T> = serde_json::from_str(&response_text)
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Magento GraphQL response"
                );
            })?;

        gql_response.into_result()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Customer Token Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange credentials for a customer token.
    ///
    /// # Errors
    ///
    /// Returns `UserError` for bad credentials, or a transport error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn generate_customer_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, MagentoError> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "generateCustomerToken")]
            generate_customer_token: TokenResult,
        }

        #[derive(Deserialize)]
        struct TokenResult {
            token: String,
        }

        const QUERY: &str = r"
            mutation generateCustomerToken($email: String!, $password: String!) {
                generateCustomerToken(email: $email, password: $password) {
                    token
                }
            }
        ";

        let variables = serde_json::json!({ "email": email, "password": password });
        let response: Response = match self.query(None, QUERY, Some(variables)).await {
            Ok(r) => r,
            // Magento reports bad credentials as a GraphQL error; surface it
            // as a user error so callers can show a friendly message.
            Err(MagentoError::GraphQL(errors)) => {
                let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
                return Err(MagentoError::UserError(messages.join("; ")));
            }
            Err(e) => return Err(e),
        };

        Ok(response.generate_customer_token.token)
    }

    /// Revoke a customer token (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn revoke_customer_token(&self, token: &str) -> Result<(), MagentoError> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "revokeCustomerToken")]
            #[allow(dead_code)]
            revoke_customer_token: RevokeResult,
        }

        #[derive(Deserialize)]
        struct RevokeResult {
            #[allow(dead_code)]
            result: bool,
        }

        const QUERY: &str = r"
            mutation revokeCustomerToken {
                revokeCustomerToken {
                    result
                }
            }
        ";

        let _: Response = self.query(Some(token), QUERY, None).await?;
        Ok(())
    }

    /// Get the authenticated customer's record.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn get_customer(&self, token: &str) -> Result<CustomerInfo, MagentoError> {
        #[derive(Deserialize)]
        struct Response {
            customer: CustomerInfo,
        }

        const QUERY: &str = r"
            query getCustomer {
                customer {
                    id
                    email
                    firstname
                }
            }
        ";

        let response: Response = self.query(Some(token), QUERY, None).await?;
        Ok(response.customer)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog Operations
    // ─────────────────────────────────────────────────────────────────────────

    const PRODUCT_FIELDS: &'static str = r"
        sku
        name
        url_key
        type_id
        price_range {
            minimum_price {
                final_price { value currency }
            }
        }
        ... on ConfigurableProduct {
            variants {
                product { sku name }
                attributes { code value_index }
            }
            configurable_options {
                attribute_id_v2
                attribute_code
                label
                values { value_index label }
            }
        }
    ";

    /// Get the catalog product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Arc<Vec<Product>>, MagentoError> {
        const CACHE_KEY: &str = "products:all";

        if let Some(CacheValue::ProductList(products)) = self.inner.cache.get(CACHE_KEY).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        #[derive(Deserialize)]
        struct Response {
            products: ProductItems,
        }

        #[derive(Deserialize)]
        struct ProductItems {
            items: Vec<WireProduct>,
        }

        let query = format!(
            r#"
            query getProducts {{
                products(search: "", pageSize: 50) {{
                    items {{ {fields} }}
                }}
            }}
            "#,
            fields = Self::PRODUCT_FIELDS
        );

        let response: Response = self.query(None, &query, None).await?;

        let products = response
            .products
            .items
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let products = Arc::new(products);

        self.inner
            .cache
            .insert(
                CACHE_KEY.to_string(),
                CacheValue::ProductList(Arc::clone(&products)),
            )
            .await;

        Ok(products)
    }

    /// Get a product by its URL key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product matches, or a transport error.
    #[instrument(skip(self), fields(url_key = %url_key))]
    pub async fn get_product_by_url_key(&self, url_key: &str) -> Result<Product, MagentoError> {
        let cache_key = format!("product:url:{url_key}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let query = format!(
            r"
            query getProductByUrlKey($urlKey: String!) {{
                products(filter: {{ url_key: {{ eq: $urlKey }} }}) {{
                    items {{ {fields} }}
                }}
            }}
            ",
            fields = Self::PRODUCT_FIELDS
        );

        let variables = serde_json::json!({ "urlKey": url_key });
        let product = self
            .fetch_single_product(&query, variables)
            .await?
            .ok_or_else(|| MagentoError::NotFound(format!("Product not found: {url_key}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a product by its SKU.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no product matches, or a transport error.
    #[instrument(skip(self), fields(sku = %sku))]
    pub async fn get_product_by_sku(&self, sku: &Sku) -> Result<Product, MagentoError> {
        let cache_key = format!("product:sku:{sku}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let query = format!(
            r"
            query getProductBySku($sku: String!) {{
                products(filter: {{ sku: {{ eq: $sku }} }}) {{
                    items {{ {fields} }}
                }}
            }}
            ",
            fields = Self::PRODUCT_FIELDS
        );

        let variables = serde_json::json!({ "sku": sku.as_str() });
        let product = self
            .fetch_single_product(&query, variables)
            .await?
            .ok_or_else(|| MagentoError::NotFound(format!("Product not found: {sku}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    async fn fetch_single_product(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Option<Product>, MagentoError> {
        #[derive(Deserialize)]
        struct Response {
            products: ProductItems,
        }

        #[derive(Deserialize)]
        struct ProductItems {
            items: Vec<WireProduct>,
        }

        let response: Response = self.query(None, query, Some(variables)).await?;

        response
            .products
            .items
            .into_iter()
            .next()
            .map(Product::try_from)
            .transpose()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wishlist Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the customer's wishlist items.
    ///
    /// Never cached here: wishlist state is mutable per customer and the
    /// wishlist service owns its own snapshot cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn get_wishlist(&self, token: &str) -> Result<Vec<WireWishlistItem>, MagentoError> {
        #[derive(Deserialize)]
        struct Response {
            customer: CustomerWishlist,
        }

        #[derive(Deserialize)]
        struct CustomerWishlist {
            wishlist: Wishlist,
        }

        #[derive(Deserialize)]
        struct Wishlist {
            items: Vec<WireWishlistItem>,
        }

        const QUERY: &str = r"
            query getWishlist {
                customer {
                    wishlist {
                        items {
                            id
                            qty
                            product { sku name }
                            ... on ConfigurableWishlistItem {
                                child_sku
                            }
                        }
                    }
                }
            }
        ";

        let response: Response = self.query(Some(token), QUERY, None).await?;
        Ok(response.customer.wishlist.items)
    }

    /// Add an item to the customer's wishlist.
    ///
    /// The payload carries the parent SKU, the configurable item options as
    /// extension attributes, and the quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the mutation is rejected.
    #[instrument(skip(self, token), fields(sku = %request.sku))]
    pub async fn add_wishlist_item(
        &self,
        token: &str,
        request: &AddItemRequest,
    ) -> Result<(), MagentoError> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "saveWishlistItem")]
            #[allow(dead_code)]
            save_wishlist_item: SavedItem,
        }

        #[derive(Deserialize)]
        struct SavedItem {
            #[allow(dead_code)]
            id: i64,
        }

        const QUERY: &str = r"
            mutation saveWishlistItem($wishlistItem: WishlistItemInput!) {
                saveWishlistItem(wishlistItem: $wishlistItem) {
                    id
                }
            }
        ";

        let variables = serde_json::json!({ "wishlistItem": request });
        let _: Response = self.query(Some(token), QUERY, Some(variables)).await?;
        Ok(())
    }

    /// Remove an item from the customer's wishlist by its item id.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the mutation is rejected.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn remove_wishlist_item(
        &self,
        token: &str,
        item_id: WishlistItemId,
    ) -> Result<(), MagentoError> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(rename = "removeProductFromWishlist")]
            #[allow(dead_code)]
            remove_product_from_wishlist: RemovedItem,
        }

        #[derive(Deserialize)]
        struct RemovedItem {
            #[allow(dead_code)]
            id: i64,
        }

        const QUERY: &str = r"
            mutation removeProductFromWishlist($itemId: Int!) {
                removeProductFromWishlist(item_id: $itemId) {
                    id
                }
            }
        ";

        let variables = serde_json::json!({ "itemId": item_id.as_i64() });
        let _: Response = self.query(Some(token), QUERY, Some(variables)).await?;
        Ok(())
    }
}
