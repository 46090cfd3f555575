//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::magento::MagentoClient;
use crate::wishlist::WishlistService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the Magento client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    magento: MagentoClient,
    wishlist: WishlistService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let magento = MagentoClient::new(&config.magento);
        let wishlist = WishlistService::new(magento.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                magento,
                wishlist,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Magento GraphQL client.
    #[must_use]
    pub fn magento(&self) -> &MagentoClient {
        &self.inner.magento
    }

    /// Get a reference to the wishlist service.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistService {
        &self.inner.wishlist
    }
}
