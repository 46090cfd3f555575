//! Wishlist backend service: snapshot cache and per-customer in-flight guard.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use golden_fig_core::{CustomerId, Sku};

use crate::magento::{MagentoClient, MagentoError};

use super::types::{AddItemRequest, RemoveItemRequest, WishlistEntry, WishlistSnapshot};

/// How long a fetched wishlist snapshot stays fresh.
///
/// Short on purpose: mutations invalidate eagerly, so this only bounds how
/// stale a snapshot can get when another session mutates the same wishlist.
const SNAPSHOT_TTL: Duration = Duration::from_secs(30);

/// Errors from wishlist mutations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// The Magento API call failed.
    #[error(transparent)]
    Backend(#[from] MagentoError),

    /// Another mutation for this customer is already in flight.
    #[error("a wishlist update is already in progress")]
    Busy,
}

/// Wishlist operations against Magento, with a per-customer snapshot cache.
///
/// At most one mutation runs per customer at a time; a second attempt while
/// one is in flight returns [`WishlistError::Busy`], and snapshots taken in
/// that window report `pending`. Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct WishlistService {
    inner: Arc<WishlistServiceInner>,
}

struct WishlistServiceInner {
    magento: MagentoClient,
    snapshots: Cache<CustomerId, Arc<HashMap<Sku, WishlistEntry>>>,
    in_flight: Mutex<HashSet<CustomerId>>,
}

/// Marks a customer's mutation as in flight until dropped.
struct InFlightGuard {
    inner: Arc<WishlistServiceInner>,
    customer_id: CustomerId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.inner.in_flight.lock() {
            set.remove(&self.customer_id);
        }
    }
}

impl WishlistService {
    /// Create a new wishlist service backed by the given Magento client.
    #[must_use]
    pub fn new(magento: MagentoClient) -> Self {
        let snapshots = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(SNAPSHOT_TTL)
            .build();

        Self {
            inner: Arc::new(WishlistServiceInner {
                magento,
                snapshots,
                in_flight: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Take a snapshot of the customer's wishlist.
    ///
    /// Items come from the cache when fresh, otherwise from Magento. The
    /// snapshot's `pending` flag reflects whether a mutation for this
    /// customer is in flight at the moment of the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist has to be fetched and the API call
    /// fails.
    #[instrument(skip(self, token), fields(customer_id = %customer_id))]
    pub async fn snapshot(
        &self,
        customer_id: CustomerId,
        token: &str,
    ) -> Result<WishlistSnapshot, WishlistError> {
        let items = self.items(customer_id, token).await?;
        Ok(WishlistSnapshot::new(
            items.as_ref().clone(),
            self.is_pending(customer_id),
        ))
    }

    /// Number of items in the customer's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist has to be fetched and the API call
    /// fails.
    pub async fn count(
        &self,
        customer_id: CustomerId,
        token: &str,
    ) -> Result<usize, WishlistError> {
        Ok(self.items(customer_id, token).await?.len())
    }

    /// Add an item to the customer's wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Busy`] if another mutation for this customer
    /// is in flight, or a backend error.
    #[instrument(skip(self, token), fields(customer_id = %customer_id, sku = %request.sku))]
    pub async fn add(
        &self,
        customer_id: CustomerId,
        token: &str,
        request: &AddItemRequest,
    ) -> Result<(), WishlistError> {
        let _guard = self.begin(customer_id)?;

        self.inner.magento.add_wishlist_item(token, request).await?;
        self.inner.snapshots.invalidate(&customer_id).await;
        debug!("Added wishlist item");
        Ok(())
    }

    /// Remove an item from the customer's wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Busy`] if another mutation for this customer
    /// is in flight, or a backend error.
    #[instrument(
        skip(self, token),
        fields(customer_id = %customer_id, item_id = %request.item_id, sku = %request.sku)
    )]
    pub async fn remove(
        &self,
        customer_id: CustomerId,
        token: &str,
        request: &RemoveItemRequest,
    ) -> Result<(), WishlistError> {
        let _guard = self.begin(customer_id)?;

        self.inner
            .magento
            .remove_wishlist_item(token, request.item_id)
            .await?;
        self.inner.snapshots.invalidate(&customer_id).await;
        debug!("Removed wishlist item");
        Ok(())
    }

    /// Drop the cached snapshot for a customer (e.g. on logout).
    pub async fn forget(&self, customer_id: CustomerId) {
        self.inner.snapshots.invalidate(&customer_id).await;
    }

    async fn items(
        &self,
        customer_id: CustomerId,
        token: &str,
    ) -> Result<Arc<HashMap<Sku, WishlistEntry>>, WishlistError> {
        if let Some(items) = self.inner.snapshots.get(&customer_id).await {
            debug!(customer_id = %customer_id, "Snapshot cache hit");
            return Ok(items);
        }

        let wire_items = self.inner.magento.get_wishlist(token).await?;

        let mut items = HashMap::with_capacity(wire_items.len());
        for wire in wire_items {
            match wire.into_entry() {
                Ok((sku, entry)) => {
                    items.insert(sku, entry);
                }
                // One malformed item should not hide the rest of the wishlist
                Err(e) => warn!(error = %e, "Skipping malformed wishlist item"),
            }
        }

        let items = Arc::new(items);
        self.inner
            .snapshots
            .insert(customer_id, Arc::clone(&items))
            .await;
        Ok(items)
    }

    fn is_pending(&self, customer_id: CustomerId) -> bool {
        self.inner
            .in_flight
            .lock()
            .map(|set| set.contains(&customer_id))
            .unwrap_or(false)
    }

    fn begin(&self, customer_id: CustomerId) -> Result<InFlightGuard, WishlistError> {
        let mut set = self
            .inner
            .in_flight
            .lock()
            .map_err(|_| WishlistError::Busy)?;

        if !set.insert(customer_id) {
            return Err(WishlistError::Busy);
        }

        Ok(InFlightGuard {
            inner: Arc::clone(&self.inner),
            customer_id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MagentoConfig;

    fn service() -> WishlistService {
        WishlistService::new(MagentoClient::new(&MagentoConfig {
            graphql_url: "http://localhost:1/graphql".to_string(),
            store_code: None,
            integration_token: None,
        }))
    }

    #[test]
    fn test_second_mutation_is_refused_while_first_in_flight() {
        let service = service();
        let customer = CustomerId::new(7);

        let guard = service.begin(customer).unwrap();
        assert!(service.is_pending(customer));
        assert!(matches!(service.begin(customer), Err(WishlistError::Busy)));

        drop(guard);
        assert!(!service.is_pending(customer));
        let _second = service.begin(customer).unwrap();
    }

    #[test]
    fn test_guards_are_per_customer() {
        let service = service();

        let _a = service.begin(CustomerId::new(1)).unwrap();
        let _b = service.begin(CustomerId::new(2)).unwrap();
        assert!(service.is_pending(CustomerId::new(1)));
        assert!(service.is_pending(CustomerId::new(2)));
        assert!(!service.is_pending(CustomerId::new(3)));
    }
}
