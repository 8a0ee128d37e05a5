use crate::client::api::{ApiError, StorefrontApi};
use crate::client::store::{Action, ProductSummary, Store};

/// Keeps the local cart mirror and the persisted user document from
/// permanently diverging.
///
/// Cart mutations apply locally first and the UI reads the store
/// immediately; the full snapshot is then pushed best-effort. A failed push
/// keeps the optimistic local change (no rollback), logs a warning, and is
/// retried on the next mutation or [`CartSynchronizer::flush`].
pub struct CartSynchronizer {
    store: Store,
    api: StorefrontApi,
}

impl CartSynchronizer {
    pub fn new(api: StorefrontApi) -> Self {
        Self {
            store: Store::new(),
            api,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn api(&self) -> &StorefrontApi {
        &self.api
    }

    pub async fn add_to_cart(&mut self, product: ProductSummary, quantity: u32) {
        self.store.dispatch(Action::AddToCart { product, quantity });
        self.flush().await;
    }

    pub async fn remove_from_cart(&mut self, product_id: i64) {
        self.store.dispatch(Action::RemoveFromCart { product_id });
        self.flush().await;
    }

    pub async fn update_quantity(&mut self, product_id: i64, quantity: u32) {
        self.store.dispatch(Action::UpdateQuantity {
            product_id,
            quantity,
        });
        self.flush().await;
    }

    /// Push pending local changes to the server, if any.
    pub async fn flush(&mut self) {
        if !self.store.is_dirty() {
            return;
        }
        match self.api.push_cart(self.store.cart()).await {
            Ok(()) => self.store.mark_synced(),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "cart persist failed; keeping local changes for the next attempt"
                );
            }
        }
    }

    pub async fn add_to_wishlist(&mut self, product_id: i64) -> Result<(), ApiError> {
        // Optimistic: the entry shows up locally before the server confirms.
        self.store.dispatch(Action::AddToWishlist { product_id });
        match self.api.add_to_wishlist(product_id).await {
            Ok(items) => {
                self.store
                    .dispatch(Action::ReplaceWishlist { product_ids: items });
                Ok(())
            }
            Err(err) => {
                if !matches!(err, ApiError::Conflict(_)) {
                    tracing::warn!(error = %err, "wishlist add failed to persist");
                }
                Err(err)
            }
        }
    }

    pub async fn remove_from_wishlist(&mut self, product_id: i64) -> Result<(), ApiError> {
        self.store.dispatch(Action::RemoveFromWishlist { product_id });
        match self.api.remove_from_wishlist(product_id).await {
            Ok(items) => {
                self.store
                    .dispatch(Action::ReplaceWishlist { product_ids: items });
                Ok(())
            }
            Err(err) => {
                if !matches!(err, ApiError::NotFound(_)) {
                    tracing::warn!(error = %err, "wishlist remove failed to persist");
                }
                Err(err)
            }
        }
    }

    /// Adopt a session token and replace the local cart and wishlist with the
    /// server's persisted copies. Replacement, not merge: whatever was held
    /// locally before login is discarded.
    pub async fn on_login(&mut self, token: impl Into<String>) -> Result<(), ApiError> {
        self.api.set_token(token);

        let cart = self.api.fetch_cart().await?;
        self.store.dispatch(Action::ReplaceCart { lines: cart });

        let wishlist = self.api.fetch_wishlist().await?;
        self.store
            .dispatch(Action::ReplaceWishlist { product_ids: wishlist });

        Ok(())
    }

    /// Clear the local mirror and drop the token. The persisted copy on the
    /// server is left untouched.
    pub fn on_logout(&mut self) {
        self.store.dispatch(Action::ClearLocal);
        self.api.clear_token();
    }

    /// Page-load hook: retry any pending push that failed earlier.
    pub async fn refresh(&mut self) {
        self.flush().await;
    }
}
