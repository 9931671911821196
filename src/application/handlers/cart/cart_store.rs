//! CartStore - Read-modify-write access to session carts.
//!
//! Every mutation ends with a refresh: product data is re-read, items that
//! are no longer on sale are dropped, boxes are resized and the expiry is
//! pushed out by the TTL. Concurrent writers on one session race and the
//! last write wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::cart::Cart;
use crate::domain::catalog::Product;
use crate::domain::foundation::{ProductId, ServiceError, SessionId};
use crate::ports::{CacheError, CartCache, Clock, ProductRepository};

/// Cart lifetime settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSettings {
    /// How long an untouched cart lives.
    pub ttl: Duration,
    /// Age after which a read refreshes the cart.
    pub refresh_interval: Duration,
}

pub struct CartStore {
    cache: Arc<dyn CartCache>,
    products: Arc<dyn ProductRepository>,
    clock: Arc<dyn Clock>,
    settings: CartSettings,
}

impl CartStore {
    pub fn new(
        cache: Arc<dyn CartCache>,
        products: Arc<dyn ProductRepository>,
        clock: Arc<dyn Clock>,
        settings: CartSettings,
    ) -> Self {
        Self {
            cache,
            products,
            clock,
            settings,
        }
    }

    /// Loads the session's cart, creating and storing an empty one on a
    /// miss or when the stored cart has expired.
    ///
    /// # Errors
    ///
    /// `Internal` for any cache failure other than a miss.
    pub async fn get_or_create(&self, session_id: &SessionId) -> Result<Cart, ServiceError> {
        let now = self.clock.now();
        match self.cache.get(session_id).await {
            Ok(cart) if !cart.is_expired(now) => return Ok(cart),
            Ok(_) => {
                tracing::debug!(session_id = %session_id, "stored cart expired, starting over");
            }
            Err(CacheError::NotFound(_)) => {}
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "failed to read cart");
                return Err(ServiceError::internal_from(e));
            }
        }

        let cart = Cart::new(session_id.clone(), now, self.settings.ttl);
        self.write(&cart).await?;
        Ok(cart)
    }

    /// Loads the cart for display, refreshing it when it has not been
    /// touched for longer than the refresh interval.
    pub async fn get(&self, session_id: &SessionId) -> Result<Cart, ServiceError> {
        let mut cart = self.get_or_create(session_id).await?;
        if cart.is_stale(self.clock.now(), self.settings.refresh_interval) {
            self.refresh(&mut cart).await?;
        }
        Ok(cart)
    }

    /// Adds `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` when `quantity < 1`
    /// - `NotFound` when the product does not exist
    /// - `Forbidden` when the product is not on sale
    /// - `FailedPrecondition` when the target basket would exceed inventory
    pub async fn add_item(
        &self,
        session_id: &SessionId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::invalid_argument(format!(
                "quantity must be at least 1, got {}",
                quantity
            )));
        }

        let product = self.products.get(product_id).await?;
        if !product.is_published() {
            return Err(ServiceError::forbidden(format!(
                "product is not on sale: {}",
                product_id
            )));
        }

        let mut cart = self.get_or_create(session_id).await?;
        let mut products = self.load_products(&cart.product_ids()).await?;
        products.insert(product.id.clone(), product.clone());

        let box_number = cart.add_item(&product, quantity, &products)?;
        tracing::debug!(
            session_id = %session_id,
            product_id = %product_id,
            quantity,
            box_number,
            "item added to cart"
        );

        self.commit(&mut cart, &products).await?;
        Ok(cart)
    }

    /// Removes a product from basket `box_number` (0 for every basket).
    /// Removing something that is not there still refreshes the cart.
    pub async fn remove_item(
        &self,
        session_id: &SessionId,
        product_id: &ProductId,
        box_number: u32,
    ) -> Result<Cart, ServiceError> {
        let mut cart = self.get_or_create(session_id).await?;
        if !cart.remove_item(product_id, box_number) {
            tracing::debug!(
                session_id = %session_id,
                product_id = %product_id,
                box_number,
                "nothing to remove"
            );
        }
        self.refresh(&mut cart).await?;
        Ok(cart)
    }

    /// Drops the baskets consumed by an order.
    pub async fn prune(
        &self,
        session_id: &SessionId,
        box_numbers: &[u32],
    ) -> Result<(), ServiceError> {
        let mut cart = self.get_or_create(session_id).await?;
        cart.remove_baskets(box_numbers);
        self.refresh(&mut cart).await
    }

    /// Re-reads every referenced product, normalizes the cart and writes it back.
    ///
    /// # Errors
    ///
    /// `Internal` when products cannot be loaded or the cart cannot be written.
    pub async fn refresh(&self, cart: &mut Cart) -> Result<(), ServiceError> {
        let products = self.load_products(&cart.product_ids()).await?;
        self.commit(cart, &products).await
    }

    async fn commit(
        &self,
        cart: &mut Cart,
        products: &HashMap<ProductId, Product>,
    ) -> Result<(), ServiceError> {
        cart.refresh(products, self.clock.now(), self.settings.ttl);
        self.write(cart).await
    }

    async fn load_products(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Product>, ServiceError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let products = self.products.multi_get(product_ids).await.map_err(|e| {
            tracing::error!(error = %e, "failed to load cart products");
            ServiceError::internal_from(e)
        })?;
        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    async fn write(&self, cart: &Cart) -> Result<(), ServiceError> {
        self.cache.insert(cart).await.map_err(|e| {
            tracing::error!(session_id = %cart.session_id, error = %e, "failed to store cart");
            ServiceError::internal_from(e)
        })
    }
}
