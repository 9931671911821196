//! In-memory catalog: products, promotions and shipping configurations.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::catalog::{Product, Promotion, Shipping};
use crate::domain::foundation::{CoordinatorId, DomainError, ProductId, PromotionId};
use crate::ports::{ProductRepository, PromotionRepository, ShippingRepository};

#[derive(Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
    promotions: RwLock<HashMap<PromotionId, Promotion>>,
    shippings: RwLock<HashMap<CoordinatorId, Shipping>>,
    default_shipping: RwLock<Option<Shipping>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_product(&self, product: Product) {
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
    }

    pub async fn put_promotion(&self, promotion: Promotion) {
        self.promotions
            .write()
            .await
            .insert(promotion.id.clone(), promotion);
    }

    /// Stores a coordinator's shipping, or the platform default when it has
    /// no coordinator.
    pub async fn put_shipping(&self, shipping: Shipping) {
        match shipping.coordinator_id.clone() {
            Some(coordinator_id) => {
                self.shippings.write().await.insert(coordinator_id, shipping);
            }
            None => *self.default_shipping.write().await = Some(shipping),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn get(&self, product_id: &ProductId) -> Result<Product, DomainError> {
        self.products
            .read()
            .await
            .get(product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", product_id))
    }

    async fn multi_get(&self, product_ids: &[ProductId]) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().await;
        Ok(product_ids
            .iter()
            .filter_map(|id| products.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl PromotionRepository for InMemoryCatalog {
    async fn get(&self, promotion_id: &PromotionId) -> Result<Promotion, DomainError> {
        self.promotions
            .read()
            .await
            .get(promotion_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("promotion", promotion_id))
    }
}

#[async_trait]
impl ShippingRepository for InMemoryCatalog {
    async fn get_by_coordinator_id(
        &self,
        coordinator_id: &CoordinatorId,
    ) -> Result<Shipping, DomainError> {
        self.shippings
            .read()
            .await
            .get(coordinator_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("shipping", coordinator_id))
    }

    async fn get_default(&self) -> Result<Shipping, DomainError> {
        self.default_shipping
            .read()
            .await
            .clone()
            .ok_or_else(|| DomainError::not_found("shipping", "default"))
    }
}
