//! JSON seed data for the in-memory adapters.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::{InMemoryCatalog, InMemoryUsers};
use crate::domain::catalog::{Product, Promotion, Shipping};
use crate::domain::customer::{Address, Customer};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog and user records loaded at startup. Every list may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub promotions: Vec<Promotion>,
    pub shippings: Vec<Shipping>,
    pub customers: Vec<Customer>,
    pub addresses: Vec<Address>,
}

impl SeedData {
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    pub async fn load_into(self, catalog: &InMemoryCatalog, users: &InMemoryUsers) {
        tracing::info!(
            products = self.products.len(),
            promotions = self.promotions.len(),
            shippings = self.shippings.len(),
            customers = self.customers.len(),
            addresses = self.addresses.len(),
            "loading seed data"
        );
        for product in self.products {
            catalog.put_product(product).await;
        }
        for promotion in self.promotions {
            catalog.put_promotion(promotion).await;
        }
        for shipping in self.shippings {
            catalog.put_shipping(shipping).await;
        }
        for customer in self.customers {
            users.put_customer(customer).await;
        }
        for address in self.addresses {
            users.put_address(address).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ProductId, UserId};
    use crate::ports::{ProductRepository, ShippingRepository, UserService};

    #[tokio::test]
    async fn partial_seed_populates_adapters() {
        let json = r#"{
            "products": [{
                "id": "p1",
                "coordinator_id": "c1",
                "name": "Tomatoes",
                "price": 400,
                "inventory": 20,
                "public": true,
                "deleted": false,
                "delivery_type": "refrigerated",
                "box60_rate": 25,
                "box80_rate": 20,
                "box100_rate": 10
            }],
            "customers": [{
                "id": "u1",
                "email": "hanako@example.com",
                "lastname": "Yamada",
                "firstname": "Hanako"
            }]
        }"#;
        let seed: SeedData = serde_json::from_str(json).unwrap();
        let catalog = InMemoryCatalog::new();
        let users = InMemoryUsers::new();

        seed.load_into(&catalog, &users).await;

        let product = ProductRepository::get(&catalog, &ProductId::new("p1").unwrap())
            .await
            .unwrap();
        assert_eq!(product.name, "Tomatoes");
        assert!(users.get_user(&UserId::new("u1").unwrap()).await.is_ok());
        assert!(catalog.get_default().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = SeedData::from_file("/nonexistent/seed.json")
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }
}
