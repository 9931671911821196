//! Product repository port (read side).

use async_trait::async_trait;

use crate::domain::catalog::Product;
use crate::domain::foundation::{DomainError, ProductId};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Loads one product, deleted or not.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such product exists
    async fn get(&self, product_id: &ProductId) -> Result<Product, DomainError>;

    /// Loads several products. Unknown ids are skipped, not reported.
    async fn multi_get(&self, product_ids: &[ProductId]) -> Result<Vec<Product>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ProductRepository) {}
    }
}
