//! Promotion repository port.

use async_trait::async_trait;

use crate::domain::catalog::Promotion;
use crate::domain::foundation::{DomainError, PromotionId};

#[async_trait]
pub trait PromotionRepository: Send + Sync {
    /// # Errors
    ///
    /// - `NotFound` if no such promotion exists
    async fn get(&self, promotion_id: &PromotionId) -> Result<Promotion, DomainError>;
}
