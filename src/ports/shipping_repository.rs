//! Shipping configuration repository port.

use async_trait::async_trait;

use crate::domain::catalog::Shipping;
use crate::domain::foundation::{CoordinatorId, DomainError};

#[async_trait]
pub trait ShippingRepository: Send + Sync {
    /// Loads the shipping configuration a coordinator set up.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the coordinator uses the platform default
    async fn get_by_coordinator_id(
        &self,
        coordinator_id: &CoordinatorId,
    ) -> Result<Shipping, DomainError>;

    /// Loads the platform default shipping configuration.
    async fn get_default(&self) -> Result<Shipping, DomainError>;
}
