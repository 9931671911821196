//! User service port (read side).

use async_trait::async_trait;

use crate::domain::customer::{Address, Customer};
use crate::domain::foundation::{AddressId, DomainError, UserId};

/// Port for customer profile and address book lookups.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Loads a customer profile.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist
    async fn get_user(&self, user_id: &UserId) -> Result<Customer, DomainError>;

    /// Loads an address owned by `user_id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the address does not exist or belongs to someone else
    async fn get_address(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
    ) -> Result<Address, DomainError>;
}
