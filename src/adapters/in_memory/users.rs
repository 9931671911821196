//! In-memory user service.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::customer::{Address, Customer};
use crate::domain::foundation::{AddressId, DomainError, UserId};
use crate::ports::UserService;

#[derive(Default)]
pub struct InMemoryUsers {
    customers: RwLock<HashMap<UserId, Customer>>,
    addresses: RwLock<HashMap<AddressId, Address>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_customer(&self, customer: Customer) {
        self.customers
            .write()
            .await
            .insert(customer.id.clone(), customer);
    }

    pub async fn put_address(&self, address: Address) {
        self.addresses
            .write()
            .await
            .insert(address.id.clone(), address);
    }
}

#[async_trait]
impl UserService for InMemoryUsers {
    async fn get_user(&self, user_id: &UserId) -> Result<Customer, DomainError> {
        self.customers
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    /// Addresses belonging to someone else read as missing.
    async fn get_address(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
    ) -> Result<Address, DomainError> {
        self.addresses
            .read()
            .await
            .get(address_id)
            .filter(|address| address.is_owned_by(user_id))
            .cloned()
            .ok_or_else(|| DomainError::not_found("address", address_id))
    }
}
