//! Customer profile and address book entries, as returned by the user service.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AddressId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: UserId,
    pub email: String,
    pub lastname: String,
    pub firstname: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.lastname, self.firstname)
    }
}

/// A postal address. Orders keep a copy, so later edits never reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub lastname: String,
    pub firstname: String,
    pub postal_code: String,
    /// JIS X 0401 prefecture code (1 = Hokkaido .. 47 = Okinawa).
    pub prefecture_code: i32,
    pub city: String,
    pub address_line1: String,
    pub address_line2: String,
    pub phone_number: String,
}

impl Address {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.lastname, self.firstname)
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
