//! Concurrent lookups feeding a checkout.
//!
//! All lookups run in one `try_join!`: the first failure drops the others,
//! and dropping the returned future (client gone) cancels everything still
//! in flight. The whole group is bounded by a timeout.

use std::sync::Arc;
use std::time::Duration;

use super::process_checkout::CheckoutCommand;
use crate::application::handlers::cart::CartStore;
use crate::domain::cart::Cart;
use crate::domain::catalog::{Promotion, Shipping};
use crate::domain::customer::{Address, Customer};
use crate::domain::foundation::{CoordinatorId, ServiceError};
use crate::ports::{PromotionRepository, ShippingRepository, UserService};

/// Everything checkout reads before pricing.
#[derive(Debug, Clone)]
pub struct CheckoutContext {
    pub customer: Customer,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub cart: Cart,
    pub shipping: Shipping,
    pub promotion: Option<Promotion>,
}

pub struct CheckoutLookups {
    users: Arc<dyn UserService>,
    shippings: Arc<dyn ShippingRepository>,
    promotions: Arc<dyn PromotionRepository>,
    carts: Arc<CartStore>,
    timeout: Duration,
}

impl CheckoutLookups {
    pub fn new(
        users: Arc<dyn UserService>,
        shippings: Arc<dyn ShippingRepository>,
        promotions: Arc<dyn PromotionRepository>,
        carts: Arc<CartStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            shippings,
            promotions,
            carts,
            timeout,
        }
    }

    /// Runs every lookup for `cmd` concurrently.
    ///
    /// # Errors
    ///
    /// The first lookup error, or `Internal` when the timeout expires.
    pub async fn gather(&self, cmd: &CheckoutCommand) -> Result<CheckoutContext, ServiceError> {
        let customer = async {
            self.users
                .get_user(&cmd.user_id)
                .await
                .map_err(ServiceError::from)
        };
        let billing_address = async {
            self.users
                .get_address(&cmd.user_id, &cmd.billing_address_id)
                .await
                .map_err(ServiceError::from)
        };
        let shipping_address = async {
            self.users
                .get_address(&cmd.user_id, &cmd.shipping_address_id)
                .await
                .map_err(ServiceError::from)
        };
        let cart = self.carts.get_or_create(&cmd.session_id);
        let shipping = self.shipping_for(&cmd.coordinator_id);
        let promotion = async {
            match &cmd.promotion_id {
                Some(id) => self
                    .promotions
                    .get(id)
                    .await
                    .map(Some)
                    .map_err(ServiceError::from),
                None => Ok(None),
            }
        };

        let joined = async {
            tokio::try_join!(
                customer,
                billing_address,
                shipping_address,
                cart,
                shipping,
                promotion
            )
        };

        let (customer, billing_address, shipping_address, cart, shipping, promotion) =
            tokio::time::timeout(self.timeout, joined)
                .await
                .map_err(|_| {
                    tracing::error!(
                        session_id = %cmd.session_id,
                        timeout_secs = self.timeout.as_secs(),
                        "checkout lookups timed out"
                    );
                    ServiceError::internal("checkout lookups timed out")
                })??;

        Ok(CheckoutContext {
            customer,
            billing_address,
            shipping_address,
            cart,
            shipping,
            promotion,
        })
    }

    /// Coordinator shipping, or the platform default when the coordinator
    /// has none. Only a `NotFound` falls back.
    async fn shipping_for(&self, coordinator_id: &CoordinatorId) -> Result<Shipping, ServiceError> {
        match self.shippings.get_by_coordinator_id(coordinator_id).await {
            Ok(shipping) => Ok(shipping),
            Err(e) if e.is_not_found() => {
                tracing::debug!(coordinator_id = %coordinator_id, "using default shipping");
                self.shippings.get_default().await.map_err(ServiceError::from)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::checkout::PaymentInstruction;
    use crate::application::handlers::testing::*;
    use crate::domain::catalog::fixtures::{promotion, shipping};
    use crate::domain::customer::fixtures::{address, customer};
    use crate::domain::foundation::{
        AddressId, DomainError, ErrorCode, PromotionId, SessionId, Timestamp, UserId,
    };
    use crate::domain::order::PaymentMethodType;
    use async_trait::async_trait;

    struct Fixture {
        users: Arc<MockUsers>,
        catalog: Arc<MockCatalog>,
        lookups: CheckoutLookups,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(MockUsers::default());
        users.add_customer(customer("u1"));
        users.add_address(address("a1", "u1"));
        users.add_address(address("a2", "u1"));
        let catalog = Arc::new(MockCatalog::default());
        catalog.add_shipping(shipping(None));
        let carts = cart_store(
            Arc::new(MockCartCache::default()),
            catalog.clone(),
            fixed_clock(),
        );
        let lookups = CheckoutLookups::new(
            users.clone(),
            catalog.clone(),
            catalog.clone(),
            carts,
            Duration::from_secs(5),
        );
        Fixture {
            users,
            catalog,
            lookups,
        }
    }

    fn command() -> CheckoutCommand {
        CheckoutCommand {
            user_id: UserId::new("u1").unwrap(),
            session_id: SessionId::new("s1").unwrap(),
            coordinator_id: CoordinatorId::new("c1").unwrap(),
            box_number: 0,
            promotion_id: None,
            billing_address_id: AddressId::new("a1").unwrap(),
            shipping_address_id: AddressId::new("a2").unwrap(),
            callback_url: "https://marche.example.com/checkout/done".to_string(),
            total: 0,
            payment: PaymentInstruction::Wallet(PaymentMethodType::PayPay),
        }
    }

    #[tokio::test]
    async fn gathers_everything() {
        let f = fixture();
        f.catalog.add_shipping(shipping(Some("c1")));
        f.catalog.add_promotion(promotion("pr1", Timestamp::now()));
        let mut cmd = command();
        cmd.promotion_id = Some(PromotionId::new("pr1").unwrap());

        let ctx = f.lookups.gather(&cmd).await.unwrap();

        assert_eq!(ctx.customer.id.as_str(), "u1");
        assert_eq!(ctx.billing_address.id.as_str(), "a1");
        assert_eq!(ctx.shipping_address.id.as_str(), "a2");
        assert!(ctx.cart.is_empty());
        assert!(!ctx.shipping.is_default());
        assert!(ctx.promotion.is_some());
    }

    #[tokio::test]
    async fn falls_back_to_default_shipping_on_not_found() {
        let f = fixture();
        let ctx = f.lookups.gather(&command()).await.unwrap();
        assert!(ctx.shipping.is_default());
        assert!(ctx.promotion.is_none());
    }

    #[tokio::test]
    async fn other_shipping_errors_fail_checkout() {
        let f = fixture();
        f.catalog
            .fail_coordinator_shipping(DomainError::database("connection reset"));

        let err = f.lookups.gather(&command()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn unknown_address_is_not_found() {
        let f = fixture();
        f.users.add_address(address("a9", "someone-else"));
        let mut cmd = command();
        cmd.shipping_address_id = AddressId::new("a9").unwrap();

        let err = f.lookups.gather(&cmd).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_promotion_is_not_found() {
        let f = fixture();
        let mut cmd = command();
        cmd.promotion_id = Some(PromotionId::new("nope").unwrap());

        let err = f.lookups.gather(&cmd).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Cancellation and timeout
    // ════════════════════════════════════════════════════════════════════════════

    /// User service whose profile lookup never returns.
    struct HangingUsers {
        inner: Arc<MockUsers>,
    }

    #[async_trait]
    impl UserService for HangingUsers {
        async fn get_user(&self, _user_id: &UserId) -> Result<Customer, DomainError> {
            std::future::pending::<Result<Customer, DomainError>>().await
        }

        async fn get_address(
            &self,
            user_id: &UserId,
            address_id: &AddressId,
        ) -> Result<Address, DomainError> {
            self.inner.get_address(user_id, address_id).await
        }
    }

    fn hanging_lookups(f: &Fixture, timeout: Duration) -> CheckoutLookups {
        CheckoutLookups::new(
            Arc::new(HangingUsers {
                inner: f.users.clone(),
            }),
            f.catalog.clone(),
            f.catalog.clone(),
            cart_store(
                Arc::new(MockCartCache::default()),
                f.catalog.clone(),
                fixed_clock(),
            ),
            timeout,
        )
    }

    #[tokio::test]
    async fn first_failure_cancels_pending_lookups() {
        let f = fixture();
        f.catalog.fail_coordinator_shipping(DomainError::new(
            ErrorCode::ExternalServiceError,
            "shipping service down",
        ));
        let lookups = hanging_lookups(&f, Duration::from_secs(30));

        let started = std::time::Instant::now();
        let err = lookups.gather(&command()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn timeout_is_internal() {
        let f = fixture();
        let lookups = hanging_lookups(&f, Duration::from_millis(50));

        let err = lookups.gather(&command()).await.unwrap_err();
        assert_eq!(err, ServiceError::internal("checkout lookups timed out"));
    }
}
