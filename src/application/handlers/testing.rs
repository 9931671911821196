//! Hand-written port doubles shared by handler tests.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::cart::{CartSettings, CartStore};
use crate::adapters::runtime::FixedClock;
use crate::domain::cart::Cart;
use crate::domain::catalog::{Product, Promotion, Shipping};
use crate::domain::customer::{Address, Customer};
use crate::domain::foundation::{
    AddressId, CoordinatorId, DomainError, ErrorCode, OrderId, ProductId, PromotionId, SessionId,
    Timestamp, UserId,
};
use crate::domain::order::{Order, PaymentMethodType, PaymentStatusUpdate, RefundUpdate};
use crate::ports::{
    BackgroundExecutor, CacheError, CartCache, CreateSessionRequest, CreditCardDetail, Notifier,
    OrderRepository, PayResult, PaymentError, PaymentGateway, PaymentSession, ProductRepository,
    PromotionRepository, ShippingRepository, UserService, WebhookEvent,
};

pub const TTL: Duration = Duration::from_secs(14 * 24 * 3600);
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(600);

// ════════════════════════════════════════════════════════════════════════════
// Cart cache
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockCartCache {
    carts: Mutex<HashMap<SessionId, Cart>>,
    fail_get: Mutex<bool>,
    fail_insert: Mutex<bool>,
    inserts: Mutex<usize>,
}

impl MockCartCache {
    pub fn put(&self, cart: Cart) {
        self.carts
            .lock()
            .unwrap()
            .insert(cart.session_id.clone(), cart);
    }

    pub fn stored(&self, session_id: &str) -> Option<Cart> {
        self.carts
            .lock()
            .unwrap()
            .get(&SessionId::new(session_id).unwrap())
            .cloned()
    }

    pub fn fail_get(&self) {
        *self.fail_get.lock().unwrap() = true;
    }

    pub fn fail_insert(&self) {
        *self.fail_insert.lock().unwrap() = true;
    }

    pub fn insert_count(&self) -> usize {
        *self.inserts.lock().unwrap()
    }
}

#[async_trait]
impl CartCache for MockCartCache {
    async fn get(&self, session_id: &SessionId) -> Result<Cart, CacheError> {
        if *self.fail_get.lock().unwrap() {
            return Err(CacheError::Backend("connection refused".to_string()));
        }
        self.carts
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(session_id.clone()))
    }

    async fn insert(&self, cart: &Cart) -> Result<(), CacheError> {
        if *self.fail_insert.lock().unwrap() {
            return Err(CacheError::Backend("connection refused".to_string()));
        }
        *self.inserts.lock().unwrap() += 1;
        self.put(cart.clone());
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockCatalog {
    products: Mutex<HashMap<ProductId, Product>>,
    promotions: Mutex<HashMap<PromotionId, Promotion>>,
    shippings: Mutex<HashMap<CoordinatorId, Shipping>>,
    default_shipping: Mutex<Option<Shipping>>,
    coordinator_shipping_error: Mutex<Option<DomainError>>,
    fail_multi_get: Mutex<bool>,
    multi_get_calls: Mutex<usize>,
}

impl MockCatalog {
    pub fn add_product(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.id.clone(), product);
    }

    pub fn add_promotion(&self, promotion: Promotion) {
        self.promotions
            .lock()
            .unwrap()
            .insert(promotion.id.clone(), promotion);
    }

    pub fn add_shipping(&self, shipping: Shipping) {
        match shipping.coordinator_id.clone() {
            Some(id) => {
                self.shippings.lock().unwrap().insert(id, shipping);
            }
            None => *self.default_shipping.lock().unwrap() = Some(shipping),
        }
    }

    /// Makes every coordinator shipping lookup fail with `err`.
    pub fn fail_coordinator_shipping(&self, err: DomainError) {
        *self.coordinator_shipping_error.lock().unwrap() = Some(err);
    }

    pub fn fail_multi_get(&self) {
        *self.fail_multi_get.lock().unwrap() = true;
    }

    pub fn multi_get_calls(&self) -> usize {
        *self.multi_get_calls.lock().unwrap()
    }
}

#[async_trait]
impl ProductRepository for MockCatalog {
    async fn get(&self, product_id: &ProductId) -> Result<Product, DomainError> {
        self.products
            .lock()
            .unwrap()
            .get(product_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", product_id))
    }

    async fn multi_get(&self, product_ids: &[ProductId]) -> Result<Vec<Product>, DomainError> {
        *self.multi_get_calls.lock().unwrap() += 1;
        if *self.fail_multi_get.lock().unwrap() {
            return Err(DomainError::database("Simulated multi_get failure"));
        }
        let products = self.products.lock().unwrap();
        Ok(product_ids
            .iter()
            .filter_map(|id| products.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl PromotionRepository for MockCatalog {
    async fn get(&self, promotion_id: &PromotionId) -> Result<Promotion, DomainError> {
        self.promotions
            .lock()
            .unwrap()
            .get(promotion_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("promotion", promotion_id))
    }
}

#[async_trait]
impl ShippingRepository for MockCatalog {
    async fn get_by_coordinator_id(
        &self,
        coordinator_id: &CoordinatorId,
    ) -> Result<Shipping, DomainError> {
        if let Some(err) = self.coordinator_shipping_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.shippings
            .lock()
            .unwrap()
            .get(coordinator_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("shipping", coordinator_id))
    }

    async fn get_default(&self) -> Result<Shipping, DomainError> {
        self.default_shipping
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DomainError::not_found("shipping", "default"))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockUsers {
    customers: Mutex<HashMap<UserId, Customer>>,
    addresses: Mutex<HashMap<AddressId, Address>>,
}

impl MockUsers {
    pub fn add_customer(&self, customer: Customer) {
        self.customers
            .lock()
            .unwrap()
            .insert(customer.id.clone(), customer);
    }

    pub fn add_address(&self, address: Address) {
        self.addresses
            .lock()
            .unwrap()
            .insert(address.id.clone(), address);
    }
}

#[async_trait]
impl UserService for MockUsers {
    async fn get_user(&self, user_id: &UserId) -> Result<Customer, DomainError> {
        self.customers
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    async fn get_address(
        &self,
        user_id: &UserId,
        address_id: &AddressId,
    ) -> Result<Address, DomainError> {
        self.addresses
            .lock()
            .unwrap()
            .get(address_id)
            .filter(|a| a.is_owned_by(user_id))
            .cloned()
            .ok_or_else(|| DomainError::not_found("address", address_id))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Orders
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockOrders {
    orders: Mutex<HashMap<OrderId, Order>>,
    create_calls: Mutex<usize>,
    fail_create: Mutex<bool>,
    fail_updates: Mutex<bool>,
}

impl MockOrders {
    pub fn put(&self, order: Order) {
        self.orders.lock().unwrap().insert(order.id, order);
    }

    pub fn all(&self) -> Vec<Order> {
        self.orders.lock().unwrap().values().cloned().collect()
    }

    pub fn find(&self, order_id: &OrderId) -> Option<Order> {
        self.orders.lock().unwrap().get(order_id).cloned()
    }

    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }

    pub fn fail_create(&self) {
        *self.fail_create.lock().unwrap() = true;
    }

    pub fn fail_updates(&self) {
        *self.fail_updates.lock().unwrap() = true;
    }
}

#[async_trait]
impl OrderRepository for MockOrders {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        *self.create_calls.lock().unwrap() += 1;
        if *self.fail_create.lock().unwrap() {
            return Err(DomainError::database("Simulated insert failure"));
        }
        self.put(order.clone());
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Order, DomainError> {
        self.find(order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))
    }

    async fn update_payment(
        &self,
        order_id: &OrderId,
        update: &PaymentStatusUpdate,
    ) -> Result<(), DomainError> {
        if *self.fail_updates.lock().unwrap() {
            return Err(DomainError::database("Simulated update failure"));
        }
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        order.payment.apply_status(update)
    }

    async fn update_refund(
        &self,
        order_id: &OrderId,
        update: &RefundUpdate,
    ) -> Result<(), DomainError> {
        if *self.fail_updates.lock().unwrap() {
            return Err(DomainError::database("Simulated update failure"));
        }
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        order.payment.apply_refund(update)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Payment gateway
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockGateway {
    sessions: Mutex<Vec<CreateSessionRequest>>,
    card_payments: Mutex<Vec<String>>,
    wallet_payments: Mutex<Vec<(String, PaymentMethodType)>>,
    fail_session: Mutex<Option<PaymentError>>,
    fail_pay: Mutex<Option<PaymentError>>,
    webhook: Mutex<Option<Result<WebhookEvent, PaymentError>>>,
}

impl MockGateway {
    pub fn sessions(&self) -> Vec<CreateSessionRequest> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn card_payments(&self) -> Vec<String> {
        self.card_payments.lock().unwrap().clone()
    }

    pub fn wallet_payments(&self) -> Vec<(String, PaymentMethodType)> {
        self.wallet_payments.lock().unwrap().clone()
    }

    pub fn fail_session(&self, err: PaymentError) {
        *self.fail_session.lock().unwrap() = Some(err);
    }

    pub fn fail_pay(&self, err: PaymentError) {
        *self.fail_pay.lock().unwrap() = Some(err);
    }

    pub fn set_webhook(&self, result: Result<WebhookEvent, PaymentError>) {
        *self.webhook.lock().unwrap() = Some(result);
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<PaymentSession, PaymentError> {
        if let Some(err) = self.fail_session.lock().unwrap().clone() {
            return Err(err);
        }
        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(request);
        let id = format!("sess_{}", sessions.len());
        Ok(PaymentSession {
            session_url: format!("https://pay.example.com/{}", id),
            id,
        })
    }

    async fn pay_credit_card(
        &self,
        session_id: &str,
        _card: &CreditCardDetail,
    ) -> Result<PayResult, PaymentError> {
        if let Some(err) = self.fail_pay.lock().unwrap().clone() {
            return Err(err);
        }
        self.card_payments
            .lock()
            .unwrap()
            .push(session_id.to_string());
        Ok(PayResult {
            redirect_url: format!("https://pay.example.com/3ds/{}", session_id),
        })
    }

    async fn pay_wallet(
        &self,
        session_id: &str,
        method: PaymentMethodType,
    ) -> Result<PayResult, PaymentError> {
        if let Some(err) = self.fail_pay.lock().unwrap().clone() {
            return Err(err);
        }
        self.wallet_payments
            .lock()
            .unwrap()
            .push((session_id.to_string(), method));
        Ok(PayResult {
            redirect_url: format!("https://wallet.example.com/{}", session_id),
        })
    }

    async fn verify_webhook(
        &self,
        _payload: &[u8],
        _signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.webhook
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(PaymentError::invalid_webhook("no event configured")))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Notifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockNotifier {
    notified: Mutex<Vec<OrderId>>,
    fail: Mutex<bool>,
}

impl MockNotifier {
    pub fn notified(&self) -> Vec<OrderId> {
        self.notified.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        *self.fail.lock().unwrap() = true;
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify_order_authorized(&self, order_id: &OrderId) -> Result<(), DomainError> {
        if *self.fail.lock().unwrap() {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                "Simulated notifier failure",
            ));
        }
        self.notified.lock().unwrap().push(*order_id);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Background executor
// ════════════════════════════════════════════════════════════════════════════

/// Holds spawned tasks until the test runs them.
#[derive(Default)]
pub struct ManualExecutor {
    tasks: Mutex<Vec<(&'static str, BoxFuture<'static, ()>)>>,
}

impl ManualExecutor {
    pub fn names(&self) -> Vec<&'static str> {
        self.tasks.lock().unwrap().iter().map(|(n, _)| *n).collect()
    }

    pub async fn run_all(&self) {
        let tasks: Vec<_> = self.tasks.lock().unwrap().drain(..).collect();
        for (_, task) in tasks {
            task.await;
        }
    }
}

impl BackgroundExecutor for ManualExecutor {
    fn spawn(&self, name: &'static str, task: BoxFuture<'static, ()>) {
        self.tasks.lock().unwrap().push((name, task));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wiring
// ════════════════════════════════════════════════════════════════════════════

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Timestamp::now()))
}

pub fn cart_store(
    cache: Arc<MockCartCache>,
    catalog: Arc<MockCatalog>,
    clock: Arc<FixedClock>,
) -> Arc<CartStore> {
    Arc::new(CartStore::new(
        cache,
        catalog,
        clock,
        CartSettings {
            ttl: TTL,
            refresh_interval: REFRESH_INTERVAL,
        },
    ))
}
