//! marche-checkout - storefront cart and checkout service
//!
//! Serves the cart, checkout and payment webhook API. Carts live in Redis
//! when `MARCHE__REDIS__URL` is set and in process memory otherwise; the
//! catalog, users and orders use the in-memory stores, optionally seeded
//! from `MARCHE__STORE__SEED_PATH`.

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use marche_checkout::adapters::http::{app_router, AppState};
use marche_checkout::adapters::{
    InMemoryCartCache, InMemoryCatalog, InMemoryOrders, InMemoryUsers, KomojuClient,
    KomojuConfig, LoggingNotifier, RedisCartCache, SeedData, SystemClock, TrackedExecutor,
};
use marche_checkout::application::handlers::cart::{CartSettings, CartStore};
use marche_checkout::application::handlers::checkout::{
    CheckoutHandler, CheckoutLookups, CheckoutPorts,
};
use marche_checkout::application::handlers::payment::{
    HandlePaymentWebhookHandler, PaymentEventReconciler,
};
use marche_checkout::config::{AppConfig, ServerConfig};
use marche_checkout::ports::{CartCache, Clock};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "starting marche-checkout"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache = cart_cache(&config, clock.clone()).await?;

    let catalog = Arc::new(InMemoryCatalog::new());
    let users = Arc::new(InMemoryUsers::new());
    let orders = Arc::new(InMemoryOrders::new());
    if let Some(path) = &config.store.seed_path {
        SeedData::from_file(path)
            .await?
            .load_into(&catalog, &users)
            .await;
        tracing::info!(path = %path, "store seeded");
    }

    let gateway = Arc::new(KomojuClient::new(KomojuConfig {
        api_base_url: config.payment.api_base_url.clone(),
        secret_key: config.payment.secret_key.clone(),
        webhook_secret: config.payment.webhook_secret.clone(),
        timeout: config.payment.timeout(),
    }));
    let executor = Arc::new(TrackedExecutor::new());

    let carts = Arc::new(CartStore::new(
        cache,
        catalog.clone(),
        clock.clone(),
        CartSettings {
            ttl: config.cart.ttl(),
            refresh_interval: config.cart.refresh_interval(),
        },
    ));
    let checkout = CheckoutHandler::new(
        CheckoutLookups::new(
            users,
            catalog.clone(),
            catalog.clone(),
            carts.clone(),
            config.checkout.lookup_timeout(),
        ),
        carts.clone(),
        CheckoutPorts {
            products: catalog,
            orders: orders.clone(),
            gateway: gateway.clone(),
            clock,
            background: executor.clone(),
        },
    );
    let reconciler = Arc::new(PaymentEventReconciler::new(
        orders,
        Arc::new(LoggingNotifier),
    ));
    let webhook = HandlePaymentWebhookHandler::new(gateway, reconciler);

    let app = app_router(AppState::new(carts, checkout, webhook), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    executor.shutdown(config.server.shutdown_grace()).await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// JSON logs in production, compact lines otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

async fn cart_cache(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn CartCache>, BoxError> {
    if !config.redis.is_enabled() {
        tracing::warn!("no Redis URL configured, carts are kept in process memory");
        return Ok(Arc::new(InMemoryCartCache::new(clock)));
    }

    let connect = RedisCartCache::connect(&config.redis.url, config.cart.key_prefix.clone(), clock);
    let cache = tokio::time::timeout(config.redis.timeout(), connect)
        .await
        .map_err(|_| "timed out connecting to Redis")??;
    tracing::info!("cart cache connected to Redis");
    Ok(Arc::new(cache))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
