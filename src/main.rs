//! Cloud Steward server entry point.

use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cloud_steward::adapters::http::{app_router, ApiContext};
use cloud_steward::adapters::postgres::{
    PostgresAccountRepository, PostgresBudgetRepository, PostgresFinalizeCommitter,
    PostgresGroupRepository, PostgresNotificationStore, PostgresServiceRecordRepository,
    PostgresSessionRepository,
};
use cloud_steward::adapters::{
    Argon2PasswordHasher, HttpPricingOracle, InMemoryStore, JwtAuthenticator, SimulatedProvisioner,
    StaticPriceTable,
};
use cloud_steward::application::handlers::accounts::BootstrapAdminHandler;
use cloud_steward::config::{AppConfig, DatabaseConfig, PricingSource};
use cloud_steward::domain::budget::BudgetAlertPolicy;
use cloud_steward::domain::catalog::ServiceCatalog;
use cloud_steward::domain::foundation::Username;
use cloud_steward::ports::{
    AccountRepository, BudgetRepository, FinalizeCommitter, GroupRepository, NotificationReader,
    NotificationSink, PricingOracle, ServiceRecordRepository, SessionRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config);
    config.validate().context("validating configuration")?;

    let pricing = pricing_oracle(&config)?;
    let authenticator = Arc::new(JwtAuthenticator::new(
        &config.auth.jwt_secret,
        config.auth.issuer.clone(),
        config.auth.token_ttl_secs,
    ));

    let stores = match &config.database {
        Some(database) => postgres_stores(database).await?,
        None => {
            tracing::warn!("No database configured, state is kept in memory only");
            memory_stores()
        }
    };
    let context = ApiContext {
        accounts: stores.accounts,
        groups: stores.groups,
        budgets: stores.budgets,
        sessions: stores.sessions,
        records: stores.records,
        committer: stores.committer,
        notification_sink: stores.notification_sink,
        notification_reader: stores.notification_reader,
        provisioner: Arc::new(SimulatedProvisioner::new()),
        pricing,
        catalog: Arc::new(ServiceCatalog::standard()),
        token_issuer: authenticator.clone(),
        token_validator: authenticator,
        hasher: Arc::new(Argon2PasswordHasher::new()),
        dispatch_timeout: config.provisioning.dispatch_timeout(),
        alert_policy: BudgetAlertPolicy::new(config.provisioning.alert_threshold_percent),
    };

    if let Some(admin) = config.auth.bootstrap_admin() {
        let username = Username::new(admin.username)?;
        let created = BootstrapAdminHandler::new(context.accounts.clone(), context.hasher.clone())
            .handle(username.clone(), &admin.password)
            .await?;
        if created {
            tracing::info!(%username, "Bootstrap administrator created");
        }
    }

    let app = app_router(&context, &config.server);
    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn pricing_oracle(config: &AppConfig) -> anyhow::Result<Arc<dyn PricingOracle>> {
    let oracle: Arc<dyn PricingOracle> = match config.pricing.source()? {
        PricingSource::Oracle { url, timeout } => {
            tracing::info!(%url, "Using remote price oracle");
            Arc::new(HttpPricingOracle::new(url, timeout)?)
        }
        PricingSource::Table(entries) => {
            tracing::info!(entries = entries.len(), "Using configured price table");
            Arc::new(StaticPriceTable::from_entries(&entries)?)
        }
        PricingSource::ListPrices => Arc::new(StaticPriceTable::list_prices()),
    };
    Ok(oracle)
}

/// Persistence ports, bound to either PostgreSQL or the in-memory store.
struct Stores {
    accounts: Arc<dyn AccountRepository>,
    groups: Arc<dyn GroupRepository>,
    budgets: Arc<dyn BudgetRepository>,
    sessions: Arc<dyn SessionRepository>,
    records: Arc<dyn ServiceRecordRepository>,
    committer: Arc<dyn FinalizeCommitter>,
    notification_sink: Arc<dyn NotificationSink>,
    notification_reader: Arc<dyn NotificationReader>,
}

fn memory_stores() -> Stores {
    let store = Arc::new(InMemoryStore::new());
    Stores {
        accounts: store.clone(),
        groups: store.clone(),
        budgets: store.clone(),
        sessions: store.clone(),
        records: store.clone(),
        committer: store.clone(),
        notification_sink: store.clone(),
        notification_reader: store,
    }
}

async fn postgres_stores(database: &DatabaseConfig) -> anyhow::Result<Stores> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .connect(database.url.expose_secret())
        .await
        .context("connecting to PostgreSQL")?;

    if database.run_migrations {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let notifications = Arc::new(PostgresNotificationStore::new(pool.clone()));
    Ok(Stores {
        accounts: Arc::new(PostgresAccountRepository::new(pool.clone())),
        groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
        budgets: Arc::new(PostgresBudgetRepository::new(pool.clone())),
        sessions: Arc::new(PostgresSessionRepository::new(pool.clone())),
        records: Arc::new(PostgresServiceRecordRepository::new(pool.clone())),
        committer: Arc::new(PostgresFinalizeCommitter::new(pool)),
        notification_sink: notifications.clone(),
        notification_reader: notifications,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
