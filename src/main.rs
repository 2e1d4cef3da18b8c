use std::sync::Arc;

use anyhow::Context;

use bookstore_app::modules;
use bookstore_app::modules::books::store::{BookStore, PgBookStore};
use bookstore_kernel::settings::Settings;
use bookstore_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;

    bookstore_telemetry::init(&settings.telemetry)
        .with_context(|| "failed to initialize telemetry")?;

    tracing::info!(
        env = ?settings.environment,
        database = %settings.database.name,
        "bookstore-app bootstrap starting"
    );

    let pool = bookstore_db::connect(&settings.database)
        .await
        .with_context(|| "failed to connect to the record store")?;

    let store: Arc<dyn BookStore> = Arc::new(PgBookStore::new(pool.clone()));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);

    let ctx = InitCtx {
        settings: &settings,
        db: &pool,
    };
    registry.init_modules(&ctx).await?;

    let migrations = registry.collect_migrations();
    bookstore_db::run_migrations(&pool, &migrations)
        .await
        .with_context(|| "failed to run migrations")?;

    registry.start_modules(&ctx).await?;

    tracing::info!("bookstore-app bootstrap complete");

    bookstore_http::start_server(&registry, &settings).await
}
