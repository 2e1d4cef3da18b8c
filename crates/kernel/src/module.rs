use async_trait::async_trait;
use axum::Router;
use sqlx::PgPool;

/// Dependencies handed to every module at startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a PgPool,
}

/// A SQL batch a module contributes to schema setup. Statements must be
/// idempotent since the runner re-executes every batch on each boot.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Lifecycle contract for application modules.
///
/// The registry drives each module through init -> migrations -> start and
/// calls stop on shutdown. Everything except `name` defaults to a no-op so
/// small modules stay small.
#[async_trait]
pub trait Module: Sync + Send {
    /// Stable identifier; doubles as the mount point under `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Runs once per boot, before migrations are applied.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Axum routes to mount under `/api/{name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment merged into the service-wide document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema migrations owned by this module, in execution order.
    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    /// Runs after migrations, before the server accepts traffic.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs during shutdown, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
