//! HTTP layer for the bookstore service: Axum server, shared middleware,
//! error envelope, and OpenAPI document assembly.

use anyhow::Context;
use axum::{routing::get, Router};

use bookstore_kernel::settings::Settings;
use bookstore_kernel::ModuleRegistry;

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Bind the configured address and serve the assembled router until a
/// shutdown signal arrives, then stop the registered modules.
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    registry.stop_modules().await
}

/// Resolves on the first shutdown signal: SIGTERM or Ctrl-C on Unix,
/// Ctrl-C elsewhere.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }

    tracing::info!("shutdown signal received");
}

/// Assemble the full service router: health probe, module routes under
/// `/api/{name}`, OpenAPI docs, and the middleware stack on top.
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut builder = RouterBuilder::new().route("/healthz", get(healthz));

    for module in registry.modules() {
        tracing::info!(module = module.name(), "mounting module routes");
        builder = builder.mount(module.name(), module.routes());
    }

    builder
        .with_openapi(registry)
        .with_middleware(settings.server.request_timeout_ms)
        .build()
}

async fn healthz() -> &'static str {
    "ok"
}
