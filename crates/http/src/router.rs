//! Router assembly for the bookstore HTTP server.

use std::time::Duration;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use uuid::{Timestamp, Uuid};

use bookstore_kernel::ModuleRegistry;

/// Stamps inbound requests with a sortable UUIDv7 `x-request-id`.
#[derive(Clone)]
struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v7(Timestamp::now(uuid::NoContext));
        id.to_string()
            .parse::<HeaderValue>()
            .ok()
            .map(RequestId::new)
    }
}

/// Assembles the service router from module routes, the shared middleware
/// stack, and the merged OpenAPI document.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a plain route outside the module namespace.
    pub fn route(mut self, path: &str, handler: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, handler);
        self
    }

    /// Nest a module's routes under `/api/{name}`.
    pub fn mount(mut self, name: &str, routes: Router) -> Self {
        self.router = self.router.nest(&format!("/api/{name}"), routes);
        self
    }

    /// Apply the shared middleware stack: request tracing, permissive CORS,
    /// request IDs, and a per-request timeout. Call after all routes are in
    /// place; axum layers only wrap routes registered before them.
    pub fn with_middleware(mut self, timeout_ms: u64) -> Self {
        let trace = TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().include_headers(true))
            .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
            .on_response(DefaultOnResponse::new().level(tracing::Level::INFO));

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        self.router = self
            .router
            .layer(trace)
            .layer(cors)
            .layer(SetRequestIdLayer::x_request_id(RequestUuid))
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Serve the merged OpenAPI document: Swagger UI at `/swagger-ui` plus
    /// the raw JSON at `/docs/openapi.json` for external consumers.
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let spec = collect_openapi(registry);

        // SwaggerUi wants a typed document; fall back to a bare one if the
        // merged JSON does not round-trip.
        let openapi: utoipa::openapi::OpenApi = serde_json::from_value(spec.clone())
            .unwrap_or_else(|_| {
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Bookstore API")
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi),
        );
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(spec.clone()) }),
        );
        self
    }

    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge every module's OpenAPI fragment into one document. Module paths
/// are prefixed with their `/api/{name}` mount point; component schemas
/// are merged by name.
fn collect_openapi(registry: &ModuleRegistry) -> Value {
    let mut spec = json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Bookstore API",
            "version": "1.0.0",
            "description": "Book records REST API"
        },
        "paths": {
            "/healthz": {
                "get": {
                    "summary": "Health check",
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "ErrorResponse": error_response_schema()
            }
        }
    });

    for module in registry.modules() {
        let Some(fragment) = module.openapi() else {
            continue;
        };

        if let Some(paths) = fragment.get("paths").and_then(Value::as_object) {
            for (path, item) in paths {
                let mounted = format!("/api/{}{}", module.name(), path);
                spec["paths"][mounted] = item.clone();
            }
        }

        if let Some(schemas) = fragment
            .pointer("/components/schemas")
            .and_then(Value::as_object)
        {
            for (name, schema) in schemas {
                spec["components"]["schemas"][name] = schema.clone();
            }
        }
    }

    spec
}

/// Schema of the error envelope rendered by `AppError`.
fn error_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "string" },
                    "message": { "type": "string" },
                    "details": { "type": "array", "items": {} },
                    "trace_id": { "type": "string" },
                    "timestamp": { "type": "string" }
                },
                "required": ["code", "message", "trace_id", "timestamp"]
            }
        },
        "required": ["error"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::routing::get;
    use bookstore_kernel::Module;

    struct StubModule;

    #[async_trait::async_trait]
    impl Module for StubModule {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn openapi(&self) -> Option<Value> {
            Some(json!({
                "paths": { "/": { "get": { "summary": "stub root" } } },
                "components": { "schemas": { "Stub": { "type": "object" } } }
            }))
        }
    }

    #[tokio::test]
    async fn builds_with_mounted_module_and_middleware() {
        let module_routes = Router::new().route("/", get(|| async { "stub" }));

        let _router = RouterBuilder::new()
            .route("/healthz", get(|| async { "ok" }))
            .mount("stub", module_routes)
            .with_middleware(5000)
            .build();
    }

    #[test]
    fn openapi_merge_prefixes_module_paths() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(StubModule));

        let spec = collect_openapi(&registry);
        assert!(spec["paths"].get("/api/stub/").is_some());
        assert!(spec["paths"].get("/healthz").is_some());
        assert!(spec["components"]["schemas"].get("Stub").is_some());
        assert!(spec["components"]["schemas"].get("ErrorResponse").is_some());
    }

    #[test]
    fn modules_without_fragments_contribute_nothing() {
        let registry = ModuleRegistry::new();

        let spec = collect_openapi(&registry);
        assert_eq!(spec["paths"].as_object().unwrap().len(), 1);
    }
}
