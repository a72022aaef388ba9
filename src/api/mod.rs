//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Public endpoints are mounted under `/api/v1`, admin endpoints under
//! `/api/v1/admin` behind [`auth::require_admin`].

pub mod auth;
pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the complete application router, state included.
pub fn build_router(state: AppState) -> Router {
    let admin = handlers::admin_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_admin,
    ));

    let router = Router::new()
        .nest(
            "/api/v1",
            handlers::public_routes().nest("/admin", admin),
        )
        .merge(handlers::system::routes());

    with_docs(router)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;
    use utoipa::OpenApi;

    router.route(
        "/api-docs/openapi.json",
        get(|| async { Json(openapi::ApiDoc::openapi()) }),
    )
}
