use crate::docs::ApiDoc;
use crate::state::AppState;
use axum::Router;
use axum::routing::post;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower_http::cors::{Any, CorsLayer};

pub fn configure_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Path the upload form posts to.
        .route("/upload", post(crate::modules::compress::handler::compress))
        .nest("/api/v1", api_routes().merge(crate::modules::compress::router()))
        .layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new().route("/health", axum::routing::get(|| async { "ok" }))
}
