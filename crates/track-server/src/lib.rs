pub mod config;
pub mod errors;
pub mod handlers;
pub mod packaging;
pub mod request_id;
pub mod types;

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
};
use track_synth::TrajectoryGenerator;
use utoipa::OpenApi;

use crate::{
    config::ServerConfig,
    handlers::{generate_activities, health_check, not_found},
    request_id::request_id_middleware,
};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::generate_activities, handlers::health_check),
    components(schemas(types::GenerateRequest, types::TimeSpec, types::ErrorResponse)),
    tags(
        (name = "generate", description = "Synthetic TCX running activities"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(config: &ServerConfig) -> Router {
    let generator = Arc::new(TrajectoryGenerator::new(config.generator.clone()));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/generate", post(generate_activities))
        .route("/api-docs/openapi.json", get(openapi_json));

    // Front-end page, when shipped next to the binary
    let router = if config.static_dir.is_dir() {
        router.fallback_service(ServeDir::new(&config.static_dir))
    } else {
        tracing::warn!(
            "Static directory {} not found, serving API only",
            config.static_dir.display()
        );
        router.fallback(not_found)
    };

    router
        .layer(Extension(generator))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    tracing::info!("Server running on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
