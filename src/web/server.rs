use axum::{
    http::{header, HeaderValue, StatusCode},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::propagator::Propagator;

use super::api::simulation as simulation_handlers;
use super::api_doc::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub propagator: Arc<Propagator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let propagator = Propagator::new(config.propagator.clone());
        Self {
            config: Arc::new(config),
            propagator: Arc::new(propagator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let no_store = SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
    );

    let ui = ServeDir::new(&state.config.web.ui_dir);

    Router::new()
        .route("/run-simulation", post(simulation_handlers::run_simulation))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Static UI, index.html at /
        .fallback_service(ui)
        // Middleware
        .layer(no_store)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let ui_dir = config.web.ui_dir.clone();
    let app = router(AppState::new(config));

    log::info!(
        "Starting server on {} (ui from {})",
        bind_addr,
        ui_dir.display()
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
