pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::{Config, ServerConfig},
    image::OpenAiImageClient,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Builds the relay router. CORS mirrors the caller's origin, method and
/// headers so that credentials stay allowed for every origin.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/edit-image/", post(handlers::edit_image))
        .route("/edit-image", post(handlers::edit_image))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // One client for the whole process
    let editor = OpenAiImageClient::new(config.image_api.clone())?;
    info!(
        "Image API client ready (model {}, options {:?})",
        editor.model(),
        editor.options()
    );

    let app_state = AppState {
        editor: Arc::new(editor),
    };

    let app = router(app_state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
