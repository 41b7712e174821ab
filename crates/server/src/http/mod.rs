use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, routes};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::boards::router(&state))
        .merge(routes::tasks::router(&state));

    Router::new()
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
