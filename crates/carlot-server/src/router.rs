use std::path::Path;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// HTTP paths served by Carlot.
pub mod paths {
    pub const HEALTH: &str = "/api/health";
    pub const CARS: &str = "/api/cars";
    pub const CAR: &str = "/api/cars/:id";
    pub const MEDIA: &str = "/media";
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(paths::HEALTH, get(handler::health_handler))
        .route(
            paths::CARS,
            get(handler::list_cars).post(handler::create_car),
        )
        .route(
            paths::CAR,
            get(handler::get_car)
                .put(handler::update_car)
                .delete(handler::delete_car),
        )
        .with_state(state)
}

/// Build the full application: API routes, optional media hosting, and
/// the tracing/CORS layers.
pub fn build_app(state: AppState, media_root: Option<&Path>, cors_permissive: bool) -> Router {
    let mut app = build_router(state);
    if let Some(root) = media_root {
        app = app.nest_service(paths::MEDIA, ServeDir::new(root));
    }
    if cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }
    app.layer(TraceLayer::new_for_http())
}
