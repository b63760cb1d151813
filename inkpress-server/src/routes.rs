//! Router assembly

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{admin_handlers, auth_handlers};

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
    let auth = Router::new()
        .route("/sign-up", post(auth_handlers::sign_up))
        .route("/sign-in", post(auth_handlers::sign_in))
        .route("/sign-in/social", post(auth_handlers::sign_in_social))
        .route("/sign-out", post(auth_handlers::sign_out))
        .route("/session", get(auth_handlers::session))
        .route("/access", get(auth_handlers::check_access));

    let admin = Router::new()
        .route("/users", get(admin_handlers::list_users))
        .route("/users/bulk", post(admin_handlers::bulk));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/auth", auth)
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
