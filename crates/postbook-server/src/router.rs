use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Postbook endpoints.
pub fn build_router(state: AppState) -> Router {
    let timeout = TimeoutLayer::new(state.config.request_timeout());
    let cors = state.config.cors;

    let router = Router::new()
        .route("/health", get(handler::health_handler))
        .route("/info", get(handler::info_handler))
        .route("/users", get(handler::list_accounts))
        .route("/user", post(handler::create_account))
        .route(
            "/user/:id",
            get(handler::get_account)
                .patch(handler::update_account)
                .delete(handler::delete_account),
        )
        .route("/posts", get(handler::list_posts))
        .route("/post", post(handler::create_post))
        .route(
            "/post/:id",
            get(handler::get_post)
                .patch(handler::update_post)
                .delete(handler::delete_post),
        )
        .layer(timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}
