pub mod account;
pub mod auction;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod query;
pub mod scheduler;
pub mod state;
pub mod store;

// region:    --- Imports
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

// endregion: --- Imports

// region:    --- Router
/// 라우터 생성
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_index))
        .route(
            "/login",
            get(handlers::handle_login_page).post(handlers::handle_login_submit),
        )
        .route("/logout", get(handlers::handle_logout_request))
        .route(
            "/register",
            get(handlers::handle_register_page).post(handlers::handle_register_submit),
        )
        .route(
            "/create",
            get(handlers::handle_create_page).post(handlers::handle_create_submit),
        )
        .route(
            "/listing/:id",
            get(handlers::handle_listing_page).post(handlers::handle_listing_submit),
        )
        .route("/categories", get(handlers::handle_categories))
        .route("/category/:id", get(handlers::handle_category))
        .route("/watchlist", get(handlers::handle_watchlist))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .with_state(state)
}
// endregion: --- Router
