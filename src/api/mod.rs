//! REST API.

pub mod routes;
pub mod state;

pub use state::AppState;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{auth, leaderboard, live_players, rpg};

/// Builds the full router. No auth layer is applied here: endpoints that need
/// a caller take an [`AuthUser`](crate::auth::AuthUser) argument.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        // Auth
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Leaderboard
        .route(
            "/leaderboard",
            get(leaderboard::get_leaderboard).post(leaderboard::submit_score),
        )
        // Live players
        .route(
            "/live-players",
            get(live_players::list_live_players).post(live_players::create_live_player),
        )
        .route(
            "/live-players/:id",
            get(live_players::get_live_player)
                .put(live_players::update_live_player)
                .delete(live_players::delete_live_player),
        )
        // RPG
        .route("/rpg/leaderboard", post(rpg::submit_rpg_score))
        .route("/rpg/leaderboard/:level_id", get(rpg::get_rpg_leaderboard))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
