mod analytics;
mod auth;
mod claims;
mod deals;
mod feed;
mod leaderboard;
mod users;

use crate::auth::AppState;
use axum::Router;

pub use auth::cleanup_expired_tokens;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(deals::router())
        .merge(feed::router())
        .merge(claims::router())
        .merge(leaderboard::router())
        .merge(analytics::router())
}
