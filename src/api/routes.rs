use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    health,
    performances::{create_performance, list_performances, player_average, team_average},
    records::get_records,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/performances", get(list_performances).post(create_performance))
        .route("/api/performances/team-average", get(team_average))
        .route("/api/performances/player-average", get(player_average))
        .route("/api/records", get(get_records))
        .with_state(state)
}
