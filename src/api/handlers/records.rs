use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{AppState, RecordParams};
use crate::api::error::ApiError;
use crate::api::models::ListResponse;

/// One player's records, or every player's when no `player` is given.
pub async fn get_records(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RecordParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;

    let response = match params.player {
        Some(player) => Json(state.reporter.player_records(player)?).into_response(),
        None => Json(ListResponse::new(state.reporter.all_records()?)).into_response(),
    };
    Ok(response)
}
