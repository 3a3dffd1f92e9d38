use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, AverageParams, PerformanceParams};
use crate::api::error::ApiError;
use crate::api::models::{AverageResponse, ListResponse};
use crate::database::PerformanceFilter;
use crate::domain::NewPerformance;

pub async fn list_performances(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PerformanceParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;

    let mut filter = PerformanceFilter::new().limited(params.amount);
    if let Some(player) = params.player {
        filter = filter.for_player(player);
    }
    if let Some(team) = params.team {
        filter = filter.for_team(team);
    }
    if let Some(game) = params.game {
        filter = filter.for_match(game);
    }

    let views = state.reporter.list_performances(filter)?;
    Ok(Json(ListResponse::new(views)))
}

/// Stores the performance and updates the player's records before answering.
pub async fn create_performance(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewPerformance>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(new) = body?;

    let recorder = state.recorder.clone();
    // waits on the player's lock and the database, so keep it off the async workers
    let recorded = tokio::task::spawn_blocking(move || recorder.record_performance(&new))
        .await
        .context("Performance recording task failed")??;

    Ok((StatusCode::CREATED, Json(recorded)))
}

pub async fn team_average(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AverageParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let team = params
        .team
        .ok_or_else(|| ApiError::bad_request("query parameter `team` is required"))?;

    let summary = state.reporter.team_average(team, params.amount)?;
    Ok(Json(AverageResponse::from(summary)))
}

pub async fn player_average(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AverageParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let player = params
        .player
        .ok_or_else(|| ApiError::bad_request("query parameter `player` is required"))?;

    let summary = state.reporter.player_average(player, params.amount)?;
    Ok(Json(AverageResponse::from(summary)))
}
