use anyhow::Context;
use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::database::{self, DbPool};
use crate::domain::{MatchId, PlayerId, TeamId};
use crate::services::{RecordingService, ReportingService};

pub mod performances;
pub mod records;

pub struct AppState {
    pub pool: DbPool,
    pub recorder: RecordingService,
    pub reporter: ReportingService,
}

impl AppState {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        Self {
            recorder: RecordingService::new(pool.clone()),
            reporter: ReportingService::new(pool.clone(), config.query.clone()),
            pool,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PerformanceParams {
    pub player: Option<PlayerId>,
    pub team: Option<TeamId>,
    #[serde(rename = "match")]
    pub game: Option<MatchId>,
    pub amount: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AverageParams {
    pub player: Option<PlayerId>,
    pub team: Option<TeamId>,
    pub amount: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordParams {
    pub player: Option<PlayerId>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    let conn = database::get_connection(&state.pool)?;
    conn.query_row("SELECT 1", [], |_| Ok(()))
        .context("Database is not answering")?;
    Ok("OK")
}
