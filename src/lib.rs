pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod services;
pub mod stats;

#[cfg(test)]
mod fixtures;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::path::Path;

use crate::api::models::AverageResponse;
use crate::cli::Command;
use crate::config::AppConfig;
use crate::domain::{PlayerId, TeamId};
use crate::services::{ImportService, ReportingService, Roster, ServerService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup() -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database)?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)
}

pub fn handle_import(path: &Path) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database)?;
    let roster = Roster::load(path)?;

    let summary = ImportService::new(pool).run(&roster)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub fn handle_averages(
    player: Option<PlayerId>,
    team: Option<TeamId>,
    amount: Option<usize>,
) -> Result<()> {
    let reporter = reporting_service()?;
    let summary = match (player, team) {
        (Some(player), _) => reporter.player_average(player, amount)?,
        (None, Some(team)) => reporter.team_average(team, amount)?,
        (None, None) => {
            let message = "either a player or a team is required".to_string();
            return Err(errors::StatsError::InvalidInput(message).into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&AverageResponse::from(summary))?);
    Ok(())
}

pub fn handle_records(player: PlayerId) -> Result<()> {
    let records = reporting_service()?.player_records(player)?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn reporting_service() -> Result<ReportingService> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.database)?;
    Ok(ReportingService::new(pool, config.query))
}
