use anyhow::Result;

use volleyball_stats::cli::Command;
use volleyball_stats::{
    handle_averages, handle_import, handle_records, handle_serve, handle_setup, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Setup => handle_setup(),
        Command::Import { path } => handle_import(path),
        Command::Averages { player, team, amount } => handle_averages(*player, *team, *amount),
        Command::Records { player } => handle_records(*player),
    }
}
