use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{PlayerId, TeamId};

#[derive(Parser, Debug)]
#[command(author, version, about = "volleyball statistics and records backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Drop and recreate the database schema
    Setup,
    /// Load players, teams, matches and performances from a JSON file, all or nothing
    Import {
        /// Roster file
        path: PathBuf,
    },
    /// Print averaged statistics of a player (per set) or a team (per match)
    Averages {
        #[arg(long, conflicts_with = "team", required_unless_present = "team")]
        player: Option<PlayerId>,
        #[arg(long)]
        team: Option<TeamId>,
        /// Number of performances to average over
        #[arg(short, long)]
        amount: Option<usize>,
    },
    /// Print a player's records
    Records {
        #[arg(long)]
        player: PlayerId,
    },
}
