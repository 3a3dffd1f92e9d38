pub mod connection;
pub mod matches;
pub mod models;
pub mod performances;
pub mod players;
pub mod records;
pub mod setup;
pub mod teams;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;

use crate::domain::Position;

fn parse_position(idx: usize, code: &str) -> rusqlite::Result<Position> {
    code.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}
