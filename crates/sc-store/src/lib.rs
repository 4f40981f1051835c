//! sc-store: relational persistence for scenarios, baselines and timelines.
//!
//! Every table lives in one SQLite database. Multi-step writes run inside a
//! single transaction obtained from [`ScenarioStore::write`]; repository
//! functions take a plain `&Connection` so they compose inside it.

pub mod baseline;
mod columns;
pub mod nodes;
pub mod params;
pub mod scenarios;
mod schema;
pub mod store;

pub use nodes::NodePatch;
pub use rusqlite::{Connection, Transaction};
pub use scenarios::ScenarioRecord;
pub use store::{ScenarioStore, StoreOptions};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Scenario not found: {scenario}")]
    ScenarioNotFound { scenario: sc_core::ScenarioId },

    #[error("Corrupt value in {table}.{column}: {value}")]
    Corrupt {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}
