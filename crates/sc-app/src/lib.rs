//! Shared application service layer for scenaria.
//!
//! Frontends go through these services rather than the store directly: they
//! validate before writing, wrap every multi-step write in one transaction,
//! and own the baseline/root-node mirroring rule.

pub mod baseline_service;
pub mod catalog;
pub mod config;
pub mod error;
pub mod parameter_service;
pub mod scenario_service;
pub mod timeline_service;
pub mod vitals_service;

// Re-export key types for convenience
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use parameter_service::list_for as list_additional_parameters;
pub use timeline_service::{SaveSummary, delete_node, load, save};
pub use vitals_service::{AppliedTo, apply as apply_vital_sign_edit};

pub use sc_store::{ScenarioStore, StoreOptions};
