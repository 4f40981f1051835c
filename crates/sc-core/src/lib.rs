//! sc-core: shared foundation for the scenario timeline engine.
//!
//! Contains:
//! - baseline (the scenario's initial patient state)
//! - ids (scenario, node index and parameter identifiers)
//! - vitals (the fixed vital-sign field set shared by baseline and timeline nodes)
//! - error (shared error types)

pub mod baseline;
pub mod error;
pub mod ids;
pub mod vitals;

// Re-exports: nice ergonomics for downstream crates
pub use baseline::{AccessKind, Baseline, VascularAccess};
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use vitals::*;
