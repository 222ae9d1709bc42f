//! Domain types for the Rotasched neurosurgery scheduling backend.

pub mod call;
pub mod config;
pub mod errors;
pub mod leave;
pub mod requests;
pub mod resident;
pub mod rotation;

use serde::Serialize;

pub use call::*;
pub use config::*;
pub use errors::*;
pub use leave::*;
pub use requests::*;
pub use resident::*;
pub use rotation::*;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build_sha: String,
    pub uptime_seconds: u64,
}

/// Ready check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub store: String,
}
