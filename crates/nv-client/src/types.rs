//! Typed responses of the issuance service.

use nv_core::{ChainId, SectorId, Timestamp};
use serde::{Deserialize, Serialize};

/// Service availability reported by `ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingStatus {
    pub available: bool,
    pub application_version: String,
    pub system_time: Timestamp,
}

impl PingStatus {
    /// Whether the service version starts with `prefix`, e.g. `"2.0"`.
    pub fn supports_version(&self, prefix: &str) -> bool {
        self.application_version.starts_with(prefix)
    }
}

/// A federation chain registered with the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: ChainId,
    #[serde(default)]
    pub description: Option<String>,
}

/// A usage sector registered with the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: SectorId,
    #[serde(default)]
    pub description: Option<String>,
}
