//! # Single-Item Identifier Operations
//!
//! | Operation | Remote call | Result |
//! |-----------|-------------|--------|
//! | `ping` | `ping` | availability, version, service clock |
//! | `list_chains` / `list_sectors` | `retrieveChains` / `retrieveSectors` | active registries |
//! | `derive_stampseudonym` | `retrieveStampseudonym` | HPgn → Stampseudonym |
//! | `derive_eck_id` | `retrieveEckId` | (Stampseudonym, chain, sector) → EckId |
//! | `replace_stampseudonym` | `replaceStampseudonym` | link new HPgn to old identity |
//! | `replace_eck_id` | `replaceEckId` | same, answered as the scoped EckId |
//!
//! No local caching: each call is a fresh round trip and the client holds no
//! identifier state. Argument validation is left to the service, which
//! reports the offending argument in its fault.
//!
//! ## Substitution
//!
//! A replace establishes `old → new`. Once effective, every HPgn in the
//! chain resolves to the identity at its head, so the returned value is the
//! head's Stampseudonym (or EckId), not an intermediate one. With a future
//! `effective_date` the link stays inert until that date.

use std::sync::Arc;

use nv_core::{ChainId, EckId, HPgn, SectorId, Stampseudonym, Timestamp};

use crate::error::ClientError;
use crate::transport::IdentityTransport;
use crate::types::{Chain, PingStatus, Sector};

/// Client for the synchronous identifier operations.
#[derive(Debug)]
pub struct IdentityClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for IdentityClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: IdentityTransport> IdentityClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    // ── Service status ──────────────────────────────────────────────────

    pub async fn ping(&self) -> Result<PingStatus, ClientError> {
        self.transport.ping().await
    }

    /// Ping and warn when the service is unavailable or its version does
    /// not start with `expected_version_prefix`.
    pub async fn ping_checked(
        &self,
        expected_version_prefix: &str,
    ) -> Result<PingStatus, ClientError> {
        let status = self.transport.ping().await?;
        if !status.available {
            tracing::warn!("issuance service reports itself unavailable");
        }
        if !status.supports_version(expected_version_prefix) {
            tracing::warn!(
                version = %status.application_version,
                expected = expected_version_prefix,
                "issuance service version differs from the version this client targets"
            );
        }
        Ok(status)
    }

    pub async fn list_chains(&self) -> Result<Vec<Chain>, ClientError> {
        self.transport.retrieve_chains().await
    }

    pub async fn list_sectors(&self) -> Result<Vec<Sector>, ClientError> {
        self.transport.retrieve_sectors().await
    }

    // ── Derivation ──────────────────────────────────────────────────────

    /// First stage: HPgn → Stampseudonym.
    pub async fn derive_stampseudonym(&self, hpgn: &HPgn) -> Result<Stampseudonym, ClientError> {
        self.transport.retrieve_stampseudonym(hpgn).await
    }

    /// Second stage: Stampseudonym → EckId scoped to (chain, sector).
    pub async fn derive_eck_id(
        &self,
        stampseudonym: &Stampseudonym,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<EckId, ClientError> {
        self.transport
            .retrieve_eck_id(stampseudonym, chain_id, sector_id)
            .await
    }

    /// Both stages in sequence: HPgn → Stampseudonym → EckId.
    pub async fn resolve_eck_id(
        &self,
        hpgn: &HPgn,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<EckId, ClientError> {
        let stampseudonym = self.derive_stampseudonym(hpgn).await?;
        self.derive_eck_id(&stampseudonym, chain_id, sector_id).await
    }

    // ── Substitution ────────────────────────────────────────────────────

    /// Link `hpgn_new` to the identity `hpgn_old` resolves to and return
    /// that identity's Stampseudonym.
    ///
    /// `effective_date` of `None` or in the past activates the link
    /// immediately.
    pub async fn replace_stampseudonym(
        &self,
        hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        effective_date: Option<Timestamp>,
    ) -> Result<Stampseudonym, ClientError> {
        tracing::info!(
            effective_date = ?effective_date.map(|d| d.to_iso8601()),
            "requesting stampseudonym substitution"
        );
        self.transport
            .replace_stampseudonym(hpgn_new, hpgn_old, effective_date)
            .await
    }

    /// As [`replace_stampseudonym`](Self::replace_stampseudonym), answered
    /// with the EckId of the linked identity in (chain, sector).
    pub async fn replace_eck_id(
        &self,
        hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        chain_id: &ChainId,
        sector_id: &SectorId,
        effective_date: Option<Timestamp>,
    ) -> Result<EckId, ClientError> {
        tracing::info!(
            effective_date = ?effective_date.map(|d| d.to_iso8601()),
            "requesting eck id substitution"
        );
        self.transport
            .replace_eck_id(hpgn_new, hpgn_old, chain_id, sector_id, effective_date)
            .await
    }
}
