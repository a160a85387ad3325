//! The narrow seam between the client logic and the remote binding.
//!
//! [`IdentityTransport`] mirrors the remote operations one to one. The HTTP
//! implementation lives in [`crate::http`]; tests substitute in-memory
//! implementations to script fault sequences.

use std::future::Future;

use nv_core::{
    BatchIdentifier, BatchItems, BatchResult, ChainId, EckId, HPgn, SectorId, Stampseudonym,
    Timestamp,
};

use crate::error::ClientError;
use crate::types::{Chain, PingStatus, Sector};

/// Remote operations of the issuance service.
///
/// Implementations perform exactly one remote round trip per call and never
/// retry on their own.
pub trait IdentityTransport: Send + Sync {
    fn ping(&self) -> impl Future<Output = Result<PingStatus, ClientError>> + Send;

    fn retrieve_chains(&self) -> impl Future<Output = Result<Vec<Chain>, ClientError>> + Send;

    fn retrieve_sectors(&self) -> impl Future<Output = Result<Vec<Sector>, ClientError>> + Send;

    fn retrieve_stampseudonym(
        &self,
        hpgn: &HPgn,
    ) -> impl Future<Output = Result<Stampseudonym, ClientError>> + Send;

    fn retrieve_eck_id(
        &self,
        stampseudonym: &Stampseudonym,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> impl Future<Output = Result<EckId, ClientError>> + Send;

    fn replace_stampseudonym(
        &self,
        hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        effective_date: Option<Timestamp>,
    ) -> impl Future<Output = Result<Stampseudonym, ClientError>> + Send;

    fn replace_eck_id(
        &self,
        hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        chain_id: &ChainId,
        sector_id: &SectorId,
        effective_date: Option<Timestamp>,
    ) -> impl Future<Output = Result<EckId, ClientError>> + Send;

    fn submit_stampseudonym_batch(
        &self,
        items: &BatchItems<HPgn>,
    ) -> impl Future<Output = Result<BatchIdentifier, ClientError>> + Send;

    fn submit_eck_id_batch(
        &self,
        items: &BatchItems<Stampseudonym>,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> impl Future<Output = Result<BatchIdentifier, ClientError>> + Send;

    /// One retrieval attempt. A pending batch yields the `NotFinished` fault.
    fn retrieve_batch(
        &self,
        batch: &BatchIdentifier,
    ) -> impl Future<Output = Result<BatchResult<String>, ClientError>> + Send;
}
