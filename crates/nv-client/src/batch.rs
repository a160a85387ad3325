//! # Batch Submission and Polling
//!
//! Batches are processed asynchronously by the service. A caller submits a
//! map of index → value, receives a [`BatchIdentifier`], and polls
//! `retrieveBatch` until the result is ready.
//!
//! ```text
//! Idle ──submit──▶ Submitted ──▶ Polling ──┬─▶ Succeeded(BatchResult)
//!                                          └─▶ Failed(ClientError)
//! ```
//!
//! ## Polling contract
//!
//! - At most `attempts` calls to `retrieveBatch`, each preceded by a fixed
//!   sleep of `interval`. No backoff growth.
//! - `NotFinished` is the only fault that leads to another attempt.
//! - Every other fault ends polling at once.
//! - `attempts` consecutive `NotFinished` answers end in
//!   [`ClientError::Timeout`].
//! - A completed batch can be retrieved once. Retrieving it again yields
//!   `ContentAlreadyRetrieved`, so a successful result must not be polled
//!   for a second time.

use std::future::Future;
use std::sync::Arc;

use nv_core::{
    BatchIdentifier, BatchItems, BatchResult, ChainId, EckId, HPgn, SectorId, Stampseudonym,
};

use crate::config::BatchPollConfig;
use crate::error::ClientError;
use crate::transport::IdentityTransport;

/// Lifecycle of one batch as seen by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchState {
    Idle,
    Submitted,
    Polling,
    Succeeded,
    Failed,
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitted => write!(f, "submitted"),
            Self::Polling => write!(f, "polling"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// What one `retrieveBatch` answer means for the polling loop.
#[derive(Debug)]
pub enum PollStep {
    /// Result is ready; stop polling.
    Done(BatchResult<String>),
    /// `NotFinished`; try again after the interval.
    Pending,
    /// Any other failure; stop polling and surface it.
    Abort(ClientError),
}

impl PollStep {
    /// Classify a single retrieval outcome.
    pub fn classify(outcome: Result<BatchResult<String>, ClientError>) -> Self {
        match outcome {
            Ok(result) => Self::Done(result),
            Err(ClientError::Fault { fault, .. }) if fault.is_retryable() => Self::Pending,
            Err(e) => Self::Abort(e),
        }
    }

    /// The state the coordinator is in after this step.
    pub fn state(&self) -> BatchState {
        match self {
            Self::Done(_) => BatchState::Succeeded,
            Self::Pending => BatchState::Polling,
            Self::Abort(_) => BatchState::Failed,
        }
    }
}

/// Submits batches and polls for their results.
#[derive(Debug)]
pub struct BatchCoordinator<T> {
    transport: Arc<T>,
    poll: BatchPollConfig,
}

impl<T> Clone for BatchCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            poll: self.poll,
        }
    }
}

impl<T: IdentityTransport> BatchCoordinator<T> {
    pub fn new(transport: Arc<T>, poll: BatchPollConfig) -> Self {
        Self { transport, poll }
    }

    pub fn poll_config(&self) -> &BatchPollConfig {
        &self.poll
    }

    // ── Submission ──────────────────────────────────────────────────────

    /// Submit HPgns for Stampseudonym derivation.
    ///
    /// An empty map is rejected locally. Remote validation faults and the
    /// daily submission limit are surfaced without retry.
    pub async fn submit_stampseudonym_batch(
        &self,
        items: &BatchItems<HPgn>,
    ) -> Result<BatchIdentifier, ClientError> {
        ensure_not_empty(items.len())?;
        let batch = self.transport.submit_stampseudonym_batch(items).await?;
        tracing::info!(
            batch = %batch,
            items = items.len(),
            state = %BatchState::Submitted,
            "stampseudonym batch submitted"
        );
        Ok(batch)
    }

    /// Submit Stampseudonyms for EckId derivation in (chain, sector).
    pub async fn submit_eck_id_batch(
        &self,
        items: &BatchItems<Stampseudonym>,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<BatchIdentifier, ClientError> {
        ensure_not_empty(items.len())?;
        let batch = self
            .transport
            .submit_eck_id_batch(items, chain_id, sector_id)
            .await?;
        tracing::info!(
            batch = %batch,
            items = items.len(),
            state = %BatchState::Submitted,
            "eck id batch submitted"
        );
        Ok(batch)
    }

    // ── Retrieval ───────────────────────────────────────────────────────

    /// Exactly one retrieval attempt, no sleep.
    pub async fn retrieve_batch(
        &self,
        batch: &BatchIdentifier,
    ) -> Result<BatchResult<String>, ClientError> {
        self.transport.retrieve_batch(batch).await
    }

    /// Poll until the batch completes, a non-retryable fault occurs, or the
    /// attempt budget is spent.
    pub async fn poll_until_done(
        &self,
        batch: &BatchIdentifier,
    ) -> Result<BatchResult<String>, ClientError> {
        self.poll_until_cancelled(batch, std::future::pending()).await
    }

    /// As [`poll_until_done`](Self::poll_until_done), abandoning the batch
    /// with [`ClientError::Cancelled`] once `cancel` resolves.
    ///
    /// Cancellation is observed only while sleeping between attempts; an
    /// in-flight `retrieveBatch` call always completes and is classified.
    pub async fn poll_until_cancelled<C>(
        &self,
        batch: &BatchIdentifier,
        cancel: C,
    ) -> Result<BatchResult<String>, ClientError>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let max_attempts = self.poll.attempts;

        for attempt in 1..=max_attempts {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    tracing::info!(batch = %batch, attempt, "batch polling cancelled");
                    return Err(ClientError::Cancelled {
                        batch: batch.clone(),
                        attempts: attempt - 1,
                    });
                }
                _ = tokio::time::sleep(self.poll.interval) => {}
            }

            let step = PollStep::classify(self.transport.retrieve_batch(batch).await);
            match step {
                PollStep::Done(result) => {
                    tracing::info!(
                        batch = %batch,
                        attempt,
                        success = result.success.len(),
                        failed = result.failed.len(),
                        state = %BatchState::Succeeded,
                        "batch result retrieved"
                    );
                    return Ok(result);
                }
                PollStep::Pending => {
                    tracing::debug!(
                        batch = %batch,
                        attempt,
                        max_attempts,
                        state = %BatchState::Polling,
                        "batch not finished"
                    );
                }
                PollStep::Abort(e) => {
                    tracing::warn!(
                        batch = %batch,
                        attempt,
                        state = %BatchState::Failed,
                        "batch polling stopped: {e}"
                    );
                    return Err(e);
                }
            }
        }

        tracing::warn!(
            batch = %batch,
            max_attempts,
            state = %BatchState::Failed,
            "batch still not finished after all poll attempts"
        );
        Err(ClientError::Timeout {
            batch: batch.clone(),
            attempts: max_attempts,
        })
    }

    // ── Submit + poll ───────────────────────────────────────────────────

    /// Submit HPgns, poll for the result, and check it covers every index.
    pub async fn run_stampseudonym_batch(
        &self,
        items: &BatchItems<HPgn>,
    ) -> Result<BatchResult<Stampseudonym>, ClientError> {
        let batch = self.submit_stampseudonym_batch(items).await?;
        let result = self.poll_until_done(&batch).await?;
        check_partition(&batch, &result, items.keys())?;
        Ok(result.map_success(Stampseudonym::from))
    }

    /// Submit Stampseudonyms, poll for the result, and check it covers every
    /// index.
    pub async fn run_eck_id_batch(
        &self,
        items: &BatchItems<Stampseudonym>,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<BatchResult<EckId>, ClientError> {
        let batch = self.submit_eck_id_batch(items, chain_id, sector_id).await?;
        let result = self.poll_until_done(&batch).await?;
        check_partition(&batch, &result, items.keys())?;
        Ok(result.map_success(EckId::from))
    }

    /// HPgns straight to EckIds in (chain, sector): a Stampseudonym batch
    /// followed by an EckId batch over its successes.
    ///
    /// Items rejected in the first stage keep that stage's error message and
    /// are not resubmitted. When every item fails the first stage no second
    /// batch is submitted.
    pub async fn run_hpgn_eck_id_batch(
        &self,
        items: &BatchItems<HPgn>,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<BatchResult<EckId>, ClientError> {
        let stampseudonyms = self.run_stampseudonym_batch(items).await?;
        if stampseudonyms.success.is_empty() {
            return Ok(BatchResult {
                success: Default::default(),
                failed: stampseudonyms.failed,
            });
        }

        let mut result = self
            .run_eck_id_batch(&stampseudonyms.success, chain_id, sector_id)
            .await?;
        result.failed.extend(stampseudonyms.failed);
        Ok(result)
    }
}

fn ensure_not_empty(len: usize) -> Result<(), ClientError> {
    if len == 0 {
        return Err(ClientError::InvalidInput(
            "batch must contain at least one item".into(),
        ));
    }
    Ok(())
}

fn check_partition<'a>(
    batch: &BatchIdentifier,
    result: &BatchResult<String>,
    submitted: impl IntoIterator<Item = &'a u32>,
) -> Result<(), ClientError> {
    result
        .check_partition(submitted)
        .map_err(|violation| ClientError::InconsistentBatch {
            batch: batch.clone(),
            violation,
        })
}
