//! In-memory transport for unit tests: replays a script of batch answers
//! and fixed answers for the single-item operations.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use nv_core::{
    BatchIdentifier, BatchItems, BatchResult, ChainId, EckId, HPgn, RemoteFault, SectorId,
    Stampseudonym, Timestamp,
};

use crate::error::ClientError;
use crate::transport::IdentityTransport;
use crate::types::{Chain, PingStatus, Sector};

/// One scripted `retrieveBatch` answer.
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Done(BatchResult<String>),
    Fault(&'static str),
    ApiError(u16),
}

impl Scripted {
    fn into_outcome(self) -> Result<BatchResult<String>, ClientError> {
        match self {
            Self::Done(result) => Ok(result),
            Self::Fault(actor) => Err(ClientError::fault(
                "retrieveBatch",
                RemoteFault::from_actor(actor, "scripted"),
            )),
            Self::ApiError(status) => Err(ClientError::Api {
                endpoint: "retrieveBatch".into(),
                status,
                body: String::new(),
            }),
        }
    }
}

pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<Scripted>,
    retrieve_calls: AtomicU32,
    submit_calls: AtomicU32,
    pub(crate) ping: PingStatus,
}

impl ScriptedTransport {
    /// Replay `script` in order; an exhausted script answers `ContentRemoved`.
    pub(crate) fn new(script: Vec<Scripted>) -> Self {
        Self::build(script, None)
    }

    /// Answer every retrieval with `answer`.
    pub(crate) fn always(answer: Scripted) -> Self {
        Self::build(Vec::new(), Some(answer))
    }

    fn build(script: Vec<Scripted>, fallback: Option<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            retrieve_calls: AtomicU32::new(0),
            submit_calls: AtomicU32::new(0),
            ping: PingStatus {
                available: true,
                application_version: "2.0.7".into(),
                system_time: Timestamp::now(),
            },
        }
    }

    pub(crate) fn retrieve_calls(&self) -> u32 {
        self.retrieve_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    fn next_answer(&self) -> Scripted {
        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        scripted
            .or_else(|| self.fallback.clone())
            .unwrap_or(Scripted::Fault(nv_core::fault::CONTENT_REMOVED))
    }
}

fn stampseudonym_for(hpgn: &HPgn) -> Stampseudonym {
    Stampseudonym::new(format!("https://ketenid.nl/sppilot/{hpgn}"))
}

impl IdentityTransport for ScriptedTransport {
    async fn ping(&self) -> Result<PingStatus, ClientError> {
        Ok(self.ping.clone())
    }

    async fn retrieve_chains(&self) -> Result<Vec<Chain>, ClientError> {
        Ok(vec![Chain {
            id: ChainId::new("chain-1"),
            description: None,
        }])
    }

    async fn retrieve_sectors(&self) -> Result<Vec<Sector>, ClientError> {
        Ok(vec![Sector {
            id: SectorId::new("sector-1"),
            description: None,
        }])
    }

    async fn retrieve_stampseudonym(&self, hpgn: &HPgn) -> Result<Stampseudonym, ClientError> {
        if hpgn.as_str().is_empty() {
            return Err(ClientError::fault(
                "retrieveStampseudonym",
                RemoteFault::from_actor("InvalidHpgnException", "hpgn is empty"),
            ));
        }
        Ok(stampseudonym_for(hpgn))
    }

    async fn retrieve_eck_id(
        &self,
        stampseudonym: &Stampseudonym,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<EckId, ClientError> {
        Ok(EckId::new(format!(
            "https://ketenid.nl/pilot/{stampseudonym}|{chain_id}|{sector_id}"
        )))
    }

    async fn replace_stampseudonym(
        &self,
        _hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        _effective_date: Option<Timestamp>,
    ) -> Result<Stampseudonym, ClientError> {
        Ok(stampseudonym_for(hpgn_old))
    }

    async fn replace_eck_id(
        &self,
        _hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        chain_id: &ChainId,
        sector_id: &SectorId,
        _effective_date: Option<Timestamp>,
    ) -> Result<EckId, ClientError> {
        self.retrieve_eck_id(&stampseudonym_for(hpgn_old), chain_id, sector_id)
            .await
    }

    async fn submit_stampseudonym_batch(
        &self,
        _items: &BatchItems<HPgn>,
    ) -> Result<BatchIdentifier, ClientError> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BatchIdentifier::new(format!("scripted-{n}")))
    }

    async fn submit_eck_id_batch(
        &self,
        _items: &BatchItems<Stampseudonym>,
        _chain_id: &ChainId,
        _sector_id: &SectorId,
    ) -> Result<BatchIdentifier, ClientError> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BatchIdentifier::new(format!("scripted-{n}")))
    }

    async fn retrieve_batch(
        &self,
        _batch: &BatchIdentifier,
    ) -> Result<BatchResult<String>, ClientError> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        self.next_answer().into_outcome()
    }
}
