//! JSON binding of the remote operations.
//!
//! Each operation is a `POST {endpoint}/{operationName}` carrying a camelCase
//! request object. Faults come back with a non-2xx status and a
//! [`FaultEnvelope`] body naming the fault actor.

use nv_core::{BatchItems, BatchResult, ChainId, EckId, HPgn, SectorId, Stampseudonym, Timestamp};
use serde::{Deserialize, Serialize};

use crate::types::{Chain, Sector};

// -- Operation names ----------------------------------------------------------

pub const PING: &str = "ping";
pub const RETRIEVE_CHAINS: &str = "retrieveChains";
pub const RETRIEVE_SECTORS: &str = "retrieveSectors";
pub const RETRIEVE_STAMPSEUDONYM: &str = "retrieveStampseudonym";
pub const RETRIEVE_ECK_ID: &str = "retrieveEckId";
pub const REPLACE_STAMPSEUDONYM: &str = "replaceStampseudonym";
pub const REPLACE_ECK_ID: &str = "replaceEckId";
pub const SUBMIT_STAMPSEUDONYM_BATCH: &str = "submitStampseudonymBatch";
pub const SUBMIT_ECK_ID_BATCH: &str = "submitEckIdBatch";
pub const RETRIEVE_BATCH: &str = "retrieveBatch";

// -- Requests -----------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Empty {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveStampseudonymRequest<'a> {
    pub hpgn: &'a HPgn,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveEckIdRequest<'a> {
    pub stampseudonym: &'a Stampseudonym,
    pub chain_id: &'a ChainId,
    pub sector_id: &'a SectorId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceStampseudonymRequest<'a> {
    pub hpgn_new: &'a HPgn,
    pub hpgn_old: &'a HPgn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceEckIdRequest<'a> {
    pub hpgn_new: &'a HPgn,
    pub hpgn_old: &'a HPgn,
    pub chain_id: &'a ChainId,
    pub sector_id: &'a SectorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HpgnItem<'a> {
    pub index: u32,
    pub hpgn: &'a HPgn,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StampseudonymItem<'a> {
    pub index: u32,
    pub stampseudonym: &'a Stampseudonym,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStampseudonymBatchRequest<'a> {
    pub hpgn_list: Vec<HpgnItem<'a>>,
}

impl<'a> SubmitStampseudonymBatchRequest<'a> {
    pub fn from_items(items: &'a BatchItems<HPgn>) -> Self {
        Self {
            hpgn_list: items
                .iter()
                .map(|(&index, hpgn)| HpgnItem { index, hpgn })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEckIdBatchRequest<'a> {
    pub chain_id: &'a ChainId,
    pub sector_id: &'a SectorId,
    pub stampseudonym_list: Vec<StampseudonymItem<'a>>,
}

impl<'a> SubmitEckIdBatchRequest<'a> {
    pub fn from_items(
        items: &'a BatchItems<Stampseudonym>,
        chain_id: &'a ChainId,
        sector_id: &'a SectorId,
    ) -> Self {
        Self {
            chain_id,
            sector_id,
            stampseudonym_list: items
                .iter()
                .map(|(&index, stampseudonym)| StampseudonymItem {
                    index,
                    stampseudonym,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveBatchRequest<'a> {
    pub batch_identifier: &'a nv_core::BatchIdentifier,
}

// -- Responses ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChainsResponse {
    #[serde(default)]
    pub chains: Vec<Chain>,
}

#[derive(Debug, Deserialize)]
pub struct SectorsResponse {
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

#[derive(Debug, Deserialize)]
pub struct StampseudonymResponse {
    pub stampseudonym: Stampseudonym,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EckIdResponse {
    pub eck_id: EckId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSubmittedResponse {
    pub batch_identifier: nv_core::BatchIdentifier,
}

#[derive(Debug, Deserialize)]
pub struct SuccessEntry {
    pub index: u32,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedEntry {
    pub index: u32,
    pub error_message: String,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveBatchResponse {
    #[serde(default)]
    pub success: Vec<SuccessEntry>,
    #[serde(default)]
    pub failed: Vec<FailedEntry>,
}

impl From<RetrieveBatchResponse> for BatchResult<String> {
    fn from(resp: RetrieveBatchResponse) -> Self {
        Self {
            success: resp.success.into_iter().map(|e| (e.index, e.value)).collect(),
            failed: resp
                .failed
                .into_iter()
                .map(|e| (e.index, e.error_message))
                .collect(),
        }
    }
}

/// Body of a fault response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultEnvelope {
    pub fault_actor: String,
    #[serde(default)]
    pub fault_string: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_request_omits_absent_effective_date() {
        let new = HPgn::new("a".repeat(64));
        let old = HPgn::new("b".repeat(64));
        let req = ReplaceStampseudonymRequest {
            hpgn_new: &new,
            hpgn_old: &old,
            effective_date: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"hpgnNew": "a".repeat(64), "hpgnOld": "b".repeat(64)}));
    }

    #[test]
    fn eck_id_batch_request_lists_items_in_index_order() {
        let items = BatchItems::from([
            (3, Stampseudonym::new("s3")),
            (0, Stampseudonym::new("s0")),
        ]);
        let chain = ChainId::new("chain");
        let sector = SectorId::new("sector");
        let req = SubmitEckIdBatchRequest::from_items(&items, &chain, &sector);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "chainId": "chain",
                "sectorId": "sector",
                "stampseudonymList": [
                    {"index": 0, "stampseudonym": "s0"},
                    {"index": 3, "stampseudonym": "s3"}
                ]
            })
        );
    }

    #[test]
    fn batch_response_converts_to_partition() {
        let resp: RetrieveBatchResponse = serde_json::from_value(json!({
            "success": [{"index": 0, "value": "e0"}],
            "failed": [{"index": 1, "errorMessage": "hpgn is empty"}]
        }))
        .unwrap();
        let result = BatchResult::from(resp);
        assert_eq!(result.success.get(&0).map(String::as_str), Some("e0"));
        assert_eq!(result.failed.get(&1).map(String::as_str), Some("hpgn is empty"));
        assert!(result.check_partition(&[0, 1]).is_ok());
    }

    #[test]
    fn batch_response_tolerates_missing_lists() {
        let resp: RetrieveBatchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(BatchResult::from(resp).is_empty());
    }

    #[test]
    fn fault_envelope_message_is_optional() {
        let env: FaultEnvelope =
            serde_json::from_value(json!({"faultActor": "NotFinishedException"})).unwrap();
        assert_eq!(env.fault_actor, "NotFinishedException");
        assert!(env.fault_string.is_empty());
    }
}
