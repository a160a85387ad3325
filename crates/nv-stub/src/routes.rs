// SPDX-License-Identifier: Apache-2.0
//! Route definitions for the issuance service stub.
//!
//! One `POST /{operationName}` route per operation, taking and returning the
//! camelCase JSON bodies `nv-client` sends. Faults are answered with status
//! 500 and a `{"faultActor", "faultString"}` body.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use nv_core::{BatchResult, Timestamp};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::store::{AppState, BatchRequest, StubFault, INVALID_SUBSTITUTION};

/// Build the complete router with all operation routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Discovery
        .route("/ping", post(ping))
        .route("/retrieveChains", post(retrieve_chains))
        .route("/retrieveSectors", post(retrieve_sectors))
        // Single derivation
        .route("/retrieveStampseudonym", post(retrieve_stampseudonym))
        .route("/retrieveEckId", post(retrieve_eck_id))
        // Substitution
        .route("/replaceStampseudonym", post(replace_stampseudonym))
        .route("/replaceEckId", post(replace_eck_id))
        // Batches
        .route("/submitStampseudonymBatch", post(submit_stampseudonym_batch))
        .route("/submitEckIdBatch", post(submit_eck_id_batch))
        .route("/retrieveBatch", post(retrieve_batch))
        .fallback(not_implemented)
        .with_state(state)
}

impl IntoResponse for StubFault {
    fn into_response(self) -> Response {
        tracing::debug!(actor = %self.actor, message = %self.message, "answering fault");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "faultActor": self.actor,
                "faultString": self.message,
            })),
        )
            .into_response()
    }
}

type Answer = Result<Json<Value>, StubFault>;

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> StatusCode {
    StatusCode::OK
}

// ── Discovery ───────────────────────────────────────────────────────

async fn ping(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "available": true,
        "applicationVersion": state.config().application_version,
        "systemTime": Timestamp::now(),
    }))
}

async fn retrieve_chains(State(state): State<AppState>) -> Json<Value> {
    let chains: Vec<Value> = state
        .config()
        .chains
        .iter()
        .map(|c| json!({"id": c.id, "description": c.description}))
        .collect();
    Json(json!({ "chains": chains }))
}

async fn retrieve_sectors(State(state): State<AppState>) -> Json<Value> {
    let sectors: Vec<Value> = state
        .config()
        .sectors
        .iter()
        .map(|s| json!({"id": s.id, "description": s.description}))
        .collect();
    Json(json!({ "sectors": sectors }))
}

// ── Single derivation ───────────────────────────────────────────────

#[derive(Deserialize)]
struct HpgnBody {
    #[serde(default)]
    hpgn: String,
}

async fn retrieve_stampseudonym(State(state): State<AppState>, Json(body): Json<HpgnBody>) -> Answer {
    let stampseudonym = state.stampseudonym(&body.hpgn, Timestamp::now())?;
    Ok(Json(json!({ "stampseudonym": stampseudonym })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EckIdBody {
    #[serde(default)]
    stampseudonym: String,
    #[serde(default)]
    chain_id: String,
    #[serde(default)]
    sector_id: String,
}

async fn retrieve_eck_id(State(state): State<AppState>, Json(body): Json<EckIdBody>) -> Answer {
    let eck_id = state.eck_id(&body.stampseudonym, &body.chain_id, &body.sector_id)?;
    Ok(Json(json!({ "eckId": eck_id })))
}

// ── Substitution ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplaceBody {
    #[serde(default)]
    hpgn_new: String,
    #[serde(default)]
    hpgn_old: String,
    #[serde(default)]
    chain_id: String,
    #[serde(default)]
    sector_id: String,
    effective_date: Option<String>,
}

impl ReplaceBody {
    fn effective(&self) -> Result<Option<Timestamp>, StubFault> {
        self.effective_date
            .as_deref()
            .map(Timestamp::parse_lenient)
            .transpose()
            .map_err(|e| StubFault::new(INVALID_SUBSTITUTION, e.to_string()))
    }
}

async fn replace_stampseudonym(State(state): State<AppState>, Json(body): Json<ReplaceBody>) -> Answer {
    let effective = body.effective()?;
    let stampseudonym =
        state.replace_stampseudonym(&body.hpgn_new, &body.hpgn_old, effective, Timestamp::now())?;
    Ok(Json(json!({ "stampseudonym": stampseudonym })))
}

async fn replace_eck_id(State(state): State<AppState>, Json(body): Json<ReplaceBody>) -> Answer {
    let effective = body.effective()?;
    let eck_id = state.replace_eck_id(
        &body.hpgn_new,
        &body.hpgn_old,
        &body.chain_id,
        &body.sector_id,
        effective,
        Timestamp::now(),
    )?;
    Ok(Json(json!({ "eckId": eck_id })))
}

// ── Batches ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HpgnEntry {
    index: u32,
    #[serde(default)]
    hpgn: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StampseudonymBatchBody {
    #[serde(default)]
    hpgn_list: Vec<HpgnEntry>,
}

#[derive(Deserialize)]
struct StampseudonymEntry {
    index: u32,
    #[serde(default)]
    stampseudonym: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EckIdBatchBody {
    #[serde(default)]
    chain_id: String,
    #[serde(default)]
    sector_id: String,
    #[serde(default)]
    stampseudonym_list: Vec<StampseudonymEntry>,
}

async fn submit_stampseudonym_batch(
    State(state): State<AppState>,
    Json(body): Json<StampseudonymBatchBody>,
) -> Answer {
    let items = body.hpgn_list.into_iter().map(|e| (e.index, e.hpgn)).collect();
    let id = state.submit_batch(BatchRequest::Stampseudonym { items })?;
    tracing::info!(batch = %id, "stampseudonym batch accepted");
    Ok(Json(json!({ "batchIdentifier": id })))
}

async fn submit_eck_id_batch(State(state): State<AppState>, Json(body): Json<EckIdBatchBody>) -> Answer {
    let items = body
        .stampseudonym_list
        .into_iter()
        .map(|e| (e.index, e.stampseudonym))
        .collect();
    let id = state.submit_batch(BatchRequest::EckId {
        items,
        chain_id: body.chain_id,
        sector_id: body.sector_id,
    })?;
    tracing::info!(batch = %id, "eckid batch accepted");
    Ok(Json(json!({ "batchIdentifier": id })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveBatchBody {
    #[serde(default)]
    batch_identifier: String,
}

async fn retrieve_batch(State(state): State<AppState>, Json(body): Json<RetrieveBatchBody>) -> Answer {
    let result = state.retrieve_batch(&body.batch_identifier)?;
    Ok(Json(batch_body(&result)))
}

fn batch_body(result: &BatchResult<String>) -> Value {
    let success: Vec<Value> = result
        .success
        .iter()
        .map(|(index, value)| json!({"index": index, "value": value}))
        .collect();
    let failed: Vec<Value> = result
        .failed
        .iter()
        .map(|(index, message)| json!({"index": index, "errorMessage": message}))
        .collect();
    json!({ "success": success, "failed": failed })
}

// ── Fallback ────────────────────────────────────────────────────────

async fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
