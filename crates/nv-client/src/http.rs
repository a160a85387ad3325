//! HTTP binding of [`IdentityTransport`] over reqwest.
//!
//! Every operation is a JSON `POST` to `{endpoint}/{operationName}`. Each
//! request carries the caller's OIN in the `X-Addressing-From` header. The
//! transport never retries: a request that might have reached the service
//! (a batch submission in particular) must not be replayed behind the
//! caller's back.

use std::time::Duration;

use nv_core::{
    BatchIdentifier, BatchItems, BatchResult, ChainId, EckId, HPgn, RemoteFault, SectorId,
    Stampseudonym, Timestamp,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{CertificateVerification, ClientConfig, ConfigError};
use crate::error::ClientError;
use crate::transport::IdentityTransport;
use crate::types::{Chain, PingStatus, Sector};
use crate::wire;

/// Header identifying the calling organisation.
pub const ADDRESSING_FROM_HEADER: &str = "x-addressing-from";

/// Prefix of the addressing value; the OIN is appended.
pub const ANONYMOUS_OIN_PREFIX: &str = "http://www.w3.org/2005/08/addressing/anonymous?oin=";

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build the HTTP client: timeout, addressing header, client identity,
    /// extra trust root, and certificate verification mode.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(ADDRESSING_FROM_HEADER),
            addressing_value(&config.instance_oin)?,
        );

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers);

        if let Some(path) = &config.tls.client_identity_pem {
            let pem = read_pem(path)?;
            let identity = reqwest::Identity::from_pem(&pem).map_err(|e| ConfigError::Tls {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            builder = builder.identity(identity);
        }

        if let Some(path) = &config.tls.ca_certificate_pem {
            let pem = read_pem(path)?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| ConfigError::Tls {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            builder = builder.add_root_certificate(cert);
        }

        if config.tls.verification == CertificateVerification::DangerAcceptInvalid {
            tracing::warn!(
                endpoint = %config.endpoint_url,
                "server certificate validation is DISABLED; use only against test environments"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|e| ClientError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;

        Ok(Self {
            http,
            base_url: config.endpoint_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{operation}", self.base_url)
    }

    /// POST one operation and decode the response or the fault envelope.
    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send,
    {
        let url = self.operation_url(operation);
        tracing::debug!(operation, "calling issuance service");

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: operation.to_string(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<wire::FaultEnvelope>(&body) {
                Ok(envelope) => {
                    let fault = RemoteFault::from_actor(&envelope.fault_actor, envelope.fault_string);
                    tracing::debug!(operation, fault = fault.actor(), "service reported fault");
                    ClientError::fault(operation, fault)
                }
                Err(_) => ClientError::Api {
                    endpoint: operation.to_string(),
                    status,
                    body,
                },
            });
        }

        resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: operation.to_string(),
            source: e,
        })
    }
}

impl IdentityTransport for HttpTransport {
    async fn ping(&self) -> Result<PingStatus, ClientError> {
        self.call(wire::PING, &wire::Empty {}).await
    }

    async fn retrieve_chains(&self) -> Result<Vec<Chain>, ClientError> {
        let resp: wire::ChainsResponse = self.call(wire::RETRIEVE_CHAINS, &wire::Empty {}).await?;
        Ok(resp.chains)
    }

    async fn retrieve_sectors(&self) -> Result<Vec<Sector>, ClientError> {
        let resp: wire::SectorsResponse = self.call(wire::RETRIEVE_SECTORS, &wire::Empty {}).await?;
        Ok(resp.sectors)
    }

    async fn retrieve_stampseudonym(&self, hpgn: &HPgn) -> Result<Stampseudonym, ClientError> {
        let resp: wire::StampseudonymResponse = self
            .call(
                wire::RETRIEVE_STAMPSEUDONYM,
                &wire::RetrieveStampseudonymRequest { hpgn },
            )
            .await?;
        Ok(resp.stampseudonym)
    }

    async fn retrieve_eck_id(
        &self,
        stampseudonym: &Stampseudonym,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<EckId, ClientError> {
        let resp: wire::EckIdResponse = self
            .call(
                wire::RETRIEVE_ECK_ID,
                &wire::RetrieveEckIdRequest {
                    stampseudonym,
                    chain_id,
                    sector_id,
                },
            )
            .await?;
        Ok(resp.eck_id)
    }

    async fn replace_stampseudonym(
        &self,
        hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        effective_date: Option<Timestamp>,
    ) -> Result<Stampseudonym, ClientError> {
        let resp: wire::StampseudonymResponse = self
            .call(
                wire::REPLACE_STAMPSEUDONYM,
                &wire::ReplaceStampseudonymRequest {
                    hpgn_new,
                    hpgn_old,
                    effective_date,
                },
            )
            .await?;
        Ok(resp.stampseudonym)
    }

    async fn replace_eck_id(
        &self,
        hpgn_new: &HPgn,
        hpgn_old: &HPgn,
        chain_id: &ChainId,
        sector_id: &SectorId,
        effective_date: Option<Timestamp>,
    ) -> Result<EckId, ClientError> {
        let resp: wire::EckIdResponse = self
            .call(
                wire::REPLACE_ECK_ID,
                &wire::ReplaceEckIdRequest {
                    hpgn_new,
                    hpgn_old,
                    chain_id,
                    sector_id,
                    effective_date,
                },
            )
            .await?;
        Ok(resp.eck_id)
    }

    async fn submit_stampseudonym_batch(
        &self,
        items: &BatchItems<HPgn>,
    ) -> Result<BatchIdentifier, ClientError> {
        let resp: wire::BatchSubmittedResponse = self
            .call(
                wire::SUBMIT_STAMPSEUDONYM_BATCH,
                &wire::SubmitStampseudonymBatchRequest::from_items(items),
            )
            .await?;
        Ok(resp.batch_identifier)
    }

    async fn submit_eck_id_batch(
        &self,
        items: &BatchItems<Stampseudonym>,
        chain_id: &ChainId,
        sector_id: &SectorId,
    ) -> Result<BatchIdentifier, ClientError> {
        let resp: wire::BatchSubmittedResponse = self
            .call(
                wire::SUBMIT_ECK_ID_BATCH,
                &wire::SubmitEckIdBatchRequest::from_items(items, chain_id, sector_id),
            )
            .await?;
        Ok(resp.batch_identifier)
    }

    async fn retrieve_batch(
        &self,
        batch: &BatchIdentifier,
    ) -> Result<BatchResult<String>, ClientError> {
        let resp: wire::RetrieveBatchResponse = self
            .call(
                wire::RETRIEVE_BATCH,
                &wire::RetrieveBatchRequest {
                    batch_identifier: batch,
                },
            )
            .await?;
        Ok(resp.into())
    }
}

fn addressing_value(instance_oin: &str) -> Result<HeaderValue, ConfigError> {
    let oin = instance_oin.trim();
    if oin.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "instance_oin".into(),
            reason: "must not be empty".into(),
        });
    }
    HeaderValue::from_str(&format!("{ANONYMOUS_OIN_PREFIX}{oin}")).map_err(|_| {
        ConfigError::InvalidValue {
            var: "instance_oin".into(),
            reason: "contains characters not allowed in a header".into(),
        }
    })
}

fn read_pem(path: &std::path::Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|e| ConfigError::Tls {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
