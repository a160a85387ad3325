//! # nv-client: Typed Client for the Nummervoorziening Issuance Service
//!
//! Converts hashed identifiers into sector-scoped pseudonyms through the
//! remote issuance service:
//!
//! - **Hashing** via [`nv_crypto::Hasher`]: raw PGN → HPgn, locally.
//! - **Identity** via [`identity::IdentityClient`]: HPgn → Stampseudonym →
//!   EckId, chain/sector listing, and substitution.
//! - **Batches** via [`batch::BatchCoordinator`]: asynchronous bulk
//!   derivation with bounded polling.
//!
//! ## Architecture
//!
//! Both sub-clients share one [`transport::IdentityTransport`]. The
//! production transport is [`http::HttpTransport`], a JSON binding over
//! reqwest with client-certificate TLS. Configuration is an explicit
//! [`ClientConfig`] owned by the caller; the library holds no global state.
//!
//! ## Retry policy
//!
//! Nothing is retried automatically except `NotFinished` while polling a
//! batch. Quota, validation and expiry faults surface unchanged.

pub mod batch;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod transport;
pub mod types;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchCoordinator, BatchState, PollStep};
pub use config::{BatchPollConfig, CertificateVerification, ClientConfig, TlsConfig};
pub use error::{ClientError, ErrorClass};
pub use http::HttpTransport;
pub use identity::IdentityClient;
pub use transport::IdentityTransport;
pub use types::{Chain, PingStatus, Sector};

use std::sync::Arc;

use nv_core::HPgn;
use nv_crypto::Hasher;

/// Top-level client. Holds the hasher and both sub-clients over one HTTP
/// transport.
#[derive(Debug, Clone)]
pub struct NvClient {
    hasher: Hasher,
    identity: IdentityClient<HttpTransport>,
    batch: BatchCoordinator<HttpTransport>,
}

impl NvClient {
    /// Create a client from configuration.
    ///
    /// Fails if the salt or KDF parameters are invalid, if TLS material
    /// cannot be loaded, or if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let hasher = Hasher::new(&config.first_level_salt, config.kdf_params)?;
        let transport = Arc::new(HttpTransport::new(&config)?);
        tracing::debug!(
            endpoint = %config.endpoint_url,
            kdf = %config.kdf_params,
            "issuance service client initialised"
        );

        Ok(Self {
            hasher,
            identity: IdentityClient::new(Arc::clone(&transport)),
            batch: BatchCoordinator::new(transport, config.batch_poll),
        })
    }

    /// Derive the HPgn of a raw identifier. Runs locally; nothing is sent.
    pub fn hash(&self, raw_identifier: &str) -> Result<HPgn, ClientError> {
        Ok(self.hasher.derive_token(raw_identifier)?)
    }

    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    /// Access the single-item identity client.
    pub fn identity(&self) -> &IdentityClient<HttpTransport> {
        &self.identity
    }

    /// Access the batch coordinator.
    pub fn batch(&self) -> &BatchCoordinator<HttpTransport> {
        &self.batch
    }
}
