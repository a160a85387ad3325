//! Issuance service client error types.
//!
//! [`ClientError::class`] maps every error onto the caller-facing taxonomy:
//! local input errors, remote rejections, the transient `NotFinished`
//! condition, terminal faults, poll timeouts, and transport failures.

use nv_core::{BatchIdentifier, FaultClass, PartitionViolation, RemoteFault};
use nv_crypto::CryptoError;

use crate::config::ConfigError;

/// Errors from issuance service calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Rejected locally before any remote call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The service answered with a named fault.
    #[error("{operation} failed with {fault}")]
    Fault {
        operation: String,
        fault: RemoteFault,
    },

    /// Every poll attempt reported `NotFinished`.
    #[error("batch {batch} not finished after {attempts} poll attempts")]
    Timeout {
        batch: BatchIdentifier,
        attempts: u32,
    },

    /// Polling was cancelled between attempts.
    #[error("polling of batch {batch} cancelled after {attempts} attempts")]
    Cancelled {
        batch: BatchIdentifier,
        attempts: u32,
    },

    /// A batch result did not partition the submitted indices.
    #[error("inconsistent result for batch {batch}: {violation}")]
    InconsistentBatch {
        batch: BatchIdentifier,
        violation: PartitionViolation,
    },

    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Non-2xx status without a fault envelope.
    #[error("service {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },

    /// HPgn derivation failed.
    #[error("hashing error: {0}")]
    Crypto(#[from] CryptoError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Caller-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Local validation or configuration. Never retried.
    InputValidation,
    /// The service rejected an argument (hpgn, stampseudonym, chain, sector).
    RemoteRejected,
    /// Batch still processing. Only polling retries this.
    Transient,
    /// Quota, consumed, expired, cancelled, or inconsistent. Abandon the batch.
    Terminal,
    /// Poll attempts exhausted. The caller may resubmit.
    Timeout,
    /// Connection, status, or decoding failure.
    Transport,
}

impl ClientError {
    pub(crate) fn fault(operation: &str, fault: RemoteFault) -> Self {
        Self::Fault {
            operation: operation.to_string(),
            fault,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidInput(_) | Self::Crypto(_) | Self::Config(_) => ErrorClass::InputValidation,
            Self::Fault { fault, .. } => match fault.class() {
                FaultClass::Transient => ErrorClass::Transient,
                FaultClass::Terminal => ErrorClass::Terminal,
                FaultClass::Rejected => ErrorClass::RemoteRejected,
            },
            Self::Timeout { .. } => ErrorClass::Timeout,
            Self::Cancelled { .. } | Self::InconsistentBatch { .. } => ErrorClass::Terminal,
            Self::Http { .. } | Self::Api { .. } | Self::Deserialization { .. } => {
                ErrorClass::Transport
            }
        }
    }

    /// The remote fault, if the service reported one.
    pub fn remote_fault(&self) -> Option<&RemoteFault> {
        match self {
            Self::Fault { fault, .. } => Some(fault),
            _ => None,
        }
    }
}
