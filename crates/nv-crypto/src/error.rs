//! # Cryptographic Error Types
//!
//! Structured errors for HPgn derivation. Both variants are local input
//! errors and are never retried.

use thiserror::Error;

/// Errors from HPgn derivation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The raw identifier is too short after trimming.
    #[error("invalid input: at least {min_chars} non-blank characters required")]
    InvalidInput {
        /// Minimum trimmed length.
        min_chars: usize,
    },

    /// Salt or cost parameters are missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
}
