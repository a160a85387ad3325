//! # Validation Errors
//!
//! Local validation failures for domain primitives. These never involve the
//! remote service and are never retried.

use thiserror::Error;

/// Error raised when a value fails a local shape check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An HPgn was not 64 lowercase hexadecimal characters.
    #[error("invalid HPgn: expected {expected} lowercase hex characters, got {actual:?}")]
    InvalidHpgn {
        /// Required length in characters.
        expected: usize,
        /// The rejected value.
        actual: String,
    },

    /// A required identifier was empty or whitespace.
    #[error("{kind} must not be empty")]
    EmptyIdentifier {
        /// The identifier kind, e.g. `"chain id"`.
        kind: &'static str,
    },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_hpgn_display_names_expected_length() {
        let err = ValidationError::InvalidHpgn {
            expected: 64,
            actual: "abc".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("64"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn empty_identifier_display() {
        let err = ValidationError::EmptyIdentifier { kind: "sector id" };
        assert_eq!(err.to_string(), "sector id must not be empty");
    }
}
