//! # Identifier Newtypes
//!
//! Domain-primitive newtypes for every identifier exchanged with the
//! issuance service. Each identifier is a distinct type: you cannot pass an
//! [`EckId`] where a [`Stampseudonym`] is expected.
//!
//! ## Validation
//!
//! All identifiers are carried verbatim on the wire. The issuance service
//! validates them and reports which argument it rejected, so construction
//! via `new()` is infallible and a malformed value can still be submitted
//! (batch items with an empty value are reported back per index).
//!
//! Callers that want to fail early use `parse()`, which rejects empty
//! values, and for [`HPgn`] additionally enforces the 64-character
//! lowercase hex shape produced by the hasher.
//!
//! ## Reference
//!
//! - HPgn: scrypt output, 32 bytes, lowercase hex.
//! - Stampseudonym / EckId: URI-like strings issued by the service, e.g.
//!   `https://ketenid.nl/pilot/<hex>`.
//! - ChainId / SectorId: registry URIs, e.g.
//!   `http://purl.edustandaard.nl/begrippenkader/<uuid>`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of a well-formed HPgn in hex characters.
pub const HPGN_HEX_LEN: usize = 64;

/// Declares an opaque string identifier with transparent serde, `Display`,
/// `AsRef<str>`, conversions from strings, and a non-empty `parse()`.
macro_rules! opaque_identifier {
    ($(#[$meta:meta])* $ty:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(String);

        impl $ty {
            /// Wrap a value without local validation.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Wrap a value, rejecting empty or whitespace-only input.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(value))
            }

            /// Access the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

opaque_identifier!(
    /// First-stage pseudonym issued for an HPgn. Chain and sector independent.
    Stampseudonym,
    "stampseudonym"
);

opaque_identifier!(
    /// Second-stage pseudonym scoped to a (chain, sector) pair. Also known as
    /// SchoolID in the legacy protocol.
    EckId,
    "eck id"
);

opaque_identifier!(
    /// Identifier of a federation chain registered with the service.
    ChainId,
    "chain id"
);

opaque_identifier!(
    /// Identifier of a usage sector registered with the service.
    SectorId,
    "sector id"
);

opaque_identifier!(
    /// Token returned by a batch submission, used to retrieve the result.
    BatchIdentifier,
    "batch identifier"
);

// ---------------------------------------------------------------------------
// HPgn
// ---------------------------------------------------------------------------

/// Salted one-way hash of a PGN, safe to transmit.
///
/// Produced by the hasher as 64 lowercase hex characters. `Debug` prints the
/// full value: an HPgn is already pseudonymous, but callers should still keep
/// it out of `info`-level logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HPgn(String);

impl HPgn {
    /// Wrap a value without local validation. The service validates.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Wrap a value, requiring exactly 64 lowercase hex characters.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !is_lower_hex(&value) {
            return Err(ValidationError::InvalidHpgn {
                expected: HPGN_HEX_LEN,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Whether this value has the shape the hasher produces.
    pub fn is_well_formed(&self) -> bool {
        is_lower_hex(&self.0)
    }

    /// Access the underlying hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for HPgn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HPgn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for HPgn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_lower_hex(value: &str) -> bool {
    value.len() == HPGN_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
