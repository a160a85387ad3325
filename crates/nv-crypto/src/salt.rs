//! # Salt Decoding
//!
//! The first-level salt is distributed as a base64 string. It is decoded
//! once at construction into zeroizing memory.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Decoded KDF salt. Bytes are wiped on drop and never printed.
#[derive(Clone)]
pub struct Salt(Zeroizing<Vec<u8>>);

impl Salt {
    /// Decode a standard-alphabet base64 salt.
    ///
    /// # Errors
    ///
    /// `CryptoError::Configuration` if the string is blank, is not valid
    /// base64, or decodes to zero bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(CryptoError::Configuration("salt is empty".into()));
        }
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::Configuration(format!("salt is not valid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(CryptoError::Configuration("salt decodes to zero bytes".into()));
        }
        Ok(Self(Zeroizing::new(bytes)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Salt").field(&"[REDACTED]").finish()
    }
}
