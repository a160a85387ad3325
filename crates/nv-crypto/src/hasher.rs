//! # HPgn Hasher
//!
//! `derive_token(salt, input)`:
//!
//! 1. Reject input with fewer than [`MIN_INPUT_CHARS`] UTF-16 code units
//!    once leading and trailing code points up to U+0020 are stripped.
//!    Other whitespace (NBSP, ideographic space) counts as content, and a
//!    supplementary-plane character counts as two units.
//! 2. Lower-case the input. It is **not** trimmed: surrounding whitespace
//!    is part of the hashed value.
//! 3. Run scrypt over the UTF-8 bytes with the decoded salt.
//! 4. Hex-encode the 32 derived bytes in lowercase.
//!
//! The output must be reproducible by independent implementations, so the
//! steps above are fixed.

use nv_core::HPgn;
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::params::{KdfParams, OUTPUT_LEN};
use crate::salt::Salt;

/// Minimum number of UTF-16 code units in the trimmed input.
pub const MIN_INPUT_CHARS: usize = 2;

/// Salted scrypt hasher with fixed cost parameters.
#[derive(Clone)]
pub struct Hasher {
    salt: Salt,
    params: KdfParams,
    scrypt_params: scrypt::Params,
}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hasher")
            .field("salt", &"[REDACTED]")
            .field("params", &self.params)
            .finish()
    }
}

impl Hasher {
    /// Build a hasher from a base64 salt.
    pub fn new(salt_b64: &str, params: KdfParams) -> Result<Self, CryptoError> {
        Self::with_salt(Salt::from_base64(salt_b64)?, params)
    }

    /// Build a hasher from an already decoded salt.
    pub fn with_salt(salt: Salt, params: KdfParams) -> Result<Self, CryptoError> {
        Ok(Self {
            scrypt_params: params.to_scrypt()?,
            salt,
            params,
        })
    }

    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Derive the HPgn for a raw identifier.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidInput` if the trimmed input has fewer than two
    /// UTF-16 code units.
    pub fn derive_token(&self, input: &str) -> Result<HPgn, CryptoError> {
        if trimmed_utf16_len(input) < MIN_INPUT_CHARS {
            return Err(CryptoError::InvalidInput {
                min_chars: MIN_INPUT_CHARS,
            });
        }

        let normalized = Zeroizing::new(input.to_lowercase());
        let mut derived = Zeroizing::new([0u8; OUTPUT_LEN]);
        scrypt::scrypt(
            normalized.as_bytes(),
            self.salt.as_bytes(),
            &self.scrypt_params,
            derived.as_mut_slice(),
        )
        .map_err(|e| CryptoError::Configuration(format!("scrypt output length rejected: {e}")))?;

        Ok(HPgn::new(hex::encode(derived.as_slice())))
    }
}

/// Length in UTF-16 code units after stripping control characters and
/// spaces (code points up to U+0020) from both ends.
fn trimmed_utf16_len(input: &str) -> usize {
    input.trim_matches(|c: char| c <= ' ').encode_utf16().count()
}

/// One-shot derivation. Prefer a long-lived [`Hasher`] when hashing many
/// inputs with the same salt.
pub fn derive_token(salt_b64: &str, input: &str, params: KdfParams) -> Result<HPgn, CryptoError> {
    Hasher::new(salt_b64, params)?.derive_token(input)
}
