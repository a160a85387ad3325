//! # Scrypt Cost Parameters
//!
//! The cost parameters determine the derived bytes, so client and service
//! must use identical values. The presets below are frozen.

use crate::error::CryptoError;

/// Salt used by the legacy SchoolID client, base64 encoded.
pub const SCHOOL_ID_LEGACY_SALT: &str = "rktYml0MIp9TC9u6Ny6uqw==";

/// Length of the derived key in bytes.
pub(crate) const OUTPUT_LEN: usize = 32;

/// Scrypt cost parameters: work factor `N = 2^log_n`, block size `r`,
/// parallelism `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KdfParams {
    log_n: u8,
    r: u32,
    p: u32,
}

impl KdfParams {
    /// EckID first-level hashing: N = 131072, r = 8, p = 4.
    pub const ECK_ID: Self = Self {
        log_n: 17,
        r: 8,
        p: 4,
    };

    /// Legacy SchoolID hashing: N = 16384, r = 8, p = 1.
    pub const SCHOOL_ID_LEGACY: Self = Self {
        log_n: 14,
        r: 8,
        p: 1,
    };

    /// Custom parameters, validated against scrypt's limits.
    ///
    /// Tokens derived with non-preset parameters will not match those the
    /// service computes. Intended for tests and local tooling.
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, CryptoError> {
        let params = Self { log_n, r, p };
        params.to_scrypt()?;
        Ok(params)
    }

    pub fn log_n(&self) -> u8 {
        self.log_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    /// Work factor N.
    pub fn n(&self) -> u64 {
        1u64 << self.log_n
    }

    pub(crate) fn to_scrypt(self) -> Result<scrypt::Params, CryptoError> {
        scrypt::Params::new(self.log_n, self.r, self.p, OUTPUT_LEN)
            .map_err(|e| CryptoError::Configuration(format!("invalid scrypt parameters: {e}")))
    }
}

impl std::fmt::Display for KdfParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scrypt(N={}, r={}, p={})", self.n(), self.r, self.p)
    }
}
