//! # nv-crypto: HPgn Derivation
//!
//! Converts a raw identifying number (PGN) into an HPgn: the salted,
//! one-way token that is the only form of the identifier ever sent to the
//! issuance service.
//!
//! - **Salt handling** ([`salt`]): base64 decoding into zeroizing memory.
//! - **Cost parameters** ([`params`]): the frozen scrypt presets shared
//!   with the service. Changing them changes every derived token.
//! - **Hasher** ([`hasher`]): input normalization and derivation.
//!
//! Raw input and salt bytes are never logged and are wiped from memory
//! when dropped.

pub mod error;
pub mod hasher;
pub mod params;
pub mod salt;

pub use error::CryptoError;
pub use hasher::{derive_token, Hasher, MIN_INPUT_CHARS};
pub use params::{KdfParams, SCHOOL_ID_LEGACY_SALT};
pub use salt::Salt;
