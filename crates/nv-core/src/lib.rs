//! # nv-core: Foundational Types for the Nummervoorziening Client
//!
//! Defines the domain primitives shared by the hasher, the client, and the
//! in-memory issuance service. This crate performs no I/O and depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers.** `HPgn`, `Stampseudonym`, `EckId`,
//!    `ChainId`, `SectorId` and `BatchIdentifier` are distinct types. You
//!    cannot pass a stampseudonym where an HPgn is expected.
//!
//! 2. **Remote values stay opaque.** Identifiers issued or validated by the
//!    remote service are carried verbatim. Local shape checks are available
//!    (`HPgn::parse`, `HPgn::is_well_formed`) but the service remains the
//!    authority, so malformed values can still be forwarded and rejected
//!    remotely.
//!
//! 3. **Batch results are partitions.** [`BatchResult`] keeps successes and
//!    per-item failures in two disjoint ordered maps keyed by the caller's
//!    index.
//!
//! 4. **One fault taxonomy.** [`RemoteFault`] is the single mapping from
//!    remote fault actor names to retry classification.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `nv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod batch;
pub mod error;
pub mod fault;
pub mod identity;
pub mod temporal;

pub use batch::{BatchItems, BatchResult, PartitionViolation};
pub use error::ValidationError;
pub use fault::{FaultClass, RemoteFault};
pub use identity::{BatchIdentifier, ChainId, EckId, HPgn, SectorId, Stampseudonym, HPGN_HEX_LEN};
pub use temporal::Timestamp;
