// SPDX-License-Identifier: Apache-2.0
//! In-memory issuance service state.
//!
//! Holds substitution links keyed by the new HPgn, and batch jobs keyed by
//! their identifier. Links live behind one `parking_lot::RwLock`: the cycle
//! check reads other keys, so guard and insert must share a write lock.
//! Batches and daily counters are independent per key and use DashMap. Pseudonyms are derived deterministically from the
//! issuer secret, so no per-identity storage is needed: the same HPgn
//! yields the same Stampseudonym across restarts with the same secret.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::DashMap;
use nv_core::{fault, BatchResult, HPgn, Timestamp};
use parking_lot::RwLock;
use sha2::{Digest, Sha512};
use uuid::Uuid;

/// Prefix of issued Stampseudonyms.
pub const STAMPSEUDONYM_PREFIX: &str = "https://ketenid.nl/sppilot/";
/// Prefix of issued EckIds.
pub const ECK_ID_PREFIX: &str = "https://ketenid.nl/pilot/";

pub const INVALID_HPGN: &str = "InvalidHpgnException";
pub const INVALID_STAMPSEUDONYM: &str = "InvalidStampseudonymException";
pub const INVALID_CHAIN: &str = "InvalidChainException";
pub const INVALID_SECTOR: &str = "InvalidSectorException";
pub const INVALID_BATCH: &str = "InvalidBatchException";
pub const INVALID_BATCH_IDENTIFIER: &str = "InvalidBatchIdentifierException";
pub const INVALID_SUBSTITUTION: &str = "InvalidSubstitutionException";

/// A fault answered to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubFault {
    pub actor: String,
    pub message: String,
}

impl StubFault {
    pub fn new(actor: &str, message: impl Into<String>) -> Self {
        Self {
            actor: actor.to_string(),
            message: message.into(),
        }
    }
}

/// A registry entry (chain or sector).
#[derive(Debug, Clone)]
pub struct Registry {
    pub id: String,
    pub description: String,
}

/// Stub behaviour knobs.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Version reported by `ping`.
    pub application_version: String,
    /// Secret mixed into every derived pseudonym.
    pub issuer_secret: String,
    /// `NotFinished` answers before a batch result becomes available.
    pub not_finished_polls: u32,
    /// Accepted batch submissions per UTC day.
    pub daily_submission_limit: u32,
    /// Age after which an unretrieved batch is purged.
    pub retention: Duration,
    /// Polls closer together than this are answered `TemporaryBlocked`.
    pub min_poll_interval: Duration,
    pub chains: Vec<Registry>,
    pub sectors: Vec<Registry>,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            application_version: "2.0.0-stub".into(),
            issuer_secret: "nv-stub".into(),
            not_finished_polls: 1,
            daily_submission_limit: 1000,
            retention: Duration::from_secs(24 * 60 * 60),
            min_poll_interval: Duration::ZERO,
            chains: vec![Registry {
                id: "http://purl.edustandaard.nl/begrippenkader/e7ec7d3c-c235-4513-bfb6-e54e66854795"
                    .into(),
                description: "Onderwijs keten".into(),
            }],
            sectors: vec![Registry {
                id: "http://purl.edustandaard.nl/begrippenkader/512e4729-03a4-43a2-95ba-758071d1b725"
                    .into(),
                description: "Primair en voortgezet onderwijs".into(),
            }],
        }
    }
}

#[derive(Debug, Clone)]
struct Link {
    old: String,
    effective: Timestamp,
}

/// What a batch asks for.
#[derive(Debug, Clone)]
pub enum BatchRequest {
    Stampseudonym {
        items: Vec<(u32, String)>,
    },
    EckId {
        items: Vec<(u32, String)>,
        chain_id: String,
        sector_id: String,
    },
}

impl BatchRequest {
    fn len(&self) -> usize {
        match self {
            Self::Stampseudonym { items } | Self::EckId { items, .. } => items.len(),
        }
    }
}

/// Observable state of a batch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Pending,
    Complete,
    Consumed,
    Expired,
}

#[derive(Debug)]
struct BatchEntry {
    request: BatchRequest,
    submitted_at: Instant,
    last_poll: Option<Instant>,
    polls_until_ready: u32,
    consumed: bool,
    expired: bool,
}

impl BatchEntry {
    fn status(&self) -> BatchStatus {
        if self.consumed {
            BatchStatus::Consumed
        } else if self.expired {
            BatchStatus::Expired
        } else if self.polls_until_ready == 0 {
            BatchStatus::Complete
        } else {
            BatchStatus::Pending
        }
    }
}

struct Inner {
    config: StubConfig,
    links: RwLock<HashMap<String, Link>>,
    batches: DashMap<String, BatchEntry>,
    submissions: DashMap<NaiveDate, u32>,
}

/// Shared application state.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StubConfig::default())
    }
}

impl AppState {
    pub fn new(config: StubConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                links: RwLock::new(HashMap::new()),
                batches: DashMap::new(),
                submissions: DashMap::new(),
            }),
        }
    }

    pub fn config(&self) -> &StubConfig {
        &self.inner.config
    }

    // ── Derivation ──────────────────────────────────────────────────────

    /// Stampseudonym of `hpgn` as of `at`, following effective links.
    pub fn stampseudonym(&self, hpgn: &str, at: Timestamp) -> Result<String, StubFault> {
        validate_hpgn(hpgn, "hpgn")?;
        let head = resolve_head(&self.inner.links.read(), hpgn, at);
        Ok(self.issue_stampseudonym(&head))
    }

    /// EckId of a Stampseudonym in (chain, sector). Each argument is
    /// validated separately and the fault names the one that failed.
    pub fn eck_id(&self, stampseudonym: &str, chain_id: &str, sector_id: &str) -> Result<String, StubFault> {
        self.validate_stampseudonym(stampseudonym)?;
        self.validate_scope(chain_id, sector_id)?;
        Ok(format!(
            "{ECK_ID_PREFIX}{}",
            self.digest(&["eckid", stampseudonym, chain_id, sector_id])
        ))
    }

    // ── Substitution ────────────────────────────────────────────────────

    /// Link `new` to `old`.
    ///
    /// With an effective date in the past (or none) the link is active at
    /// once and the head-of-chain Stampseudonym of `old` is returned. A
    /// future link is stored inert and the current Stampseudonym of `new`
    /// is returned.
    pub fn replace_stampseudonym(
        &self,
        new: &str,
        old: &str,
        effective: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<String, StubFault> {
        validate_hpgn(new, "hpgnNew")?;
        validate_hpgn(old, "hpgnOld")?;
        if new == old {
            return Err(StubFault::new(INVALID_SUBSTITUTION, "hpgnNew and hpgnOld must differ"));
        }
        let effective = effective.unwrap_or(now);
        let head = {
            let mut links = self.inner.links.write();
            if links.contains_key(new) {
                return Err(StubFault::new(INVALID_SUBSTITUTION, "hpgnNew is already substituted"));
            }
            if reaches(&links, old, new) {
                return Err(StubFault::new(INVALID_SUBSTITUTION, "substitution would create a cycle"));
            }
            links.insert(
                new.to_string(),
                Link {
                    old: old.to_string(),
                    effective,
                },
            );
            let subject = if effective <= now { old } else { new };
            resolve_head(&links, subject, now)
        };
        tracing::info!(%effective, deferred = effective > now, "substitution registered");

        Ok(self.issue_stampseudonym(&head))
    }

    /// As [`replace_stampseudonym`](Self::replace_stampseudonym), answered
    /// as the EckId in (chain, sector). Scope is validated before linking.
    pub fn replace_eck_id(
        &self,
        new: &str,
        old: &str,
        chain_id: &str,
        sector_id: &str,
        effective: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<String, StubFault> {
        self.validate_scope(chain_id, sector_id)?;
        let stampseudonym = self.replace_stampseudonym(new, old, effective, now)?;
        self.eck_id(&stampseudonym, chain_id, sector_id)
    }

    // ── Batches ─────────────────────────────────────────────────────────

    /// Accept a batch and return its identifier.
    pub fn submit_batch(&self, request: BatchRequest) -> Result<String, StubFault> {
        if request.len() == 0 {
            return Err(StubFault::new(INVALID_BATCH, "batch must contain at least one item"));
        }
        if let BatchRequest::EckId {
            chain_id, sector_id, ..
        } = &request
        {
            self.validate_scope(chain_id, sector_id)?;
        }

        let today = Timestamp::now().as_datetime().date_naive();
        self.evict(today);
        {
            let mut count = self.inner.submissions.entry(today).or_insert(0);
            if *count >= self.inner.config.daily_submission_limit {
                return Err(StubFault::new(
                    fault::LIMIT_DAILY_BATCH_SUBMISSIONS_EXCEEDED,
                    format!(
                        "daily limit of {} batch submissions reached",
                        self.inner.config.daily_submission_limit
                    ),
                ));
            }
            *count += 1;
        }

        let id = Uuid::new_v4().to_string();
        self.inner.batches.insert(
            id.clone(),
            BatchEntry {
                request,
                submitted_at: Instant::now(),
                last_poll: None,
                polls_until_ready: self.inner.config.not_finished_polls,
                consumed: false,
                expired: false,
            },
        );
        Ok(id)
    }

    /// One retrieval attempt.
    pub fn retrieve_batch(&self, id: &str) -> Result<BatchResult<String>, StubFault> {
        let now = Instant::now();
        let request = {
            let mut entry = self
                .inner
                .batches
                .get_mut(id)
                .ok_or_else(|| StubFault::new(INVALID_BATCH_IDENTIFIER, "unknown batch identifier"))?;

            match entry.status() {
                BatchStatus::Consumed => {
                    return Err(StubFault::new(
                        fault::CONTENT_ALREADY_RETRIEVED,
                        "batch result was already retrieved",
                    ))
                }
                BatchStatus::Expired => {
                    return Err(StubFault::new(fault::CONTENT_REMOVED, "batch result was removed"))
                }
                BatchStatus::Pending | BatchStatus::Complete => {}
            }
            if now.duration_since(entry.submitted_at) >= self.inner.config.retention {
                entry.expired = true;
                return Err(StubFault::new(fault::CONTENT_REMOVED, "batch result was removed"));
            }
            if let Some(last) = entry.last_poll {
                if now.duration_since(last) < self.inner.config.min_poll_interval {
                    return Err(StubFault::new(
                        fault::TEMPORARY_BLOCKED,
                        "polling too frequently, try again later",
                    ));
                }
            }
            entry.last_poll = Some(now);
            if entry.polls_until_ready > 0 {
                entry.polls_until_ready -= 1;
                return Err(StubFault::new(fault::NOT_FINISHED, "batch is being processed"));
            }
            entry.consumed = true;
            entry.request.clone()
        };

        Ok(self.process(&request, Timestamp::now()))
    }

    pub fn batch_status(&self, id: &str) -> Option<BatchStatus> {
        self.inner.batches.get(id).map(|entry| entry.status())
    }

    /// Drop batches older than twice the retention period and counters of
    /// past days. Between one and two periods a batch still answers
    /// `ContentRemoved`; after that its identifier is unknown.
    fn evict(&self, today: NaiveDate) {
        let horizon = self.inner.config.retention.saturating_mul(2);
        let now = Instant::now();
        let before = self.inner.batches.len();
        self.inner
            .batches
            .retain(|_, entry| now.duration_since(entry.submitted_at) < horizon);
        self.inner.submissions.retain(|day, _| *day >= today);
        let evicted = before.saturating_sub(self.inner.batches.len());
        if evicted > 0 {
            tracing::debug!(evicted, "purged batches past retention");
        }
    }

    fn process(&self, request: &BatchRequest, now: Timestamp) -> BatchResult<String> {
        let mut result = BatchResult::default();
        let mut record = |index: u32, outcome: Result<String, StubFault>| match outcome {
            Ok(value) => {
                result.success.insert(index, value);
            }
            Err(fault) => {
                result.failed.insert(index, fault.message);
            }
        };
        match request {
            BatchRequest::Stampseudonym { items } => {
                for (index, hpgn) in items {
                    record(*index, self.stampseudonym(hpgn, now));
                }
            }
            BatchRequest::EckId {
                items,
                chain_id,
                sector_id,
            } => {
                for (index, stampseudonym) in items {
                    record(*index, self.eck_id(stampseudonym, chain_id, sector_id));
                }
            }
        }
        result
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn issue_stampseudonym(&self, head: &str) -> String {
        format!("{STAMPSEUDONYM_PREFIX}{}", self.digest(&["stampseudonym", head]))
    }

    fn digest(&self, parts: &[&str]) -> String {
        let mut hasher = Sha512::new();
        hasher.update(self.inner.config.issuer_secret.as_bytes());
        for part in parts {
            hasher.update([0u8]);
            hasher.update(part.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    fn validate_stampseudonym(&self, value: &str) -> Result<(), StubFault> {
        let well_formed = value
            .strip_prefix(STAMPSEUDONYM_PREFIX)
            .map(|rest| rest.len() == 128 && rest.bytes().all(|b| b.is_ascii_hexdigit()))
            .unwrap_or(false);
        if well_formed {
            Ok(())
        } else {
            Err(StubFault::new(INVALID_STAMPSEUDONYM, "stampseudonym is empty or malformed"))
        }
    }

    fn validate_scope(&self, chain_id: &str, sector_id: &str) -> Result<(), StubFault> {
        let config = &self.inner.config;
        if !config.chains.iter().any(|c| c.id == chain_id) {
            return Err(StubFault::new(INVALID_CHAIN, "chain is unknown or not active"));
        }
        if !config.sectors.iter().any(|s| s.id == sector_id) {
            return Err(StubFault::new(INVALID_SECTOR, "sector is unknown or not active"));
        }
        Ok(())
    }
}

/// Follow links effective at `at` to the head of the chain.
fn resolve_head(links: &HashMap<String, Link>, hpgn: &str, at: Timestamp) -> String {
    let mut current = hpgn;
    for _ in 0..=links.len() {
        match links.get(current) {
            Some(link) if link.effective <= at => current = &link.old,
            _ => break,
        }
    }
    current.to_string()
}

/// Whether following links from `start`, effective or not, reaches `target`.
fn reaches(links: &HashMap<String, Link>, start: &str, target: &str) -> bool {
    let mut current = start;
    for _ in 0..=links.len() {
        if current == target {
            return true;
        }
        match links.get(current) {
            Some(link) => current = &link.old,
            None => return false,
        }
    }
    false
}

fn validate_hpgn(value: &str, field: &str) -> Result<(), StubFault> {
    if HPgn::new(value).is_well_formed() {
        Ok(())
    } else {
        Err(StubFault::new(
            INVALID_HPGN,
            format!("{field} is empty or not a 64 character lowercase hex string"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "9735dfd2235eaeb5f0300886bcc99c82ffc1d6420c4e0bde8de7218def2135fa";
    const B: &str = "0b870ff044775ef0360655c40d5b284b7e3ae2b72207a6894794d787eb019e60";
    const C: &str = "95237cd20963e630034620324550809a3df98bbe0774a36c356bf5dbc8a65e7b";

    fn chain() -> String {
        StubConfig::default().chains[0].id.clone()
    }

    fn sector() -> String {
        StubConfig::default().sectors[0].id.clone()
    }

    fn now() -> Timestamp {
        Timestamp::parse("2026-03-01T10:00:00Z").unwrap()
    }

    #[test]
    fn stampseudonym_is_deterministic_and_prefixed() {
        let state = AppState::default();
        let s1 = state.stampseudonym(A, now()).unwrap();
        let s2 = state.stampseudonym(A, now()).unwrap();
        assert_eq!(s1, s2);
        assert!(s1.starts_with(STAMPSEUDONYM_PREFIX));
        assert_ne!(s1, state.stampseudonym(B, now()).unwrap());
    }

    #[test]
    fn different_secrets_issue_different_pseudonyms() {
        let other = AppState::new(StubConfig {
            issuer_secret: "other".into(),
            ..StubConfig::default()
        });
        assert_ne!(
            AppState::default().stampseudonym(A, now()).unwrap(),
            other.stampseudonym(A, now()).unwrap()
        );
    }

    #[test]
    fn malformed_hpgn_is_rejected() {
        let state = AppState::default();
        let upper = A.to_uppercase();
        for bad in ["", "abc", upper.as_str()] {
            let err = state.stampseudonym(bad, now()).unwrap_err();
            assert_eq!(err.actor, INVALID_HPGN);
        }
    }

    #[test]
    fn eck_id_reports_each_invalid_axis() {
        let state = AppState::default();
        let stamp = state.stampseudonym(A, now()).unwrap();
        assert_eq!(
            state.eck_id("", &chain(), &sector()).unwrap_err().actor,
            INVALID_STAMPSEUDONYM
        );
        assert_eq!(
            state.eck_id(&stamp, "invalidchainguid", &sector()).unwrap_err().actor,
            INVALID_CHAIN
        );
        assert_eq!(
            state.eck_id(&stamp, &chain(), "invalidsectorguid").unwrap_err().actor,
            INVALID_SECTOR
        );
        let eck = state.eck_id(&stamp, &chain(), &sector()).unwrap();
        assert!(eck.starts_with(ECK_ID_PREFIX));
    }

    #[test]
    fn chained_substitution_resolves_to_head() {
        let state = AppState::default();
        let original = state.stampseudonym(A, now()).unwrap();

        assert_eq!(state.replace_stampseudonym(B, A, None, now()).unwrap(), original);
        assert_eq!(state.replace_stampseudonym(C, B, None, now()).unwrap(), original);

        for hpgn in [A, B, C] {
            assert_eq!(state.stampseudonym(hpgn, now()).unwrap(), original);
        }
    }

    #[test]
    fn future_substitution_is_inert_until_effective() {
        let state = AppState::default();
        let independent_b = state.stampseudonym(B, now()).unwrap();
        let future = now().offset_secs(86_400);

        let answered = state.replace_stampseudonym(B, A, Some(future), now()).unwrap();
        assert_eq!(answered, independent_b);
        assert_eq!(state.stampseudonym(B, now()).unwrap(), independent_b);

        let after = future.offset_secs(1);
        assert_eq!(
            state.stampseudonym(B, after).unwrap(),
            state.stampseudonym(A, after).unwrap()
        );
    }

    #[test]
    fn past_effective_date_is_active_immediately() {
        let state = AppState::default();
        let past = now().offset_secs(-3600);
        let answered = state.replace_stampseudonym(B, A, Some(past), now()).unwrap();
        assert_eq!(answered, state.stampseudonym(A, now()).unwrap());
        assert_eq!(state.stampseudonym(B, now()).unwrap(), answered);
    }

    #[test]
    fn cycles_and_self_links_are_rejected() {
        let state = AppState::default();
        state.replace_stampseudonym(B, A, None, now()).unwrap();
        assert_eq!(
            state.replace_stampseudonym(A, B, None, now()).unwrap_err().actor,
            INVALID_SUBSTITUTION
        );
        assert_eq!(
            state.replace_stampseudonym(C, C, None, now()).unwrap_err().actor,
            INVALID_SUBSTITUTION
        );
        assert_eq!(
            state.replace_stampseudonym(B, C, None, now()).unwrap_err().actor,
            INVALID_SUBSTITUTION
        );
    }

    #[test]
    fn opposite_concurrent_substitutions_never_form_a_cycle() {
        use std::sync::Barrier;

        for _ in 0..2_000 {
            let state = AppState::default();
            let barrier = Arc::new(Barrier::new(2));
            let spawn = |new: &'static str, old: &'static str| {
                let state = state.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    state.replace_stampseudonym(new, old, None, now()).is_ok()
                })
            };
            let forward = spawn(B, A);
            let backward = spawn(A, B);
            let accepted = [forward.join().unwrap(), backward.join().unwrap()];

            assert_eq!(accepted.iter().filter(|ok| **ok).count(), 1);
            assert_eq!(
                state.stampseudonym(A, now()).unwrap(),
                state.stampseudonym(B, now()).unwrap()
            );
        }
    }

    #[test]
    fn replace_eck_id_validates_scope_before_linking() {
        let state = AppState::default();
        let err = state
            .replace_eck_id(B, A, "invalidchainguid", &sector(), None, now())
            .unwrap_err();
        assert_eq!(err.actor, INVALID_CHAIN);
        // The failed call must not have linked B to A.
        assert_ne!(
            state.stampseudonym(B, now()).unwrap(),
            state.stampseudonym(A, now()).unwrap()
        );
    }

    #[test]
    fn batch_lifecycle_pending_complete_consumed() {
        let state = AppState::default();
        let id = state
            .submit_batch(BatchRequest::Stampseudonym {
                items: vec![(0, A.into()), (1, String::new())],
            })
            .unwrap();
        assert_eq!(state.batch_status(&id), Some(BatchStatus::Pending));

        assert_eq!(state.retrieve_batch(&id).unwrap_err().actor, fault::NOT_FINISHED);
        assert_eq!(state.batch_status(&id), Some(BatchStatus::Complete));

        let result = state.retrieve_batch(&id).unwrap();
        assert_eq!(result.success.get(&0), Some(&state.stampseudonym(A, now()).unwrap()));
        assert!(result.failed.contains_key(&1));
        assert!(result.check_partition(&[0, 1]).is_ok());
        assert_eq!(state.batch_status(&id), Some(BatchStatus::Consumed));

        assert_eq!(
            state.retrieve_batch(&id).unwrap_err().actor,
            fault::CONTENT_ALREADY_RETRIEVED
        );
    }

    #[test]
    fn unknown_batch_identifier_is_rejected() {
        let state = AppState::default();
        assert_eq!(
            state.retrieve_batch("invalid_batch_identifier").unwrap_err().actor,
            INVALID_BATCH_IDENTIFIER
        );
        assert_eq!(state.batch_status("invalid_batch_identifier"), None);
    }

    #[test]
    fn empty_and_out_of_scope_batches_are_rejected_at_submit() {
        let state = AppState::default();
        assert_eq!(
            state
                .submit_batch(BatchRequest::Stampseudonym { items: vec![] })
                .unwrap_err()
                .actor,
            INVALID_BATCH
        );
        assert_eq!(
            state
                .submit_batch(BatchRequest::EckId {
                    items: vec![(0, "x".into())],
                    chain_id: chain(),
                    sector_id: "invalidsectorguid".into(),
                })
                .unwrap_err()
                .actor,
            INVALID_SECTOR
        );
    }

    #[test]
    fn expired_batch_is_removed() {
        let state = AppState::new(StubConfig {
            retention: Duration::ZERO,
            ..StubConfig::default()
        });
        let id = state
            .submit_batch(BatchRequest::Stampseudonym {
                items: vec![(0, A.into())],
            })
            .unwrap();
        assert_eq!(state.retrieve_batch(&id).unwrap_err().actor, fault::CONTENT_REMOVED);
        assert_eq!(state.batch_status(&id), Some(BatchStatus::Expired));
        assert_eq!(state.retrieve_batch(&id).unwrap_err().actor, fault::CONTENT_REMOVED);
    }

    #[test]
    fn stale_batches_are_evicted_on_next_submit() {
        let state = AppState::new(StubConfig {
            retention: Duration::ZERO,
            ..StubConfig::default()
        });
        let request = || BatchRequest::Stampseudonym {
            items: vec![(0, A.into())],
        };
        let first = state.submit_batch(request()).unwrap();
        let second = state.submit_batch(request()).unwrap();

        assert_eq!(state.batch_status(&first), None);
        assert_eq!(state.batch_status(&second), Some(BatchStatus::Pending));
        assert_eq!(
            state.retrieve_batch(&first).unwrap_err().actor,
            INVALID_BATCH_IDENTIFIER
        );
    }

    #[test]
    fn batches_within_retention_survive_eviction() {
        let state = AppState::default();
        let request = || BatchRequest::Stampseudonym {
            items: vec![(0, A.into())],
        };
        let first = state.submit_batch(request()).unwrap();
        state.submit_batch(request()).unwrap();
        assert_eq!(state.batch_status(&first), Some(BatchStatus::Pending));
    }

    #[test]
    fn rapid_polling_is_temporarily_blocked() {
        let state = AppState::new(StubConfig {
            not_finished_polls: 3,
            min_poll_interval: Duration::from_secs(3600),
            ..StubConfig::default()
        });
        let id = state
            .submit_batch(BatchRequest::Stampseudonym {
                items: vec![(0, A.into())],
            })
            .unwrap();
        assert_eq!(state.retrieve_batch(&id).unwrap_err().actor, fault::NOT_FINISHED);
        assert_eq!(state.retrieve_batch(&id).unwrap_err().actor, fault::TEMPORARY_BLOCKED);
    }

    #[test]
    fn daily_submission_limit_is_enforced() {
        let state = AppState::new(StubConfig {
            daily_submission_limit: 1,
            ..StubConfig::default()
        });
        let request = || BatchRequest::Stampseudonym {
            items: vec![(0, A.into())],
        };
        assert!(state.submit_batch(request()).is_ok());
        assert_eq!(
            state.submit_batch(request()).unwrap_err().actor,
            fault::LIMIT_DAILY_BATCH_SUBMISSIONS_EXCEEDED
        );
    }

    #[test]
    fn eck_id_batch_partitions_valid_and_invalid_items() {
        let state = AppState::new(StubConfig {
            not_finished_polls: 0,
            ..StubConfig::default()
        });
        let stamp = state.stampseudonym(A, now()).unwrap();
        let id = state
            .submit_batch(BatchRequest::EckId {
                items: vec![(0, stamp.clone()), (1, String::new())],
                chain_id: chain(),
                sector_id: sector(),
            })
            .unwrap();
        let result = state.retrieve_batch(&id).unwrap();
        assert_eq!(
            result.success.get(&0),
            Some(&state.eck_id(&stamp, &chain(), &sector()).unwrap())
        );
        assert_eq!(
            result.failed.get(&1).map(String::as_str),
            Some("stampseudonym is empty or malformed")
        );
    }
}
