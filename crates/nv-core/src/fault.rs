//! # Remote Fault Taxonomy
//!
//! The issuance service reports failures as named faults. The fault actor
//! name decides how a caller reacts:
//!
//! | Actor | Class |
//! |-------|-------|
//! | `NotFinishedException` | Transient: poll again |
//! | `TemporaryBlockedException` | Terminal |
//! | `ContentAlreadyRetrievedException` | Terminal |
//! | `ContentRemovedException` | Terminal |
//! | `LimitDailyBatchSubmissionsExceededException` | Terminal |
//! | anything else | Rejected: validation of the request failed |
//!
//! Only `NotFinished` is ever retried, and only while polling a batch.

use std::fmt;

/// Actor name reported while a batch is still being processed.
pub const NOT_FINISHED: &str = "NotFinishedException";
/// Actor name reported when the caller is rate limited.
pub const TEMPORARY_BLOCKED: &str = "TemporaryBlockedException";
/// Actor name reported when a batch result was already retrieved.
pub const CONTENT_ALREADY_RETRIEVED: &str = "ContentAlreadyRetrievedException";
/// Actor name reported when a batch result was purged.
pub const CONTENT_REMOVED: &str = "ContentRemovedException";
/// Actor name reported when the daily submission quota is used up.
pub const LIMIT_DAILY_BATCH_SUBMISSIONS_EXCEEDED: &str =
    "LimitDailyBatchSubmissionsExceededException";

/// How a caller must react to a [`RemoteFault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultClass {
    /// The batch is still processing; polling may continue.
    Transient,
    /// Quota, consumption or expiry. The batch is abandoned.
    Terminal,
    /// The service rejected the request arguments.
    Rejected,
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Terminal => write!(f, "terminal"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A fault reported by the issuance service, with its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFault {
    NotFinished(String),
    TemporaryBlocked(String),
    ContentAlreadyRetrieved(String),
    ContentRemoved(String),
    LimitDailyBatchSubmissionsExceeded(String),
    /// Validation faults and any actor this client does not recognize.
    Other { actor: String, message: String },
}

impl RemoteFault {
    /// Classify a fault by its actor name.
    pub fn from_actor(actor: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match actor {
            NOT_FINISHED => Self::NotFinished(message),
            TEMPORARY_BLOCKED => Self::TemporaryBlocked(message),
            CONTENT_ALREADY_RETRIEVED => Self::ContentAlreadyRetrieved(message),
            CONTENT_REMOVED => Self::ContentRemoved(message),
            LIMIT_DAILY_BATCH_SUBMISSIONS_EXCEEDED => {
                Self::LimitDailyBatchSubmissionsExceeded(message)
            }
            other => Self::Other {
                actor: other.to_string(),
                message,
            },
        }
    }

    /// The actor name as it appears on the wire.
    pub fn actor(&self) -> &str {
        match self {
            Self::NotFinished(_) => NOT_FINISHED,
            Self::TemporaryBlocked(_) => TEMPORARY_BLOCKED,
            Self::ContentAlreadyRetrieved(_) => CONTENT_ALREADY_RETRIEVED,
            Self::ContentRemoved(_) => CONTENT_REMOVED,
            Self::LimitDailyBatchSubmissionsExceeded(_) => LIMIT_DAILY_BATCH_SUBMISSIONS_EXCEEDED,
            Self::Other { actor, .. } => actor,
        }
    }

    /// The human-readable fault message.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFinished(m)
            | Self::TemporaryBlocked(m)
            | Self::ContentAlreadyRetrieved(m)
            | Self::ContentRemoved(m)
            | Self::LimitDailyBatchSubmissionsExceeded(m) => m,
            Self::Other { message, .. } => message,
        }
    }

    pub fn class(&self) -> FaultClass {
        match self {
            Self::NotFinished(_) => FaultClass::Transient,
            Self::TemporaryBlocked(_)
            | Self::ContentAlreadyRetrieved(_)
            | Self::ContentRemoved(_)
            | Self::LimitDailyBatchSubmissionsExceeded(_) => FaultClass::Terminal,
            Self::Other { .. } => FaultClass::Rejected,
        }
    }

    /// Whether polling may continue after this fault.
    pub fn is_retryable(&self) -> bool {
        self.class() == FaultClass::Transient
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message().is_empty() {
            write!(f, "{}", self.actor())
        } else {
            write!(f, "{}: {}", self.actor(), self.message())
        }
    }
}
