//! Verification results
//!
//! Shapes handed back to callers that assert on the journal. Both results carry
//! a `request_journal_disabled` flag so a caller can tell "nothing matched" apart
//! from "nothing was recorded".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::serve_event::LoggedRequest;

/// Count of requests matching a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// `-1` when the journal is disabled
    pub count: i64,
    pub request_journal_disabled: bool,
}

impl VerificationResult {
    pub fn with_count(count: i64) -> Self {
        Self {
            count,
            request_journal_disabled: false,
        }
    }

    pub fn journal_disabled() -> Self {
        Self {
            count: -1,
            request_journal_disabled: true,
        }
    }
}

/// Requests matching a pattern, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindRequestsResult {
    pub requests: Vec<LoggedRequest>,
    pub request_journal_disabled: bool,
}

impl FindRequestsResult {
    pub fn with_requests(requests: Vec<LoggedRequest>) -> Self {
        Self {
            requests,
            request_journal_disabled: false,
        }
    }

    pub fn journal_disabled() -> Self {
        Self {
            requests: Vec::new(),
            request_journal_disabled: true,
        }
    }
}

/// Expected number of matching requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMatchingStrategy {
    Exactly(i64),
    LessThan(i64),
    LessThanOrExactly(i64),
    MoreThan(i64),
    MoreThanOrExactly(i64),
}

impl CountMatchingStrategy {
    pub fn matches(&self, actual: i64) -> bool {
        match *self {
            Self::Exactly(n) => actual == n,
            Self::LessThan(n) => actual < n,
            Self::LessThanOrExactly(n) => actual <= n,
            Self::MoreThan(n) => actual > n,
            Self::MoreThanOrExactly(n) => actual >= n,
        }
    }
}

impl fmt::Display for CountMatchingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::LessThan(n) => write!(f, "less than {n}"),
            Self::LessThanOrExactly(n) => write!(f, "less than or exactly {n}"),
            Self::MoreThan(n) => write!(f, "more than {n}"),
            Self::MoreThanOrExactly(n) => write!(f, "more than or exactly {n}"),
        }
    }
}
