//! Result types for cross-platform aggregation.

use serde::{Deserialize, Serialize};

use crate::model::{Listing, SourceId};

/// A platform that failed during aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFailure {
    /// Platform that failed
    pub source: SourceId,

    /// Machine-readable code (`PlatformError::code_str`)
    #[serde(default)]
    pub code: String,

    /// Error message
    pub error: String,

    /// Whether this was a timeout
    #[serde(default)]
    pub is_timeout: bool,
}

impl SourceFailure {
    pub fn from_error(source: SourceId, error: &crate::error::PlatformError) -> Self {
        Self {
            source,
            code: error.code_str().to_string(),
            error: error.to_string(),
            is_timeout: matches!(error, crate::error::PlatformError::Timeout { .. }),
        }
    }
}

/// Settled result of one `compare_across_sources` call.
///
/// Partial and even total platform failure is data, not an error: the
/// listing list is still well-formed (possibly empty) and `failures`
/// records what went missing. Callers who need to distinguish "every
/// platform failed" from "legitimately zero matches" check `all_failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareOutcome {
    /// The search query
    pub query: String,

    /// Surviving listings, ranked ascending by price and truncated to the
    /// caller's result cap.
    pub listings: Vec<Listing>,

    /// Platforms that responded (in registration order), whether or not any
    /// of their listings survived filtering.
    pub completed: Vec<SourceId>,

    /// Platforms that failed or timed out.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SourceFailure>,

    /// Total time for the fan-out barrier plus merge (ms).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl CompareOutcome {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            listings: Vec::new(),
            completed: Vec::new(),
            failures: Vec::new(),
            duration_ms: None,
        }
    }

    /// Record a platform that settled successfully. `listings` must already
    /// be filtered; merge order here fixes the ranking tie-break.
    pub fn add_completed(&mut self, source: SourceId, listings: Vec<Listing>) {
        self.completed.push(source);
        self.listings.extend(listings);
    }

    pub fn add_failure(&mut self, failure: SourceFailure) {
        self.failures.push(failure);
    }

    /// Whether at least one platform failed.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Whether every queried platform failed.
    pub fn all_failed(&self) -> bool {
        self.completed.is_empty() && !self.failures.is_empty()
    }
}
