//! Credential records and the presentation-facing search state.
//!
//! `SearchState` is never edited field by field. Every change goes through
//! [`SearchState::apply`], which takes the previous snapshot and a
//! [`Transition`] and returns the next snapshot. Settlements carry the
//! generation of the query that produced them; a settlement whose generation
//! is no longer current leaves the state untouched.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};

/// One discovered login entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CredentialRecord {
    /// Login name, empty if the entry omitted it.
    pub login: String,
    /// Password, empty if the entry omitted it.
    pub password: String,
    /// Pre-formatted success rate text (e.g. "68%").
    pub success_rate: String,
}

impl CredentialRecord {
    pub fn new(login: impl Into<String>, password: impl Into<String>, success_rate: impl Into<String>) -> Self {
        Self { login: login.into(), password: password.into(), success_rate: success_rate.into() }
    }
}

/// User-visible failure indicator for the latest query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for SearchFailure {
    fn from(err: &Error) -> Self {
        Self { kind: err.kind(), message: err.to_string() }
    }
}

/// Snapshot published to the presentation layer after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    /// True exactly while the fetch for the most recently issued query is outstanding.
    pub loading: bool,
    /// Records in document order.
    pub results: Vec<CredentialRecord>,
    /// Domain text of the most recently issued query.
    pub query: Option<String>,
    /// Sequence number of the most recently issued query (0 before the first).
    pub generation: u64,
    /// Failure of the most recently issued query, if it failed.
    pub error: Option<SearchFailure>,
    /// RFC 3339 timestamp of the last applied settlement.
    pub settled_at: Option<String>,
}

/// A delta applied to the previous [`SearchState`].
#[derive(Debug, Clone)]
pub enum Transition {
    /// A new query was issued and supersedes any in-flight one.
    Submitted { generation: u64, query: String },
    /// A query finished with extracted records.
    Settled { generation: u64, results: Vec<CredentialRecord>, at: DateTime<Utc> },
    /// A query finished with an error.
    Failed { generation: u64, failure: SearchFailure, at: DateTime<Utc> },
}

impl SearchState {
    /// Whether a settlement for `generation` would be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Whether the query with `generation` has either settled or been superseded.
    pub fn is_done(&self, generation: u64) -> bool {
        self.generation > generation || (self.generation == generation && !self.loading)
    }

    /// Compute the next state from this one and a delta.
    ///
    /// Submissions with a generation not newer than the current one, and
    /// settlements for anything other than the current generation, return an
    /// unchanged copy.
    pub fn apply(&self, transition: Transition) -> SearchState {
        match transition {
            Transition::Submitted { generation, query } if generation > self.generation => SearchState {
                loading: true,
                results: Vec::new(),
                query: Some(query),
                generation,
                error: None,
                settled_at: self.settled_at.clone(),
            },
            Transition::Settled { generation, results, at } if self.is_current(generation) => SearchState {
                loading: false,
                results,
                error: None,
                settled_at: Some(at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
                ..self.clone()
            },
            Transition::Failed { generation, failure, at } if self.is_current(generation) => SearchState {
                loading: false,
                results: Vec::new(),
                error: Some(failure),
                settled_at: Some(at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}
