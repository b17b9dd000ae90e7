//! Search controller: owns the query lifecycle and the published state.
//!
//! ### Submission
//! - `submit_query` never drops a query; a new one supersedes whatever is in flight.
//! - Loading is set and results cleared synchronously, before any I/O.
//! - The fetch, decode, parse and extract steps run on a spawned task.
//!
//! ### Settlement
//! - Each query carries a generation from a monotonically increasing counter.
//! - Only the settlement of the most recently issued generation is applied;
//!   anything older is discarded, so the last submitted query wins.
//! - Failures end loading, keep results empty and set the error indicator.
//!
//! ### Publication
//! - State lives in a `tokio::sync::watch` channel; the controller is the only writer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use findlogin_core::{AppConfig, CredentialRecord, Error, SearchFailure, SearchState, Transition};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::extract::{CredentialExtractor, ScraperExtractor};
use crate::fetch::{FetchClient, FetchConfig, Fetcher, query_url};

/// Handle to one submitted query.
///
/// Dropping it does not cancel the query.
#[derive(Debug)]
pub struct QueryHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl QueryHandle {
    /// Sequence number assigned to this query.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the query's task to finish, whether or not its outcome was applied.
    pub async fn settled(self) {
        if let Err(e) = self.task.await {
            tracing::error!(generation = self.generation, "query task did not complete: {}", e);
        }
    }
}

struct Inner {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn CredentialExtractor>,
    base_url: String,
    issued: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl Inner {
    /// Apply a transition and notify subscribers if it changed anything.
    fn publish(&self, transition: Transition) -> bool {
        self.state.send_if_modified(|state| {
            let next = state.apply(transition);
            if next == *state {
                return false;
            }
            *state = next;
            true
        })
    }

    async fn run(&self, domain: &str) -> Result<Vec<CredentialRecord>, Error> {
        let url = query_url(&self.base_url, domain).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let html = self.fetcher.fetch_text(&url).await?;
        self.extractor.extract(&html)
    }

    fn settle(&self, generation: u64, outcome: Result<Vec<CredentialRecord>, Error>) {
        let at = Utc::now();
        let transition = match outcome {
            Ok(results) => {
                tracing::debug!(generation, count = results.len(), "query settled");
                Transition::Settled { generation, results, at }
            }
            Err(e) => {
                tracing::warn!(generation, kind = ?e.kind(), "query failed: {}", e);
                Transition::Failed { generation, failure: SearchFailure::from(&e), at }
            }
        };

        if !self.publish(transition) {
            tracing::debug!(generation, latest = self.issued.load(Ordering::SeqCst), "discarding stale settlement");
        }
    }
}

/// Owns the query lifecycle for one search session.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("base_url", &self.inner.base_url)
            .field("issued", &self.inner.issued.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl SearchController {
    /// Create a controller that fetches through `fetcher` and extracts with [`ScraperExtractor`].
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: impl Into<String>) -> Self {
        Self::with_extractor(fetcher, Arc::new(ScraperExtractor), base_url)
    }

    pub fn with_extractor(
        fetcher: Arc<dyn Fetcher>, extractor: Arc<dyn CredentialExtractor>, base_url: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                fetcher,
                extractor,
                base_url: base_url.into(),
                issued: AtomicU64::new(0),
                state,
            }),
        }
    }

    /// Create a controller backed by a real HTTP client built from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig::from(config))?;
        Ok(Self::new(Arc::new(client), config.base_url.clone()))
    }

    /// Submit a domain query.
    ///
    /// Must be called from within a tokio runtime. The returned handle may be
    /// dropped; the query keeps running and its outcome is published if it is
    /// still the latest.
    pub fn submit_query(&self, domain: impl Into<String>) -> QueryHandle {
        let domain = domain.into();
        let generation = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.publish(Transition::Submitted { generation, query: domain.clone() });
        tracing::debug!(generation, domain = %domain, "query submitted");

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let outcome = inner.run(&domain).await;
            inner.settle(generation, outcome);
        });

        QueryHandle { generation, task }
    }

    /// Current snapshot.
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Wait until the query with `generation` has settled or been superseded,
    /// then return the snapshot at that point.
    pub async fn wait_for(&self, generation: u64) -> SearchState {
        let mut rx = self.subscribe();
        match rx.wait_for(|state| state.is_done(generation)).await {
            Ok(state) => (*state).clone(),
            Err(_) => self.state(),
        }
    }
}
