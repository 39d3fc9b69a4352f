//! Debounced search that never reports a stale answer.
//!
//! Every submission takes a new generation number. A submission whose
//! generation is no longer the latest, either after the debounce delay or
//! after its request returns, is reported as superseded instead of
//! overwriting the newer query's results.

use crate::error::MetadataError;
use crate::traits::MovieMetadata;
use cinenote_models::MovieSearchResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub enum SearchOutcome {
    Results(Vec<MovieSearchResult>),
    Failed(MetadataError),
    /// A newer query was submitted while this one was pending
    Superseded,
}

pub struct SearchSession {
    metadata: Arc<dyn MovieMetadata>,
    debounce: Duration,
    generation: AtomicU64,
}

impl SearchSession {
    pub fn new(metadata: Arc<dyn MovieMetadata>, debounce: Duration) -> Self {
        Self {
            metadata,
            debounce,
            generation: AtomicU64::new(0),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Drop whatever is pending, e.g. when the query box is cleared
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn submit(&self, query: &str, year_hint: Option<&str>) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }
        if !self.is_current(generation) {
            debug!("Search {:?} superseded before sending", query);
            return SearchOutcome::Superseded;
        }

        let result = self.metadata.search(query, year_hint).await;
        if !self.is_current(generation) {
            debug!("Search {:?} superseded in flight", query);
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(results) => SearchOutcome::Results(results),
            Err(e) => SearchOutcome::Failed(e),
        }
    }
}
