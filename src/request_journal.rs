//! Request journal
//!
//! Public face of the journal. Every operation checks the fixed `JournalMode`
//! before touching the store. When the journal is disabled:
//!
//! - identity lookups and removals fail with `JournalError::Disabled`,
//! - counts return `-1`,
//! - filtered lists come back empty,
//! - ingestion and reset do nothing.

use std::num::NonZeroUsize;
use std::sync::Arc;

use uuid::Uuid;

use crate::errors::{JournalError, JournalResult};
use crate::journal_mode::JournalMode;
use crate::journal_store::JournalStore;
use crate::metadata_pattern::MetadataPredicate;
use crate::request_pattern::RequestPredicate;
use crate::serve_event::ServeEvent;
use crate::verification::{CountMatchingStrategy, FindRequestsResult, VerificationResult};

pub struct RequestJournal {
    mode: JournalMode,
    store: JournalStore,
}

impl RequestJournal {
    pub fn new(mode: JournalMode, max_entries: Option<NonZeroUsize>) -> Self {
        let store = match mode {
            JournalMode::Enabled => JournalStore::with_capacity(max_entries),
            JournalMode::Disabled => JournalStore::unbounded(),
        };
        tracing::info!(
            mode = %mode,
            max_entries = store.capacity().map(NonZeroUsize::get),
            "Request journal created"
        );
        Self { mode, store }
    }

    /// Enabled journal without an entry limit
    pub fn unbounded() -> Self {
        Self::new(JournalMode::Enabled, None)
    }

    pub fn bounded(max_entries: NonZeroUsize) -> Self {
        Self::new(JournalMode::Enabled, Some(max_entries))
    }

    pub fn disabled() -> Self {
        Self::new(JournalMode::Disabled, None)
    }

    pub fn mode(&self) -> JournalMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.mode.is_enabled()
    }

    pub fn max_entries(&self) -> Option<NonZeroUsize> {
        self.store.capacity()
    }

    fn require_enabled(&self, operation: &str) -> JournalResult<()> {
        if self.mode.is_enabled() {
            Ok(())
        } else {
            tracing::warn!(operation, "Rejected operation on disabled request journal");
            Err(JournalError::disabled(operation))
        }
    }

    /// Records one completed exchange
    pub fn request_received(&self, event: ServeEvent) {
        if !self.mode.is_enabled() {
            tracing::trace!(event_id = %event.id, "Request journal disabled, dropping serve event");
            return;
        }
        self.store.append(Arc::new(event));
    }

    pub fn reset(&self) {
        if self.mode.is_enabled() {
            let cleared = self.store.clear();
            tracing::debug!(cleared, "Request journal reset");
        }
    }

    pub fn get_all_serve_events(&self) -> JournalResult<Vec<Arc<ServeEvent>>> {
        self.require_enabled("get_all_serve_events")?;
        Ok(self.store.snapshot())
    }

    /// `Ok(None)` for an id the journal does not hold, including evicted ones
    pub fn get_serve_event(&self, id: Uuid) -> JournalResult<Option<Arc<ServeEvent>>> {
        self.require_enabled("get_serve_event")?;
        Ok(self.store.get(id))
    }

    pub fn remove_event(&self, id: Uuid) -> JournalResult<Option<Arc<ServeEvent>>> {
        self.require_enabled("remove_event")?;
        Ok(self.store.remove_where(|event| event.id == id).into_iter().next())
    }

    pub fn remove_events_matching<P>(&self, pattern: &P) -> JournalResult<Vec<Arc<ServeEvent>>>
    where
        P: RequestPredicate + ?Sized,
    {
        self.require_enabled("remove_events_matching")?;
        Ok(self.store.remove_where(|event| pattern.matches(&event.request)))
    }

    /// Removes events whose serving stub carries metadata matching `pattern`.
    /// Unmatched requests have no stub and are never removed here.
    pub fn remove_serve_events_for_stubs_matching_metadata<M>(
        &self,
        pattern: &M,
    ) -> JournalResult<Vec<Arc<ServeEvent>>>
    where
        M: MetadataPredicate + ?Sized,
    {
        self.require_enabled("remove_serve_events_for_stubs_matching_metadata")?;
        Ok(self.store.remove_where(|event| {
            event
                .stub_metadata()
                .map(|metadata| pattern.matches(metadata))
                .unwrap_or(false)
        }))
    }

    /// Number of matching requests, or `-1` when the journal is disabled
    pub fn count_requests_matching<P>(&self, pattern: &P) -> i64
    where
        P: RequestPredicate + ?Sized,
    {
        if !self.mode.is_enabled() {
            return -1;
        }
        let count = self
            .store
            .snapshot()
            .iter()
            .filter(|event| pattern.matches(&event.request))
            .count();
        i64::try_from(count).unwrap_or(i64::MAX)
    }

    /// Matching events oldest first; empty when the journal is disabled
    pub fn get_requests_matching<P>(&self, pattern: &P) -> Vec<Arc<ServeEvent>>
    where
        P: RequestPredicate + ?Sized,
    {
        if !self.mode.is_enabled() {
            return Vec::new();
        }
        self.store
            .snapshot()
            .into_iter()
            .filter(|event| pattern.matches(&event.request))
            .collect()
    }

    pub fn find_unmatched_requests(&self) -> Vec<Arc<ServeEvent>> {
        if !self.mode.is_enabled() {
            return Vec::new();
        }
        self.store
            .snapshot()
            .into_iter()
            .filter(|event| !event.was_matched())
            .collect()
    }

    pub fn verification_result<P>(&self, pattern: &P) -> VerificationResult
    where
        P: RequestPredicate + ?Sized,
    {
        if !self.mode.is_enabled() {
            return VerificationResult::journal_disabled();
        }
        VerificationResult::with_count(self.count_requests_matching(pattern))
    }

    pub fn find_requests_result<P>(&self, pattern: &P) -> FindRequestsResult
    where
        P: RequestPredicate + ?Sized,
    {
        if !self.mode.is_enabled() {
            return FindRequestsResult::journal_disabled();
        }
        let requests = self
            .get_requests_matching(pattern)
            .iter()
            .map(|event| event.request.clone())
            .collect();
        FindRequestsResult::with_requests(requests)
    }

    /// Fails unless the number of matching requests satisfies `strategy`
    pub fn verify<P>(&self, strategy: CountMatchingStrategy, pattern: &P) -> JournalResult<()>
    where
        P: RequestPredicate + ?Sized,
    {
        self.require_enabled("verify")?;
        let actual = self.count_requests_matching(pattern);
        if strategy.matches(actual) {
            Ok(())
        } else {
            Err(JournalError::verification(strategy.to_string(), actual))
        }
    }

    /// Number of held events; always 0 when disabled
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for RequestJournal {
    fn default() -> Self {
        Self::unbounded()
    }
}
