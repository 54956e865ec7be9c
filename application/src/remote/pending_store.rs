//! Pending-result store for non-suspending invocations.
//!
//! Results posted by the remote-delivery path wait here until the matching
//! invocation runs. A result may arrive before its invocation exists; it is
//! held until an invocation with that call id consumes it. Each call id has
//! at most one unconsumed entry; a second insert for the same id overwrites
//! the first. Ids that were consumed or forgotten are retired and later
//! results for them are dropped.
//!
//! Insert and consume-and-remove both happen under one lock, so a reader
//! never observes a half-written entry.

use crate::config::MatchPolicy;
use bridge_domain::{CallId, ToolResult};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// What happened to an inserted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Stored,
    /// An unconsumed entry for the same id was replaced.
    Overwrote,
    /// The id was already consumed or forgotten; the result was dropped.
    Unknown,
}

#[derive(Default)]
struct StoreInner {
    expected: HashSet<CallId>,
    /// Consumed or forgotten ids.
    retired: HashSet<CallId>,
    /// Insertion order is the drain order under [`MatchPolicy::Any`].
    entries: Vec<(CallId, ToolResult)>,
}

pub struct PendingResultStore {
    policy: MatchPolicy,
    inner: Mutex<StoreInner>,
}

impl PendingResultStore {
    pub fn new(policy: MatchPolicy) -> Self {
        if policy == MatchPolicy::Any {
            warn!(
                "Pending-result store uses any-match; results are only correct with a single outstanding call"
            );
        }
        Self {
            policy,
            inner: Mutex::new(StoreInner::default()),
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark a call id as outstanding.
    ///
    /// Returns `false` when the id is already outstanding. Reusing a retired
    /// id starts it afresh.
    pub fn expect(&self, call_id: &CallId) -> bool {
        let mut inner = self.lock();
        if !inner.expected.insert(call_id.clone()) {
            warn!("Call id {} is already outstanding", call_id);
            return false;
        }
        inner.retired.remove(call_id);
        true
    }

    /// Post a result for a call id.
    pub fn insert(&self, call_id: &CallId, result: ToolResult) -> StoreOutcome {
        let mut inner = self.lock();

        if inner.retired.contains(call_id) {
            warn!("Dropping result for settled call id {}", call_id);
            return StoreOutcome::Unknown;
        }

        if let Some(slot) = inner.entries.iter_mut().find(|(id, _)| id == call_id) {
            warn!("Overwriting unconsumed result for call id {}", call_id);
            slot.1 = result;
            return StoreOutcome::Overwrote;
        }

        if inner.expected.contains(call_id) {
            debug!("Stored result for call id {}", call_id);
        } else {
            debug!("Holding result for call id {} ahead of its invocation", call_id);
        }
        inner.entries.push((call_id.clone(), result));
        StoreOutcome::Stored
    }

    /// Consume a result for `call_id`.
    ///
    /// Under [`MatchPolicy::Exact`] only the entry stored under `call_id`
    /// matches. Under [`MatchPolicy::Any`] the oldest entry is drained
    /// whatever id it was stored under. Either way `call_id` and the
    /// consumed entry's id are retired.
    pub fn take(&self, call_id: &CallId) -> Option<ToolResult> {
        let mut inner = self.lock();
        inner.expected.remove(call_id);
        inner.retired.insert(call_id.clone());

        let position = match self.policy {
            MatchPolicy::Exact => inner.entries.iter().position(|(id, _)| id == call_id),
            MatchPolicy::Any => (!inner.entries.is_empty()).then_some(0),
        }?;

        let (stored_id, result) = inner.entries.remove(position);
        if &stored_id != call_id {
            debug!("Call {} consumed result stored under {}", call_id, stored_id);
            inner.expected.remove(&stored_id);
            inner.retired.insert(stored_id);
        }
        Some(result)
    }

    /// Abandon a call id and discard anything stored for it.
    pub fn forget(&self, call_id: &CallId) {
        let mut inner = self.lock();
        inner.expected.remove(call_id);
        inner.retired.insert(call_id.clone());
        inner.entries.retain(|(id, _)| id != call_id);
    }

    pub fn is_expected(&self, call_id: &CallId) -> bool {
        self.lock().expected.contains(call_id)
    }

    /// Number of unconsumed results.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CallId {
        CallId::new(s)
    }

    #[test]
    fn test_exact_take_by_id() {
        let store = PendingResultStore::new(MatchPolicy::Exact);
        store.expect(&id("a"));
        store.expect(&id("b"));

        assert_eq!(store.insert(&id("b"), ToolResult::success("for b")), StoreOutcome::Stored);
        assert_eq!(store.insert(&id("a"), ToolResult::success("for a")), StoreOutcome::Stored);

        assert_eq!(store.take(&id("a")).unwrap().llm_content, "for a");
        assert_eq!(store.take(&id("a")), None);
        assert_eq!(store.take(&id("b")).unwrap().llm_content, "for b");
        assert!(store.is_empty());
    }

    #[test]
    fn test_result_posted_before_expect_is_held() {
        let store = PendingResultStore::new(MatchPolicy::Exact);

        assert_eq!(store.insert(&id("abc"), ToolResult::success("early")), StoreOutcome::Stored);
        assert!(!store.is_expected(&id("abc")));
        assert_eq!(store.len(), 1);

        store.expect(&id("abc"));
        assert_eq!(store.take(&id("abc")).unwrap().llm_content, "early");
        assert!(store.is_empty());
    }

    #[test]
    fn test_exact_other_id_does_not_match() {
        let store = PendingResultStore::new(MatchPolicy::Exact);
        store.expect(&id("a"));

        assert_eq!(store.insert(&id("zzz"), ToolResult::success("stray")), StoreOutcome::Stored);
        assert_eq!(store.take(&id("a")), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_any_drains_early_result() {
        let store = PendingResultStore::new(MatchPolicy::Any);

        store.insert(&id("zzz"), ToolResult::success("early"));
        store.expect(&id("a"));
        assert_eq!(store.take(&id("a")).unwrap().llm_content, "early");

        // Both the consuming id and the drained id are retired
        assert_eq!(store.insert(&id("zzz"), ToolResult::success("late")), StoreOutcome::Unknown);
        assert_eq!(store.insert(&id("a"), ToolResult::success("late")), StoreOutcome::Unknown);
    }

    #[test]
    fn test_second_insert_overwrites() {
        let store = PendingResultStore::new(MatchPolicy::Exact);
        store.expect(&id("a"));

        store.insert(&id("a"), ToolResult::success("first"));
        assert_eq!(store.insert(&id("a"), ToolResult::success("second")), StoreOutcome::Overwrote);
        assert_eq!(store.len(), 1);
        assert_eq!(store.take(&id("a")).unwrap().llm_content, "second");
    }

    #[test]
    fn test_any_drains_oldest_regardless_of_id() {
        let store = PendingResultStore::new(MatchPolicy::Any);
        store.expect(&id("a"));
        store.expect(&id("b"));
        store.insert(&id("b"), ToolResult::success("from b"));

        let taken = store.take(&id("a")).unwrap();
        assert_eq!(taken.llm_content, "from b");
        assert!(!store.is_expected(&id("a")));
        assert!(!store.is_expected(&id("b")));

        // Late delivery for the drained id no longer lands
        assert_eq!(store.insert(&id("b"), ToolResult::success("late")), StoreOutcome::Unknown);
    }

    #[test]
    fn test_consumed_id_rejects_late_insert() {
        let store = PendingResultStore::new(MatchPolicy::Exact);
        store.expect(&id("a"));
        store.insert(&id("a"), ToolResult::success("ok"));
        store.take(&id("a"));

        assert_eq!(store.insert(&id("a"), ToolResult::success("retry")), StoreOutcome::Unknown);
    }

    #[test]
    fn test_forget_discards_entry() {
        let store = PendingResultStore::new(MatchPolicy::Exact);
        store.expect(&id("a"));
        store.insert(&id("a"), ToolResult::success("ok"));
        store.forget(&id("a"));

        assert!(store.is_empty());
        assert!(!store.is_expected(&id("a")));
        assert_eq!(store.insert(&id("a"), ToolResult::success("late")), StoreOutcome::Unknown);
        assert!(store.is_empty());
    }

    #[test]
    fn test_expect_rejects_outstanding_id() {
        let store = PendingResultStore::new(MatchPolicy::Exact);
        assert!(store.expect(&id("a")));
        assert!(!store.expect(&id("a")));

        store.take(&id("a"));
        assert!(store.expect(&id("a")));
        assert_eq!(store.insert(&id("a"), ToolResult::success("fresh")), StoreOutcome::Stored);
    }
}
