use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Set of canonical addresses already dispatched for fetching
///
/// [`VisitedRegistry::try_claim`] is the only deduplication guard of a traversal. The
/// membership test and the insertion happen under one lock, so two tasks discovering the
/// same address at the same time can never both win the claim.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    claimed: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims an address for fetching
    ///
    /// # Returns
    ///
    /// * `true` - The address was unclaimed and now belongs to the caller, who must
    ///   dispatch exactly one fetch for it
    /// * `false` - Another caller already claimed it; no fetch may be dispatched
    pub fn try_claim(&self, url: &Url) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.as_str().to_string())
    }

    /// Whether an address has been claimed
    ///
    /// Informational only. Deciding to dispatch from this answer is a check-then-act race;
    /// use [`VisitedRegistry::try_claim`].
    pub fn has_been_claimed(&self, url: &Url) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url.as_str())
    }

    /// Number of claimed addresses
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
