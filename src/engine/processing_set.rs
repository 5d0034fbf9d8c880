use dashmap::DashSet;
use std::sync::Arc;

/// Tracks `IntentId`s currently under analysis or execution so that
/// at-least-once event delivery and polling re-discovery collapse to at
/// most one concurrent pipeline per intent.
#[derive(Clone, Default)]
pub struct ProcessingSet {
    inner: Arc<DashSet<String>>,
}

impl ProcessingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to claim `id`. Returns `None` if already claimed (caller
    /// should exit as a no-op); otherwise returns a guard that releases the
    /// claim on drop, guaranteeing removal on every exit path including
    /// panics.
    pub fn try_claim(&self, id: &str) -> Option<ProcessingGuard> {
        if self.inner.insert(id.to_string()) {
            Some(ProcessingGuard {
                set: self.inner.clone(),
                id: id.to_string(),
            })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// RAII scoped-release handle: removes its id from the set on drop,
/// regardless of how the holding task exits.
pub struct ProcessingGuard {
    set: Arc<DashSet<String>>,
    id: String,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_rejected_while_first_is_held() {
        let set = ProcessingSet::new();
        let guard = set.try_claim("intent-1");
        assert!(guard.is_some());
        assert!(set.try_claim("intent-1").is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn dropping_the_guard_releases_the_id() {
        let set = ProcessingSet::new();
        {
            let _guard = set.try_claim("intent-1").unwrap();
            assert_eq!(set.len(), 1);
        }
        assert!(set.is_empty());
        assert!(set.try_claim("intent-1").is_some());
    }

    #[test]
    fn distinct_ids_claim_independently() {
        let set = ProcessingSet::new();
        let _g1 = set.try_claim("a").unwrap();
        let _g2 = set.try_claim("b").unwrap();
        assert_eq!(set.len(), 2);
    }
}
