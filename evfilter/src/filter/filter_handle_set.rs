use crate::errors::EvFilterResult;
use crate::event::EventBean;
use crate::filter::{EventEvaluatorProvider, FilterHandle};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeSet;

/// Evaluator that reports every handle registered with it.
///
/// Statements that share an identical filter constant share one entry in an
/// index; that entry's evaluator is a `FilterHandleSet` holding all of their
/// handles. The set has its own lock because handles are added and removed
/// while holding only the index's read lock.
#[derive(Default)]
pub struct FilterHandleSet {
    handles: RwLock<BTreeSet<FilterHandle>>,
}

impl FilterHandleSet {
    pub fn new() -> Self {
        FilterHandleSet {
            handles: RwLock::new(BTreeSet::new()),
        }
    }

    /// Adds a handle; returns `false` if it was already present.
    pub fn add(&self, handle: FilterHandle) -> bool {
        self.handles.write().insert(handle)
    }

    /// Removes a handle; returns `false` if it was not present.
    pub fn remove(&self, handle: &FilterHandle) -> bool {
        self.handles.write().remove(handle)
    }

    pub fn contains(&self, handle: &FilterHandle) -> bool {
        self.handles.read().contains(handle)
    }

    pub fn len(&self) -> usize {
        self.handles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.read().is_empty()
    }
}

impl EventEvaluatorProvider for FilterHandleSet {
    fn match_event(&self, _event: &EventBean, matches: &mut Vec<FilterHandle>) -> EvFilterResult<()> {
        matches.extend(self.handles.read().iter().copied());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let set = FilterHandleSet::new();
        assert!(set.is_empty());
        assert!(set.add(FilterHandle::new(1, 0)));
        assert!(!set.add(FilterHandle::new(1, 0)));
        assert!(set.add(FilterHandle::new(2, 0)));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&FilterHandle::new(2, 0)));

        assert!(set.remove(&FilterHandle::new(1, 0)));
        assert!(!set.remove(&FilterHandle::new(1, 0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_match_appends_all_handles() {
        let set = FilterHandleSet::new();
        set.add(FilterHandle::new(2, 1));
        set.add(FilterHandle::new(1, 1));

        let mut matches = vec![FilterHandle::new(9, 9)];
        set.match_event(&EventBean::new("E"), &mut matches).unwrap();
        assert_eq!(
            matches,
            vec![
                FilterHandle::new(9, 9),
                FilterHandle::new(1, 1),
                FilterHandle::new(2, 1)
            ]
        );
    }
}
