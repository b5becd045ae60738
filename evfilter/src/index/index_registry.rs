use crate::errors::{ErrorKind, EvFilterError, EvFilterResult};
use crate::event::EventBean;
use crate::filter::{FilterHandle, FilterOperator};
use crate::index::{FilterIndexFactory, FilterParamIndex, FilterParamIndexProvider, Lookupable};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of the live filter indexes, one per operator and lookupable.
///
/// Indexes are created on first use and shared by every caller asking for
/// the same operator and lookupable. Clones share the same registry.
///
/// Registration and removal of filters go through [`write_index`] and
/// [`write_existing_index`], which hold the registry lock for as long as the
/// index is written. [`release`] needs the registry lock exclusively, so it
/// never drops an index while a filter is being put into it. The lock order
/// is always registry first, then index.
///
/// [`write_index`]: FilterIndexRegistry::write_index
/// [`write_existing_index`]: FilterIndexRegistry::write_existing_index
/// [`release`]: FilterIndexRegistry::release
///
/// # Examples
///
/// ```
/// use evfilter::index::{FilterIndexFactory, FilterIndexRegistry, FilterSpecLookupable, Lookupable};
/// use evfilter::filter::FilterOperator;
///
/// let registry = FilterIndexRegistry::new(FilterIndexFactory::new());
/// let lookupable: Lookupable = FilterSpecLookupable::property("symbol").into();
/// let index = registry.get_or_create(FilterOperator::Equal, &lookupable).unwrap();
/// let again = registry.get_or_create(FilterOperator::Equal, &lookupable).unwrap();
/// assert!(index.ptr_eq(&again));
/// assert_eq!(registry.index_count(), 1);
/// ```
#[derive(Clone)]
pub struct FilterIndexRegistry {
    factory: Arc<FilterIndexFactory>,
    indexes: Arc<RwLock<HashMap<String, FilterParamIndex>>>,
}

fn registry_key(operator: FilterOperator, lookupable: &Lookupable) -> String {
    format!("{}|{}", operator, lookupable.index_key())
}

impl FilterIndexRegistry {
    pub fn new(factory: FilterIndexFactory) -> Self {
        FilterIndexRegistry {
            factory: Arc::new(factory),
            indexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the index for `operator` and `lookupable`, creating it if it
    /// doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Propagates the factory error if no plugin serves `operator` or the
    /// plugin rejects the lookupable. Nothing is registered in that case.
    pub fn get_or_create(&self, operator: FilterOperator, lookupable: &Lookupable) -> EvFilterResult<FilterParamIndex> {
        let key = registry_key(operator, lookupable);
        if let Some(index) = self.indexes.read().get(&key) {
            return Ok(index.clone());
        }

        let mut indexes = self.indexes.write();
        if let Some(index) = indexes.get(&key) {
            return Ok(index.clone());
        }
        let index = self.factory.create_index(operator, lookupable)?;
        indexes.insert(key, index.clone());
        Ok(index)
    }

    pub fn get(&self, operator: FilterOperator, lookupable: &Lookupable) -> Option<FilterParamIndex> {
        let key = registry_key(operator, lookupable);
        self.indexes.read().get(&key).cloned()
    }

    /// Runs `f` under the write lock of the index for `operator` and
    /// `lookupable`, creating the index if needed. The index stays
    /// registered until `f` returns.
    ///
    /// # Errors
    ///
    /// Propagates factory errors and the error returned by `f`.
    pub fn write_index<R, F>(&self, operator: FilterOperator, lookupable: &Lookupable, f: F) -> EvFilterResult<R>
    where
        F: FnOnce(&mut dyn FilterParamIndexProvider) -> EvFilterResult<R>,
    {
        let key = registry_key(operator, lookupable);
        let indexes = {
            let indexes = self.indexes.read();
            if indexes.contains_key(&key) {
                indexes
            } else {
                drop(indexes);
                let mut indexes = self.indexes.write();
                if !indexes.contains_key(&key) {
                    let index = self.factory.create_index(operator, lookupable)?;
                    indexes.insert(key.clone(), index);
                }
                RwLockWriteGuard::downgrade(indexes)
            }
        };
        match indexes.get(&key) {
            Some(index) => Self::write_locked(&indexes, index, f),
            None => {
                log::error!("Filter index {} vanished while the registry was locked", key);
                Err(EvFilterError::new(
                    &format!("Filter index {} vanished while the registry was locked", key),
                    ErrorKind::InternalError,
                ))
            }
        }
    }

    /// Like [`write_index`](FilterIndexRegistry::write_index) but never
    /// creates an index; returns `None` if none is registered.
    pub fn write_existing_index<R, F>(
        &self,
        operator: FilterOperator,
        lookupable: &Lookupable,
        f: F,
    ) -> EvFilterResult<Option<R>>
    where
        F: FnOnce(&mut dyn FilterParamIndexProvider) -> EvFilterResult<R>,
    {
        let key = registry_key(operator, lookupable);
        let indexes = self.indexes.read();
        match indexes.get(&key) {
            Some(index) => Self::write_locked(&indexes, index, f).map(Some),
            None => Ok(None),
        }
    }

    // the registry guard is taken only to tie its lifetime to the index guard
    fn write_locked<R, F>(
        _registry: &RwLockReadGuard<'_, HashMap<String, FilterParamIndex>>,
        index: &FilterParamIndex,
        f: F,
    ) -> EvFilterResult<R>
    where
        F: FnOnce(&mut dyn FilterParamIndexProvider) -> EvFilterResult<R>,
    {
        let mut guard = index.write();
        f(&mut **guard)
    }

    /// Drops the index for `operator` and `lookupable` if it holds no
    /// constant. Returns whether an index was dropped.
    ///
    /// Waits for every [`write_index`](FilterIndexRegistry::write_index)
    /// call in progress. Handles obtained earlier from `get_or_create` stay
    /// usable but are detached; write through the registry instead.
    pub fn release(&self, operator: FilterOperator, lookupable: &Lookupable) -> bool {
        let key = registry_key(operator, lookupable);
        let mut indexes = self.indexes.write();
        match indexes.get(&key) {
            Some(index) if index.is_empty() => {
                indexes.remove(&key);
                log::debug!("Released filter index {}", key);
                true
            }
            Some(_) => {
                log::warn!("Filter index {} still holds filters, not released", key);
                false
            }
            None => false,
        }
    }

    pub fn index_count(&self) -> usize {
        self.indexes.read().len()
    }

    /// Matches the event against every registered index, appending the
    /// handles of all satisfied filters.
    ///
    /// The registry lock is not held while indexes are matched, so indexes
    /// may be created or released concurrently.
    pub fn match_event(&self, event: &EventBean, matches: &mut Vec<FilterHandle>) -> EvFilterResult<()> {
        let indexes: Vec<FilterParamIndex> = self.indexes.read().values().cloned().collect();
        for index in indexes {
            index.match_event(event, matches)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::config::QuadTreeConfig;
    use crate::errors::ErrorKind;
    use crate::filter::{EventEvaluator, FilterConstant, FilterHandleSet};
    use crate::index::{AdvancedIndexLookupable, FilterSpecLookupable};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn registry() -> FilterIndexRegistry {
        FilterIndexRegistry::new(FilterIndexFactory::new())
    }

    fn symbol() -> Lookupable {
        FilterSpecLookupable::property("symbol").into()
    }

    fn evaluator_for(statement_id: u64) -> EventEvaluator {
        let set = FilterHandleSet::new();
        set.add(FilterHandle::new(statement_id, 0));
        EventEvaluator::new(set)
    }

    #[test]
    fn test_get_or_create_shares_index() {
        let registry = registry();
        assert!(registry.get(FilterOperator::Equal, &symbol()).is_none());

        let index = registry.get_or_create(FilterOperator::Equal, &symbol()).unwrap();
        let found = registry.get(FilterOperator::Equal, &symbol()).unwrap();
        assert!(index.ptr_eq(&found));

        let other = registry
            .get_or_create(FilterOperator::Equal, &FilterSpecLookupable::property("venue").into())
            .unwrap();
        assert!(!index.ptr_eq(&other));
        assert_eq!(registry.index_count(), 2);
    }

    #[test]
    fn test_failed_create_registers_nothing() {
        let registry = registry();
        let advanced: Lookupable =
            AdvancedIndexLookupable::properties("x", "y", "w", "h", QuadTreeConfig::new(0.0, 0.0, 1.0, 1.0)).into();
        let err = registry
            .get_or_create(FilterOperator::AdvancedIndex, &advanced)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IndexingError);
        assert_eq!(registry.index_count(), 0);
    }

    #[test]
    fn test_release_only_when_empty() {
        let registry = registry();
        let index = registry.get_or_create(FilterOperator::Equal, &symbol()).unwrap();
        let constant = FilterConstant::Value(Value::from("ACME"));
        index.put(&constant, evaluator_for(1)).unwrap();

        assert!(!registry.release(FilterOperator::Equal, &symbol()));
        assert_eq!(registry.index_count(), 1);

        index.remove(&constant).unwrap();
        assert!(registry.release(FilterOperator::Equal, &symbol()));
        assert_eq!(registry.index_count(), 0);
        assert!(!registry.release(FilterOperator::Equal, &symbol()));
    }

    #[test]
    fn test_match_event_across_indexes() {
        let registry = registry();
        registry
            .get_or_create(FilterOperator::Equal, &symbol())
            .unwrap()
            .put(&Value::from("ACME").into(), evaluator_for(1))
            .unwrap();
        registry
            .get_or_create(FilterOperator::Equal, &FilterSpecLookupable::property("venue").into())
            .unwrap()
            .put(&Value::from("NYSE").into(), evaluator_for(2))
            .unwrap();

        let event = EventBean::new("Tick").with("symbol", "ACME").with("venue", "NYSE");
        let mut matches = Vec::new();
        registry.match_event(&event, &mut matches).unwrap();
        matches.sort();
        assert_eq!(matches, vec![FilterHandle::new(1, 0), FilterHandle::new(2, 0)]);
    }

    #[test]
    fn test_concurrent_get_or_create() {
        let registry = registry();
        let mut workers = vec![];
        for _ in 0..8 {
            let registry = registry.clone();
            workers.push(thread::spawn(move || {
                registry.get_or_create(FilterOperator::Equal, &symbol()).unwrap()
            }));
        }
        let indexes: Vec<FilterParamIndex> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        assert!(indexes.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
        assert_eq!(registry.index_count(), 1);
    }

    #[test]
    fn test_write_index_creates_and_reuses() {
        let registry = registry();
        let acme = FilterConstant::Value(Value::from("ACME"));
        registry
            .write_index(FilterOperator::Equal, &symbol(), |index| index.put(&acme, evaluator_for(1)))
            .unwrap();
        let size = registry
            .write_index(FilterOperator::Equal, &symbol(), |index| Ok(index.size_expensive()))
            .unwrap();
        assert_eq!(size, 1);
        assert_eq!(registry.index_count(), 1);

        let advanced: Lookupable =
            AdvancedIndexLookupable::properties("x", "y", "w", "h", QuadTreeConfig::new(0.0, 0.0, 1.0, 1.0)).into();
        let err = registry
            .write_index(FilterOperator::AdvancedIndex, &advanced, |_| Ok(()))
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IndexingError);
        assert_eq!(registry.index_count(), 1);
    }

    #[test]
    fn test_write_existing_index_never_creates() {
        let registry = registry();
        let result = registry
            .write_existing_index(FilterOperator::Equal, &symbol(), |index| Ok(index.size_expensive()))
            .unwrap();
        assert!(result.is_none());
        assert_eq!(registry.index_count(), 0);
    }

    #[test]
    fn test_register_after_last_filter_released() {
        let registry = registry();
        let acme = FilterConstant::Value(Value::from("ACME"));
        let bolt = FilterConstant::Value(Value::from("BOLT"));

        registry
            .write_index(FilterOperator::Equal, &symbol(), |index| index.put(&acme, evaluator_for(1)))
            .unwrap();
        registry
            .write_existing_index(FilterOperator::Equal, &symbol(), |index| index.remove(&acme))
            .unwrap();
        assert!(registry.release(FilterOperator::Equal, &symbol()));

        registry
            .write_index(FilterOperator::Equal, &symbol(), |index| index.put(&bolt, evaluator_for(2)))
            .unwrap();
        let mut matches = Vec::new();
        registry
            .match_event(&EventBean::new("Tick").with("symbol", "BOLT"), &mut matches)
            .unwrap();
        assert_eq!(matches, vec![FilterHandle::new(2, 0)]);
    }

    #[test]
    fn test_release_waits_for_write_in_progress() {
        let registry = registry();
        let (entered_tx, entered_rx) = mpsc::channel();

        let writer = {
            let registry = registry.clone();
            thread::spawn(move || {
                registry
                    .write_index(FilterOperator::Equal, &symbol(), |index| {
                        entered_tx.send(()).unwrap();
                        // the index is still empty while release is attempted
                        thread::sleep(Duration::from_millis(100));
                        index.put(&Value::from("ACME").into(), evaluator_for(7))
                    })
                    .unwrap();
            })
        };

        entered_rx.recv().unwrap();
        assert!(!registry.release(FilterOperator::Equal, &symbol()));
        writer.join().unwrap();

        assert_eq!(registry.index_count(), 1);
        let mut matches = Vec::new();
        registry
            .match_event(&EventBean::new("Tick").with("symbol", "ACME"), &mut matches)
            .unwrap();
        assert_eq!(matches, vec![FilterHandle::new(7, 0)]);
    }
}
