use crate::errors::EvFilterResult;
use crate::event::EventBean;
use crate::filter::{EventEvaluator, FilterConstant, FilterHandle, FilterOperator};
use crate::index::Lookupable;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Contract shared by every filter index variant.
///
/// A filter index maps the constants of registered filters to evaluators
/// and, for each event, invokes the evaluators whose constants the event
/// satisfies. Variants differ in the structure behind the mapping: a hash
/// map for equality, a quadtree for rectangle overlap.
///
/// Implementations perform no locking. Reading methods take `&self` and
/// writing methods `&mut self`; [`FilterParamIndex`] puts the provider
/// behind the read-write lock that callers share.
pub trait FilterParamIndexProvider: Any + Send + Sync {
    /// The operator kind this index serves.
    fn operator(&self) -> FilterOperator;

    /// What this index evaluates against each event.
    fn lookupable(&self) -> &Lookupable;

    /// Appends into `matches` the handles of every filter the event
    /// satisfies.
    ///
    /// # Errors
    ///
    /// Fails with [`TypeCoercionError`](crate::errors::ErrorKind::TypeCoercionError)
    /// if the lookupable yields a value of the wrong type, and propagates
    /// evaluator failures.
    fn match_event(&self, event: &EventBean, matches: &mut Vec<FilterHandle>) -> EvFilterResult<()>;

    /// Returns the evaluator registered under `filter_constant`, if any.
    fn get(&self, filter_constant: &FilterConstant) -> EvFilterResult<Option<EventEvaluator>>;

    /// Registers `evaluator` under `filter_constant`, replacing any evaluator
    /// registered under an equal constant.
    fn put(&mut self, filter_constant: &FilterConstant, evaluator: EventEvaluator) -> EvFilterResult<()>;

    /// Removes the evaluator registered under `filter_constant`; removing a
    /// constant that is not present is a no-op.
    fn remove(&mut self, filter_constant: &FilterConstant) -> EvFilterResult<()>;

    /// Number of distinct constants. Walks the whole structure for some
    /// variants; keep it off latency-sensitive paths.
    fn size_expensive(&self) -> usize;

    /// Whether no constant is registered. May walk the structure.
    fn is_empty(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// A filter index together with the read-write lock that guards it.
///
/// Clones share the same index and lock. Callers either hold a guard across
/// several calls:
///
/// ```rust
/// use evfilter::index::{FilterParamIndex, FilterParamIndexEquals, FilterSpecLookupable};
/// use evfilter::filter::{EventEvaluator, FilterConstant, FilterHandleSet};
/// use evfilter::common::Value;
///
/// let index = FilterParamIndex::new(FilterParamIndexEquals::new(FilterSpecLookupable::property("symbol")));
/// let constant = FilterConstant::Value(Value::from("ACME"));
/// {
///     let mut guard = index.write();
///     if guard.get(&constant).unwrap().is_none() {
///         guard.put(&constant, EventEvaluator::new(FilterHandleSet::new())).unwrap();
///     }
/// } // write lock released here
/// assert_eq!(index.size_expensive(), 1);
/// ```
///
/// or use the convenience methods, each of which holds the right lock for
/// exactly one call. Guards release on drop, so every exit path, including
/// `?` returns and panics, releases the lock.
#[derive(Clone)]
pub struct FilterParamIndex {
    inner: Arc<RwLock<Box<dyn FilterParamIndexProvider>>>,
}

impl FilterParamIndex {
    pub fn new<T: FilterParamIndexProvider + 'static>(inner: T) -> Self {
        FilterParamIndex {
            inner: Arc::new(RwLock::new(Box::new(inner))),
        }
    }

    /// Acquires the shared lock for matching and lookups.
    pub fn read(&self) -> RwLockReadGuard<'_, Box<dyn FilterParamIndexProvider>> {
        self.inner.read()
    }

    /// Acquires the exclusive lock for registration and removal.
    pub fn write(&self) -> RwLockWriteGuard<'_, Box<dyn FilterParamIndexProvider>> {
        self.inner.write()
    }

    pub fn match_event(&self, event: &EventBean, matches: &mut Vec<FilterHandle>) -> EvFilterResult<()> {
        self.read().match_event(event, matches)
    }

    pub fn get(&self, filter_constant: &FilterConstant) -> EvFilterResult<Option<EventEvaluator>> {
        self.read().get(filter_constant)
    }

    pub fn put(&self, filter_constant: &FilterConstant, evaluator: EventEvaluator) -> EvFilterResult<()> {
        self.write().put(filter_constant, evaluator)
    }

    pub fn remove(&self, filter_constant: &FilterConstant) -> EvFilterResult<()> {
        self.write().remove(filter_constant)
    }

    pub fn size_expensive(&self) -> usize {
        self.read().size_expensive()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn operator(&self) -> FilterOperator {
        self.read().operator()
    }

    /// Returns whether both handles share the same index and lock.
    pub fn ptr_eq(&self, other: &FilterParamIndex) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for FilterParamIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_read() {
            Some(guard) => write!(f, "FilterParamIndex({} {})", guard.operator(), guard.lookupable()),
            None => write!(f, "FilterParamIndex(<locked>)"),
        }
    }
}
