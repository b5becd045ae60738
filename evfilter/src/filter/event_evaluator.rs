use crate::errors::EvFilterResult;
use crate::event::EventBean;
use crate::filter::FilterHandle;
use std::any::Any;
use std::ops::Deref;
use std::sync::Arc;

/// Capability of a value stored in a filter index: accept an event and
/// append zero or more matches.
///
/// An index treats its evaluators as opaque. The usual implementation is
/// [`FilterHandleSet`](crate::filter::FilterHandleSet), which fans the event
/// out to every statement registered with the same filter constant.
pub trait EventEvaluatorProvider: Any + Send + Sync {
    /// Evaluates the event and appends matching handles into `matches`.
    ///
    /// # Errors
    ///
    /// Implementations that evaluate further expressions (for example a
    /// nested index) propagate their failures unchanged.
    fn match_event(&self, event: &EventBean, matches: &mut Vec<FilterHandle>) -> EvFilterResult<()>;

    fn as_any(&self) -> &dyn Any;
}

/// Cloneable handle to an [`EventEvaluatorProvider`].
///
/// Cloning is a reference count increment, so the same evaluator can be
/// stored in an index and held by the statement that registered it.
///
/// # Examples
///
/// ```rust
/// use evfilter::filter::{EventEvaluator, FilterHandle, FilterHandleSet};
/// use evfilter::event::EventBean;
///
/// let handles = FilterHandleSet::new();
/// handles.add(FilterHandle::new(1, 0));
/// let evaluator = EventEvaluator::new(handles);
///
/// let mut matches = Vec::new();
/// evaluator.match_event(&EventBean::new("Tick"), &mut matches).unwrap();
/// assert_eq!(matches, vec![FilterHandle::new(1, 0)]);
/// ```
#[derive(Clone)]
pub struct EventEvaluator {
    inner: Arc<dyn EventEvaluatorProvider>,
}

impl EventEvaluator {
    pub fn new<T: EventEvaluatorProvider + 'static>(inner: T) -> Self {
        EventEvaluator {
            inner: Arc::new(inner),
        }
    }

    /// Wraps an evaluator the caller keeps a typed reference to.
    pub fn from_arc<T: EventEvaluatorProvider + 'static>(inner: Arc<T>) -> Self {
        EventEvaluator { inner }
    }

    /// Returns whether both handles point at the same evaluator instance.
    pub fn ptr_eq(&self, other: &EventEvaluator) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the concrete evaluator if it is of type `T`.
    pub fn downcast_ref<T: EventEvaluatorProvider + 'static>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }
}

impl Deref for EventEvaluator {
    type Target = Arc<dyn EventEvaluatorProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for EventEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventEvaluator({:p})", Arc::as_ptr(&self.inner))
    }
}
