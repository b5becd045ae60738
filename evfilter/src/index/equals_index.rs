use crate::common::Value;
use crate::errors::{ErrorKind, EvFilterError, EvFilterResult};
use crate::event::EventBean;
use crate::filter::{EventEvaluator, FilterConstant, FilterHandle, FilterOperator};
use crate::index::{FilterParamIndexProvider, FilterSpecLookupable, Lookupable};
use std::any::Any;
use std::collections::HashMap;

/// Equality filter index: `property = constant`.
///
/// Constants are hashed, so matching is a single lookup of the event's
/// value regardless of how many filters are registered. A `null` event value
/// never matches, not even a filter registered with a `null` constant.
pub struct FilterParamIndexEquals {
    lookupable: Lookupable,
    constants_map: HashMap<Value, EventEvaluator>,
}

impl FilterParamIndexEquals {
    pub fn new(lookupable: FilterSpecLookupable) -> Self {
        FilterParamIndexEquals {
            lookupable: Lookupable::Simple(lookupable),
            constants_map: HashMap::new(),
        }
    }

    fn value_constant<'a>(&self, filter_constant: &'a FilterConstant) -> EvFilterResult<&'a Value> {
        filter_constant.as_value().ok_or_else(|| {
            log::error!(
                "Equality index on {} cannot use constant {}",
                self.lookupable,
                filter_constant
            );
            EvFilterError::new(
                &format!(
                    "Equality index on {} requires a value constant, got {}",
                    self.lookupable, filter_constant
                ),
                ErrorKind::InvalidDataType,
            )
        })
    }
}

impl FilterParamIndexProvider for FilterParamIndexEquals {
    fn operator(&self) -> FilterOperator {
        FilterOperator::Equal
    }

    fn lookupable(&self) -> &Lookupable {
        &self.lookupable
    }

    fn match_event(&self, event: &EventBean, matches: &mut Vec<FilterHandle>) -> EvFilterResult<()> {
        let value = match &self.lookupable {
            Lookupable::Simple(lookupable) => lookupable.extract(event)?,
            Lookupable::AdvancedIndex(lookupable) => {
                log::error!("Equality index built over advanced lookupable {}", lookupable.expression());
                return Err(EvFilterError::new(
                    &format!("Equality index built over advanced lookupable {}", lookupable.expression()),
                    ErrorKind::InternalError,
                ));
            }
        };
        if value.is_null() {
            return Ok(());
        }
        match self.constants_map.get(&value) {
            Some(evaluator) => evaluator.match_event(event, matches),
            None => Ok(()),
        }
    }

    fn get(&self, filter_constant: &FilterConstant) -> EvFilterResult<Option<EventEvaluator>> {
        let value = self.value_constant(filter_constant)?;
        Ok(self.constants_map.get(value).cloned())
    }

    fn put(&mut self, filter_constant: &FilterConstant, evaluator: EventEvaluator) -> EvFilterResult<()> {
        let value = self.value_constant(filter_constant)?.clone();
        self.constants_map.insert(value, evaluator);
        Ok(())
    }

    fn remove(&mut self, filter_constant: &FilterConstant) -> EvFilterResult<()> {
        let value = self.value_constant(filter_constant)?;
        self.constants_map.remove(value);
        Ok(())
    }

    fn size_expensive(&self) -> usize {
        self.constants_map.len()
    }

    fn is_empty(&self) -> bool {
        self.constants_map.is_empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::XYWHRectangle;
    use crate::filter::FilterHandleSet;

    fn evaluator_for(statement_id: u64) -> EventEvaluator {
        let set = FilterHandleSet::new();
        set.add(FilterHandle::new(statement_id, 0));
        EventEvaluator::new(set)
    }

    fn constant(v: impl Into<Value>) -> FilterConstant {
        FilterConstant::Value(v.into())
    }

    fn index() -> FilterParamIndexEquals {
        FilterParamIndexEquals::new(FilterSpecLookupable::property("symbol"))
    }

    #[test]
    fn test_put_get_remove() {
        let mut index = index();
        let evaluator = evaluator_for(1);
        index.put(&constant("ACME"), evaluator.clone()).unwrap();

        let found = index.get(&constant("ACME")).unwrap().unwrap();
        assert!(found.ptr_eq(&evaluator));
        assert!(index.get(&constant("OTHER")).unwrap().is_none());

        index.remove(&constant("ACME")).unwrap();
        assert!(index.get(&constant("ACME")).unwrap().is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_put_replaces() {
        let mut index = index();
        index.put(&constant(5i32), evaluator_for(1)).unwrap();
        let second = evaluator_for(2);
        index.put(&constant(5i64), second.clone()).unwrap();
        assert_eq!(index.size_expensive(), 1);
        assert!(index.get(&constant(5u8)).unwrap().unwrap().ptr_eq(&second));
    }

    #[test]
    fn test_match_event() {
        let mut index = index();
        index.put(&constant("ACME"), evaluator_for(1)).unwrap();
        index.put(&constant("IBM"), evaluator_for(2)).unwrap();

        let mut matches = Vec::new();
        index
            .match_event(&EventBean::new("Tick").with("symbol", "IBM"), &mut matches)
            .unwrap();
        assert_eq!(matches, vec![FilterHandle::new(2, 0)]);

        matches.clear();
        index
            .match_event(&EventBean::new("Tick").with("symbol", "MSFT"), &mut matches)
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_null_never_matches() {
        let mut index = index();
        index.put(&constant(Value::Null), evaluator_for(1)).unwrap();

        let mut matches = Vec::new();
        index.match_event(&EventBean::new("Tick"), &mut matches).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_rectangle_constant_rejected() {
        let mut index = index();
        let rect = FilterConstant::Rectangle(XYWHRectangle::new(0.0, 0.0, 1.0, 1.0));
        let err = index.put(&rect, evaluator_for(1)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidDataType);
        assert!(index.get(&rect).is_err());
        assert!(index.remove(&rect).is_err());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut index = index();
        index.put(&constant("ACME"), evaluator_for(1)).unwrap();
        index.remove(&constant("NONE")).unwrap();
        assert_eq!(index.size_expensive(), 1);
    }
}
