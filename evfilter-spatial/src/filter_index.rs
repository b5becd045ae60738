use crate::error::QuadTreeError;
use crate::mxcif::MxCifQuadTree;
use evfilter::common::XYWHRectangle;
use evfilter::errors::{ErrorKind, EvFilterError, EvFilterResult};
use evfilter::event::EventBean;
use evfilter::filter::{EventEvaluator, FilterConstant, FilterHandle, FilterOperator};
use evfilter::index::{AdvancedIndexLookupable, FilterParamIndexProvider, Lookupable};
use std::any::Any;

/// Filter index over an MX-CIF quadtree of filter rectangles.
///
/// Each registered filter contributes a rectangle constant. An event is
/// turned into a query rectangle by the lookupable's four extractors and
/// matches every filter whose rectangle intersects it.
pub struct FilterParamIndexQuadTreeMxCif {
    lookupable: Lookupable,
    quad_tree: MxCifQuadTree<EventEvaluator>,
}

impl FilterParamIndexQuadTreeMxCif {
    /// Creates an empty index over the region configured on `lookupable`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`](evfilter::errors::ErrorKind::ValidationError)
    /// if the region configuration is invalid.
    pub fn new(lookupable: AdvancedIndexLookupable) -> EvFilterResult<Self> {
        let quad_tree = MxCifQuadTree::new(lookupable.config().clone())?;
        Ok(FilterParamIndexQuadTreeMxCif {
            lookupable: Lookupable::AdvancedIndex(lookupable),
            quad_tree,
        })
    }

    pub fn quad_tree(&self) -> &MxCifQuadTree<EventEvaluator> {
        &self.quad_tree
    }

    fn query_rectangle(&self, event: &EventBean) -> EvFilterResult<XYWHRectangle> {
        let advanced = self.lookupable.as_advanced().ok_or_else(|| {
            log::error!("Quadtree index built over non-rectangle lookupable {}", self.lookupable);
            EvFilterError::new(
                &format!("Quadtree index built over non-rectangle lookupable {}", self.lookupable),
                ErrorKind::InternalError,
            )
        })?;
        Ok(XYWHRectangle::new(
            advanced.x().extract_f64(event)?,
            advanced.y().extract_f64(event)?,
            advanced.width().extract_f64(event)?,
            advanced.height().extract_f64(event)?,
        ))
    }

    fn rectangle_constant<'a>(&self, filter_constant: &'a FilterConstant) -> EvFilterResult<&'a XYWHRectangle> {
        match filter_constant.as_rectangle() {
            Some(rect) => Ok(rect),
            None => {
                log::error!("Quadtree index on {} cannot use constant {}", self.lookupable, filter_constant);
                Err(QuadTreeError::UnsupportedConstant(filter_constant.to_string()).into())
            }
        }
    }
}

impl FilterParamIndexProvider for FilterParamIndexQuadTreeMxCif {
    fn operator(&self) -> FilterOperator {
        FilterOperator::AdvancedIndex
    }

    fn lookupable(&self) -> &Lookupable {
        &self.lookupable
    }

    fn match_event(&self, event: &EventBean, matches: &mut Vec<FilterHandle>) -> EvFilterResult<()> {
        let query = self.query_rectangle(event)?;
        self.quad_tree
            .collect(&query, |_, evaluator| evaluator.match_event(event, matches))
    }

    fn get(&self, filter_constant: &FilterConstant) -> EvFilterResult<Option<EventEvaluator>> {
        let rect = self.rectangle_constant(filter_constant)?;
        Ok(self.quad_tree.get(rect).cloned())
    }

    fn put(&mut self, filter_constant: &FilterConstant, evaluator: EventEvaluator) -> EvFilterResult<()> {
        let rect = *self.rectangle_constant(filter_constant)?;
        self.quad_tree.insert(rect, evaluator).map_err(EvFilterError::from)?;
        Ok(())
    }

    fn remove(&mut self, filter_constant: &FilterConstant) -> EvFilterResult<()> {
        let rect = *self.rectangle_constant(filter_constant)?;
        self.quad_tree.remove(&rect);
        Ok(())
    }

    fn size_expensive(&self) -> usize {
        self.quad_tree.count()
    }

    fn is_empty(&self) -> bool {
        self.quad_tree.is_empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
