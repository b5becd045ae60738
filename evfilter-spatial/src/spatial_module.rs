use crate::FilterParamIndexQuadTreeMxCif;
use evfilter::errors::{ErrorKind, EvFilterError, EvFilterResult};
use evfilter::filter::FilterOperator;
use evfilter::index::{FilterIndexFactory, FilterIndexModule, FilterIndexPlugin, FilterParamIndex, Lookupable};

/// Plugin building MX-CIF quadtree indexes for advanced index filters.
pub struct QuadTreeIndexPlugin;

impl FilterIndexPlugin for QuadTreeIndexPlugin {
    fn operators(&self) -> Vec<FilterOperator> {
        vec![FilterOperator::AdvancedIndex]
    }

    fn create_index(&self, operator: FilterOperator, lookupable: &Lookupable) -> EvFilterResult<FilterParamIndex> {
        match lookupable {
            Lookupable::AdvancedIndex(advanced) => {
                let index = FilterParamIndexQuadTreeMxCif::new(advanced.clone())?;
                Ok(FilterParamIndex::new(index))
            }
            Lookupable::Simple(_) => {
                log::error!("Operator {} cannot index simple lookupable {}", operator, lookupable);
                Err(EvFilterError::new(
                    &format!("Operator {} requires an advanced index lookupable, got {}", operator, lookupable),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }
}

/// Module for loading the quadtree filter index.
///
/// ## Example
///
/// ```rust
/// use evfilter::filter::FilterOperator;
/// use evfilter::index::FilterIndexFactory;
/// use evfilter_spatial::SpatialModule;
///
/// let mut factory = FilterIndexFactory::new();
/// factory.load_module(&SpatialModule).unwrap();
/// assert!(factory.supports(FilterOperator::AdvancedIndex));
/// ```
pub struct SpatialModule;

impl Default for SpatialModule {
    fn default() -> Self {
        Self
    }
}

impl FilterIndexModule for SpatialModule {
    fn load(&self, factory: &mut FilterIndexFactory) -> EvFilterResult<()> {
        factory.register_plugin(QuadTreeIndexPlugin);
        Ok(())
    }
}
