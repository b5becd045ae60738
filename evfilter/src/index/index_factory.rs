use crate::errors::{ErrorKind, EvFilterError, EvFilterResult};
use crate::filter::FilterOperator;
use crate::index::{FilterParamIndex, FilterParamIndexEquals, Lookupable};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Creates filter indexes for the operator kinds it serves.
pub trait FilterIndexPlugin: Send + Sync {
    /// Operator kinds this plugin builds indexes for.
    fn operators(&self) -> Vec<FilterOperator>;

    /// Builds an empty index for `operator` over `lookupable`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidOperation`] if the lookupable is not of
    /// the kind the index needs, or a validation error for a bad
    /// configuration.
    fn create_index(&self, operator: FilterOperator, lookupable: &Lookupable) -> EvFilterResult<FilterParamIndex>;
}

/// A bundle of plugins an extension crate contributes to a factory.
///
/// ```rust,ignore
/// use evfilter::index::FilterIndexFactory;
/// use evfilter_spatial::SpatialModule;
///
/// let mut factory = FilterIndexFactory::new();
/// factory.load_module(&SpatialModule)?;
/// ```
pub trait FilterIndexModule {
    fn load(&self, factory: &mut FilterIndexFactory) -> EvFilterResult<()>;
}

struct EqualsIndexPlugin;

impl FilterIndexPlugin for EqualsIndexPlugin {
    fn operators(&self) -> Vec<FilterOperator> {
        vec![FilterOperator::Equal]
    }

    fn create_index(&self, operator: FilterOperator, lookupable: &Lookupable) -> EvFilterResult<FilterParamIndex> {
        match lookupable {
            Lookupable::Simple(l) => Ok(FilterParamIndex::new(FilterParamIndexEquals::new(l.clone()))),
            Lookupable::AdvancedIndex(_) => {
                log::error!("Operator {} cannot index advanced lookupable {}", operator, lookupable);
                Err(EvFilterError::new(
                    &format!("Operator {} requires a simple lookupable, got {}", operator, lookupable),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }
}

/// Selects the index variant for a filter by its operator kind.
///
/// The equality plugin is always registered; other variants arrive through
/// [`FilterIndexModule`]s. Registering a plugin for an operator that already
/// has one replaces it.
pub struct FilterIndexFactory {
    plugins: BTreeMap<FilterOperator, Arc<dyn FilterIndexPlugin>>,
}

impl Default for FilterIndexFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterIndexFactory {
    pub fn new() -> Self {
        let mut factory = FilterIndexFactory {
            plugins: BTreeMap::new(),
        };
        factory.register_plugin(EqualsIndexPlugin);
        factory
    }

    pub fn register_plugin<P: FilterIndexPlugin + 'static>(&mut self, plugin: P) {
        let plugin: Arc<dyn FilterIndexPlugin> = Arc::new(plugin);
        for operator in plugin.operators() {
            log::debug!("Registering filter index plugin for operator {}", operator);
            self.plugins.insert(operator, plugin.clone());
        }
    }

    pub fn load_module<M: FilterIndexModule>(&mut self, module: &M) -> EvFilterResult<()> {
        module.load(self)
    }

    pub fn supports(&self, operator: FilterOperator) -> bool {
        self.plugins.contains_key(&operator)
    }

    /// Builds a new, empty index for `operator` over `lookupable`.
    pub fn create_index(&self, operator: FilterOperator, lookupable: &Lookupable) -> EvFilterResult<FilterParamIndex> {
        match self.plugins.get(&operator) {
            Some(plugin) => {
                let index = plugin.create_index(operator, lookupable)?;
                log::debug!("Created filter index {} on {}", operator, lookupable);
                Ok(index)
            }
            None => {
                log::error!("No filter index plugin registered for operator {}", operator);
                Err(EvFilterError::new(
                    &format!("No filter index plugin registered for operator {}", operator),
                    ErrorKind::IndexingError,
                ))
            }
        }
    }
}
