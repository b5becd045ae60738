use crate::common::Value;
use crate::config::QuadTreeConfig;
use crate::errors::EvFilterResult;
use crate::event::EventBean;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Computes a value from an event.
///
/// Extractors must be deterministic and free of side effects: the same event
/// always yields the same value. Closures of the right shape implement the
/// trait directly.
///
/// ```rust
/// use evfilter::index::FieldExtractor;
/// use evfilter::event::EventBean;
/// use evfilter::common::Value;
///
/// let doubled = |event: &EventBean| -> evfilter::errors::EvFilterResult<Value> {
///     let x = event.get("x").cloned().unwrap_or_default().coerce_f64("x")?;
///     Ok(Value::F64(x * 2.0))
/// };
/// let event = EventBean::new("E").with("x", 2i32);
/// assert_eq!(doubled.extract(&event).unwrap(), Value::F64(4.0));
/// ```
pub trait FieldExtractor: Send + Sync {
    fn extract(&self, event: &EventBean) -> EvFilterResult<Value>;
}

impl<F> FieldExtractor for F
where
    F: Fn(&EventBean) -> EvFilterResult<Value> + Send + Sync,
{
    fn extract(&self, event: &EventBean) -> EvFilterResult<Value> {
        self(event)
    }
}

/// Reads a named property of the event; a missing property is `Null`.
#[derive(Debug, Clone)]
pub struct PropertyExtractor {
    property_name: String,
}

impl PropertyExtractor {
    pub fn new(property_name: &str) -> Self {
        PropertyExtractor {
            property_name: property_name.to_string(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }
}

impl FieldExtractor for PropertyExtractor {
    fn extract(&self, event: &EventBean) -> EvFilterResult<Value> {
        Ok(event.get(&self.property_name).cloned().unwrap_or(Value::Null))
    }
}

/// An expression text paired with the extractor that evaluates it.
///
/// The expression text identifies the lookupable: two lookupables with the
/// same expression are served by the same index.
#[derive(Clone)]
pub struct FilterSpecLookupable {
    expression: String,
    extractor: Arc<dyn FieldExtractor>,
}

impl FilterSpecLookupable {
    pub fn new<E: FieldExtractor + 'static>(expression: &str, extractor: E) -> Self {
        FilterSpecLookupable {
            expression: expression.to_string(),
            extractor: Arc::new(extractor),
        }
    }

    /// A lookupable reading the event property of the same name.
    pub fn property(property_name: &str) -> Self {
        FilterSpecLookupable::new(property_name, PropertyExtractor::new(property_name))
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn extract(&self, event: &EventBean) -> EvFilterResult<Value> {
        self.extractor.extract(event)
    }

    /// Extracts the value and coerces it to `f64`, naming the expression in
    /// the error if the value is not numeric.
    pub fn extract_f64(&self, event: &EventBean) -> EvFilterResult<f64> {
        self.extractor.extract(event)?.coerce_f64(&self.expression)
    }
}

impl Debug for FilterSpecLookupable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FilterSpecLookupable({})", self.expression)
    }
}

/// Lookupable of an advanced (spatial) index: four extractors computing the
/// event's rectangle and the configuration of the index region.
#[derive(Debug, Clone)]
pub struct AdvancedIndexLookupable {
    expression: String,
    x: FilterSpecLookupable,
    y: FilterSpecLookupable,
    width: FilterSpecLookupable,
    height: FilterSpecLookupable,
    config: QuadTreeConfig,
}

impl AdvancedIndexLookupable {
    pub fn new(
        x: FilterSpecLookupable,
        y: FilterSpecLookupable,
        width: FilterSpecLookupable,
        height: FilterSpecLookupable,
        config: QuadTreeConfig,
    ) -> Self {
        let expression = format!(
            "rectangle({},{},{},{})",
            x.expression(),
            y.expression(),
            width.expression(),
            height.expression()
        );
        AdvancedIndexLookupable {
            expression,
            x,
            y,
            width,
            height,
            config,
        }
    }

    /// Builds the lookupable from four event property names.
    pub fn properties(x: &str, y: &str, width: &str, height: &str, config: QuadTreeConfig) -> Self {
        AdvancedIndexLookupable::new(
            FilterSpecLookupable::property(x),
            FilterSpecLookupable::property(y),
            FilterSpecLookupable::property(width),
            FilterSpecLookupable::property(height),
            config,
        )
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn x(&self) -> &FilterSpecLookupable {
        &self.x
    }

    pub fn y(&self) -> &FilterSpecLookupable {
        &self.y
    }

    pub fn width(&self) -> &FilterSpecLookupable {
        &self.width
    }

    pub fn height(&self) -> &FilterSpecLookupable {
        &self.height
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }
}

/// What a filter index evaluates against each event.
#[derive(Debug, Clone)]
pub enum Lookupable {
    Simple(FilterSpecLookupable),
    AdvancedIndex(AdvancedIndexLookupable),
}

impl Lookupable {
    pub fn expression(&self) -> &str {
        match self {
            Lookupable::Simple(l) => l.expression(),
            Lookupable::AdvancedIndex(l) => l.expression(),
        }
    }

    /// Key distinguishing indexes: the expression, plus the region
    /// configuration for advanced indexes.
    pub fn index_key(&self) -> String {
        match self {
            Lookupable::Simple(l) => l.expression().to_string(),
            Lookupable::AdvancedIndex(l) => format!("{}@{}", l.expression(), l.config().region_key()),
        }
    }

    pub fn as_simple(&self) -> Option<&FilterSpecLookupable> {
        match self {
            Lookupable::Simple(l) => Some(l),
            Lookupable::AdvancedIndex(_) => None,
        }
    }

    pub fn as_advanced(&self) -> Option<&AdvancedIndexLookupable> {
        match self {
            Lookupable::AdvancedIndex(l) => Some(l),
            Lookupable::Simple(_) => None,
        }
    }
}

impl From<FilterSpecLookupable> for Lookupable {
    fn from(lookupable: FilterSpecLookupable) -> Self {
        Lookupable::Simple(lookupable)
    }
}

impl From<AdvancedIndexLookupable> for Lookupable {
    fn from(lookupable: AdvancedIndexLookupable) -> Self {
        Lookupable::AdvancedIndex(lookupable)
    }
}

impl Display for Lookupable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression())
    }
}
