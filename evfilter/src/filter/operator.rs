use crate::common::{Value, XYWHRectangle};
use std::fmt::{Display, Formatter};

/// The operator of a filter predicate; selects the index variant that
/// serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterOperator {
    /// `property = constant`, served by a hash index.
    Equal,
    /// An advanced (spatial) index such as the MX-CIF quadtree, matching
    /// event rectangles against filter rectangles.
    AdvancedIndex,
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOperator::Equal => write!(f, "="),
            FilterOperator::AdvancedIndex => write!(f, "advanced-index"),
        }
    }
}

/// The constant a statement filter was registered with.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterConstant {
    Value(Value),
    Rectangle(XYWHRectangle),
}

impl FilterConstant {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FilterConstant::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_rectangle(&self) -> Option<&XYWHRectangle> {
        match self {
            FilterConstant::Rectangle(r) => Some(r),
            _ => None,
        }
    }
}

impl From<XYWHRectangle> for FilterConstant {
    fn from(rect: XYWHRectangle) -> Self {
        FilterConstant::Rectangle(rect)
    }
}

impl From<Value> for FilterConstant {
    fn from(value: Value) -> Self {
        FilterConstant::Value(value)
    }
}

impl Display for FilterConstant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterConstant::Value(v) => write!(f, "{:?}", v),
            FilterConstant::Rectangle(r) => write!(f, "{}", r),
        }
    }
}
