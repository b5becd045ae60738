//! # evfilter-spatial - Spatial Filter Indexes
//!
//! An MX-CIF quadtree filter index for `evfilter`. Statements register
//! rectangle constants; each event is turned into a query rectangle and
//! matched against every registered rectangle it intersects.
//!
//! ## Quick Start
//!
//! ```rust
//! use evfilter::common::XYWHRectangle;
//! use evfilter::config::QuadTreeConfig;
//! use evfilter::event::EventBean;
//! use evfilter::filter::{EventEvaluator, FilterHandle, FilterHandleSet, FilterOperator};
//! use evfilter::index::{AdvancedIndexLookupable, FilterIndexFactory, FilterIndexRegistry, Lookupable};
//! use evfilter_spatial::SpatialModule;
//!
//! # fn main() -> evfilter::errors::EvFilterResult<()> {
//! let mut factory = FilterIndexFactory::new();
//! factory.load_module(&SpatialModule)?;
//! let registry = FilterIndexRegistry::new(factory);
//!
//! let config = QuadTreeConfig::new(0.0, 0.0, 100.0, 100.0);
//! let lookupable: Lookupable = AdvancedIndexLookupable::properties("px", "py", "pw", "ph", config).into();
//!
//! let handles = FilterHandleSet::new();
//! handles.add(FilterHandle::new(1, 0));
//! registry.write_index(FilterOperator::AdvancedIndex, &lookupable, |index| {
//!     index.put(&XYWHRectangle::new(10.0, 10.0, 5.0, 5.0).into(), EventEvaluator::new(handles))
//! })?;
//!
//! let event = EventBean::new("Pos").with("px", 0.0).with("py", 0.0).with("pw", 20.0).with("ph", 20.0);
//! let mut matches = Vec::new();
//! registry.match_event(&event, &mut matches)?;
//! assert_eq!(matches, vec![FilterHandle::new(1, 0)]);
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod error;
pub mod filter_index;
pub mod mxcif;
pub mod spatial_module;

pub use bounding_box::{BoundingBox, Quadrant};
pub use error::{QuadTreeError, QuadTreeResult};
pub use filter_index::FilterParamIndexQuadTreeMxCif;
pub use mxcif::{MxCifNode, MxCifQuadTree};
pub use spatial_module::{QuadTreeIndexPlugin, SpatialModule};
