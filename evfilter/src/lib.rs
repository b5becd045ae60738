//! # evfilter - Event Filter Indexes
//!
//! Core types of an event-processing filter service: events, filter
//! constants, evaluators and the indexes that map filter constants to
//! evaluators so each arriving event is matched against many registered
//! statement filters at once.
//!
//! ## Quick Start
//!
//! ```rust
//! use evfilter::common::Value;
//! use evfilter::event::EventBean;
//! use evfilter::filter::{EventEvaluator, FilterHandle, FilterHandleSet, FilterOperator};
//! use evfilter::index::{FilterIndexFactory, FilterIndexRegistry, FilterSpecLookupable, Lookupable};
//!
//! # fn main() -> evfilter::errors::EvFilterResult<()> {
//! let registry = FilterIndexRegistry::new(FilterIndexFactory::new());
//! let lookupable: Lookupable = FilterSpecLookupable::property("symbol").into();
//! let index = registry.get_or_create(FilterOperator::Equal, &lookupable)?;
//!
//! let handles = FilterHandleSet::new();
//! handles.add(FilterHandle::new(1, 0));
//! index.put(&Value::from("ACME").into(), EventEvaluator::new(handles))?;
//!
//! let mut matches = Vec::new();
//! registry.match_event(&EventBean::new("Tick").with("symbol", "ACME"), &mut matches)?;
//! assert_eq!(matches, vec![FilterHandle::new(1, 0)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Values and rectangles
//! - [`config`] - Quadtree index configuration
//! - [`errors`] - Error types and result definitions
//! - [`event`] - Events
//! - [`filter`] - Filter handles, evaluators and operators
//! - [`index`] - Filter indexes, factory and registry

pub mod common;
pub mod config;
pub mod errors;
pub mod event;
pub mod filter;
pub mod index;
