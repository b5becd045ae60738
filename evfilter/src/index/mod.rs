//! Filter indexes.
//!
//! Every index variant implements [`FilterParamIndexProvider`] and is used
//! through the lock-carrying [`FilterParamIndex`] handle. The
//! [`FilterIndexFactory`] picks the variant for an operator kind, and
//! [`FilterIndexRegistry`] keeps one live index per operator and
//! [`Lookupable`].
//!
//! The equality index ships with this crate; spatial variants are loaded
//! from extension crates as a [`FilterIndexModule`].

mod equals_index;
mod filter_param_index;
mod index_factory;
mod index_registry;
mod lookupable;

pub use equals_index::*;
pub use filter_param_index::*;
pub use index_factory::*;
pub use index_registry::*;
pub use lookupable::*;
