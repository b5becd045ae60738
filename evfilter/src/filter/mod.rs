//! Filter handles, evaluators and operators.
//!
//! A registered statement filter is represented inside an index by an
//! [`EventEvaluator`] stored under the filter's [`FilterConstant`]. When an
//! event matches, the evaluator appends [`FilterHandle`]s to the caller's
//! match list.

mod event_evaluator;
mod filter_handle;
mod filter_handle_set;
mod operator;

pub use event_evaluator::*;
pub use filter_handle::*;
pub use filter_handle_set::*;
pub use operator::*;
