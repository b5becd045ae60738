//! Value types shared by every filter index.

mod rectangle;
mod value;

pub use rectangle::*;
pub use value::*;
