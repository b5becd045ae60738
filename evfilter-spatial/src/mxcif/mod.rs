//! MX-CIF quadtree: a region quadtree storing rectangles at the smallest
//! node that fully contains them.

mod node;
mod quad_tree;

pub use node::*;
pub use quad_tree::*;
