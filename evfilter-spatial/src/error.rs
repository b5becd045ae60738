//! Errors raised by the MX-CIF quadtree.

use evfilter::common::XYWHRectangle;
use evfilter::errors::{ErrorKind, EvFilterError};
use thiserror::Error;

/// Errors that can occur in quadtree operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadTreeError {
    #[error("Rectangle {rectangle} lies outside the quadtree region {region}")]
    OutOfRegion {
        rectangle: XYWHRectangle,
        region: XYWHRectangle,
    },

    #[error("Invalid rectangle: {0}")]
    InvalidRectangle(String),

    #[error("Invalid quadtree configuration: {0}")]
    InvalidConfig(String),

    #[error("Quadtree index cannot use constant {0}")]
    UnsupportedConstant(String),
}

impl From<QuadTreeError> for EvFilterError {
    fn from(err: QuadTreeError) -> Self {
        let kind = match err {
            QuadTreeError::OutOfRegion { .. }
            | QuadTreeError::InvalidRectangle(_)
            | QuadTreeError::InvalidConfig(_) => ErrorKind::ValidationError,
            QuadTreeError::UnsupportedConstant(_) => ErrorKind::InvalidDataType,
        };
        EvFilterError::new(&err.to_string(), kind)
    }
}

/// Result type for quadtree operations
pub type QuadTreeResult<T> = Result<T, QuadTreeError>;
