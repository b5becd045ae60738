use crate::errors::{ErrorKind, EvFilterError, EvFilterResult};
use std::fmt::{Display, Formatter};

/// An immutable axis-aligned rectangle given by its minimum corner and extent.
///
/// Rectangles are used both as filter constants (the literal
/// `rectangle(x, y, width, height)` of a statement filter) and as query
/// regions derived from events. Two rectangles are equal only when all four
/// fields are equal; equality is an exact key, not geometric equivalence.
///
/// # Examples
///
/// ```rust
/// use evfilter::common::XYWHRectangle;
///
/// let rect = XYWHRectangle::new(10.0, 10.0, 5.0, 5.0);
/// assert_eq!(rect.max_x(), 15.0);
/// assert!(XYWHRectangle::try_new(0.0, 0.0, -1.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct XYWHRectangle {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl XYWHRectangle {
    /// Creates a rectangle without validating its fields.
    ///
    /// Use [`XYWHRectangle::try_new`] for values that did not come from a
    /// trusted source.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        XYWHRectangle { x, y, w, h }
    }

    /// Creates a rectangle, rejecting non-finite fields and negative extents.
    pub fn try_new(x: f64, y: f64, w: f64, h: f64) -> EvFilterResult<Self> {
        let rect = XYWHRectangle::new(x, y, w, h);
        if !rect.is_valid() {
            log::error!("Invalid rectangle {}", rect);
            return Err(EvFilterError::new(
                &format!(
                    "Invalid rectangle {}: fields must be finite and width/height non-negative",
                    rect
                ),
                ErrorKind::ValidationError,
            ));
        }
        Ok(rect)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn w(&self) -> f64 {
        self.w
    }

    #[inline]
    pub fn h(&self) -> f64 {
        self.h
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    /// Checks that all fields are finite and both extents are non-negative.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w >= 0.0
            && self.h >= 0.0
    }
}

impl Display for XYWHRectangle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "XYWHRectangle(x={}, y={}, w={}, h={})", self.x, self.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let rect = XYWHRectangle::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.x(), 1.0);
        assert_eq!(rect.y(), 2.0);
        assert_eq!(rect.w(), 3.0);
        assert_eq!(rect.h(), 4.0);
        assert_eq!(rect.max_x(), 4.0);
        assert_eq!(rect.max_y(), 6.0);
    }

    #[test]
    fn test_equality_is_field_wise() {
        let a = XYWHRectangle::new(10.0, 10.0, 5.0, 5.0);
        let b = XYWHRectangle::new(10.0, 10.0, 5.0, 5.0);
        let c = XYWHRectangle::new(10.0, 10.0, 5.0, 5.5);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_try_new_validation() {
        assert!(XYWHRectangle::try_new(0.0, 0.0, 0.0, 0.0).is_ok());
        assert!(XYWHRectangle::try_new(-5.0, -5.0, 1.0, 1.0).is_ok());

        let err = XYWHRectangle::try_new(0.0, 0.0, -1.0, 1.0).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert!(XYWHRectangle::try_new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(XYWHRectangle::try_new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_display() {
        let rect = XYWHRectangle::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.to_string(), "XYWHRectangle(x=1, y=2, w=3, h=4)");
    }
}
