use evfilter::common::XYWHRectangle;

/// One of the four equal quarters of a node's bounds.
///
/// The y axis grows downward, so the north-west quadrant holds the node's
/// minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NW,
    NE,
    SW,
    SE,
}

impl Quadrant {
    /// All quadrants in child-slot order.
    pub const ALL: [Quadrant; 4] = [Quadrant::NW, Quadrant::NE, Quadrant::SW, Quadrant::SE];

    /// Index of the quadrant in a node's child array.
    pub fn index(self) -> usize {
        match self {
            Quadrant::NW => 0,
            Quadrant::NE => 1,
            Quadrant::SW => 2,
            Quadrant::SE => 3,
        }
    }
}

/// A 2D bounding box represented by minimum and maximum coordinates.
///
/// Node bounds of the quadtree are kept in this form so that containment
/// and intersection tests are plain comparisons. All tests treat the box as
/// closed: touching edges contain and intersect.
///
/// # Examples
///
/// ```rust
/// use evfilter::common::XYWHRectangle;
/// use evfilter_spatial::BoundingBox;
///
/// let region = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
/// let rect = BoundingBox::from_rectangle(&XYWHRectangle::new(10.0, 10.0, 5.0, 5.0));
/// assert!(region.contains(&rect));
/// assert!(region.intersects(&rect));
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, serde::Deserialize, serde::Serialize)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f64,
    /// Minimum Y coordinate
    pub min_y: f64,
    /// Maximum X coordinate
    pub max_x: f64,
    /// Maximum Y coordinate
    pub max_y: f64,
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundingBox({}, {}, {}, {})", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<&XYWHRectangle> for BoundingBox {
    fn from(rect: &XYWHRectangle) -> Self {
        BoundingBox::from_rectangle(rect)
    }
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Converts an origin-and-extent rectangle to min/max form.
    pub fn from_rectangle(rect: &XYWHRectangle) -> BoundingBox {
        BoundingBox::new(rect.x(), rect.y(), rect.max_x(), rect.max_y())
    }

    /// Converts back to origin-and-extent form.
    pub fn to_rectangle(&self) -> XYWHRectangle {
        XYWHRectangle::new(self.min_x, self.min_y, self.width(), self.height())
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Checks if this bounding box contains a point.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Checks if this bounding box contains another bounding box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x && other.max_x <= self.max_x
            && other.min_y >= self.min_y && other.max_y <= self.max_y
    }

    /// Checks if this bounding box intersects another bounding box.
    ///
    /// A degenerate box (zero width or height) intersects another box when
    /// its segment or point lies within the other's closed extent.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x
            && self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    /// Returns the bounds of one quarter of this box, obtained by bisecting
    /// both axes at their midpoints.
    pub fn quadrant(&self, quadrant: Quadrant) -> BoundingBox {
        let (cx, cy) = self.center();
        match quadrant {
            Quadrant::NW => BoundingBox::new(self.min_x, self.min_y, cx, cy),
            Quadrant::NE => BoundingBox::new(cx, self.min_y, self.max_x, cy),
            Quadrant::SW => BoundingBox::new(self.min_x, cy, cx, self.max_y),
            Quadrant::SE => BoundingBox::new(cx, cy, self.max_x, self.max_y),
        }
    }

    /// Returns the four quarters of this box in child-slot order.
    pub fn quadrants(&self) -> [BoundingBox; 4] {
        Quadrant::ALL.map(|q| self.quadrant(q))
    }
}
