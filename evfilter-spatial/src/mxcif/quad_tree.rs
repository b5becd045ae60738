use crate::bounding_box::BoundingBox;
use crate::error::{QuadTreeError, QuadTreeResult};
use crate::mxcif::MxCifNode;
use evfilter::common::XYWHRectangle;
use evfilter::config::QuadTreeConfig;

/// An MX-CIF quadtree mapping rectangles to values.
///
/// Each rectangle is stored at the smallest node whose bounds fully contain
/// it, so the same rectangle always resolves to the same node for exact
/// lookup and removal. Range collection visits only nodes whose bounds
/// intersect the query.
///
/// Containment and intersection use closed intervals: rectangles touching
/// along an edge or at a corner intersect.
///
/// The tree performs no locking; wrap it the way
/// [`FilterParamIndex`](evfilter::index::FilterParamIndex) does when it is
/// shared between threads.
///
/// # Examples
///
/// ```rust
/// use evfilter::common::XYWHRectangle;
/// use evfilter::config::QuadTreeConfig;
/// use evfilter_spatial::MxCifQuadTree;
///
/// let mut tree = MxCifQuadTree::new(QuadTreeConfig::new(0.0, 0.0, 100.0, 100.0)).unwrap();
/// tree.insert(XYWHRectangle::new(10.0, 10.0, 5.0, 5.0), "A").unwrap();
/// tree.insert(XYWHRectangle::new(50.0, 50.0, 5.0, 5.0), "B").unwrap();
///
/// let mut found = Vec::new();
/// tree.collect(&XYWHRectangle::new(0.0, 0.0, 20.0, 20.0), |_, v| {
///     found.push(*v);
///     Ok::<(), ()>(())
/// })
/// .unwrap();
/// assert_eq!(found, vec!["A"]);
/// ```
pub struct MxCifQuadTree<V> {
    root: MxCifNode<V>,
    region: XYWHRectangle,
    region_bounds: BoundingBox,
    config: QuadTreeConfig,
}

impl<V> MxCifQuadTree<V> {
    /// Creates an empty tree covering the configured region.
    ///
    /// # Errors
    ///
    /// Returns [`QuadTreeError::InvalidConfig`] if the configuration does
    /// not validate.
    pub fn new(config: QuadTreeConfig) -> QuadTreeResult<Self> {
        if let Err(err) = config.validate() {
            return Err(QuadTreeError::InvalidConfig(err.message().to_string()));
        }
        let region = XYWHRectangle::new(config.x(), config.y(), config.width(), config.height());
        let region_bounds = BoundingBox::from_rectangle(&region);
        Ok(MxCifQuadTree {
            root: MxCifNode::new(region_bounds, 1),
            region,
            region_bounds,
            config,
        })
    }

    pub fn region(&self) -> &XYWHRectangle {
        &self.region
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    pub fn root(&self) -> &MxCifNode<V> {
        &self.root
    }

    /// Stores `value` under `rect`, returning the value previously stored
    /// under an equal rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`QuadTreeError::InvalidRectangle`] for non-finite
    /// coordinates or negative extents and [`QuadTreeError::OutOfRegion`]
    /// if `rect` is not contained in the tree's region. The tree is left
    /// unchanged in both cases.
    pub fn insert(&mut self, rect: XYWHRectangle, value: V) -> QuadTreeResult<Option<V>> {
        if !rect.is_valid() {
            log::error!("Invalid rectangle {} for quadtree insert", rect);
            return Err(QuadTreeError::InvalidRectangle(rect.to_string()));
        }
        let bbox = BoundingBox::from_rectangle(&rect);
        if !self.region_bounds.contains(&bbox) {
            log::error!("Rectangle {} lies outside quadtree region {}", rect, self.region);
            return Err(QuadTreeError::OutOfRegion {
                rectangle: rect,
                region: self.region,
            });
        }
        Ok(self.root.insert(rect, &bbox, value, &self.config))
    }

    /// Returns the value stored under a rectangle equal to `rect`.
    pub fn get(&self, rect: &XYWHRectangle) -> Option<&V> {
        let bbox = BoundingBox::from_rectangle(rect);
        if !self.region_bounds.contains(&bbox) {
            return None;
        }
        self.root.get(rect, &bbox, &self.config)
    }

    /// Removes and returns the value stored under a rectangle equal to
    /// `rect`; a missing rectangle leaves the tree unchanged.
    pub fn remove(&mut self, rect: &XYWHRectangle) -> Option<V> {
        let bbox = BoundingBox::from_rectangle(rect);
        if !self.region_bounds.contains(&bbox) {
            return None;
        }
        self.root.remove(rect, &bbox, &self.config)
    }

    /// Invokes `f` with every stored rectangle that intersects `query` and
    /// its value. Stops at the first error and returns it.
    ///
    /// The order of invocation is unspecified. A query with a negative or
    /// non-finite extent matches nothing.
    pub fn collect<E, F>(&self, query: &XYWHRectangle, mut f: F) -> Result<(), E>
    where
        F: FnMut(&XYWHRectangle, &V) -> Result<(), E>,
    {
        let bbox = BoundingBox::from_rectangle(query);
        if !(bbox.width() >= 0.0 && bbox.height() >= 0.0) {
            return Ok(());
        }
        self.root.collect(&bbox, &mut f)
    }

    /// Number of stored rectangles. Walks the whole tree.
    pub fn count(&self) -> usize {
        self.root.count()
    }

    /// Whether no rectangle is stored; stops at the first entry found.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of allocated nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Level of the deepest allocated node, the root being level 1.
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }
}
