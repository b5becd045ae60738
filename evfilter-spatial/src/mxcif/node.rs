use crate::bounding_box::{BoundingBox, Quadrant};
use evfilter::common::XYWHRectangle;
use evfilter::config::QuadTreeConfig;
use smallvec::SmallVec;
use std::mem;

type EntryVec<V> = SmallVec<[(XYWHRectangle, V); 4]>;

/// A node of an MX-CIF quadtree.
///
/// A node holds the entries whose rectangle no single child quadrant
/// contains, either because the rectangle straddles a quadrant boundary or
/// because the node may not subdivide any further. Children are created on
/// first use and, when present, exactly quarter the node's bounds.
pub struct MxCifNode<V> {
    bounds: BoundingBox,
    level: u32,
    children: [Option<Box<MxCifNode<V>>>; 4],
    entries: EntryVec<V>,
}

impl<V> MxCifNode<V> {
    pub(crate) fn new(bounds: BoundingBox, level: u32) -> Self {
        MxCifNode {
            bounds,
            level,
            children: [None, None, None, None],
            entries: SmallVec::new(),
        }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Depth of this node, the root being level 1.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<&MxCifNode<V>> {
        self.children[quadrant.index()].as_deref()
    }

    /// Entries stored locally at this node.
    pub fn entries(&self) -> impl Iterator<Item = (&XYWHRectangle, &V)> {
        self.entries.iter().map(|(r, v)| (r, v))
    }

    fn can_subdivide(&self, config: &QuadTreeConfig) -> bool {
        if self.level >= config.max_tree_height() {
            return false;
        }
        let (cx, cy) = self.bounds.center();
        // no progress once the midpoint collapses onto an edge
        if !(cx > self.bounds.min_x && cx < self.bounds.max_x && cy > self.bounds.min_y && cy < self.bounds.max_y) {
            return false;
        }
        let min_size = config.min_node_size();
        self.bounds.width() / 2.0 >= min_size && self.bounds.height() / 2.0 >= min_size
    }

    /// The child quadrant an entry with bounds `bbox` belongs to, or `None`
    /// if it stays at this node.
    fn target_quadrant(&self, bbox: &BoundingBox, config: &QuadTreeConfig) -> Option<Quadrant> {
        if !self.can_subdivide(config) {
            return None;
        }
        let mut target = None;
        for quadrant in Quadrant::ALL {
            if self.bounds.quadrant(quadrant).contains(bbox) {
                if target.is_some() {
                    // touches a midline, more than one quadrant contains it
                    return None;
                }
                target = Some(quadrant);
            }
        }
        target
    }

    pub(crate) fn insert(
        &mut self,
        rect: XYWHRectangle,
        bbox: &BoundingBox,
        value: V,
        config: &QuadTreeConfig,
    ) -> Option<V> {
        if let Some(quadrant) = self.target_quadrant(bbox, config) {
            let child_bounds = self.bounds.quadrant(quadrant);
            let child_level = self.level + 1;
            let child = self.children[quadrant.index()]
                .get_or_insert_with(|| Box::new(MxCifNode::new(child_bounds, child_level)));
            return child.insert(rect, bbox, value, config);
        }

        for (existing, stored) in self.entries.iter_mut() {
            if *existing == rect {
                return Some(mem::replace(stored, value));
            }
        }
        self.entries.push((rect, value));
        None
    }

    pub(crate) fn get(&self, rect: &XYWHRectangle, bbox: &BoundingBox, config: &QuadTreeConfig) -> Option<&V> {
        match self.target_quadrant(bbox, config) {
            Some(quadrant) => self.children[quadrant.index()]
                .as_ref()
                .and_then(|child| child.get(rect, bbox, config)),
            None => self.entries.iter().find(|(r, _)| r == rect).map(|(_, v)| v),
        }
    }

    pub(crate) fn remove(&mut self, rect: &XYWHRectangle, bbox: &BoundingBox, config: &QuadTreeConfig) -> Option<V> {
        match self.target_quadrant(bbox, config) {
            Some(quadrant) => {
                let slot = &mut self.children[quadrant.index()];
                let child = slot.as_mut()?;
                let removed = child.remove(rect, bbox, config);
                if removed.is_some() && config.prune_empty_nodes() && child.is_vacant() {
                    log::trace!("Pruning vacant quadtree node {} at level {}", child.bounds, child.level);
                    *slot = None;
                }
                removed
            }
            None => {
                let position = self.entries.iter().position(|(r, _)| r == rect)?;
                Some(self.entries.remove(position).1)
            }
        }
    }

    /// Invokes `f` for every entry intersecting `query`, skipping subtrees
    /// whose bounds don't intersect it.
    pub(crate) fn collect<E, F>(&self, query: &BoundingBox, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&XYWHRectangle, &V) -> Result<(), E>,
    {
        if !self.bounds.intersects(query) {
            return Ok(());
        }
        for (rect, value) in self.entries.iter() {
            if BoundingBox::from_rectangle(rect).intersects(query) {
                f(rect, value)?;
            }
        }
        for child in self.children.iter().flatten() {
            child.collect(query, f)?;
        }
        Ok(())
    }

    pub(crate) fn count(&self) -> usize {
        self.entries.len() + self.children.iter().flatten().map(|c| c.count()).sum::<usize>()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.children.iter().flatten().all(|c| c.is_empty())
    }

    fn is_vacant(&self) -> bool {
        self.entries.is_empty() && self.children.iter().all(|c| c.is_none())
    }

    pub(crate) fn node_count(&self) -> usize {
        1 + self.children.iter().flatten().map(|c| c.node_count()).sum::<usize>()
    }

    pub(crate) fn depth(&self) -> u32 {
        self.children
            .iter()
            .flatten()
            .map(|c| c.depth())
            .max()
            .unwrap_or(self.level)
    }
}
