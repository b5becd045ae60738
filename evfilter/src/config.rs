//! Configuration of advanced (spatial) filter indexes.

use crate::errors::{ErrorKind, EvFilterError, EvFilterResult};
use std::fmt::{Display, Formatter};

/// Default maximum number of node levels of a quadtree, root included.
pub const DEFAULT_MAX_TREE_HEIGHT: u32 = 20;

/// Default minimum quadrant extent; zero disables the size bound.
pub const DEFAULT_MIN_NODE_SIZE: f64 = 0.0;

fn default_max_tree_height() -> u32 {
    DEFAULT_MAX_TREE_HEIGHT
}

fn default_min_node_size() -> f64 {
    DEFAULT_MIN_NODE_SIZE
}

/// Region and subdivision bounds of a quadtree filter index.
///
/// The region is fixed for the lifetime of the index; rectangles outside it
/// cannot be registered. Subdivision stops at `max_tree_height` levels or
/// when a child quadrant would be smaller than `min_node_size` in either
/// axis, whichever comes first.
///
/// # Examples
///
/// ```rust
/// use evfilter::config::QuadTreeConfig;
///
/// let config = QuadTreeConfig::new(0.0, 0.0, 100.0, 100.0)
///     .with_max_tree_height(8)
///     .with_prune_empty_nodes(true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_tree_height(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct QuadTreeConfig {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default = "default_max_tree_height")]
    max_tree_height: u32,
    #[serde(default = "default_min_node_size")]
    min_node_size: f64,
    #[serde(default)]
    prune_empty_nodes: bool,
}

impl QuadTreeConfig {
    /// Creates a configuration for the given region with default bounds.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        QuadTreeConfig {
            x,
            y,
            width,
            height,
            max_tree_height: DEFAULT_MAX_TREE_HEIGHT,
            min_node_size: DEFAULT_MIN_NODE_SIZE,
            prune_empty_nodes: false,
        }
    }

    pub fn with_max_tree_height(mut self, max_tree_height: u32) -> Self {
        self.max_tree_height = max_tree_height;
        self
    }

    pub fn with_min_node_size(mut self, min_node_size: f64) -> Self {
        self.min_node_size = min_node_size;
        self
    }

    /// Enables dropping child nodes that hold nothing after a removal.
    pub fn with_prune_empty_nodes(mut self, prune: bool) -> Self {
        self.prune_empty_nodes = prune;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn max_tree_height(&self) -> u32 {
        self.max_tree_height
    }

    pub fn min_node_size(&self) -> f64 {
        self.min_node_size
    }

    pub fn prune_empty_nodes(&self) -> bool {
        self.prune_empty_nodes
    }

    /// Checks that the region is a finite rectangle with positive extent and
    /// that the subdivision bounds are usable.
    pub fn validate(&self) -> EvFilterResult<()> {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            log::error!("Invalid quadtree region in {}", self);
            return Err(EvFilterError::new(
                &format!("Quadtree region must be finite with positive extent: {}", self),
                ErrorKind::ValidationError,
            ));
        }

        if self.max_tree_height == 0 {
            log::error!("Invalid max tree height in {}", self);
            return Err(EvFilterError::new(
                "Quadtree max tree height must be at least 1",
                ErrorKind::ValidationError,
            ));
        }

        if !self.min_node_size.is_finite() || self.min_node_size < 0.0 {
            log::error!("Invalid min node size in {}", self);
            return Err(EvFilterError::new(
                &format!(
                    "Quadtree min node size must be finite and non-negative, got {}",
                    self.min_node_size
                ),
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }

    /// Text identifying the region and subdivision settings. Configs that
    /// compare equal yield the same key, so `-0.0` and `0.0` coincide.
    pub fn region_key(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            unsigned_zero(self.x),
            unsigned_zero(self.y),
            unsigned_zero(self.width),
            unsigned_zero(self.height),
            self.max_tree_height,
            unsigned_zero(self.min_node_size),
            self.prune_empty_nodes
        )
    }
}

fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl Display for QuadTreeConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "QuadTreeConfig(x={}, y={}, width={}, height={}, max_tree_height={}, min_node_size={}, prune={})",
            self.x,
            self.y,
            self.width,
            self.height,
            self.max_tree_height,
            self.min_node_size,
            self.prune_empty_nodes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuadTreeConfig::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(config.max_tree_height(), DEFAULT_MAX_TREE_HEIGHT);
        assert_eq!(config.min_node_size(), DEFAULT_MIN_NODE_SIZE);
        assert!(!config.prune_empty_nodes());
        assert_eq!(config.width(), 10.0);
        assert_eq!(config.height(), 20.0);
    }

    #[test]
    fn test_validate_region() {
        assert!(QuadTreeConfig::new(-50.0, -50.0, 100.0, 100.0).validate().is_ok());

        let err = QuadTreeConfig::new(0.0, 0.0, 0.0, 10.0).validate().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
        assert!(QuadTreeConfig::new(0.0, 0.0, 10.0, -1.0).validate().is_err());
        assert!(QuadTreeConfig::new(f64::NAN, 0.0, 10.0, 10.0).validate().is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let base = QuadTreeConfig::new(0.0, 0.0, 10.0, 10.0);
        assert!(base.clone().with_max_tree_height(0).validate().is_err());
        assert!(base.clone().with_max_tree_height(1).validate().is_ok());
        assert!(base.clone().with_min_node_size(-1.0).validate().is_err());
        assert!(base.clone().with_min_node_size(f64::INFINITY).validate().is_err());
        assert!(base.with_min_node_size(0.5).validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"x": 0.0, "y": 0.0, "width": 100.0, "height": 50.0}"#;
        let config: QuadTreeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, QuadTreeConfig::new(0.0, 0.0, 100.0, 50.0));

        let json = r#"{"x": 0.0, "y": 0.0, "width": 100.0, "height": 50.0,
                       "max_tree_height": 4, "prune_empty_nodes": true}"#;
        let config: QuadTreeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_tree_height(), 4);
        assert!(config.prune_empty_nodes());
    }

    #[test]
    fn test_region_key_ignores_zero_sign() {
        let positive = QuadTreeConfig::new(0.0, 0.0, 100.0, 100.0);
        let negative = QuadTreeConfig::new(-0.0, -0.0, 100.0, 100.0).with_min_node_size(-0.0);
        assert_eq!(positive.region_key(), negative.region_key());
        assert_ne!(positive.to_string(), negative.to_string());

        let shifted = QuadTreeConfig::new(1.0, 0.0, 100.0, 100.0);
        assert_ne!(positive.region_key(), shifted.region_key());
        assert_ne!(positive.region_key(), positive.clone().with_max_tree_height(4).region_key());
        assert_ne!(positive.region_key(), positive.clone().with_prune_empty_nodes(true).region_key());
    }
}
