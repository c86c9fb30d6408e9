//! Groups nodes into per-level point sets.

use crate::{Result, error::HierarchyError, geometry::Node, geometry::Point};

/// Splits `nodes` into `layer_count` point sets, one per level.
///
/// Entry `i` holds the points of level `i + 1` in input order; levels without
/// nodes yield an empty set.
///
/// # Errors
/// Returns [`HierarchyError::LevelOutOfRange`] when a node's level falls
/// outside `1..=layer_count` and [`HierarchyError::NonFiniteCoordinate`] when
/// a node position contains NaN or infinity.
///
/// # Examples
/// ```
/// use fogtier_core::{Node, Point, partition_by_level};
///
/// let nodes = [
///     Node::new(Point::new(0.0, 0.0, 0.0), 2),
///     Node::new(Point::new(1.0, 1.0, 0.0), 1),
/// ];
/// let levels = partition_by_level(&nodes, 3)?;
/// assert_eq!(levels.len(), 3);
/// assert_eq!(levels[0], vec![Point::new(1.0, 1.0, 0.0)]);
/// assert!(levels[2].is_empty());
/// # Ok::<(), fogtier_core::HierarchyError>(())
/// ```
pub fn partition_by_level(nodes: &[Node], layer_count: usize) -> Result<Vec<Vec<Point>>> {
    let mut levels = vec![Vec::new(); layer_count];
    for (index, node) in nodes.iter().enumerate() {
        let level = node.level();
        let bucket = level
            .checked_sub(1)
            .and_then(|slot| levels.get_mut(slot))
            .ok_or(HierarchyError::LevelOutOfRange {
                node: index,
                level,
                layer_count,
            })?;
        let point = node.point();
        if !point.is_finite() {
            return Err(HierarchyError::NonFiniteCoordinate { node: index });
        }
        bucket.push(point);
    }
    Ok(levels)
}
