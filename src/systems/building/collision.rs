//! Geometric overlap queries over the placed-building list.
//!
//! Nothing here mutates state or applies layer rules; callers decide which
//! overlaps disqualify a placement.

use crate::components::{BoundingBox, GridPosition, PlacedBuilding};
use crate::systems::network::AdjacencyGraph;

/// Closed-interval test: boxes that share an edge count as overlapping. A
/// single-tile explicit footprint has a zero-area box, and only the closed
/// test keeps two of those on the same cell from slipping past each other.
pub fn boxes_overlap(a: &BoundingBox, b: &BoundingBox) -> bool {
    let separated = a.bottom_right.x < b.top_left.x
        || b.bottom_right.x < a.top_left.x
        || a.bottom_right.y < b.top_left.y
        || b.bottom_right.y < a.top_left.y;
    !separated
}

pub fn check_collision(candidate: &BoundingBox, placed: &[PlacedBuilding]) -> bool {
    placed
        .iter()
        .any(|building| boxes_overlap(candidate, &building.bounding_box()))
}

/// Every placed building overlapping `candidate`, in placement order.
pub fn colliding_buildings<'a>(candidate: &BoundingBox, placed: &'a [PlacedBuilding]) -> Vec<&'a PlacedBuilding> {
    placed
        .iter()
        .filter(|building| boxes_overlap(candidate, &building.bounding_box()))
        .collect()
}

pub fn is_tile_occupied(x: i32, y: i32, placed: &[PlacedBuilding]) -> bool {
    placed
        .iter()
        .any(|building| building.bounding_box().contains_tile(x, y))
}

/// Display names of conduit nodes already sitting on `cell`.
pub fn colliding_conduit_labels(cell: GridPosition, graph: &AdjacencyGraph) -> Vec<String> {
    graph
        .node(cell)
        .and_then(|node| node.metadata.display_name.clone())
        .into_iter()
        .collect()
}
