use bevy::math::DVec2;

use crate::components::{BoundingBox, BuildingDef, GridPosition, PlacementBounds};
use crate::systems::grid::grid_to_world;

/// Local extent of the footprint. Rectangles span `[0, width] x [0, height]`,
/// explicit shapes span the min/max of their offsets.
pub fn bounds(building: &BuildingDef) -> PlacementBounds {
    let offsets = &building.placement_offset;
    if offsets.is_empty() {
        return PlacementBounds {
            min_x: 0,
            max_x: building.width,
            min_y: 0,
            max_y: building.height,
        };
    }

    offsets.iter().fold(
        PlacementBounds {
            min_x: i32::MAX,
            max_x: i32::MIN,
            min_y: i32::MAX,
            max_y: i32::MIN,
        },
        |acc, offset| PlacementBounds {
            min_x: acc.min_x.min(offset.x),
            max_x: acc.max_x.max(offset.x),
            min_y: acc.min_y.min(offset.y),
            max_y: acc.max_y.max(offset.y),
        },
    )
}

/// Anchor correction in cells, added to the snapped grid origin before the
/// sprite is drawn from its top-left corner. Local `+y` is up, render `+y`
/// is down, hence the negated `max_y`. `None` when `max_y` is `i32::MIN`.
pub fn placement_offset(building: &BuildingDef) -> Option<GridPosition> {
    let bounds = bounds(building);
    Some(GridPosition::new(bounds.min_x, bounds.max_y.checked_neg()?))
}

/// World position of the sprite's top-left corner for a building anchored
/// at `grid_pos`.
pub fn sprite_origin(building: &BuildingDef, grid_pos: GridPosition) -> Option<DVec2> {
    let offset = placement_offset(building)?;
    Some(grid_to_world(grid_pos.checked_offset(offset.x, offset.y)?))
}

/// Cells covered by the building at `origin`, or `None` if any of them falls
/// outside the `i32` grid.
pub fn occupied_tiles(building: &BuildingDef, origin: GridPosition) -> Option<Vec<GridPosition>> {
    if !building.has_explicit_offsets() {
        let mut tiles = Vec::new();
        for dx in 0..building.width {
            for dy in 0..building.height {
                tiles.push(origin.checked_offset(dx, dy)?);
            }
        }
        return Some(tiles);
    }

    building
        .placement_offset
        .iter()
        .map(|offset| {
            Some(GridPosition::new(
                origin.x.checked_add(offset.x)?,
                origin.y.checked_sub(offset.y)?,
            ))
        })
        .collect()
}

/// The box stored on commit and compared by the collision detector. `None`
/// when a corner leaves the `i32` grid.
pub fn world_bounding_box(building: &BuildingDef, grid_pos: GridPosition) -> Option<BoundingBox> {
    let bounds = bounds(building);
    Some(BoundingBox::new(
        GridPosition::new(
            grid_pos.x.checked_add(bounds.min_x)?,
            grid_pos.y.checked_sub(bounds.max_y)?,
        ),
        GridPosition::new(
            grid_pos.x.checked_add(bounds.max_x)?,
            grid_pos.y.checked_sub(bounds.min_y)?,
        ),
    ))
}
