use bevy::prelude::*;

use crate::components::{BoundingBox, NetworkKind, PlacedBuildings};
use crate::systems::building::PlacementSession;
use crate::systems::grid::{cell_center, grid_to_world, to_render, CELL_SIZE};
use crate::systems::network::{ConnectionSession, Networks};
use crate::systems::tool::HoveredCell;

const PLACED_COLOR: Color = Color::srgb(0.85, 0.85, 0.85);
const VALID_COLOR: Color = Color::srgba(0.2, 0.9, 0.3, 0.9);
const INVALID_COLOR: Color = Color::srgba(0.95, 0.2, 0.2, 0.9);
const CELL: f32 = CELL_SIZE as f32;

/// Gizmo drawing for everything the planner holds: placed boxes, the live
/// preview, network edges and the active drag.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (draw_placed_buildings, draw_placement_preview, draw_networks, draw_drag_segment),
        );
    }
}

fn draw_box(gizmos: &mut Gizmos, bounds: &BoundingBox, color: Color) {
    let top_left = grid_to_world(bounds.top_left);
    let bottom_right = grid_to_world(bounds.bottom_right);
    let center = to_render((top_left + bottom_right) / 2.0);
    let size = (bottom_right - top_left).abs().as_vec2();

    // Single-tile explicit shapes collapse to a point.
    if size.x == 0.0 || size.y == 0.0 {
        gizmos.circle_2d(center, CELL / 4.0, color);
    } else {
        gizmos.rect_2d(center, size, color);
    }
}

fn draw_placed_buildings(placed: Res<PlacedBuildings>, mut gizmos: Gizmos) {
    for building in placed.iter() {
        draw_box(&mut gizmos, &building.bounding_box(), PLACED_COLOR);
    }
}

fn draw_placement_preview(session: Res<PlacementSession>, mut gizmos: Gizmos) {
    let Some(preview) = session.preview() else {
        return;
    };
    let color = if preview.is_valid_placement {
        VALID_COLOR
    } else {
        INVALID_COLOR
    };

    for tile in &preview.tiles {
        gizmos.rect_2d(to_render(cell_center(*tile)), Vec2::splat(CELL * 0.9), color.with_alpha(0.4));
    }
    draw_box(&mut gizmos, &preview.bounds, color);
}

fn draw_networks(networks: Res<Networks>, mut gizmos: Gizmos) {
    for graph in networks.iter() {
        let color = graph.kind().color();
        for (from, to) in graph.edges() {
            gizmos.line_2d(to_render(cell_center(from)), to_render(cell_center(to)), color);
        }
        for (pos, node) in graph.nodes() {
            if node.degree() == 0 {
                gizmos.circle_2d(to_render(cell_center(*pos)), CELL / 6.0, color);
            }
        }
    }
}

fn draw_drag_segment(session: Res<ConnectionSession>, hovered: Res<HoveredCell>, mut gizmos: Gizmos) {
    let (Some(anchor), Some(cell)) = (session.anchor(), hovered.0) else {
        return;
    };
    let color = session
        .target()
        .map(|target| target.network.color())
        .unwrap_or(NetworkKind::Other.color());
    gizmos.line_2d(to_render(cell_center(anchor)), to_render(cell_center(cell)), color.with_alpha(0.6));
}
