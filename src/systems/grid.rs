use bevy::math::DVec2;
use bevy::prelude::*;

use crate::components::GridPosition;

/// World units per grid cell. Changing it invalidates every placed building.
/// Planner world space is `f64` so every `i32` cell maps to an exact position.
pub const CELL_SIZE: f64 = 40.0;

/// Extra cells drawn past the viewport edge.
const GRID_PADDING_CELLS: f32 = 2.0;

#[derive(Resource)]
pub struct GridSettings {
    pub show_grid: bool,
    pub line_color: Color,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            line_color: Color::srgba(0.53, 0.53, 0.53, 0.5),
        }
    }
}

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridSettings>()
            .add_systems(Update, (toggle_grid_on_hotkey, draw_grid).chain());
    }
}

fn toggle_grid_on_hotkey(keys: Res<ButtonInput<KeyCode>>, mut grid_settings: ResMut<GridSettings>) {
    if keys.just_pressed(KeyCode::KeyG) {
        grid_settings.show_grid = !grid_settings.show_grid;
    }
}

fn draw_grid(
    grid_settings: Res<GridSettings>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut gizmos: Gizmos,
) {
    if !grid_settings.show_grid {
        return;
    }
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Some(viewport) = camera.logical_viewport_size() else {
        return;
    };
    let (Ok(corner_a), Ok(corner_b)) = (
        camera.viewport_to_world_2d(camera_transform, Vec2::ZERO),
        camera.viewport_to_world_2d(camera_transform, viewport),
    ) else {
        return;
    };

    // Cell boundaries sit on multiples of CELL_SIZE in both y conventions,
    // so the lines can be drawn straight in render space.
    let cell = CELL_SIZE as f32;
    let padding = Vec2::splat(cell * GRID_PADDING_CELLS);
    let min = corner_a.min(corner_b) - padding;
    let max = corner_a.max(corner_b) + padding;
    let start_col = (min.x / cell).floor() as i32;
    let end_col = (max.x / cell).ceil() as i32;
    let start_row = (min.y / cell).floor() as i32;
    let end_row = (max.y / cell).ceil() as i32;

    for col in start_col..=end_col {
        let x = col as f32 * cell;
        gizmos.line_2d(
            Vec2::new(x, start_row as f32 * cell),
            Vec2::new(x, end_row as f32 * cell),
            grid_settings.line_color,
        );
    }

    for row in start_row..=end_row {
        let y = row as f32 * cell;
        gizmos.line_2d(
            Vec2::new(start_col as f32 * cell, y),
            Vec2::new(end_col as f32 * cell, y),
            grid_settings.line_color,
        );
    }
}

pub fn world_to_grid(world_pos: DVec2) -> GridPosition {
    // `as` saturates, so positions beyond the grid clamp to its edge cells.
    GridPosition::new(
        (world_pos.x / CELL_SIZE).floor() as i32,
        (world_pos.y / CELL_SIZE).floor() as i32,
    )
}

/// Origin corner of the cell, not its center.
pub fn grid_to_world(grid_pos: GridPosition) -> DVec2 {
    DVec2::new(f64::from(grid_pos.x) * CELL_SIZE, f64::from(grid_pos.y) * CELL_SIZE)
}

pub fn cell_center(grid_pos: GridPosition) -> DVec2 {
    grid_to_world(grid_pos) + DVec2::splat(CELL_SIZE / 2.0)
}

/// Mirrors the y axis. The mapping is its own inverse.
pub fn flip_y(pos: DVec2) -> DVec2 {
    DVec2::new(pos.x, -pos.y)
}

/// Planner world space (`+y` down, `f64`) to Bevy's render space
/// (`+y` up, `f32`).
pub fn to_render(pos: DVec2) -> Vec2 {
    flip_y(pos).as_vec2()
}

pub fn from_render(pos: Vec2) -> DVec2 {
    flip_y(pos.as_dvec2())
}
