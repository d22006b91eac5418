use bevy::prelude::*;

use grid_planner::systems::{CameraController, CameraPlugin, CatalogPlugin, GridPlugin, InputPlugin, OverlayPlugin};
use grid_planner::ui::StatusDisplayPlugin;
use grid_planner::PlannerPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Grid Planner".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            PlannerPlugin,
            CatalogPlugin,
            GridPlugin,
            CameraPlugin,
            InputPlugin,
            OverlayPlugin,
            StatusDisplayPlugin,
        ))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, 0.0, 999.9),
        CameraController::default(),
    ));
}
