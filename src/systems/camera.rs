use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::math::DVec2;
use bevy::prelude::*;

use crate::systems::grid::from_render;

#[derive(Component)]
pub struct CameraController {
    pub pan_speed: f32,
    pub zoom_step: f32,
    /// Smallest zoom factor; 1.0 is unscaled.
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            pan_speed: 500.0,
            zoom_step: 0.1,
            min_zoom: 0.5,
            max_zoom: 2.5,
        }
    }
}

impl CameraController {
    /// Applies one wheel step to a zoom factor. Positive `scroll` zooms in.
    pub fn step_zoom(&self, zoom: f32, scroll: f32) -> f32 {
        (zoom + scroll.signum() * self.zoom_step).clamp(self.min_zoom, self.max_zoom)
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (camera_pan, camera_zoom));
    }
}

/// Screen position to planner world space, or `None` when the position
/// falls outside the camera's viewport.
pub fn screen_to_world(camera: &Camera, camera_transform: &GlobalTransform, screen: Vec2) -> Option<DVec2> {
    camera
        .viewport_to_world_2d(camera_transform, screen)
        .ok()
        .map(from_render)
}

fn camera_pan(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut query: Query<(&mut Transform, &OrthographicProjection, &CameraController), With<Camera>>,
) {
    let Ok((mut transform, projection, controller)) = query.get_single_mut() else {
        return;
    };

    let mut pan_delta = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        pan_delta.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        pan_delta.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        pan_delta.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        pan_delta.x += 1.0;
    }

    if pan_delta != Vec2::ZERO {
        let step = pan_delta.normalize() * controller.pan_speed * time.delta_secs() * projection.scale;
        transform.translation += step.extend(0.0);
    }

    if mouse_button.pressed(MouseButton::Middle) {
        for motion in mouse_motion.read() {
            transform.translation.x -= motion.delta.x * projection.scale;
            transform.translation.y += motion.delta.y * projection.scale;
        }
    } else {
        mouse_motion.clear();
    }
}

fn camera_zoom(
    mut scroll_events: EventReader<MouseWheel>,
    mut query: Query<(&mut OrthographicProjection, &CameraController), With<Camera>>,
) {
    let Ok((mut projection, controller)) = query.get_single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        if event.y == 0.0 {
            continue;
        }
        // Projection scale is the inverse of the zoom factor.
        let zoom = controller.step_zoom(1.0 / projection.scale, event.y);
        projection.scale = 1.0 / zoom;
    }
}
