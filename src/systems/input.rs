use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::systems::camera::screen_to_world;
use crate::systems::tool::{PlannerSet, PointerButton, PointerSample, SelectBuilding};

const SELECT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Turns window cursor, mouse and keyboard state into planner events.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (select_on_hotkey, emit_pointer_samples).in_set(PlannerSet::Input),
        );
    }
}

fn emit_pointer_samples(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut samples: EventWriter<PointerSample>,
    mut last_world: Local<Option<DVec2>>,
) {
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Some(world) = window
        .cursor_position()
        .and_then(|cursor| screen_to_world(camera, camera_transform, cursor))
    else {
        return;
    };

    if *last_world != Some(world) {
        samples.send(PointerSample::moved(world));
        *last_world = Some(world);
    }

    for mouse in [MouseButton::Left, MouseButton::Right] {
        let Some(button) = PointerButton::from_mouse(mouse) else {
            continue;
        };
        if mouse_buttons.just_pressed(mouse) {
            samples.send(PointerSample::pressed(button, world));
        }
        if mouse_buttons.just_released(mouse) {
            samples.send(PointerSample::released(button, world));
        }
    }
}

fn select_on_hotkey(keys: Res<ButtonInput<KeyCode>>, mut requests: EventWriter<SelectBuilding>) {
    for (index, key) in SELECT_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) {
            requests.send(SelectBuilding::Index(index));
        }
    }
    if keys.just_pressed(KeyCode::Escape) {
        requests.send(SelectBuilding::Clear);
    }
}
