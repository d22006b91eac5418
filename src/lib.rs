use bevy::prelude::*;

pub mod components;
pub mod error;
pub mod systems;
pub mod ui;

pub use error::{PlannerError, Result};

use systems::{BuildingPlugin, NetworkPlugin, ToolPlugin};

/// Placement, networks and tool selection without any window or render
/// dependency. Feed it `PointerSample` and `SelectBuilding` events.
pub struct PlannerPlugin;

impl Plugin for PlannerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ToolPlugin, BuildingPlugin, NetworkPlugin));
    }
}
