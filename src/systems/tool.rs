use bevy::math::DVec2;
use bevy::prelude::*;

use crate::components::{BuildingDef, GridPosition, NetworkKind};
use crate::systems::building::{PlacementCancelled, PlacementSession};
use crate::systems::catalog::BuildingCatalog;
use crate::systems::grid::world_to_grid;
use crate::systems::network::{ConduitTarget, ConnectionSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    pub fn from_mouse(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            MouseButton::Middle => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Move,
    Press(PointerButton),
    Release(PointerButton),
}

/// A pointer event already converted to planner world space (`+y` down).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub world: DVec2,
}

impl PointerSample {
    pub fn moved(world: DVec2) -> Self {
        Self {
            phase: PointerPhase::Move,
            world,
        }
    }

    pub fn pressed(button: PointerButton, world: DVec2) -> Self {
        Self {
            phase: PointerPhase::Press(button),
            world,
        }
    }

    pub fn released(button: PointerButton, world: DVec2) -> Self {
        Self {
            phase: PointerPhase::Release(button),
            world,
        }
    }
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum SelectBuilding {
    Index(usize),
    Name(String),
    Clear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlannerMode {
    #[default]
    View,
    Build,
}

#[derive(Resource, Debug, Default)]
pub struct ToolState {
    pub mode: PlannerMode,
    pub selected: Option<BuildingDef>,
}

impl ToolState {
    pub fn select(&mut self, building: BuildingDef) {
        self.mode = PlannerMode::Build;
        self.selected = Some(building);
    }

    pub fn clear(&mut self) {
        self.mode = PlannerMode::View;
        self.selected = None;
    }

    /// Network the selected conduit draws into, if it is drag-built.
    pub fn active_network(&self) -> Option<NetworkKind> {
        self.selected
            .as_ref()
            .filter(|def| def.is_drag_build)
            .map(|def| NetworkKind::for_category(def.category))
    }
}

/// Grid cell under the pointer as of the last move sample.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoveredCell(pub Option<GridPosition>);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlannerSet {
    /// Raw window input turned into `PointerSample`s.
    Input,
    Select,
    Interact,
}

pub struct ToolPlugin;

impl Plugin for ToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ToolState>()
            .init_resource::<HoveredCell>()
            .init_resource::<BuildingCatalog>()
            .add_event::<PointerSample>()
            .add_event::<SelectBuilding>()
            .configure_sets(
                Update,
                (PlannerSet::Input, PlannerSet::Select, PlannerSet::Interact).chain(),
            )
            .add_systems(
                Update,
                (apply_building_selection, track_hovered_cell).in_set(PlannerSet::Select),
            );
    }
}

fn apply_building_selection(
    mut requests: EventReader<SelectBuilding>,
    catalog: Res<BuildingCatalog>,
    mut tool_state: ResMut<ToolState>,
    mut placement: ResMut<PlacementSession>,
    mut connection: ResMut<ConnectionSession>,
    mut cancel_events: EventWriter<PlacementCancelled>,
) {
    for request in requests.read() {
        let building = match request {
            SelectBuilding::Index(index) => catalog.get(*index),
            SelectBuilding::Name(name) => catalog.find(name),
            SelectBuilding::Clear => None,
        };

        placement.cancel();
        connection.deactivate();

        let Some(building) = building.cloned() else {
            if *request != SelectBuilding::Clear {
                warn!("No catalog entry for {:?}", request);
            } else if tool_state.selected.is_some() {
                cancel_events.send(PlacementCancelled);
            }
            tool_state.clear();
            continue;
        };

        info!("Selected {}", building.display_name);
        if building.is_drag_build {
            connection.activate(ConduitTarget::from_def(&building));
        } else {
            placement.begin(building.clone());
        }
        tool_state.select(building);
    }
}

fn track_hovered_cell(mut samples: EventReader<PointerSample>, mut hovered: ResMut<HoveredCell>) {
    for sample in samples.read() {
        if sample.phase == PointerPhase::Move {
            hovered.0 = Some(world_to_grid(sample.world));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{object_layer, Category};

    #[test]
    fn mouse_buttons_map_to_pointer_buttons() {
        assert_eq!(PointerButton::from_mouse(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(PointerButton::from_mouse(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(PointerButton::from_mouse(MouseButton::Back), None);
    }

    #[test]
    fn only_drag_built_selections_have_a_network() {
        let mut tool_state = ToolState::default();
        assert_eq!(tool_state.active_network(), None);

        tool_state.select(BuildingDef::rectangle("Battery", "Battery", 1, 2, object_layer::BUILDING));
        assert_eq!(tool_state.mode, PlannerMode::Build);
        assert_eq!(tool_state.active_network(), None);

        tool_state.select(
            BuildingDef::rectangle("Wire", "Wire", 1, 1, object_layer::WIRE)
                .with_category(Category::Power)
                .drag_built(),
        );
        assert_eq!(tool_state.active_network(), Some(NetworkKind::Wires));

        tool_state.clear();
        assert_eq!(tool_state.mode, PlannerMode::View);
        assert!(tool_state.selected.is_none());
    }
}
