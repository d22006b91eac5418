use bevy::prelude::*;

use crate::components::{GridPosition, PlacedBuilding, PlacedBuildings};
use crate::systems::tool::{PlannerSet, PointerPhase, PointerSample, ToolState};

pub mod collision;
pub mod footprint;
pub mod placement;

pub use collision::*;
pub use footprint::*;
pub use placement::*;

/// Sent after a building is appended to `PlacedBuildings`.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BuildingPlaced {
    pub grid: GridPosition,
    pub building: PlacedBuilding,
}

/// Sent when the user backs out of the current tool.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementCancelled;

pub struct BuildingPlugin;

impl Plugin for BuildingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacedBuildings>()
            .init_resource::<PlacementSession>()
            .add_event::<BuildingPlaced>()
            .add_event::<PlacementCancelled>()
            .add_systems(Update, handle_building_placement.in_set(PlannerSet::Interact));
    }
}

fn handle_building_placement(
    mut samples: EventReader<PointerSample>,
    mut session: ResMut<PlacementSession>,
    mut placed: ResMut<PlacedBuildings>,
    mut tool_state: ResMut<ToolState>,
    mut placed_events: EventWriter<BuildingPlaced>,
    mut cancel_events: EventWriter<PlacementCancelled>,
) {
    for sample in samples.read() {
        if !session.is_previewing() {
            continue;
        }

        let button = match sample.phase {
            PointerPhase::Move => {
                session.update_preview(sample.world, placed.as_slice());
                continue;
            }
            PointerPhase::Press(button) => button,
            PointerPhase::Release(_) => continue,
        };

        match session.click(button, sample.world, &mut placed) {
            PlacementOutcome::Placed { grid, building } => {
                info!("Placed {} at {}", building.display_name, grid);
                placed_events.send(BuildingPlaced { grid, building });

                // Keep building the same thing while it stays selected.
                if let Some(selected) = tool_state.selected.clone() {
                    session.begin(selected);
                    session.update_preview(sample.world, placed.as_slice());
                }
            }
            PlacementOutcome::Rejected { conflicts } => {
                debug!("Placement blocked by {}", conflicts.join(", "));
            }
            PlacementOutcome::Cancelled => {
                tool_state.clear();
                cancel_events.send(PlacementCancelled);
            }
            PlacementOutcome::Ignored => {}
        }
    }
}
