use bevy::math::DVec2;
use bevy::prelude::*;

use super::collision::colliding_buildings;
use super::footprint::{occupied_tiles, world_bounding_box};
use crate::components::{BoundingBox, BuildingDef, GridPosition, PlacedBuilding, PlacedBuildings};
use crate::systems::grid::world_to_grid;
use crate::systems::tool::PointerButton;

/// Which overlaps disqualify a placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayerPolicy {
    /// Any overlap blocks.
    Exclusive,
    /// Only overlaps with buildings on the candidate's object layer block.
    #[default]
    SameObjectLayer,
}

impl LayerPolicy {
    pub fn conflicts<'a>(self, object_layer: i32, colliders: Vec<&'a PlacedBuilding>) -> Vec<&'a PlacedBuilding> {
        match self {
            LayerPolicy::Exclusive => colliders,
            LayerPolicy::SameObjectLayer => colliders
                .into_iter()
                .filter(|building| building.object_layer == object_layer)
                .collect(),
        }
    }
}

/// Advisory result for the current pointer cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPreview {
    pub grid: GridPosition,
    pub bounds: BoundingBox,
    pub tiles: Vec<GridPosition>,
    pub is_valid_placement: bool,
    /// Display names of the blocking buildings.
    pub conflicts: Vec<String>,
    pub conflict_message: String,
}

impl PlacementPreview {
    /// `None` when the footprint at `grid` does not fit on the `i32` grid.
    pub fn compute(
        building: &BuildingDef,
        grid: GridPosition,
        placed: &[PlacedBuilding],
        policy: LayerPolicy,
    ) -> Option<Self> {
        let bounds = world_bounding_box(building, grid)?;
        let tiles = occupied_tiles(building, grid)?;
        let colliders = colliding_buildings(&bounds, placed);
        let conflicts: Vec<String> = policy
            .conflicts(building.object_layer, colliders)
            .into_iter()
            .map(|collider| collider.display_name.clone())
            .collect();

        Some(Self {
            grid,
            bounds,
            tiles,
            is_valid_placement: conflicts.is_empty(),
            conflict_message: conflicts.join(", "),
            conflicts,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlacementState {
    #[default]
    Idle,
    Previewing {
        building: BuildingDef,
        preview: Option<PlacementPreview>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Placed {
        grid: GridPosition,
        building: PlacedBuilding,
    },
    /// The candidate overlaps a blocking building; nothing was written.
    Rejected { conflicts: Vec<String> },
    Cancelled,
    Ignored,
}

/// Preview-and-commit state machine for one selected building.
#[derive(Resource, Debug, Default)]
pub struct PlacementSession {
    state: PlacementState,
    policy: LayerPolicy,
}

impl PlacementSession {
    pub fn new(policy: LayerPolicy) -> Self {
        Self {
            state: PlacementState::Idle,
            policy,
        }
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn policy(&self) -> LayerPolicy {
        self.policy
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self.state, PlacementState::Previewing { .. })
    }

    pub fn building(&self) -> Option<&BuildingDef> {
        match &self.state {
            PlacementState::Previewing { building, .. } => Some(building),
            PlacementState::Idle => None,
        }
    }

    pub fn preview(&self) -> Option<&PlacementPreview> {
        match &self.state {
            PlacementState::Previewing { preview, .. } => preview.as_ref(),
            PlacementState::Idle => None,
        }
    }

    pub fn is_valid_placement(&self) -> bool {
        self.preview().is_some_and(|preview| preview.is_valid_placement)
    }

    pub fn begin(&mut self, building: BuildingDef) {
        self.state = PlacementState::Previewing {
            building,
            preview: None,
        };
    }

    /// Snaps `world_pos` and re-evaluates the candidate against `placed`.
    /// A footprint that leaves the grid clears the preview, so nothing can
    /// be committed there.
    pub fn update_preview(&mut self, world_pos: DVec2, placed: &[PlacedBuilding]) -> Option<&PlacementPreview> {
        let policy = self.policy;
        let PlacementState::Previewing { building, preview } = &mut self.state else {
            return None;
        };
        let grid = world_to_grid(world_pos);
        *preview = PlacementPreview::compute(building, grid, placed, policy);
        preview.as_ref()
    }

    /// Primary commits at the clicked cell, secondary cancels.
    pub fn click(&mut self, button: PointerButton, world_pos: DVec2, placed: &mut PlacedBuildings) -> PlacementOutcome {
        if !self.is_previewing() {
            return PlacementOutcome::Ignored;
        }
        match button {
            PointerButton::Primary => {
                self.update_preview(world_pos, placed.as_slice());
                self.commit(placed)
            }
            PointerButton::Secondary => self.cancel(),
            PointerButton::Middle => PlacementOutcome::Ignored,
        }
    }

    /// Appends the previewed building when the preview is valid. An invalid
    /// or missing preview leaves both the session and `placed` untouched.
    pub fn commit(&mut self, placed: &mut PlacedBuildings) -> PlacementOutcome {
        let PlacementState::Previewing {
            building,
            preview: Some(preview),
        } = &self.state
        else {
            return PlacementOutcome::Ignored;
        };

        if !preview.is_valid_placement {
            return PlacementOutcome::Rejected {
                conflicts: preview.conflicts.clone(),
            };
        }

        let grid = preview.grid;
        let record = PlacedBuilding::from_def(building, preview.bounds);
        placed.push(record.clone());
        self.state = PlacementState::Idle;

        PlacementOutcome::Placed {
            grid,
            building: record,
        }
    }

    pub fn cancel(&mut self) -> PlacementOutcome {
        match std::mem::take(&mut self.state) {
            PlacementState::Previewing { .. } => PlacementOutcome::Cancelled,
            PlacementState::Idle => PlacementOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::object_layer;
    use crate::systems::grid::grid_to_world;

    fn at(x: i32, y: i32) -> DVec2 {
        grid_to_world(GridPosition::new(x, y)) + DVec2::splat(1.0)
    }

    fn square(name: &str, object_layer: i32) -> BuildingDef {
        BuildingDef::rectangle(name, name, 2, 2, object_layer)
    }

    #[test]
    fn idle_session_ignores_input() {
        let mut session = PlacementSession::default();
        let mut placed = PlacedBuildings::default();
        assert!(session.update_preview(at(0, 0), placed.as_slice()).is_none());
        assert_eq!(
            session.click(PointerButton::Primary, at(0, 0), &mut placed),
            PlacementOutcome::Ignored
        );
        assert_eq!(session.cancel(), PlacementOutcome::Ignored);
        assert!(placed.is_empty());
    }

    #[test]
    fn commit_without_preview_is_ignored() {
        let mut session = PlacementSession::default();
        let mut placed = PlacedBuildings::default();
        session.begin(square("X", object_layer::BUILDING));
        assert_eq!(session.commit(&mut placed), PlacementOutcome::Ignored);
        assert!(session.is_previewing());
    }

    #[test]
    fn layer_policy_blocks_same_layer_only() {
        let mut session = PlacementSession::default();
        let mut placed = PlacedBuildings::default();

        session.begin(square("X", 1));
        assert!(matches!(
            session.click(PointerButton::Primary, at(0, 0), &mut placed),
            PlacementOutcome::Placed { .. }
        ));
        assert!(!session.is_previewing());

        session.begin(square("Y", 1));
        let preview = session.update_preview(at(1, 1), placed.as_slice()).unwrap();
        assert!(!preview.is_valid_placement);
        assert_eq!(preview.conflict_message, "X");
        assert_eq!(
            session.click(PointerButton::Primary, at(1, 1), &mut placed),
            PlacementOutcome::Rejected {
                conflicts: vec!["X".to_string()]
            }
        );
        assert_eq!(placed.len(), 1);
        assert!(session.is_previewing());

        session.begin(square("Z", 2));
        assert!(session.update_preview(at(1, 1), placed.as_slice()).unwrap().is_valid_placement);
        assert!(matches!(
            session.click(PointerButton::Primary, at(1, 1), &mut placed),
            PlacementOutcome::Placed { .. }
        ));
        assert_eq!(placed.len(), 2);
    }

    #[test]
    fn exclusive_policy_blocks_any_layer() {
        let mut session = PlacementSession::new(LayerPolicy::Exclusive);
        let mut placed = PlacedBuildings::default();
        session.begin(square("floor", 2));
        session.click(PointerButton::Primary, at(0, 0), &mut placed);

        session.begin(square("pump", 1));
        let preview = session.update_preview(at(0, 0), placed.as_slice()).unwrap();
        assert!(!preview.is_valid_placement);
        assert_eq!(preview.conflicts, vec!["floor".to_string()]);
    }

    #[test]
    fn conflict_message_joins_same_layer_names() {
        let mut placed = PlacedBuildings::default();
        for (name, layer, x) in [("A", 1, 0), ("B", 2, 1), ("C", 1, 1)] {
            let def = square(name, layer);
            placed.push(PlacedBuilding::from_def(&def, world_bounding_box(&def, GridPosition::new(x, 0)).unwrap()));
        }
        let preview = PlacementPreview::compute(
            &square("D", 1),
            GridPosition::new(0, 0),
            placed.as_slice(),
            LayerPolicy::SameObjectLayer,
        )
        .unwrap();
        assert_eq!(preview.conflict_message, "A, C");
    }

    #[test]
    fn committed_record_uses_footprint_box() {
        let mut session = PlacementSession::default();
        let mut placed = PlacedBuildings::default();
        let def = square("Generator", 1).with_category(crate::components::Category::Power);
        session.begin(def.clone());

        let PlacementOutcome::Placed { grid, building } =
            session.click(PointerButton::Primary, at(3, 4), &mut placed)
        else {
            panic!("expected placement");
        };
        assert_eq!(grid, GridPosition::new(3, 4));
        assert_eq!(Some(building.bounding_box()), world_bounding_box(&def, grid));
        assert_eq!(building.category, def.category);
        assert_eq!(placed.as_slice(), &[building]);
    }

    #[test]
    fn secondary_click_cancels_without_mutation() {
        let mut session = PlacementSession::default();
        let mut placed = PlacedBuildings::default();
        session.begin(square("X", 1));
        session.update_preview(at(0, 0), placed.as_slice());
        assert_eq!(
            session.click(PointerButton::Secondary, at(0, 0), &mut placed),
            PlacementOutcome::Cancelled
        );
        assert_eq!(session.state(), &PlacementState::Idle);
        assert!(placed.is_empty());
    }

    #[test]
    fn pointer_past_the_grid_edge_cannot_commit() {
        let mut session = PlacementSession::default();
        let mut placed = PlacedBuildings::default();
        session.begin(square("X", 1));

        let far = DVec2::new(9e10, 0.0);
        assert!(session.update_preview(far, placed.as_slice()).is_none());
        assert!(!session.is_valid_placement());
        assert_eq!(
            session.click(PointerButton::Primary, far, &mut placed),
            PlacementOutcome::Ignored
        );
        assert!(placed.is_empty());
        assert!(session.is_previewing());

        // Back on the grid the preview recovers.
        assert!(session.update_preview(at(0, 0), placed.as_slice()).is_some());
    }
}
