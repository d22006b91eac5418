use bevy::math::DVec2;
use bevy::prelude::*;

use super::adjacency::{AdjacencyGraph, Networks};
use super::pattern::texture_name;
use crate::components::{BuildingDef, GridPosition, NetworkKind, NodeMetadata};
use crate::error::{PlannerError, Result};
use crate::systems::grid::world_to_grid;
use crate::systems::tool::PointerButton;

/// The conduit being drawn and the graph it writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConduitTarget {
    pub network: NetworkKind,
    pub display_name: String,
    pub texture_name: String,
}

impl ConduitTarget {
    pub fn from_def(building: &BuildingDef) -> Self {
        Self {
            network: NetworkKind::for_category(building.category),
            display_name: building.display_name.clone(),
            texture_name: building.texture_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Cell where the drag began.
        origin: GridPosition,
        /// Last cell joined to the network; advances with every step.
        anchor: GridPosition,
    },
}

/// Drag-to-connect state machine. Each sample that lands on a new cell links
/// it to the previous one, so a drag lays down a chain of single steps.
#[derive(Resource, Debug, Default)]
pub struct ConnectionSession {
    target: Option<ConduitTarget>,
    state: DragState,
}

impl ConnectionSession {
    pub fn activate(&mut self, target: ConduitTarget) {
        self.target = Some(target);
        self.state = DragState::Idle;
    }

    pub fn deactivate(&mut self) {
        self.target = None;
        self.state = DragState::Idle;
    }

    pub fn target(&self) -> Option<&ConduitTarget> {
        self.target.as_ref()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn anchor(&self) -> Option<GridPosition> {
        match self.state {
            DragState::Dragging { anchor, .. } => Some(anchor),
            DragState::Idle => None,
        }
    }

    /// Begins a drag on primary press. Other buttons are ignored and return
    /// `Ok(false)`.
    pub fn start_drag(&mut self, button: PointerButton, world_pos: DVec2) -> Result<bool> {
        if button != PointerButton::Primary {
            return Ok(false);
        }
        let cell = world_to_grid(world_pos);
        if self.target.is_none() {
            return Err(PlannerError::InvalidConnection {
                from: cell,
                to: cell,
                reason: "no active network",
            });
        }
        self.state = DragState::Dragging {
            origin: cell,
            anchor: cell,
        };
        Ok(true)
    }

    /// Links the anchor to the sampled cell when they differ and advances the
    /// anchor. Returns the edge that was formed.
    pub fn move_drag(&mut self, world_pos: DVec2, networks: &mut Networks) -> Result<Option<(GridPosition, GridPosition)>> {
        let (DragState::Dragging { origin, anchor }, Some(target)) = (self.state, self.target.as_ref()) else {
            return Ok(None);
        };

        let cell = world_to_grid(world_pos);
        if cell == anchor {
            return Ok(None);
        }

        // TODO: split diagonal samples into two orthogonal steps once conduits
        // are restricted to 4-connectivity.
        link(networks.get_mut(target.network), target, anchor, cell)?;
        self.state = DragState::Dragging { origin, anchor: cell };
        Ok(Some((anchor, cell)))
    }

    /// Finishes the drag, forming one last edge if the release cell is new.
    /// Returns that final `(anchor, end)` pair for completion handlers.
    pub fn end_drag(&mut self, world_pos: DVec2, networks: &mut Networks) -> Result<Option<(GridPosition, GridPosition)>> {
        let state = std::mem::take(&mut self.state);
        let (DragState::Dragging { anchor, .. }, Some(target)) = (state, self.target.as_ref()) else {
            return Ok(None);
        };

        let cell = world_to_grid(world_pos);
        if cell == anchor {
            return Ok(None);
        }

        link(networks.get_mut(target.network), target, anchor, cell)?;
        Ok(Some((anchor, cell)))
    }

    pub fn cancel_drag(&mut self) {
        self.state = DragState::Idle;
    }
}

fn link(graph: &mut AdjacencyGraph, target: &ConduitTarget, from: GridPosition, to: GridPosition) -> Result<()> {
    graph.add_connection(from, to)?;
    refresh_node(graph, target, from);
    refresh_node(graph, target, to);
    Ok(())
}

/// Recomputes the node's pattern and the texture alias derived from it.
pub fn refresh_node(graph: &mut AdjacencyGraph, target: &ConduitTarget, pos: GridPosition) {
    let pattern = graph.pattern(pos);
    graph.update_metadata(
        pos,
        NodeMetadata {
            display_name: Some(target.display_name.clone()),
            texture: Some(texture_name(&target.texture_name, pattern)),
            pattern: Some(pattern.to_pattern_code(true)),
        },
    );
}
