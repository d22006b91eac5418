use bevy::prelude::*;

use crate::components::{GridPosition, NetworkKind};
use crate::systems::building::PlacementCancelled;
use crate::systems::tool::{PlannerSet, PointerButton, PointerPhase, PointerSample, ToolState};

pub mod adjacency;
pub mod connection;
pub mod pattern;

pub use adjacency::*;
pub use connection::*;
pub use pattern::*;

/// One edge laid down while dragging.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionFormed {
    pub network: NetworkKind,
    pub from: GridPosition,
    pub to: GridPosition,
}

/// Sent when a drag ends on a fresh cell, carrying the final step.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragCompleted {
    pub network: NetworkKind,
    pub start: GridPosition,
    pub end: GridPosition,
}

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Networks>()
            .init_resource::<ConnectionSession>()
            .add_event::<ConnectionFormed>()
            .add_event::<DragCompleted>()
            .add_systems(Update, handle_conduit_drag.in_set(PlannerSet::Interact));
    }
}

fn handle_conduit_drag(
    mut samples: EventReader<PointerSample>,
    mut session: ResMut<ConnectionSession>,
    mut networks: ResMut<Networks>,
    mut tool_state: ResMut<ToolState>,
    mut formed_events: EventWriter<ConnectionFormed>,
    mut completed_events: EventWriter<DragCompleted>,
    mut cancel_events: EventWriter<PlacementCancelled>,
) {
    for sample in samples.read() {
        let Some(network) = session.target().map(|target| target.network) else {
            continue;
        };

        match sample.phase {
            PointerPhase::Press(PointerButton::Secondary) => {
                session.deactivate();
                tool_state.clear();
                cancel_events.send(PlacementCancelled);
            }
            PointerPhase::Press(button) => {
                if let Err(err) = session.start_drag(button, sample.world) {
                    error!("Cannot start drag: {}", err);
                }
            }
            PointerPhase::Move => match session.move_drag(sample.world, &mut networks) {
                Ok(Some((from, to))) => {
                    debug!("Connected {} -> {} on {}", from, to, network.name());
                    formed_events.send(ConnectionFormed { network, from, to });
                }
                Ok(None) => {}
                Err(err) => error!("Rejected connection: {}", err),
            },
            PointerPhase::Release(PointerButton::Primary) => {
                match session.end_drag(sample.world, &mut networks) {
                    Ok(Some((start, end))) => {
                        info!("Finished {} drag at {}", network.name(), end);
                        formed_events.send(ConnectionFormed {
                            network,
                            from: start,
                            to: end,
                        });
                        completed_events.send(DragCompleted { network, start, end });
                    }
                    Ok(None) => {}
                    Err(err) => error!("Rejected connection: {}", err),
                }
            }
            PointerPhase::Release(_) => {}
        }
    }
}
