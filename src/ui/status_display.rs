use bevy::prelude::*;

use crate::systems::building::PlacementSession;
use crate::systems::tool::{HoveredCell, PlannerMode, ToolState};

#[derive(Component)]
pub struct StatusDisplay;

pub struct StatusDisplayPlugin;

impl Plugin for StatusDisplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_status_display)
            .add_systems(Update, update_status_display);
    }
}

fn setup_status_display(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.9)),
            StatusDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("View"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));
        });
}

pub fn status_line(tool_state: &ToolState, hovered: &HoveredCell, session: &PlacementSession) -> String {
    let mut line = match (tool_state.mode, &tool_state.selected) {
        (PlannerMode::Build, Some(building)) => format!("Build: {}", building.display_name),
        _ => "View".to_string(),
    };
    if let Some(cell) = hovered.0 {
        line.push_str(&format!("  [{}]", cell));
    }
    if let Some(preview) = session.preview().filter(|preview| !preview.is_valid_placement) {
        line.push_str(&format!("\nBlocked by {}", preview.conflict_message));
    }
    line
}

fn update_status_display(
    tool_state: Res<ToolState>,
    hovered: Res<HoveredCell>,
    session: Res<PlacementSession>,
    query: Query<&Children, With<StatusDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !(tool_state.is_changed() || hovered.is_changed() || session.is_changed()) {
        return;
    }

    let line = status_line(&tool_state, &hovered, &session);
    for children in &query {
        for &child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                **text = line.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{object_layer, BuildingDef, GridPosition};

    #[test]
    fn status_shows_mode_and_cell() {
        let mut tool_state = ToolState::default();
        let session = PlacementSession::default();
        assert_eq!(status_line(&tool_state, &HoveredCell(None), &session), "View");

        tool_state.select(BuildingDef::rectangle("Battery", "Battery", 1, 2, object_layer::BUILDING));
        let hovered = HoveredCell(Some(GridPosition::new(3, -2)));
        assert_eq!(status_line(&tool_state, &hovered, &session), "Build: Battery  [3,-2]");
    }
}
