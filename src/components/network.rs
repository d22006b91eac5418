use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::building::Category;

/// Which adjacency graph a conduit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkKind {
    Pipes,
    Wires,
    Conveyors,
    Other,
}

impl NetworkKind {
    pub const ALL: [NetworkKind; 4] = [
        NetworkKind::Pipes,
        NetworkKind::Wires,
        NetworkKind::Conveyors,
        NetworkKind::Other,
    ];

    pub fn index(self) -> usize {
        match self {
            NetworkKind::Pipes => 0,
            NetworkKind::Wires => 1,
            NetworkKind::Conveyors => 2,
            NetworkKind::Other => 3,
        }
    }

    /// Category lookup table. Total: anything unlisted lands in `Other`.
    pub fn for_category(category: Option<Category>) -> Self {
        match category {
            Some(Category::Plumbing | Category::Ventilation) => NetworkKind::Pipes,
            Some(Category::Power | Category::Automation) => NetworkKind::Wires,
            Some(Category::Shipping) => NetworkKind::Conveyors,
            _ => NetworkKind::Other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NetworkKind::Pipes => "pipes",
            NetworkKind::Wires => "wires",
            NetworkKind::Conveyors => "conveyors",
            NetworkKind::Other => "other",
        }
    }

    pub fn color(self) -> Color {
        match self {
            NetworkKind::Pipes => Color::srgb(0.3, 0.6, 1.0),
            NetworkKind::Wires => Color::srgb(1.0, 0.85, 0.2),
            NetworkKind::Conveyors => Color::srgb(0.8, 0.5, 0.2),
            NetworkKind::Other => Color::srgb(0.7, 0.7, 0.7),
        }
    }
}

/// Render hints carried by an adjacency node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub display_name: Option<String>,
    pub texture: Option<String>,
    pub pattern: Option<String>,
}

impl NodeMetadata {
    /// Shallow merge: fields set in `patch` replace ours, unset ones are kept.
    pub fn merge(&mut self, patch: NodeMetadata) {
        if patch.display_name.is_some() {
            self.display_name = patch.display_name;
        }
        if patch.texture.is_some() {
            self.texture = patch.texture;
        }
        if patch.pattern.is_some() {
            self.pattern = patch.pattern;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_to_networks() {
        assert_eq!(NetworkKind::for_category(Some(Category::Plumbing)), NetworkKind::Pipes);
        assert_eq!(NetworkKind::for_category(Some(Category::Ventilation)), NetworkKind::Pipes);
        assert_eq!(NetworkKind::for_category(Some(Category::Power)), NetworkKind::Wires);
        assert_eq!(NetworkKind::for_category(Some(Category::Automation)), NetworkKind::Wires);
        assert_eq!(NetworkKind::for_category(Some(Category::Shipping)), NetworkKind::Conveyors);
        assert_eq!(NetworkKind::for_category(Some(Category::Food)), NetworkKind::Other);
        assert_eq!(NetworkKind::for_category(Some(Category::Unknown)), NetworkKind::Other);
        assert_eq!(NetworkKind::for_category(None), NetworkKind::Other);
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let mut meta = NodeMetadata {
            display_name: Some("Gas Pipe".into()),
            texture: Some("gas_pipe_L".into()),
            pattern: Some("L".into()),
        };
        meta.merge(NodeMetadata {
            pattern: Some("LR".into()),
            ..default()
        });
        assert_eq!(meta.display_name.as_deref(), Some("Gas Pipe"));
        assert_eq!(meta.texture.as_deref(), Some("gas_pipe_L"));
        assert_eq!(meta.pattern.as_deref(), Some("LR"));
    }
}
