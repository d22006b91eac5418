use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::GridKeyError;

/// A cell on the infinite planner grid. `+y` points down, matching the
/// render-space convention used by placed buildings.
#[derive(
    Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_ivec2(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// `None` when the result leaves the `i32` grid.
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Canonical `"x,y"` key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for GridPosition {
    type Err = GridKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (x, y) = key
            .split_once(',')
            .ok_or_else(|| GridKeyError(key.to_string()))?;
        let x = x.trim().parse().map_err(|_| GridKeyError(key.to_string()))?;
        let y = y.trim().parse().map_err(|_| GridKeyError(key.to_string()))?;
        Ok(Self { x, y })
    }
}

impl From<IVec2> for GridPosition {
    fn from(value: IVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<GridPosition> for IVec2 {
    fn from(value: GridPosition) -> Self {
        value.to_ivec2()
    }
}

/// Named object layers from the game data. Only `object_layer` gates
/// placement exclusivity.
pub mod object_layer {
    pub const BUILDING: i32 = 1;
    pub const BACK_BUILDING: i32 = 2;
    pub const GAS_PIPE: i32 = 12;
    pub const GAS_BRIDGE: i32 = 15;
    pub const LIQUID_PIPE: i32 = 16;
    pub const LIQUID_BRIDGE: i32 = 19;
    pub const CONVEYOR_RAIL: i32 = 20;
    pub const CONVEYOR_BRIDGE: i32 = 23;
    pub const WIRE: i32 = 26;
    pub const WIRE_BRIDGE: i32 = 29;
    pub const LOGIC_GATE_AND_BRIDGE: i32 = 30;
    pub const LOGIC_WIRE: i32 = 31;
    pub const OIL_WELL: i32 = 38;
    pub const GANTRY: i32 = 39;
}

/// Build menu category as spelled in the catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Base,
    Oxygen,
    Power,
    Food,
    Plumbing,
    #[serde(rename = "hvac")]
    Ventilation,
    #[serde(rename = "refining")]
    Refinement,
    #[serde(rename = "medical")]
    Medicine,
    Furniture,
    #[serde(rename = "equipment")]
    Stations,
    Utilities,
    Automation,
    #[serde(rename = "conveyance")]
    Shipping,
    Rocketry,
    #[serde(other)]
    Unknown,
}

/// A catalog entry describing a placeable building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDef {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub texture_name: String,
    pub width: i32,
    pub height: i32,
    /// Tile-local cells relative to the anchor, `+y` up. Empty means the
    /// full `width x height` rectangle.
    #[serde(default)]
    pub placement_offset: Vec<GridPosition>,
    #[serde(default)]
    pub scene_layer: i32,
    #[serde(default)]
    pub object_layer: i32,
    #[serde(default)]
    pub tile_layer: i32,
    #[serde(default)]
    pub is_drag_build: bool,
    #[serde(default)]
    pub category: Option<Category>,
}

impl BuildingDef {
    /// A plain rectangular building with no explicit offsets.
    pub fn rectangle(name: &str, display_name: &str, width: i32, height: i32, object_layer: i32) -> Self {
        Self {
            id: name.to_lowercase(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            texture_name: name.to_string(),
            width,
            height,
            placement_offset: Vec::new(),
            scene_layer: 0,
            object_layer,
            tile_layer: 0,
            is_drag_build: false,
            category: None,
        }
    }

    pub fn with_offsets(mut self, offsets: impl IntoIterator<Item = (i32, i32)>) -> Self {
        self.placement_offset = offsets
            .into_iter()
            .map(|(x, y)| GridPosition::new(x, y))
            .collect();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn drag_built(mut self) -> Self {
        self.is_drag_build = true;
        self
    }

    pub fn has_explicit_offsets(&self) -> bool {
        !self.placement_offset.is_empty()
    }
}

/// Axis-aligned extent of a footprint in its local (`+y` up) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

/// Grid-space box stored on committed buildings. `bottom_right` is exclusive
/// for tile containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: GridPosition,
    pub bottom_right: GridPosition,
}

impl BoundingBox {
    pub fn new(top_left: GridPosition, bottom_right: GridPosition) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.bottom_right.x) - i64::from(self.top_left.x)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom_right.y) - i64::from(self.top_left.y)
    }

    /// Half-open containment: `x in [left, right)`, `y in [top, bottom)`.
    pub fn contains_tile(&self, x: i32, y: i32) -> bool {
        x >= self.top_left.x
            && x < self.bottom_right.x
            && y >= self.top_left.y
            && y < self.bottom_right.y
    }
}

/// A committed building. Never mutated after the placement session
/// appends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBuilding {
    pub display_name: String,
    pub top_left: GridPosition,
    pub bottom_right: GridPosition,
    pub scene_layer: i32,
    pub object_layer: i32,
    pub tile_layer: i32,
    pub category: Option<Category>,
}

impl PlacedBuilding {
    pub fn from_def(def: &BuildingDef, bounds: BoundingBox) -> Self {
        Self {
            display_name: def.display_name.clone(),
            top_left: bounds.top_left,
            bottom_right: bounds.bottom_right,
            scene_layer: def.scene_layer,
            object_layer: def.object_layer,
            tile_layer: def.tile_layer,
            category: def.category,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.top_left, self.bottom_right)
    }
}

/// Ordered collection of committed buildings. Collision queries re-scan it on
/// every call, so external removal is always safe between events.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlacedBuildings {
    buildings: Vec<PlacedBuilding>,
}

impl PlacedBuildings {
    pub fn push(&mut self, building: PlacedBuilding) {
        self.buildings.push(building);
    }

    pub fn remove(&mut self, index: usize) -> Option<PlacedBuilding> {
        (index < self.buildings.len()).then(|| self.buildings.remove(index))
    }

    pub fn retain(&mut self, keep: impl FnMut(&PlacedBuilding) -> bool) {
        self.buildings.retain(keep);
    }

    pub fn as_slice(&self) -> &[PlacedBuilding] {
        &self.buildings
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedBuilding> {
        self.buildings.iter()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn clear(&mut self) {
        self.buildings.clear();
    }
}
