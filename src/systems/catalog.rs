use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::components::{object_layer, BuildingDef, Category, GridPosition};
use crate::error::{PlannerError, Result};

#[derive(Resource)]
pub struct CatalogConfig {
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "assets/catalog/buildings.json".to_string(),
        }
    }
}

/// Buildings available for selection, in menu order.
#[derive(Resource, Debug, Clone, Default)]
pub struct BuildingCatalog {
    entries: Vec<BuildingDef>,
}

impl BuildingCatalog {
    pub fn new(entries: Vec<BuildingDef>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_entries())
    }

    pub fn get(&self, index: usize) -> Option<&BuildingDef> {
        self.entries.get(index)
    }

    /// Looks an entry up by its id, name or display name.
    pub fn find(&self, name: &str) -> Option<&BuildingDef> {
        self.entries
            .iter()
            .find(|def| def.id == name || def.name == name || def.display_name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildingDef> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CatalogConfig>()
            .init_resource::<BuildingCatalog>()
            .add_systems(Startup, load_building_catalog);
    }
}

fn load_building_catalog(config: Res<CatalogConfig>, mut catalog: ResMut<BuildingCatalog>) {
    match load_catalog(&config.path) {
        Ok(entries) if !entries.is_empty() => {
            info!("Loaded {} buildings from {}", entries.len(), config.path);
            *catalog = BuildingCatalog::new(entries);
        }
        Ok(_) => {
            warn!("Catalog {} has no usable entries. Using built-in catalog.", config.path);
            *catalog = BuildingCatalog::builtin();
        }
        Err(err) => {
            warn!("Failed to load catalog {}: {}. Using built-in catalog.", config.path, err);
            *catalog = BuildingCatalog::builtin();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawOffset {
    x: f64,
    y: f64,
}

/// Catalog record as written on disk. Offsets are plain JSON numbers and only
/// become grid cells once validated.
#[derive(Debug, Clone, Deserialize)]
struct RawBuildingDef {
    #[serde(default)]
    id: String,
    name: String,
    display_name: String,
    #[serde(default)]
    texture_name: String,
    width: i32,
    height: i32,
    #[serde(default)]
    placement_offset: Option<Vec<RawOffset>>,
    #[serde(default)]
    scene_layer: i32,
    #[serde(default)]
    object_layer: i32,
    #[serde(default)]
    tile_layer: i32,
    #[serde(default)]
    is_drag_build: bool,
    #[serde(default)]
    category: Option<Category>,
}

impl RawBuildingDef {
    fn into_def(self) -> Result<BuildingDef> {
        let name = self.name;
        let invalid = |reason: String| PlannerError::InvalidFootprint {
            building: name.clone(),
            reason,
        };

        let offsets = self.placement_offset.unwrap_or_default();
        let mut placement_offset = Vec::with_capacity(offsets.len());
        for offset in &offsets {
            let (Some(x), Some(y)) = (whole_cell(offset.x), whole_cell(offset.y)) else {
                return Err(invalid(format!(
                    "offset ({}, {}) is not a whole cell",
                    offset.x, offset.y
                )));
            };
            placement_offset.push(GridPosition::new(x, y));
        }

        if placement_offset.is_empty() && (self.width < 1 || self.height < 1) {
            return Err(invalid(format!(
                "rectangle footprint needs a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if placement_offset.is_empty() && self.width.checked_mul(self.height).is_none() {
            return Err(invalid(format!(
                "rectangle footprint {}x{} has too many tiles",
                self.width, self.height
            )));
        }

        let texture_name = if self.texture_name.is_empty() {
            name.clone()
        } else {
            self.texture_name
        };

        Ok(BuildingDef {
            id: self.id,
            name,
            display_name: self.display_name,
            texture_name,
            width: self.width,
            height: self.height,
            placement_offset,
            scene_layer: self.scene_layer,
            object_layer: self.object_layer,
            tile_layer: self.tile_layer,
            is_drag_build: self.is_drag_build,
            category: self.category,
        })
    }
}

fn whole_cell(value: f64) -> Option<i32> {
    let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i32)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<BuildingDef>> {
    let contents = fs::read_to_string(path)?;
    parse_catalog(&contents)
}

/// Parses a JSON array of catalog records. Records that fail validation are
/// logged and skipped; only a malformed document is an error.
pub fn parse_catalog(json: &str) -> Result<Vec<BuildingDef>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut entries = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let parsed = serde_json::from_value::<RawBuildingDef>(record)
            .map_err(PlannerError::from)
            .and_then(RawBuildingDef::into_def);
        match parsed {
            Ok(def) => entries.push(def),
            Err(err) => warn!("Skipping catalog entry {}: {}", index, err),
        }
    }

    Ok(entries)
}

fn builtin_entries() -> Vec<BuildingDef> {
    vec![
        BuildingDef::rectangle("ManualGenerator", "Manual Generator", 2, 2, object_layer::BUILDING)
            .with_category(Category::Power),
        BuildingDef::rectangle("Battery", "Battery", 1, 2, object_layer::BUILDING)
            .with_category(Category::Power),
        BuildingDef::rectangle("Headquarters", "Printing Pod", 4, 4, object_layer::BUILDING)
            .with_offsets((-1..=2).flat_map(|x| (0..=3).map(move |y| (x, y))))
            .with_category(Category::Base),
        BuildingDef::rectangle("Tile", "Tile", 1, 1, object_layer::BACK_BUILDING)
            .with_category(Category::Base),
        BuildingDef::rectangle("GasConduit", "Gas Pipe", 1, 1, object_layer::GAS_PIPE)
            .with_category(Category::Ventilation)
            .drag_built(),
        BuildingDef::rectangle("LiquidConduit", "Liquid Pipe", 1, 1, object_layer::LIQUID_PIPE)
            .with_category(Category::Plumbing)
            .drag_built(),
        BuildingDef::rectangle("Wire", "Wire", 1, 1, object_layer::WIRE)
            .with_category(Category::Power)
            .drag_built(),
        BuildingDef::rectangle("SolidConduit", "Conveyor Rail", 1, 1, object_layer::CONVEYOR_RAIL)
            .with_category(Category::Shipping)
            .drag_built(),
        BuildingDef::rectangle("LogicWire", "Automation Wire", 1, 1, object_layer::LOGIC_WIRE)
            .with_category(Category::Automation)
            .drag_built(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rectangle_and_offset_records() {
        let json = r#"[
            {"name": "Battery", "display_name": "Battery", "width": 1, "height": 2,
             "object_layer": 1, "category": "power"},
            {"name": "Corner", "display_name": "Corner", "width": 2, "height": 2,
             "placement_offset": [{"x": 0, "y": 0}, {"x": 1.0, "y": 0}, {"x": 0, "y": 1}]}
        ]"#;
        let entries = parse_catalog(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, Some(Category::Power));
        assert_eq!(entries[0].texture_name, "Battery");
        assert_eq!(
            entries[1].placement_offset,
            vec![GridPosition::new(0, 0), GridPosition::new(1, 0), GridPosition::new(0, 1)]
        );
    }

    #[test]
    fn oversized_rectangles_are_skipped() {
        let json = r#"[
            {"name": "Huge", "display_name": "Huge", "width": 65536, "height": 65536},
            {"name": "Tile", "display_name": "Tile", "width": 1, "height": 1}
        ]"#;
        let entries = parse_catalog(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Tile");
    }

    #[test]
    fn fractional_offsets_are_invalid_footprints() {
        let raw: RawBuildingDef = serde_json::from_str(
            r#"{"name": "Bad", "display_name": "Bad", "width": 1, "height": 1,
                "placement_offset": [{"x": 0.5, "y": 0}]}"#,
        )
        .unwrap();
        let err = raw.into_def().unwrap_err();
        assert!(matches!(err, PlannerError::InvalidFootprint { ref building, .. } if building == "Bad"));
    }

    #[test]
    fn empty_rectangles_are_invalid_footprints() {
        let raw: RawBuildingDef = serde_json::from_str(
            r#"{"name": "Flat", "display_name": "Flat", "width": 3, "height": 0}"#,
        )
        .unwrap();
        assert!(matches!(raw.into_def(), Err(PlannerError::InvalidFootprint { .. })));
    }

    #[test]
    fn empty_offset_list_falls_back_to_rectangle() {
        let entries = parse_catalog(
            r#"[{"name": "Box", "display_name": "Box", "width": 2, "height": 1, "placement_offset": []}]"#,
        )
        .unwrap();
        assert!(!entries[0].has_explicit_offsets());
    }

    #[test]
    fn invalid_records_are_skipped() {
        let json = r#"[
            {"name": "Good", "display_name": "Good", "width": 1, "height": 1},
            {"name": "Bad", "display_name": "Bad", "width": 1, "height": 1,
             "placement_offset": [{"x": 0.25, "y": 1}]},
            {"display_name": "Nameless", "width": 1, "height": 1}
        ]"#;
        let entries = parse_catalog(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Good");
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(parse_catalog("{not json"), Err(PlannerError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_catalog("does/not/exist/catalog.json"),
            Err(PlannerError::Io(_))
        ));
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = BuildingCatalog::builtin();
        assert!(catalog.len() <= 9);
        assert!(catalog.find("Gas Pipe").is_some_and(|def| def.is_drag_build));
        assert!(catalog.find("ManualGenerator").is_some());
        assert!(catalog
            .iter()
            .all(|def| def.has_explicit_offsets() || (def.width > 0 && def.height > 0)));
    }

    #[test]
    fn shipped_catalog_parses() {
        let entries = parse_catalog(include_str!("../../assets/catalog/buildings.json")).unwrap();
        assert_eq!(entries.len(), BuildingCatalog::builtin().len());
    }
}
