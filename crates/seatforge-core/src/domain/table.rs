use serde::{Deserialize, Serialize};

use super::TableId;

/// Display shape of a table. Has no influence on planning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    #[default]
    Round,
    Rect,
}

/// Floor position of a table, used by distance constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePos {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub angle: f64,
}

impl TablePos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, angle: 0.0 }
    }

    /// Euclidean distance between the two table centers.
    pub fn distance(&self, other: &TablePos) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A table with `capacity` seats indexed `0..capacity`.
///
/// A locked table keeps its seat contents for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: TableId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shape: TableShape,
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<TablePos>,
}

impl Table {
    pub fn new(id: impl Into<TableId>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            shape: TableShape::Round,
            capacity,
            zone: None,
            locked: false,
            pos: None,
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_shape(mut self, shape: TableShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_pos(mut self, x: f64, y: f64) -> Self {
        self.pos = Some(TablePos::new(x, y));
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn zone_is(&self, zone: &str) -> bool {
        self.zone.as_deref() == Some(zone)
    }
}
