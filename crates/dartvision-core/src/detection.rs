use serde::{Deserialize, Serialize};

use crate::consts::{GRID_CENTER, GRID_MAX};

/// Location on the normalized 0-1000 grid laid over the analysed frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Build a position, clamping both axes onto the grid.
    pub fn new(x: f32, y: f32) -> Self {
        let clamp = |v: f32| if v.is_nan() { GRID_CENTER } else { v.clamp(0.0, GRID_MAX) };
        Self {
            x: clamp(x),
            y: clamp(y),
        }
    }

    pub fn center() -> Self {
        Self {
            x: GRID_CENTER,
            y: GRID_CENTER,
        }
    }
}

/// A projectile stuck in the surface.
///
/// Identity is positional: projectiles are re-detected every cycle and never
/// tracked across frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Zone label, e.g. "T20", "D16", "BULL".
    pub zone_label: String,
    pub point_value: u32,
    pub position: Position,
}

/// One scoring reading returned by the oracle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub surface_present: bool,
    pub status_text: String,
    pub projectiles: Vec<Projectile>,
    pub aggregate_score: u32,
    pub sectors_resolved: bool,
}

impl Detection {
    /// The reading used in place of a failed oracle call.
    pub fn non_detection(reason: impl Into<String>) -> Self {
        Self {
            surface_present: false,
            status_text: reason.into(),
            projectiles: Vec::new(),
            aggregate_score: 0,
            sectors_resolved: false,
        }
    }
}

/// Result of a calibration check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub surface_present: bool,
    pub sectors_resolved: bool,
    pub status_text: String,
}

impl CalibrationReport {
    /// The surface is in view and its sectors could be read.
    pub fn is_ready(&self) -> bool {
        self.surface_present && self.sectors_resolved
    }
}
