//! Response schemas exchanged with the oracle and their conversion into the
//! core's detection model.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::detection::{CalibrationReport, Detection, Position, Projectile};
use crate::error::{DartError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCalibration {
    pub detected: bool,
    #[serde(default)]
    pub sectors_identified: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScore {
    pub detected: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub darts: Vec<WireDart>,
    #[serde(default)]
    pub total_score: Option<f64>,
    #[serde(default)]
    pub sectors_identified: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct WireDart {
    pub zone: String,
    pub score: f64,
    #[serde(default)]
    pub coordinates: Option<WireCoordinates>,
}

#[derive(Debug, Deserialize)]
pub struct WireCoordinates {
    pub x: f64,
    pub y: f64,
}

impl From<WireCalibration> for CalibrationReport {
    fn from(w: WireCalibration) -> Self {
        Self {
            surface_present: w.detected,
            sectors_resolved: w.sectors_identified,
            status_text: w.message,
        }
    }
}

impl From<WireDart> for Projectile {
    fn from(w: WireDart) -> Self {
        Self {
            zone_label: w.zone,
            point_value: to_points(w.score),
            position: w
                .coordinates
                .map(|c| Position::new(c.x as f32, c.y as f32))
                .unwrap_or_else(Position::center),
        }
    }
}

impl From<WireScore> for Detection {
    fn from(w: WireScore) -> Self {
        Self {
            surface_present: w.detected,
            status_text: w.message,
            aggregate_score: w.total_score.map(to_points).unwrap_or(0),
            sectors_resolved: w.sectors_identified.unwrap_or(w.detected),
            projectiles: w.darts.into_iter().map(Projectile::from).collect(),
        }
    }
}

/// Round a reported score to whole points; negative or non-finite values become 0.
fn to_points(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Parse the JSON object in `text`, tolerating prose around it.
pub fn extract_json(text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .or_else(|_| match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&text[start..=end]),
            _ => Err(serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "No JSON found in response",
            ))),
        })
        .map_err(|e| DartError::OracleFormat(e.to_string()))
}

pub fn parse_calibration(text: &str) -> Result<CalibrationReport> {
    let value = extract_json(text)?;
    let wire: WireCalibration =
        serde_json::from_value(value).map_err(|e| DartError::OracleFormat(e.to_string()))?;
    Ok(wire.into())
}

pub fn parse_detection(text: &str) -> Result<Detection> {
    let value = extract_json(text)?;
    let wire: WireScore =
        serde_json::from_value(value).map_err(|e| DartError::OracleFormat(e.to_string()))?;
    Ok(wire.into())
}

/// Response schema for calibration checks.
pub fn calibration_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "detected": { "type": "BOOLEAN" },
            "sectorsIdentified": { "type": "BOOLEAN" },
            "message": { "type": "STRING" }
        },
        "required": ["detected", "sectorsIdentified", "message"]
    })
}

/// Response schema for scoring.
pub fn scoring_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "detected": { "type": "BOOLEAN" },
            "message": {
                "type": "STRING",
                "description": "A brief summary of the detection result."
            },
            "darts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "zone": {
                            "type": "STRING",
                            "description": "Sector and ring, e.g. 'T20', 'D16', 'S1', 'BULL'."
                        },
                        "score": { "type": "NUMBER" },
                        "coordinates": {
                            "type": "OBJECT",
                            "properties": {
                                "x": { "type": "NUMBER", "description": "Tip X (0-1000)." },
                                "y": { "type": "NUMBER", "description": "Tip Y (0-1000)." }
                            },
                            "required": ["x", "y"]
                        }
                    },
                    "required": ["zone", "score", "coordinates"]
                }
            },
            "totalScore": { "type": "NUMBER" },
            "confidence": { "type": "NUMBER", "description": "0.0 to 1.0" }
        },
        "required": ["detected", "message", "darts", "totalScore"]
    })
}
