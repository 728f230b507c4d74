use std::collections::VecDeque;

use image::{Rgb, RgbImage};

use dartvision_core::detection::{CalibrationReport, Detection, Position, Projectile};
use dartvision_core::error::{DartError, Result};
use dartvision_core::frame::Frame;
use dartvision_core::io::source::FrameSource;
use dartvision_core::oracle::ScriptStep;
use dartvision_core::pipeline::config::DartConfig;

/// A projectile at a fixed grid position.
pub fn projectile(zone: &str, points: u32, x: f32, y: f32) -> Projectile {
    Projectile {
        zone_label: zone.to_string(),
        point_value: points,
        position: Position::new(x, y),
    }
}

/// A surface-present detection whose total is the sum of `projectiles`.
pub fn detection_with(projectiles: Vec<Projectile>) -> Detection {
    Detection {
        surface_present: true,
        status_text: String::new(),
        aggregate_score: projectiles.iter().map(|p| p.point_value).sum(),
        projectiles,
        sectors_resolved: true,
    }
}

/// A surface-present detection with a single projectile worth `score`.
pub fn detection(score: u32) -> Detection {
    detection_with(vec![projectile("S", score, 500.0, 500.0)])
}

/// A reading where the surface was not found.
pub fn miss() -> Detection {
    Detection::non_detection("no board")
}

pub fn calibration(ready: bool, message: &str) -> CalibrationReport {
    CalibrationReport {
        surface_present: ready,
        sectors_resolved: ready,
        status_text: message.to_string(),
    }
}

pub fn score_step(score: u32) -> ScriptStep {
    ScriptStep::Detection(detection(score))
}

/// Synthetic camera frame: dark background with a bright ring and a diagonal shaft.
pub fn synthetic_frame(width: u32, height: u32) -> Frame {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = width.min(height) as f32 / 3.0;
    let image = RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let dist = (dx * dx + dy * dy).sqrt();
        if (dist - radius).abs() < 2.0 {
            Rgb([220, 40, 40])
        } else if x == y {
            Rgb([240, 240, 240])
        } else {
            Rgb([30 + (x % 7) as u8, 60, 30 + (y % 5) as u8])
        }
    });
    Frame::new(image)
}

/// Small config so that preprocessing stays cheap in tests.
pub fn test_config() -> DartConfig {
    let mut config = DartConfig::default();
    config.preprocess.target_width = 64;
    config
}

/// Frame source driven by a queue. `None` entries report "not ready".
/// Once the queue is drained every call yields a fresh synthetic frame.
pub struct VecSource {
    queue: VecDeque<Option<Frame>>,
    errors: usize,
    pub acquired: usize,
}

impl VecSource {
    pub fn endless() -> Self {
        Self::new(Vec::new())
    }

    pub fn new(queue: Vec<Option<Frame>>) -> Self {
        Self {
            queue: queue.into(),
            errors: 0,
            acquired: 0,
        }
    }

    /// The first `errors` acquisitions fail as if the device dropped out.
    pub fn failing(errors: usize) -> Self {
        Self {
            errors,
            ..Self::endless()
        }
    }
}

impl FrameSource for VecSource {
    fn acquire(&mut self) -> Result<Option<Frame>> {
        self.acquired += 1;
        if self.errors > 0 {
            self.errors -= 1;
            return Err(DartError::Io(std::io::Error::other("camera unplugged")));
        }
        match self.queue.pop_front() {
            Some(entry) => Ok(entry),
            None => Ok(Some(synthetic_frame(80, 60))),
        }
    }
}
