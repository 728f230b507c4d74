use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::io::source::FrameSource;
use crate::session::SessionPhase;

use super::config::SchedulerConfig;
use super::single_flight::SingleFlight;
use super::types::{CycleKind, DropReason, TickDecision};

/// Decides, tick by tick, whether a new cycle may start.
///
/// Ticks that arrive while a cycle is in flight are dropped, never queued.
#[derive(Clone, Debug)]
pub struct CaptureScheduler {
    config: SchedulerConfig,
    flight: SingleFlight,
}

impl CaptureScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            flight: SingleFlight::new(),
        }
    }

    /// Period until the next tick; read fresh on every tick.
    pub fn period_for(&self, phase: SessionPhase) -> Duration {
        self.config.period_for(phase)
    }

    pub fn in_flight(&self) -> bool {
        self.flight.is_busy()
    }

    /// Handle one timer tick.
    ///
    /// Source errors are returned after the slot has been released.
    pub fn tick(&self, source: &mut dyn FrameSource, phase: SessionPhase) -> Result<TickDecision> {
        let Some(kind) = CycleKind::for_phase(phase) else {
            return Ok(TickDecision::Dropped(DropReason::Idle));
        };

        let Some(guard) = self.flight.try_begin() else {
            debug!(%phase, "Tick dropped, cycle in flight");
            return Ok(TickDecision::Dropped(DropReason::InFlight));
        };

        match source.acquire()? {
            Some(frame) => Ok(TickDecision::Accepted { frame, kind, guard }),
            None => {
                debug!(%phase, "Tick dropped, no frame ready");
                Ok(TickDecision::Dropped(DropReason::NotReady))
            }
        }
    }
}
