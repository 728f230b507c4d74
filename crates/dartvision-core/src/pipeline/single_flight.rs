use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Capacity-1 slot with try-acquire semantics.
///
/// A second caller is turned away rather than queued. The slot is released
/// when the returned guard is dropped, on every exit path.
#[derive(Clone, Debug)]
pub struct SingleFlight {
    slot: Arc<Semaphore>,
}

/// Proof of holding the single-flight slot.
#[derive(Debug)]
pub struct FlightGuard {
    _permit: OwnedSemaphorePermit,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the slot if it is free.
    pub fn try_begin(&self) -> Option<FlightGuard> {
        Arc::clone(&self.slot)
            .try_acquire_owned()
            .ok()
            .map(|permit| FlightGuard { _permit: permit })
    }

    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}
