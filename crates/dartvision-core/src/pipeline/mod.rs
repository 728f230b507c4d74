pub mod config;
mod cycle;
mod orchestrator;
mod scheduler;
mod single_flight;
mod types;

pub use cycle::run_cycle;
pub use orchestrator::CaptureLoop;
pub use scheduler::CaptureScheduler;
pub use single_flight::{FlightGuard, SingleFlight};
pub use types::{CycleKind, CycleOutcome, DropReason, LoopSummary, SessionCommand, TickDecision};
