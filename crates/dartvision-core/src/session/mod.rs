mod machine;
mod phase;

pub use machine::Session;
pub use phase::{SessionPhase, TransitionCause};
