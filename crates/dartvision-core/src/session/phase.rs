use serde::{Deserialize, Serialize};

/// Operating phase of a scoring session.
///
/// `Idle -> Calibrating -> Active`, with `Active -> Calibrating` as the only
/// way back. There is no terminal phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    Calibrating,
    Active,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Calibrating => write!(f, "Calibrating"),
            Self::Active => write!(f, "Active"),
        }
    }
}

/// Why a phase transition happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionCause {
    /// Requested by the player (start, skip setup, recalibrate).
    UserRequest,
    /// The oracle confirmed the surface and its sectors.
    Calibrated,
    /// Too many consecutive scoring cycles without the surface in view.
    SignalLost,
}

impl std::fmt::Display for TransitionCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserRequest => write!(f, "User request"),
            Self::Calibrated => write!(f, "Calibrated"),
            Self::SignalLost => write!(f, "Signal lost"),
        }
    }
}
