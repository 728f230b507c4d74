use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::detection::{Detection, Projectile};
use crate::pipeline::config::{MarkerPolicy, StabilityConfig};

use super::vote_buffer::{Reading, VoteBuffer};

/// The authoritative score and marker positions shown to the player.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedState {
    pub score: u32,
    pub projectiles: Vec<Projectile>,
}

/// What a single reading did to the confirmed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vote {
    /// The window agreed on a new score; score and markers were replaced.
    Committed,
    /// The window agreed on the current score.
    Agreed { markers_refreshed: bool },
    /// The window disagreed; the score was left alone.
    Rejected { markers_refreshed: bool },
}

impl Vote {
    pub fn markers_refreshed(&self) -> bool {
        match self {
            Self::Committed => true,
            Self::Agreed { markers_refreshed } | Self::Rejected { markers_refreshed } => {
                *markers_refreshed
            }
        }
    }
}

/// Temporal vote over the last `k` readings deciding when the score may change.
#[derive(Clone, Debug)]
pub struct StabilityAggregator {
    buffer: VoteBuffer,
    confirmed: ConfirmedState,
    policy: MarkerPolicy,
}

impl StabilityAggregator {
    pub fn new(config: &StabilityConfig) -> Self {
        Self {
            buffer: VoteBuffer::new(config.vote_window),
            confirmed: ConfirmedState::default(),
            policy: config.marker_policy,
        }
    }

    pub fn confirmed(&self) -> &ConfirmedState {
        &self.confirmed
    }

    pub fn buffer(&self) -> &VoteBuffer {
        &self.buffer
    }

    pub fn policy(&self) -> MarkerPolicy {
        self.policy
    }

    /// Feed one reading from a detection that saw the surface.
    pub fn observe(&mut self, detection: &Detection) -> Vote {
        let reading = Reading::from(detection);
        self.buffer.push(reading.clone());

        if !self.buffer.all_agree() {
            let markers_refreshed =
                self.policy == MarkerPolicy::Always && self.refresh_markers(&reading.projectiles);
            debug!(
                scores = ?self.buffer.scores(),
                markers_refreshed,
                "Readings disagree, discarding as noise"
            );
            return Vote::Rejected { markers_refreshed };
        }

        if reading.score != self.confirmed.score {
            info!(
                from = self.confirmed.score,
                to = reading.score,
                projectiles = reading.projectiles.len(),
                "Score committed"
            );
            self.confirmed = ConfirmedState {
                score: reading.score,
                projectiles: reading.projectiles,
            };
            return Vote::Committed;
        }

        let markers_refreshed =
            self.policy != MarkerPolicy::OnCommit && self.refresh_markers(&reading.projectiles);
        debug!(score = reading.score, markers_refreshed, "Score unchanged");
        Vote::Agreed { markers_refreshed }
    }

    /// Clear the vote window and the confirmed state together.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.confirmed = ConfirmedState::default();
    }

    fn refresh_markers(&mut self, projectiles: &[Projectile]) -> bool {
        if self.confirmed.projectiles == projectiles {
            return false;
        }
        self.confirmed.projectiles = projectiles.to_vec();
        true
    }
}
