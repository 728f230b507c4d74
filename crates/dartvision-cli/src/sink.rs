use std::io::Write;
use std::time::Duration;

use console::style;
use dartvision_core::detection::Projectile;
use dartvision_core::feedback::FeedbackSink;
use dartvision_core::session::{SessionPhase, TransitionCause};
use dartvision_core::stability::ConfirmedState;
use indicatif::{ProgressBar, ProgressStyle};

/// How many of the most recent projectiles are listed after a commit.
const RECENT_PROJECTILES: usize = 3;

/// Renders session events on the terminal: a status spinner, score lines
/// and a bell as the audio cue.
pub struct TerminalSink {
    spinner: ProgressBar,
}

impl TerminalSink {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("Idle");
        Self { spinner }
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn chime(&self) {
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

fn format_recent(projectiles: &[Projectile]) -> String {
    projectiles
        .iter()
        .rev()
        .take(RECENT_PROJECTILES)
        .map(|p| format!("{} ({})", p.zone_label, p.point_value))
        .collect::<Vec<_>>()
        .join("  ")
}

impl FeedbackSink for TerminalSink {
    fn on_phase_changed(&self, from: SessionPhase, to: SessionPhase, cause: TransitionCause) {
        let line = format!("{from} -> {to} ({cause})");
        match cause {
            TransitionCause::SignalLost => {
                self.spinner.println(style(format!("Target lost: {line}")).red().to_string())
            }
            TransitionCause::Calibrated => {
                self.spinner.println(style(format!("Setup complete: {line}")).green().to_string());
                self.chime();
            }
            TransitionCause::UserRequest => self.spinner.println(line),
        }
        self.spinner.set_message(to.to_string());
    }

    fn on_score_committed(&self, state: &ConfirmedState) {
        self.spinner.println(format!(
            "{} {}   {}",
            style("Score").bold(),
            style(state.score).bold().green(),
            format_recent(&state.projectiles)
        ));
        self.chime();
    }

    fn on_calibration_status(&self, text: &str) {
        self.spinner.set_message(format!("Calibrating: {text}"));
    }

    fn on_cycle_failed(&self, reason: &str) {
        self.spinner.set_message(style(format!("Cycle failed: {reason}")).yellow().to_string());
    }

    fn on_markers_refreshed(&self, projectiles: &[Projectile]) {
        self.spinner.set_message(format!("Active: {}", format_recent(projectiles)));
    }

    fn on_state_cleared(&self) {
        self.spinner.println(style("Score reset").dim().to_string());
    }
}
