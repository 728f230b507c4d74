use tracing::debug;

use crate::frame::Frame;
use crate::oracle::AnalysisOracle;
use crate::preprocess::prepare;

use super::config::PreprocessConfig;
use super::types::{CycleKind, CycleOutcome};

/// Preprocess `frame` and ask the oracle the question for `kind`.
///
/// Never fails outright: every error is folded into the returned outcome.
/// The prepared input lives only as long as this call.
pub async fn run_cycle(
    frame: Frame,
    kind: CycleKind,
    oracle: &dyn AnalysisOracle,
    config: &PreprocessConfig,
) -> CycleOutcome {
    let input = match prepare(&frame, config) {
        Ok(input) => input,
        Err(err) => return CycleOutcome::Abandoned(err),
    };
    drop(frame);

    debug!(%kind, oracle = oracle.name(), "Submitting frame");
    match kind {
        CycleKind::Calibration => match oracle.check_calibration(&input).await {
            Ok(report) => CycleOutcome::Calibration(report),
            Err(err) => CycleOutcome::OracleFailed(err),
        },
        CycleKind::Scoring => match oracle.score_frame(&input).await {
            Ok(detection) => CycleOutcome::Detection(detection),
            Err(err) => CycleOutcome::OracleFailed(err),
        },
    }
}
