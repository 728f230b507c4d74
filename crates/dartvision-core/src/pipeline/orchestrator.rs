use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, OptionFuture};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::feedback::{dispatch, FeedbackSink, SessionEvent};
use crate::io::source::FrameSource;
use crate::oracle::AnalysisOracle;
use crate::session::Session;

use super::config::DartConfig;
use super::cycle::run_cycle;
use super::scheduler::CaptureScheduler;
use super::types::{CycleOutcome, DropReason, LoopSummary, SessionCommand, TickDecision};

enum LoopEvent {
    Shutdown,
    Completed(CycleOutcome),
    Command(SessionCommand),
    CommandsClosed,
    Tick,
}

/// Timer-driven capture loop.
///
/// Runs on a single task: ticks, command handling and application of cycle
/// results are serialized, and the oracle call is the only suspension point.
/// Results are applied in completion order, which under single-flight is
/// also initiation order.
pub struct CaptureLoop<S: FrameSource> {
    config: DartConfig,
    source: S,
    oracle: Arc<dyn AnalysisOracle>,
    sink: Arc<dyn FeedbackSink>,
    scheduler: CaptureScheduler,
    session: Session,
    commands: Option<UnboundedReceiver<SessionCommand>>,
    max_cycles: Option<usize>,
}

impl<S: FrameSource> CaptureLoop<S> {
    pub fn new(
        config: DartConfig,
        source: S,
        oracle: Arc<dyn AnalysisOracle>,
        sink: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            scheduler: CaptureScheduler::new(config.scheduler.clone()),
            session: Session::new(&config),
            config,
            source,
            oracle,
            sink,
            commands: None,
            max_cycles: None,
        }
    }

    /// Receive player commands while running.
    pub fn with_commands(mut self, commands: UnboundedReceiver<SessionCommand>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Stop after this many completed cycles.
    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply a player command immediately and notify the sink.
    pub fn handle(&mut self, command: SessionCommand) -> Vec<SessionEvent> {
        let events = self.session.handle(command);
        dispatch(self.sink.as_ref(), &events);
        events
    }

    /// Run until `shutdown` resolves, the cycle budget is spent or a finite
    /// source has no frames left.
    ///
    /// A cycle still in flight at shutdown is dropped without being applied.
    pub async fn run<F>(&mut self, shutdown: F) -> LoopSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut summary = LoopSummary::default();
        let mut pending: Option<BoxFuture<'static, CycleOutcome>> = None;
        let mut last_tick = Instant::now();
        let mut next_tick = last_tick + self.scheduler.period_for(self.session.phase());

        info!(phase = %self.session.phase(), oracle = self.oracle.name(), "Capture loop started");

        loop {
            let event = tokio::select! {
                biased;
                _ = &mut shutdown => LoopEvent::Shutdown,
                Some(outcome) = OptionFuture::from(pending.as_mut()) => LoopEvent::Completed(outcome),
                command = next_command(&mut self.commands) => match command {
                    Some(command) => LoopEvent::Command(command),
                    None => LoopEvent::CommandsClosed,
                },
                _ = sleep_until(next_tick) => LoopEvent::Tick,
            };

            let phase_before = self.session.phase();
            match event {
                LoopEvent::Shutdown => break,
                LoopEvent::Completed(outcome) => {
                    pending = None;
                    summary.cycles += 1;
                    if matches!(
                        outcome,
                        CycleOutcome::OracleFailed(_) | CycleOutcome::Abandoned(_)
                    ) {
                        summary.failures += 1;
                    }
                    let events = self.session.apply_outcome(outcome);
                    dispatch(self.sink.as_ref(), &events);
                    if self.max_cycles.is_some_and(|max| summary.cycles >= max) {
                        break;
                    }
                    if self.source.is_exhausted() {
                        info!("Frame source exhausted");
                        break;
                    }
                }
                LoopEvent::Command(command) => {
                    self.handle(command);
                }
                LoopEvent::CommandsClosed => {
                    debug!("Command channel closed");
                    self.commands = None;
                }
                LoopEvent::Tick => {
                    summary.ticks += 1;
                    last_tick = Instant::now();
                    match self.scheduler.tick(&mut self.source, phase_before) {
                        Ok(TickDecision::Accepted { frame, kind, guard }) => {
                            let oracle = Arc::clone(&self.oracle);
                            let preprocess = self.config.preprocess.clone();
                            pending = Some(Box::pin(async move {
                                let _guard = guard;
                                run_cycle(frame, kind, oracle.as_ref(), &preprocess).await
                            }));
                        }
                        Ok(TickDecision::Dropped(reason)) => match reason {
                            DropReason::InFlight => summary.dropped_in_flight += 1,
                            DropReason::NotReady => summary.dropped_not_ready += 1,
                            DropReason::Idle => summary.dropped_idle += 1,
                        },
                        Err(err) => {
                            warn!(error = %err, "Frame acquisition failed");
                            summary.failures += 1;
                            dispatch(
                                self.sink.as_ref(),
                                &[SessionEvent::CycleFailed(err.reason().to_string())],
                            );
                        }
                    }
                    if pending.is_none() && self.source.is_exhausted() {
                        info!("Frame source exhausted");
                        break;
                    }
                    next_tick = last_tick + self.scheduler.period_for(phase_before);
                    continue;
                }
            }

            // A phase change re-arms the pending deadline with the new phase's period.
            let phase = self.session.phase();
            if phase != phase_before {
                next_tick = last_tick + self.scheduler.period_for(phase);
                debug!(%phase, "Tick period re-armed");
            }
        }

        summary.final_phase = self.session.phase();
        summary.final_score = self.session.confirmed().score;
        info!(
            ticks = summary.ticks,
            cycles = summary.cycles,
            failures = summary.failures,
            score = summary.final_score,
            "Capture loop stopped"
        );
        summary
    }
}

async fn next_command(commands: &mut Option<UnboundedReceiver<SessionCommand>>) -> Option<SessionCommand> {
    match commands {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
