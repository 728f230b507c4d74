use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use dartvision_core::io::source::ImageSequenceSource;
use dartvision_core::oracle::{AnalysisOracle, GeminiOracle, ScriptedOracle};
use dartvision_core::pipeline::{CaptureLoop, LoopSummary, SessionCommand};
use tokio::sync::mpsc;

use super::load_config;
use crate::sink::TerminalSink;

#[derive(Args)]
pub struct RunArgs {
    /// Directory of frames to replay as the camera feed
    #[arg(long)]
    pub frames: PathBuf,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Replay oracle answers from a JSON script instead of calling the API
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Start scoring right away without calibrating
    #[arg(long)]
    pub skip_calibration: bool,

    /// Restart from the first frame when the directory is exhausted
    #[arg(long)]
    pub loop_frames: bool,

    /// Stop after this many completed cycles
    #[arg(long)]
    pub max_cycles: Option<usize>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let source = ImageSequenceSource::open(&args.frames, args.loop_frames)
        .with_context(|| format!("Failed to open frames in {}", args.frames.display()))?;
    if source.is_empty() {
        bail!("No images found in {}", args.frames.display());
    }
    let max_cycles = match (args.max_cycles, args.loop_frames) {
        (Some(n), _) => Some(n),
        (None, false) => Some(source.len()),
        (None, true) => None,
    };

    let oracle: Arc<dyn AnalysisOracle> = match args.script {
        Some(ref path) => Arc::new(
            ScriptedOracle::from_json_file(path)
                .with_context(|| format!("Failed to load script {}", path.display()))?,
        ),
        None => Arc::new(GeminiOracle::new(&config.oracle)?),
    };

    println!("{}", style("DartVision").bold());
    println!("  Frames:   {} ({} images)", args.frames.display(), source.len());
    println!("  Oracle:   {}", oracle.name());
    println!(
        "  Periods:  {} ms calibrating, {} ms scoring",
        config.scheduler.calibration_period_ms, config.scheduler.active_period_ms
    );
    println!("  Window:   {} readings ({})", config.stability.vote_window, config.stability.marker_policy);
    println!("  Keys:     s+Enter skip setup, r+Enter reset, c+Enter recalibrate, Ctrl-C quit");
    println!();

    let sink = Arc::new(TerminalSink::new());
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(cmd_tx);

    let mut capture = CaptureLoop::new(config, source, oracle, sink.clone()).with_commands(cmd_rx);
    if let Some(n) = max_cycles {
        capture = capture.with_max_cycles(n);
    }

    capture.handle(SessionCommand::StartCalibration);
    if args.skip_calibration {
        capture.handle(SessionCommand::SkipCalibration);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let summary = runtime.block_on(capture.run(async {
        let _ = tokio::signal::ctrl_c().await;
    }));
    runtime.shutdown_background();

    sink.finish();
    print_summary(&summary);
    Ok(())
}

/// Forward single-letter commands typed on stdin to the capture loop.
fn spawn_stdin_reader(tx: mpsc::UnboundedSender<SessionCommand>) {
    let spawned = std::thread::Builder::new()
        .name("dartvision-stdin".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let command = match line.trim() {
                    "s" => SessionCommand::SkipCalibration,
                    "r" => SessionCommand::ResetScore,
                    "c" => SessionCommand::Recalibrate,
                    _ => continue,
                };
                if tx.send(command).is_err() {
                    break;
                }
            }
        });
    if let Err(err) = spawned {
        tracing::warn!(error = %err, "Keyboard commands unavailable");
    }
}

fn print_summary(summary: &LoopSummary) {
    println!();
    println!("Final score: {}", style(summary.final_score).bold().green());
    println!("  Phase:    {}", summary.final_phase);
    println!("  Ticks:    {}", summary.ticks);
    println!("  Cycles:   {}", summary.cycles);
    println!(
        "  Dropped:  {} in flight, {} not ready",
        summary.dropped_in_flight, summary.dropped_not_ready
    );
    println!("  Failures: {}", summary.failures);
}
