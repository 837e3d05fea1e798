//! `prospector` binary: runs a generated cave world with a scripted or
//! stdin-driven player and prints engine snapshots as JSON lines.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use prospector_app::components::Inventory;
use prospector_app::game_loop::{spawn_game_loop, LoopOptions, DEFAULT_TICK_RATE};
use prospector_app::logging;
use prospector_app::session::SessionSetup;
use prospector_app::signal::CueSignal;
use prospector_app::state::{AppError, GameLoopCommand};
use prospector_core::binding::{Binding, Signal};
use prospector_core::constants::{CAVE_DETECTOR_ID, ORE_DETECTOR_ID, SCANNER_BEEP_CUE};
use prospector_engine::config::{DetectorConfig, EngineConfig};
use prospector_engine::presets;
use prospector_world::{CaveGenConfig, CaveGenerator};

#[derive(Debug, Parser)]
#[command(name = "prospector", about = "Headless proximity detector demo")]
struct Args {
    /// World generation seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many ticks. Runs until `quit` on stdin if omitted.
    #[arg(long)]
    ticks: Option<u64>,

    /// JSON detector configuration. Uses the bundled presets if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `prospector_engine=debug`.
    /// Falls back to `RUST_LOG`, then `info`.
    #[arg(long)]
    log: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    tick_rate: u32,
}

fn signal_for(detector: &str, cue: Option<&str>) -> Arc<dyn Signal> {
    Arc::new(CueSignal::new(detector, cue.unwrap_or(SCANNER_BEEP_CUE)))
}

fn load_bindings(args: &Args) -> Result<(Vec<Binding>, EngineConfig), AppError> {
    match &args.config {
        Some(path) => {
            let config = DetectorConfig::load(path)?;
            let bindings = config.bindings(|spec| signal_for(&spec.id, spec.cue.as_deref()))?;
            info!(path = %path.display(), detectors = bindings.len(), "Configuration loaded");
            Ok((bindings, config.engine))
        }
        None => {
            let bindings = vec![
                presets::cave_detector(signal_for(CAVE_DETECTOR_ID, None))?,
                presets::ore_detector(signal_for(ORE_DETECTOR_ID, None))?,
            ];
            Ok((bindings, EngineConfig::default()))
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(logging::env_filter(args.log.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(seed = args.seed, "prospector starting");

    let generator = CaveGenerator::new(CaveGenConfig {
        seed: args.seed,
        ..CaveGenConfig::default()
    });
    let voxels = generator.generate();
    info!(chunks = voxels.loaded_chunks(), "World generated");

    let (bindings, config) = load_bindings(&args)?;
    let mut slots: Vec<Option<String>> =
        bindings.iter().map(|b| Some(b.detector_id().to_owned())).collect();
    slots.push(None);

    let setup = SessionSetup {
        voxels,
        bindings,
        config,
        spawn: generator.spawn_point().as_dvec3(),
        inventory: Inventory { slots },
    };
    let options = LoopOptions {
        tick_rate: args.tick_rate,
        max_ticks: args.ticks,
    };

    // Print only snapshots that follow a new scan.
    let mut last_scan = 0;
    let (cmd_tx, handle) = spawn_game_loop(setup, options, move |snapshot| {
        if snapshot.scan_count == last_scan {
            return;
        }
        last_scan = snapshot.scan_count;
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(%err, "Failed to serialize snapshot"),
        }
    })?;

    // With a tick limit, closing stdin must not end the loop early.
    let _keepalive = args.ticks.map(|_| cmd_tx.clone());

    // Forward stdin commands. The thread dies with the process.
    std::thread::Builder::new()
        .name("prospector-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<GameLoopCommand>() {
                    Ok(cmd) => {
                        if cmd_tx.send(cmd).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "Ignoring input"),
                }
            }
        })?;

    let ticks = handle.join().map_err(|_| AppError::LoopPanicked)??;
    info!(ticks, "prospector finished");
    Ok(())
}
